//! Password policy enforcement for new passwords.

use estate_core::config::AuthConfig;
use estate_core::error::AppError;

/// Validates new passwords against the configured length and entropy policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    min_strength: Option<zxcvbn::Score>,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let min_strength = match config.password_min_strength {
            0 => None,
            1 => Some(zxcvbn::Score::One),
            2 => Some(zxcvbn::Score::Two),
            3 => Some(zxcvbn::Score::Three),
            _ => Some(zxcvbn::Score::Four),
        };
        Self {
            min_length: config.password_min_length,
            min_strength,
        }
    }

    /// Validates a password, reporting the first violation found.
    ///
    /// `user_inputs` (email, names) are penalized by the entropy estimate.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if let Some(required) = self.min_strength {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if estimate.score() < required {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }
}

//! JWT signature and expiry verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use estate_core::config::AuthConfig;
use estate_core::error::AuthFailure;

use super::claims::Claims;

/// Verifies HS256 tokens and decodes their claims.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies the signature and embedded expiry, then returns the claims.
    ///
    /// An expired but otherwise genuine token maps to `TokenExpired`; every
    /// other decoding problem (bad signature, garbage, wrong algorithm,
    /// missing claims) maps to `InvalidSignature`.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthFailure> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthFailure::TokenExpired,
                _ => AuthFailure::InvalidSignature,
            })
    }
}

//! Path-based authorization.
//!
//! A static table maps URL path patterns to role requirements. Rules are
//! evaluated most-specific-first and the first match wins; a path no rule
//! covers requires authentication.

pub mod rules;

use estate_core::error::AuthFailure;
use estate_entity::user::UserRole;

use crate::gate::GateOutcome;

pub use rules::{PathPattern, Requirement, Rule, normalize};

/// Requirement applied when no rule matches.
static DEFAULT_REQUIREMENT: Requirement = Requirement::Authenticated;

/// Ordered authorization table.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    rules: Vec<Rule>,
}

impl AuthorizationPolicy {
    /// An empty table: every path requires authentication.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for one or more patterns and re-sort the table.
    ///
    /// Sorting is stable, so among equally specific patterns the one
    /// declared first wins.
    pub fn rule(mut self, patterns: &[&str], requirement: Requirement) -> Self {
        self.rules.extend(patterns.iter().map(|p| Rule {
            pattern: PathPattern::parse(p),
            requirement: requirement.clone(),
        }));
        self.rules.sort_by_key(|r| r.pattern.specificity());
        self
    }

    /// The route table served by the HTTP API.
    pub fn standard() -> Self {
        use Requirement::{Authenticated, HasAnyRole, HasRole, Public};
        use UserRole::{Admin, Customer, Dealer};

        Self::new()
            .rule(
                &[
                    "/api/v1/auth/authenticate",
                    "/api/v1/auth/register",
                    "/api/v1/auth/refresh",
                    "/api/health",
                ],
                Public,
            )
            .rule(
                &[
                    "/api/v1/auth/user",
                    "/api/v1/auth/resetPassword",
                    "/api/v1/auth/logout",
                ],
                Authenticated,
            )
            .rule(
                &[
                    "/api/v1/auth/userByAccessToken",
                    "/api/v1/auth/userByRefreshToken",
                ],
                HasRole(Admin),
            )
            .rule(&["/api/v1/admin/**"], HasRole(Admin))
            .rule(&["/api/v1/customer/**"], HasAnyRole(vec![Customer, Dealer]))
            .rule(&["/api/v1/dealer/**"], HasRole(Dealer))
            .rule(&["/api/v1/properties/**"], Public)
            .rule(&["/api/v1/user/**"], HasAnyRole(vec![Customer, Dealer]))
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The requirement governing `path`.
    pub fn requirement_for(&self, path: &str) -> &Requirement {
        let path = normalize(path);
        self.rules
            .iter()
            .find(|r| r.pattern.matches(path))
            .map(|r| &r.requirement)
            .unwrap_or(&DEFAULT_REQUIREMENT)
    }

    /// Decide whether the gate's outcome may proceed to `path`.
    ///
    /// A rejected token on a public route is treated as anonymous. On a
    /// protected route the rejection reason is reported as-is; a missing
    /// token reports `MissingToken`.
    pub fn authorize(&self, path: &str, outcome: &GateOutcome) -> Result<(), AuthFailure> {
        let requirement = self.requirement_for(path);
        if *requirement == Requirement::Public {
            return Ok(());
        }

        match outcome {
            GateOutcome::Anonymous => Err(AuthFailure::MissingToken),
            GateOutcome::Rejected(failure) => Err(*failure),
            GateOutcome::Authenticated(identity) if requirement.admits(identity.user.role) => {
                Ok(())
            }
            GateOutcome::Authenticated(_) => Err(AuthFailure::InsufficientRole),
        }
    }
}

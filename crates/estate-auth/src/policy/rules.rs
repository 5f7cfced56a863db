//! Path patterns and role requirements.

use std::fmt;

use estate_entity::user::UserRole;

/// What a route demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, including anonymous callers.
    Public,
    /// Any authenticated caller.
    Authenticated,
    /// A caller whose role satisfies this role.
    HasRole(UserRole),
    /// A caller whose role satisfies at least one of these roles.
    HasAnyRole(Vec<UserRole>),
}

impl Requirement {
    /// Whether a caller holding `role` passes. Only meaningful for
    /// authenticated callers.
    pub fn admits(&self, role: UserRole) -> bool {
        match self {
            Self::Public | Self::Authenticated => true,
            Self::HasRole(required) => role.satisfies(required),
            Self::HasAnyRole(allowed) => role.satisfies_any(allowed),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::HasRole(role) => write!(f, "hasRole({role})"),
            Self::HasAnyRole(roles) => {
                let names: Vec<&str> = roles.iter().map(UserRole::as_str).collect();
                write!(f, "hasAnyRole({})", names.join(","))
            }
        }
    }
}

/// A URL path pattern: either an exact path or a `/**` subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path only.
    Exact(String),
    /// Matches the base path and everything beneath it.
    Subtree(String),
}

impl PathPattern {
    /// Parse `"/a/b"` as exact and `"/a/**"` as a subtree.
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(base) => Self::Subtree(normalize(base).to_string()),
            None => Self::Exact(normalize(pattern).to_string()),
        }
    }

    /// Whether the normalized `path` falls under this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Subtree(base) => {
                base == "/"
                    || path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }

    /// Sort key: exact paths first, then longer subtrees before shorter.
    pub(crate) fn specificity(&self) -> (u8, std::cmp::Reverse<usize>) {
        match self {
            Self::Exact(path) => (0, std::cmp::Reverse(path.len())),
            Self::Subtree(base) => (1, std::cmp::Reverse(base.len())),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => write!(f, "{path}"),
            Self::Subtree(base) => write!(f, "{}/**", base.trim_end_matches('/')),
        }
    }
}

/// Strip trailing slashes, keeping the root as `/`.
pub fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// One row of the authorization table.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Which paths the rule covers.
    pub pattern: PathPattern,
    /// What those paths demand.
    pub requirement: Requirement,
}

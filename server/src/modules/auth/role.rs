use serde::{Deserialize, Serialize};

/// Closed set of account roles.
///
/// Role checks go through the policy functions in [`super::policy`], never
/// through string comparison at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Librarian,
    Member,
}

impl Role {
    /// Parse a role claim. Unknown values are rejected rather than
    /// defaulted, so a malformed token never gains access.
    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "librarian" => Some(Role::Librarian),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Librarian => "librarian",
            Role::Member => "member",
        }
    }

    /// Admin or librarian: the staff roles that manage the catalog.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Librarian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claim_known_roles() {
        assert_eq!(Role::from_claim("admin"), Some(Role::Admin));
        assert_eq!(Role::from_claim("librarian"), Some(Role::Librarian));
        assert_eq!(Role::from_claim("member"), Some(Role::Member));
    }

    #[test]
    fn test_from_claim_rejects_unknown() {
        assert_eq!(Role::from_claim("superuser"), None);
        assert_eq!(Role::from_claim(""), None);
        assert_eq!(Role::from_claim("Admin"), None);
    }
}

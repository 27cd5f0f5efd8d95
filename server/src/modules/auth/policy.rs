//! Per-action authorization policies.
//!
//! One function per (record type, action) pair:
//! - Admin: full access, including delete
//! - Librarian: view, create, update, toggle; never delete
//! - Member: read-only access to listings and active records

use super::Role;

pub mod books {
    use super::Role;

    /// Any authenticated user may see the book list.
    pub fn view_any(_role: Role) -> bool {
        true
    }

    /// Staff see every book; members only active ones.
    pub fn view(role: Role, is_active: bool) -> bool {
        role.is_staff() || is_active
    }

    pub fn create(role: Role) -> bool {
        role.is_staff()
    }

    pub fn update(role: Role) -> bool {
        role.is_staff()
    }

    pub fn delete(role: Role) -> bool {
        role == Role::Admin
    }
}

pub mod categories {
    use super::Role;

    pub fn view_any(_role: Role) -> bool {
        true
    }

    pub fn create(role: Role) -> bool {
        role.is_staff()
    }

    pub fn update(role: Role) -> bool {
        role.is_staff()
    }

    pub fn delete(role: Role) -> bool {
        role == Role::Admin
    }
}

pub mod references {
    use super::Role;

    pub fn view_any(_role: Role) -> bool {
        true
    }

    pub fn manage(role: Role) -> bool {
        role.is_staff()
    }

    pub fn delete(role: Role) -> bool {
        role == Role::Admin
    }
}

pub mod dashboard {
    use super::Role;

    /// Catalog-wide statistics are staff-only.
    pub fn view_stats(role: Role) -> bool {
        role.is_staff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_librarian_cannot_delete() {
        assert!(books::update(Role::Librarian));
        assert!(!books::delete(Role::Librarian));
        assert!(categories::create(Role::Librarian));
        assert!(!categories::delete(Role::Librarian));
    }

    #[test]
    fn test_member_is_read_only() {
        assert!(books::view_any(Role::Member));
        assert!(!books::create(Role::Member));
        assert!(!books::update(Role::Member));
        assert!(!books::delete(Role::Member));
        assert!(!dashboard::view_stats(Role::Member));
    }

    #[test]
    fn test_member_only_sees_active_books() {
        assert!(books::view(Role::Member, true));
        assert!(!books::view(Role::Member, false));
        assert!(books::view(Role::Librarian, false));
    }

    #[test]
    fn test_admin_has_full_access() {
        assert!(books::delete(Role::Admin));
        assert!(categories::delete(Role::Admin));
        assert!(references::delete(Role::Admin));
        assert!(dashboard::view_stats(Role::Admin));
    }
}

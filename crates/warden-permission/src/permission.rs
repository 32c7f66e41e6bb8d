//! The [`Permission`] trait and the catch-all [`AllPermission`].

use std::any::Any;
use std::fmt;

/// A grant that can be compared against a required permission.
///
/// Implication is asymmetric: a broad grant implies a narrow requirement but
/// not the other way round. Implementations only need to understand their
/// own concrete type; comparisons across unrelated types return `false`.
pub trait Permission: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Returns `true` if holding `self` grants everything `other` describes.
    fn implies(&self, other: &dyn Permission) -> bool;

    /// Upcast used by implementations to downcast the other side of an
    /// implication check.
    fn as_any(&self) -> &dyn Any;
}

/// A permission that implies every other permission.
///
/// Typically granted to administrative roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AllPermission;

impl Permission for AllPermission {
    fn implies(&self, _other: &dyn Permission) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for AllPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WildcardPermission;

    #[test]
    fn test_all_permission_implies_anything() {
        let all = AllPermission;
        let narrow = WildcardPermission::parse("printer:print:lp7200").unwrap();
        assert!(all.implies(&narrow));
        assert!(all.implies(&AllPermission));
    }

    #[test]
    fn test_wildcard_does_not_imply_foreign_type() {
        let star = WildcardPermission::parse("*").unwrap();
        assert!(!star.implies(&AllPermission));
    }
}

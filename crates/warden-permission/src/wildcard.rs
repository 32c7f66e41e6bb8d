//! Hierarchical wildcard permissions.
//!
//! A wildcard permission is a `:`-separated list of parts, each part a
//! `,`-separated set of tokens:
//!
//! ```text
//! printer:print,query:lp7200
//! ^^^^^^^ ^^^^^^^^^^^ ^^^^^^
//! domain  actions     instance
//! ```
//!
//! Matching is positional set containment. A granted permission implies a
//! required one when, for every position, the granted part either contains
//! `*` or contains every token of the required part. A shorter grant is
//! broader: missing trailing parts behave like `*`.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PermissionError, PermissionResult};
use crate::permission::Permission;

/// Token matching anything in its position.
pub const WILDCARD_TOKEN: &str = "*";
/// Separates parts.
pub const PART_DIVIDER: char = ':';
/// Separates tokens within a part.
pub const SUBPART_DIVIDER: char = ',';

/// A parsed wildcard permission.
///
/// Immutable once constructed. Every permission has at least one part and
/// every part has at least one token.
///
/// # Example
///
/// ```
/// use warden_permission::{Permission, WildcardPermission};
///
/// let granted = WildcardPermission::parse("printer:print").unwrap();
/// let required = WildcardPermission::parse("printer:print:lp7200").unwrap();
///
/// assert!(granted.implies(&required));
/// assert!(!required.implies(&granted));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardPermission {
    parts: Vec<BTreeSet<String>>,
    case_sensitive: bool,
}

impl WildcardPermission {
    /// Parse a permission string, lowercasing every token.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidFormat`] when the string is blank,
    /// contains only dividers, or has a part with no tokens.
    pub fn parse(input: &str) -> PermissionResult<Self> {
        Self::parse_with(input, false)
    }

    /// Parse a permission string, preserving token case.
    ///
    /// # Errors
    ///
    /// Same as [`WildcardPermission::parse`].
    pub fn parse_case_sensitive(input: &str) -> PermissionResult<Self> {
        Self::parse_with(input, true)
    }

    fn parse_with(input: &str, case_sensitive: bool) -> PermissionResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PermissionError::invalid(
                input,
                "permission string cannot be empty",
            ));
        }
        if trimmed.chars().all(|c| c == PART_DIVIDER) {
            return Err(PermissionError::invalid(
                input,
                "permission string cannot contain only dividers",
            ));
        }

        let mut parts = Vec::new();
        for raw_part in trimmed.split(PART_DIVIDER) {
            let tokens: BTreeSet<String> = raw_part
                .split(SUBPART_DIVIDER)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| {
                    if case_sensitive {
                        token.to_owned()
                    } else {
                        token.to_lowercase()
                    }
                })
                .collect();

            if tokens.is_empty() {
                return Err(PermissionError::invalid(
                    input,
                    "permission parts cannot be empty or contain only dividers",
                ));
            }
            parts.push(tokens);
        }

        Ok(Self {
            parts,
            case_sensitive,
        })
    }

    /// The parsed parts, in order.
    #[must_use]
    pub fn parts(&self) -> &[BTreeSet<String>] {
        &self.parts
    }

    /// Whether tokens kept their original case.
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Positional set-containment check against another wildcard permission.
    #[must_use]
    pub fn implies_wildcard(&self, other: &Self) -> bool {
        for (i, other_part) in other.parts.iter().enumerate() {
            let Some(part) = self.parts.get(i) else {
                // Shorter grant: remaining parts are implied.
                return true;
            };
            if !part.contains(WILDCARD_TOKEN) && !part.is_superset(other_part) {
                return false;
            }
        }

        self.parts
            .iter()
            .skip(other.parts.len())
            .all(|part| part.contains(WILDCARD_TOKEN))
    }
}

impl Permission for WildcardPermission {
    fn implies(&self, other: &dyn Permission) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.implies_wildcard(other))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for WildcardPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "{PART_DIVIDER}")?;
            }
            for (j, token) in part.iter().enumerate() {
                if j > 0 {
                    write!(f, "{SUBPART_DIVIDER}")?;
                }
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}

impl FromStr for WildcardPermission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WildcardPermission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WildcardPermission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

//! Principals and realm-tagged principal collections.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An identity claim (username, user id, email).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap an identity claim.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The claim as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RealmPrincipals {
    realm: String,
    principals: Vec<Principal>,
}

/// Ordered set of principals, each tagged with the realm that contributed it.
///
/// Realms keep the order in which they were first added; within a realm,
/// duplicates are ignored and insertion order is kept. The first principal
/// of the first realm is the primary principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalCollection {
    realms: Vec<RealmPrincipals>,
}

impl PrincipalCollection {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection holding one principal from one realm.
    #[must_use]
    pub fn single(realm: impl Into<String>, principal: impl Into<Principal>) -> Self {
        let mut collection = Self::new();
        collection.add(realm, principal);
        collection
    }

    /// Add a principal contributed by `realm`.
    pub fn add(&mut self, realm: impl Into<String>, principal: impl Into<Principal>) {
        let realm = realm.into();
        let principal = principal.into();
        match self.realms.iter_mut().find(|r| r.realm == realm) {
            Some(entry) => {
                if !entry.principals.contains(&principal) {
                    entry.principals.push(principal);
                }
            },
            None => self.realms.push(RealmPrincipals {
                realm,
                principals: vec![principal],
            }),
        }
    }

    /// Union another collection into this one.
    pub fn add_all(&mut self, other: &Self) {
        for entry in &other.realms {
            for principal in &entry.principals {
                self.add(entry.realm.clone(), principal.clone());
            }
        }
    }

    /// The primary principal, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&Principal> {
        self.realms.first().and_then(|r| r.principals.first())
    }

    /// Principals contributed by `realm` (empty if none).
    #[must_use]
    pub fn from_realm(&self, realm: &str) -> &[Principal] {
        self.realms
            .iter()
            .find(|r| r.realm == realm)
            .map_or(&[], |r| r.principals.as_slice())
    }

    /// Names of contributing realms in first-seen order.
    pub fn realm_names(&self) -> impl Iterator<Item = &str> {
        self.realms.iter().map(|r| r.realm.as_str())
    }

    /// All principals in order.
    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.realms.iter().flat_map(|r| r.principals.iter())
    }

    /// Total number of principals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.realms.iter().map(|r| r.principals.len()).sum()
    }

    /// Whether no principal has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}

impl fmt::Display for PrincipalCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary() {
            Some(p) => write!(f, "{p}"),
            None => write!(f, "<anonymous>"),
        }
    }
}

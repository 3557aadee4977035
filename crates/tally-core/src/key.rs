//! Metric identity: an (owner, name) pair.
//!
//! Keys are plain values. Equality, hashing and ordering all derive from the
//! two fields, owner first, so the registry can use them as map keys and
//! snapshots can list them in a stable order.

use std::fmt;

use crate::error::{Result, TallyError};

/// Identity of a registered metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey {
    owner: String,
    name: String,
}

impl MetricKey {
    /// Build a key from an explicit owner identifier and a metric name.
    ///
    /// Fails with [`TallyError::InvalidKey`] when either part is blank.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.trim().is_empty() {
            return Err(TallyError::InvalidKey(format!(
                "owner must not be empty (name={name:?})"
            )));
        }
        if name.trim().is_empty() {
            return Err(TallyError::InvalidKey(format!(
                "name must not be empty (owner={owner})"
            )));
        }
        Ok(Self { owner, name })
    }

    /// Build a key owned by the Rust type `T`.
    ///
    /// The owner is the type's path with generic arguments stripped, e.g.
    /// `my_app::server::Server`. Anonymous types (closures, async blocks)
    /// have no stable path and are rejected.
    pub fn for_type<T: ?Sized>(name: impl Into<String>) -> Result<Self> {
        let full = std::any::type_name::<T>();
        let owner = full.split('<').next().unwrap_or(full);
        if owner.contains("{{") {
            return Err(TallyError::InvalidKey(format!(
                "owner type {full} has no stable name"
            )));
        }
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashSet;

    struct Server;

    #[test]
    fn equal_when_owner_and_name_match() {
        let a = MetricKey::new("A", "x").unwrap();
        let b = MetricKey::new("A", "x").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, MetricKey::new("A", "y").unwrap());
        assert_ne!(a, MetricKey::new("B", "x").unwrap());

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn orders_by_owner_then_name() {
        let mut keys = vec![
            MetricKey::new("b", "a").unwrap(),
            MetricKey::new("a", "z").unwrap(),
            MetricKey::new("a", "b").unwrap(),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["a.b", "a.z", "b.a"]);
    }

    #[test]
    fn blank_parts_are_rejected() {
        let err = MetricKey::new("Server", "").unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_KEY");
        assert!(MetricKey::new("Server", "   ").is_err());
        assert!(MetricKey::new("", "requests").is_err());
    }

    #[test]
    fn owner_from_type_path() {
        let key = MetricKey::for_type::<Server>("requests").unwrap();
        assert!(key.owner().ends_with("key::tests::Server"));
        assert_eq!(key.name(), "requests");

        let generic = MetricKey::for_type::<Vec<u8>>("len").unwrap();
        assert_eq!(generic.owner(), "alloc::vec::Vec");
    }

    #[test]
    fn closure_owner_is_rejected() {
        fn key_for<T>(_: &T) -> Result<MetricKey> {
            MetricKey::for_type::<T>("calls")
        }
        let f = || 1;
        assert!(key_for(&f).is_err());
    }
}

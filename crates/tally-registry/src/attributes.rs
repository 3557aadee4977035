//! In-process management attribute server.
//!
//! Components publish named attributes on an [`ObjectName`]; external gauges
//! read them back through [`AttributeSource`] at report time.
//!
//! - `object_name -> { attribute -> reader }`

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use tally_core::error::Result;
use tally_core::{AttributeSource, ObjectName, Reading};

type Reader = Arc<dyn Fn() -> Reading + Send + Sync>;

#[derive(Default)]
pub struct AttributeServer {
    objects: DashMap<ObjectName, DashMap<String, Reader>>,
}

impl AttributeServer {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
        }
    }

    /// Publish (or replace) `attribute` on `object_name`.
    pub fn publish<F, T>(&self, object_name: &str, attribute: &str, read: F) -> Result<()>
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Reading> + 'static,
    {
        let name = ObjectName::parse(object_name)?;
        debug!(object = %name, %attribute, "attribute published");
        self.objects
            .entry(name)
            .or_insert_with(DashMap::new)
            .insert(attribute.to_string(), Arc::new(move || -> Reading { read().into() }));
        Ok(())
    }

    /// Remove `attribute`; drops the object once it has no attributes left.
    pub fn unpublish(&self, object_name: &ObjectName, attribute: &str) -> bool {
        let Some(attrs) = self.objects.get(object_name) else {
            return false;
        };
        let removed = attrs.remove(attribute).is_some();
        if attrs.is_empty() {
            drop(attrs);
            self.objects.remove_if(object_name, |_, a| a.is_empty());
        }
        removed
    }

    /// Attribute names published on `object_name`, sorted.
    pub fn attributes(&self, object_name: &ObjectName) -> Vec<String> {
        let Some(attrs) = self.objects.get(object_name) else {
            return vec![];
        };
        let mut names: Vec<String> = attrs.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl AttributeSource for AttributeServer {
    fn read(&self, object: &ObjectName, attribute: &str) -> Option<Reading> {
        let reader = self
            .objects
            .get(object)?
            .get(attribute)
            .map(|r| Arc::clone(r.value()))?;
        // Call outside the shard guards so readers may touch the server.
        Some(reader())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn publish_read_unpublish() {
        let server = AttributeServer::new();
        let live = Arc::new(AtomicI64::new(10));
        let seen = Arc::clone(&live);
        server
            .publish("app:type=Pool", "Active", move || seen.load(Ordering::Relaxed))
            .unwrap();

        let name = ObjectName::parse("app:type=Pool").unwrap();
        assert_eq!(server.read(&name, "Active"), Some(Reading::Int(10)));
        live.store(11, Ordering::Relaxed);
        assert_eq!(server.read(&name, "Active"), Some(Reading::Int(11)));
        assert_eq!(server.read(&name, "Idle"), None);
        assert_eq!(server.attributes(&name), ["Active"]);

        assert!(server.unpublish(&name, "Active"));
        assert!(!server.unpublish(&name, "Active"));
        assert_eq!(server.read(&name, "Active"), None);
        assert!(server.attributes(&name).is_empty());
    }

    #[test]
    fn publish_rejects_bad_names() {
        let server = AttributeServer::new();
        let err = server.publish("no colon", "x", || 1i64).unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_OBJECT_NAME");
    }
}

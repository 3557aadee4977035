use std::fmt;
use std::sync::Arc;

use super::gauge::Reading;
use crate::error::Result;
use crate::object_name::ObjectName;

/// Something that can resolve a named attribute of a managed object.
pub trait AttributeSource: Send + Sync {
    /// Current value of `attribute` on `object`, or `None` if either is unknown.
    fn read(&self, object: &ObjectName, attribute: &str) -> Option<Reading>;
}

/// A gauge that proxies every read to an external management attribute.
pub struct ExternalGauge {
    object_name: ObjectName,
    attribute: String,
    source: Arc<dyn AttributeSource>,
}

impl ExternalGauge {
    /// Fails with `InvalidObjectName` if `object_name` is malformed.
    pub fn new(
        object_name: &str,
        attribute: impl Into<String>,
        source: Arc<dyn AttributeSource>,
    ) -> Result<Self> {
        Ok(Self {
            object_name: ObjectName::parse(object_name)?,
            attribute: attribute.into(),
            source,
        })
    }

    pub fn value(&self) -> Option<Reading> {
        self.source.read(&self.object_name, &self.attribute)
    }

    pub fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl fmt::Debug for ExternalGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalGauge")
            .field("object_name", &self.object_name)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

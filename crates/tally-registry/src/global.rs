//! Process-wide default registry.
//!
//! Convenience for call sites that cannot have a registry passed in. Code
//! that can take an `Arc<Registry>` should; nothing else in this crate
//! touches the default.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::registry::Registry;

static DEFAULT: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

pub fn default_registry() -> Arc<Registry> {
    Arc::clone(&DEFAULT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tally_core::MetricKey;

    #[test]
    fn default_registry_is_shared() {
        let a = default_registry();
        let b = default_registry();
        assert!(Arc::ptr_eq(&a, &b));

        let key = MetricKey::new("global::tests", "hits").unwrap();
        a.get_or_create_counter(key.clone()).unwrap().inc();
        assert_eq!(b.get_or_create_counter(key).unwrap().count(), 1);
    }
}

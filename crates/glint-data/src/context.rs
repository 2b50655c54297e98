//! Chained variable contexts.
//!
//! A `DataContext` is one scope in a child → parent chain. Lookups walk up
//! to the root; `set` publishes at the root so the value is visible
//! everywhere, `set_local` stays in the current scope (used for per-element
//! variables in repeated templates).
//!
//! A child context is created per nested scope and discarded after the
//! render pass; the root context lives for the process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::value::Value;

static GLOBAL: Lazy<Arc<DataContext>> = Lazy::new(DataContext::root);

/// One scope in a chained key/value context.
pub struct DataContext {
    parent: Option<Arc<DataContext>>,
    values: RwLock<HashMap<String, Value>>,
}

impl DataContext {
    /// Create a new root context (no parent).
    pub fn root() -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            values: RwLock::new(HashMap::new()),
        })
    }

    /// The process-wide root context.
    pub fn global() -> &'static Arc<Self> {
        &GLOBAL
    }

    /// Create a child scope of this context.
    pub fn child(self: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(Arc::clone(self)),
            values: RwLock::new(HashMap::new()),
        })
    }

    /// Look up a key, walking child → parent. Unset keys resolve to
    /// `Value::Absent`; missing variables are not an error.
    pub fn get(&self, key: &str) -> Value {
        self.get_or(key, Value::Absent)
    }

    /// Look up a key, returning `default` if it is set nowhere in the chain.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        if let Some(value) = self.values.read().expect("context lock poisoned").get(key) {
            return value.clone();
        }
        match &self.parent {
            Some(parent) => parent.get_or(key, default),
            None => default,
        }
    }

    /// Set a key at the root of the chain (global visibility).
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut context = self;
        while let Some(parent) = &context.parent {
            context = parent;
        }
        context.set_local(key, value);
    }

    /// Set a key in this scope only.
    pub fn set_local(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values
            .write()
            .expect("context lock poisoned")
            .insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_unset_is_absent() {
        let root = DataContext::root();
        assert_eq!(root.get("missing"), Value::Absent);
    }

    #[test]
    fn test_get_or_default() {
        let root = DataContext::root();
        assert_eq!(root.get_or("missing", Value::I32(7)), Value::I32(7));
    }

    #[test]
    fn test_child_sees_parent_values() {
        let root = DataContext::root();
        root.set_local("coins", 10i32);
        let child = root.child();
        assert_eq!(child.get("coins"), Value::I32(10));
    }

    #[test]
    fn test_local_shadows_parent() {
        let root = DataContext::root();
        root.set_local("coins", 10i32);
        let child = root.child();
        child.set_local("coins", 20i32);
        assert_eq!(child.get("coins"), Value::I32(20));
        assert_eq!(root.get("coins"), Value::I32(10));
    }

    #[test]
    fn test_set_writes_at_root() {
        let root = DataContext::root();
        let child = root.child();
        let grandchild = child.child();
        grandchild.set("name", "player");
        // Visible from a sibling scope through the shared root.
        let sibling = root.child();
        assert_eq!(sibling.get("name"), Value::Str("player".into()));
    }

    #[test]
    fn test_set_local_does_not_leak() {
        let root = DataContext::root();
        let child = root.child();
        child.set_local("item", "torch");
        assert_eq!(root.get("item"), Value::Absent);
    }
}

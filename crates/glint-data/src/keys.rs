//! Declared data keys.
//!
//! Hosts can declare the keys they publish into the global context together
//! with a type hint. The declarations are advisory: tooling uses them for
//! autocomplete and validity coloring, but the context accepts unlisted keys
//! and evaluation never consults them.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::context::DataContext;
use crate::value::{TypeHint, Value};

static DECLARED: Lazy<RwLock<HashMap<String, TypeHint>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A declared key with its advisory type hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataKey {
    name: String,
    hint: TypeHint,
}

impl DataKey {
    /// Declare a key in the process-wide registry. Re-declaring a name
    /// overwrites its hint.
    pub fn declare(name: impl Into<String>, hint: TypeHint) -> Self {
        let name = name.into();
        DECLARED
            .write()
            .expect("key registry lock poisoned")
            .insert(name.clone(), hint);
        Self { name, hint }
    }

    /// The hint a name was declared with, if any. Undeclared names are not
    /// invalid; the context can hold unlisted keys.
    pub fn hint_of(name: &str) -> Option<TypeHint> {
        DECLARED
            .read()
            .expect("key registry lock poisoned")
            .get(name)
            .copied()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hint(&self) -> TypeHint {
        self.hint
    }

    /// Read this key from a context.
    pub fn get(&self, context: &DataContext) -> Value {
        context.get(&self.name)
    }

    /// Publish a value for this key at the root of a context chain.
    pub fn set(&self, context: &DataContext, value: impl Into<Value>) {
        context.set(self.name.clone(), value);
    }
}

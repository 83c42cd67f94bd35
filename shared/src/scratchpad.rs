use std::{
    any::Any,
    collections::HashMap,
    fmt::{Debug, Formatter},
};

use crate::types::TransactionId;

/// Scratchpad key under which the last update index of a transaction is kept.
pub fn transaction_scratchpad_key(transaction_id: &TransactionId) -> String {
    format!("TransactionManager.TransactionId:{}", transaction_id)
}

/// A keyed bag of typed values attached to a session or to a remote
/// endpoint's presence record.
///
/// A value is only visible through the type it was stored with; asking for a
/// key with a different type returns `None`.
#[derive(Default)]
pub struct Scratchpad {
    values: HashMap<String, Box<dyn Any>>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.downcast_ref::<T>()
    }

    pub fn value_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key)?.downcast_mut::<T>()
    }

    /// Stores `value` under `key`, replacing whatever was there (of any type).
    pub fn set_value<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Debug for Scratchpad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Scratchpad").field("keys", &keys).finish()
    }
}

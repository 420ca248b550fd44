//! In-memory registry implementation.

use super::Registration;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// In-memory registration registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Registrations indexed by ref_code
    records: HashMap<String, Registration>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Get a registration by ref_code.
    pub fn get(&self, ref_code: &str) -> Option<&Registration> {
        self.records.get(ref_code)
    }

    /// Get a mutable registration by ref_code.
    pub fn get_mut(&mut self, ref_code: &str) -> Option<&mut Registration> {
        self.records.get_mut(ref_code)
    }

    /// Insert a registration unless the ref_code is already taken.
    ///
    /// Returns `false` and leaves the existing entry in place on conflict.
    pub fn insert_new(&mut self, ref_code: String, registration: Registration) -> bool {
        match self.records.entry(ref_code) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(registration);
                true
            }
        }
    }

    /// Get the number of registrations.
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

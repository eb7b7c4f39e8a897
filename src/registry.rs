//! The set of states registered on an [`crate::agent::Agent`] before a run starts.

use crate::error::{EngineError, Result};
use crate::state::StateDescriptor;
use std::collections::HashMap;

/// Holds every [`StateDescriptor`] added to an agent, plus the order they
/// were registered in (used only to break ties when no state is explicitly
/// marked as an entry point).
#[derive(Default)]
pub struct StateRegistry {
    states: HashMap<String, StateDescriptor>,
    insertion_order: Vec<String>,
}

impl StateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state, or replace a previous registration under the same
    /// name. Per §8's round-trip law, "the last registration wins; prior
    /// descriptors have no effect on the next `run()`" — this is not an
    /// error, and the new descriptor takes the name's slot in insertion
    /// order (used only to break entry-point ties).
    pub fn insert(&mut self, descriptor: StateDescriptor) -> Result<()> {
        if descriptor.name.trim().is_empty() {
            return Err(EngineError::InvalidRegistration(
                "state name must not be empty".to_string(),
            ));
        }
        if let Some(pos) = self.insertion_order.iter().position(|n| n == &descriptor.name) {
            self.insertion_order.remove(pos);
        }
        self.insertion_order.push(descriptor.name.clone());
        self.states.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Result<&StateDescriptor> {
        self.states
            .get(name)
            .ok_or_else(|| EngineError::UnknownState(name.to_string()))
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Every registered state, in registration order.
    pub fn iter_in_order(&self) -> impl Iterator<Item = &StateDescriptor> {
        self.insertion_order
            .iter()
            .map(move |name| &self.states[name])
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states have been registered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

//! The static dependency graph computed from a [`crate::registry::StateRegistry`].
//!
//! Built once, before the first state of a run dispatches. Validates that
//! every declared dependency resolves to a registered state and that the
//! dependency relation is acyclic, then exposes the handful of queries the
//! scheduler needs: each state's dependency set, its dependents, and the
//! initial entry set.

use crate::error::{EngineError, Result};
use crate::registry::StateRegistry;
use std::collections::{HashMap, HashSet};

/// A validated, acyclic view over a [`StateRegistry`]'s dependency
/// declarations.
pub struct DependencyGraph {
    dependencies: HashMap<String, Vec<String>>,
    dependents: HashMap<String, Vec<String>>,
    entry_points: Vec<String>,
}

impl DependencyGraph {
    /// Build and validate the graph from `registry`.
    ///
    /// Errors with [`EngineError::UnresolvedDependency`] if a state names a
    /// dependency that was never registered, [`EngineError::CyclicGraph`] if
    /// the dependency relation contains a cycle, and
    /// [`EngineError::NoEntryPoint`] if no state is initially dispatchable.
    pub fn build(registry: &StateRegistry) -> Result<Self> {
        let mut dependencies = HashMap::new();
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();

        for descriptor in registry.iter_in_order() {
            for dep in descriptor.dependencies() {
                if !registry.contains(dep) {
                    return Err(EngineError::unresolved_dependency(descriptor.name(), dep));
                }
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(descriptor.name().to_string());
            }
            dependencies.insert(
                descriptor.name().to_string(),
                descriptor.dependencies().to_vec(),
            );
        }

        detect_cycle(&dependencies)?;

        let entry_points: Vec<String> = registry
            .iter_in_order()
            .filter(|d| d.is_entry() || d.dependencies().is_empty())
            .map(|d| d.name().to_string())
            .collect();

        if entry_points.is_empty() {
            return Err(EngineError::NoEntryPoint);
        }

        Ok(Self {
            dependencies,
            dependents,
            entry_points,
        })
    }

    /// Dependencies declared by `state`.
    pub fn dependencies_of(&self, state: &str) -> &[String] {
        self.dependencies
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// States that declare `state` as a dependency.
    pub fn dependents_of(&self, state: &str) -> &[String] {
        self.dependents.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// States dispatchable with no prior completions: those with an empty
    /// dependency list, plus any explicitly marked as an entry point.
    pub fn entry_points(&self) -> &[String] {
        &self.entry_points
    }

    /// Whether every dependency of `state` is present in `completed`.
    pub fn is_ready(&self, state: &str, completed: &HashSet<String>) -> bool {
        self.dependencies_of(state)
            .iter()
            .all(|dep| completed.contains(dep))
    }
}

/// Kahn's algorithm: repeatedly remove nodes with in-degree zero; anything
/// left over sits on a cycle.
fn detect_cycle(dependencies: &HashMap<String, Vec<String>>) -> Result<()> {
    let mut in_degree: HashMap<&str, usize> = dependencies
        .iter()
        .map(|(name, deps)| (name.as_str(), deps.len()))
        .collect();

    let mut queue: Vec<&str> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut removed = 0usize;
    while let Some(name) = queue.pop() {
        removed += 1;
        for (candidate, deps) in dependencies {
            if deps.iter().any(|d| d == name) {
                let deg = in_degree.get_mut(candidate.as_str()).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    queue.push(candidate.as_str());
                }
            }
        }
    }

    if removed < dependencies.len() {
        let cycle: Vec<String> = in_degree
            .into_iter()
            .filter(|(_, deg)| *deg > 0)
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(EngineError::CyclicGraph(cycle));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directive;
    use crate::state::{ResourceSpec, StateDescriptor};
    use std::sync::Arc;

    fn descriptor(name: &str, deps: Vec<&str>) -> StateDescriptor {
        StateDescriptor {
            name: name.to_string(),
            func: Arc::new(|_ctx| Box::pin(async { Ok(Directive::None) })),
            dependencies: deps.into_iter().map(String::from).collect(),
            resource_spec: ResourceSpec::new(),
            entry: false,
        }
    }

    #[test]
    fn linear_chain_has_single_entry_point() {
        let mut registry = StateRegistry::new();
        registry.insert(descriptor("a", vec![])).unwrap();
        registry.insert(descriptor("b", vec!["a"])).unwrap();
        registry.insert(descriptor("c", vec!["b"])).unwrap();
        let graph = DependencyGraph::build(&registry).unwrap();
        assert_eq!(graph.entry_points(), ["a".to_string()]);
        assert_eq!(graph.dependents_of("a"), ["b".to_string()]);
    }

    #[test]
    fn unresolved_dependency_is_rejected() {
        let mut registry = StateRegistry::new();
        registry.insert(descriptor("a", vec!["ghost"])).unwrap();
        let err = DependencyGraph::build(&registry).unwrap_err();
        assert!(matches!(err, EngineError::UnresolvedDependency { .. }));
    }

    #[test]
    fn cycle_is_detected() {
        let mut registry = StateRegistry::new();
        registry.insert(descriptor("a", vec!["b"])).unwrap();
        registry.insert(descriptor("b", vec!["a"])).unwrap();
        let err = DependencyGraph::build(&registry).unwrap_err();
        assert!(matches!(err, EngineError::CyclicGraph(_)));
    }

    #[test]
    fn three_state_cycle_is_detected() {
        let mut registry = StateRegistry::new();
        registry.insert(descriptor("a", vec!["b"])).unwrap();
        registry.insert(descriptor("b", vec!["c"])).unwrap();
        registry.insert(descriptor("c", vec!["a"])).unwrap();
        let err = DependencyGraph::build(&registry).unwrap_err();
        assert!(matches!(err, EngineError::CyclicGraph(_)));
    }

    #[test]
    fn fan_in_resolves_dependents_correctly() {
        let mut registry = StateRegistry::new();
        registry.insert(descriptor("a", vec![])).unwrap();
        registry.insert(descriptor("b", vec![])).unwrap();
        registry.insert(descriptor("c", vec!["a", "b"])).unwrap();
        let graph = DependencyGraph::build(&registry).unwrap();
        let mut entries = graph.entry_points().to_vec();
        entries.sort();
        assert_eq!(entries, vec!["a".to_string(), "b".to_string()]);
        let mut completed = HashSet::new();
        assert!(!graph.is_ready("c", &completed));
        completed.insert("a".to_string());
        assert!(!graph.is_ready("c", &completed));
        completed.insert("b".to_string());
        assert!(graph.is_ready("c", &completed));
    }
}

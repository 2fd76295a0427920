//! Singleton cache with coalesced construction.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use ioc_core::error::{Error, Result};
use ioc_core::value::Value;

/// The singletons of one container, each built at most once.
///
/// Resolutions in progress record which component they wait on. A wait that would close a loop
/// of such waits fails with [`Error::Circular`] instead of hanging.
#[derive(Debug, Default)]
pub(crate) struct Singletons {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    cells: HashMap<String, Arc<OnceCell<Value>>>,
    /// Pending dependencies, from dependent to dependency, counted per edge.
    waits: HashMap<String, HashMap<String, usize>>,
}

impl State {
    /// Returns the components from `from` to `to` along pending dependencies, both included.
    fn chain<'a>(&'a self, from: &'a str, to: &str) -> Option<Vec<String>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        self.walk(from, to, &mut chain, &mut visited)
            .then(|| chain.into_iter().map(str::to_owned).collect())
    }

    fn walk<'a>(
        &'a self,
        from: &'a str,
        to: &str,
        chain: &mut Vec<&'a str>,
        visited: &mut HashSet<&'a str>,
    ) -> bool {
        chain.push(from);
        if from == to {
            return true;
        }

        if visited.insert(from) {
            for dependency in self.waits.get(from).into_iter().flat_map(HashMap::keys) {
                if self.walk(dependency, to, chain, visited) {
                    return true;
                }
            }
        }

        chain.pop();
        false
    }
}

impl Singletons {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached instance of `name`, if it finished building.
    pub(crate) fn get(&self, name: &str) -> Option<Value> {
        self.state()
            .cells
            .get(name)
            .and_then(|cell| cell.get().cloned())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.state()
            .cells
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }

    /// Returns the cell every resolution of `name` builds into or waits on.
    pub(crate) fn cell(&self, name: &str) -> Arc<OnceCell<Value>> {
        Arc::clone(self.state().cells.entry(name.to_owned()).or_default())
    }

    /// Records that `dependent` cannot finish before `dependency` is resolved.
    ///
    /// The record lasts until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Circular`] if `dependency` is itself waiting on `dependent`, directly
    /// or through other resolutions in progress.
    pub(crate) fn wait<'s>(&'s self, dependent: &str, dependency: &str) -> Result<Waiting<'s>> {
        let mut state = self.state();
        if let Some(mut cycle) = state.chain(dependency, dependent) {
            cycle.push(dependency.to_owned());
            debug!(path = ?cycle, "circular wait");
            return Err(Error::Circular(cycle));
        }

        *state
            .waits
            .entry(dependent.to_owned())
            .or_default()
            .entry(dependency.to_owned())
            .or_default() += 1;

        Ok(Waiting {
            singletons: self,
            dependent: dependent.to_owned(),
            dependency: dependency.to_owned(),
        })
    }

    /// Forgets every cached instance.
    pub(crate) fn clear(&self) {
        self.state().cells.clear();
    }

    #[cfg(test)]
    pub(crate) fn insert(&self, name: &str, value: Value) {
        let cell = OnceCell::new_with(Some(value));
        self.state().cells.insert(name.to_owned(), Arc::new(cell));
    }

    #[cfg(test)]
    pub(crate) fn waiting(&self) -> usize {
        self.state().waits.values().flat_map(HashMap::values).sum()
    }
}

/// A pending dependency, removed on drop.
#[derive(Debug)]
pub(crate) struct Waiting<'s> {
    singletons: &'s Singletons,
    dependent: String,
    dependency: String,
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        let mut state = self.singletons.state();
        let Some(dependencies) = state.waits.get_mut(&self.dependent) else {
            return;
        };

        if let Some(count) = dependencies.get_mut(&self.dependency) {
            *count -= 1;
            if *count == 0 {
                dependencies.remove(&self.dependency);
            }
        }
        if dependencies.is_empty() {
            state.waits.remove(&self.dependent);
        }
    }
}

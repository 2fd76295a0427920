//! Component registry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use ioc_core::module::ModuleRef;

use crate::descriptor::Descriptor;

type Components = BTreeMap<String, Arc<Descriptor>>;

/// Holds component descriptors keyed by name.
///
/// Registration is last-write-wins per name. Descriptors are immutable once registered;
/// replacing a descriptor does not affect instances that were already resolved from the old one.
#[derive(Debug, Default)]
pub struct Registry {
    components: RwLock<Components>,
}

impl Registry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            components: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Components> {
        self.components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces a descriptor.
    pub fn register(&self, name: impl Into<String>, descriptor: Descriptor) {
        let name = name.into();
        trace!(component = %name, module = %descriptor.module, "register");
        self.components
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(descriptor));
    }

    /// Returns the descriptor registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<Arc<Descriptor>> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the registered component names in order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Returns the first component, by name order, whose module is `module`, skipping `except`.
    pub fn find_by_module(&self, module: &ModuleRef, except: &str) -> Option<String> {
        self.read()
            .iter()
            .find(|(name, descriptor)| *name != except && descriptor.module == *module)
            .map(|(name, _)| name.clone())
    }

    /// Walks the explicit references reachable from `roots` and returns the first cycle found.
    ///
    /// The returned path starts and ends with the repeated component. Unregistered components and
    /// components for which `settled` returns `true` are not followed.
    pub fn find_cycle<'n, I, F>(&self, roots: I, settled: F) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = &'n str>,
        F: Fn(&str, &Descriptor) -> bool,
    {
        let components = self.read();
        let mut walk = Walk {
            components: &components,
            settled: &settled,
            path: Vec::new(),
            done: BTreeSet::new(),
        };

        roots.into_iter().find_map(|root| walk.visit(root))
    }
}

struct Walk<'a, F> {
    components: &'a Components,
    settled: &'a F,
    path: Vec<&'a str>,
    done: BTreeSet<&'a str>,
}

impl<'a, F> Walk<'a, F>
where
    F: Fn(&str, &Descriptor) -> bool,
{
    fn visit(&mut self, name: &'a str) -> Option<Vec<String>> {
        if self.done.contains(name) {
            return None;
        }

        if let Some(start) = self.path.iter().position(|visited| *visited == name) {
            let mut cycle: Vec<String> = self.path[start..].iter().map(|&n| n.to_owned()).collect();
            cycle.push(name.to_owned());
            return Some(cycle);
        }

        let descriptor = self.components.get(name)?;
        if (self.settled)(name, descriptor) {
            return None;
        }

        self.path.push(name);
        for dependency in descriptor.references() {
            if let Some(cycle) = self.visit(dependency) {
                return Some(cycle);
            }
        }
        self.path.pop();
        self.done.insert(name);

        None
    }
}

//! Loader utilities.

use std::sync::{Arc, Mutex, PoisonError};

use ioc_core::loader::Loader;
use ioc_core::module::ModuleRef;

/// A [`Loader`] that records every requested module before delegating to an inner loader.
///
/// The record is shared between clones, so a clone can be kept to inspect the requests after the
/// loader itself was handed to a container.
#[derive(Debug)]
pub struct Recording<L> {
    inner: Arc<L>,
    requests: Arc<Mutex<Vec<Vec<ModuleRef>>>>,
}

impl<L> Clone for Recording<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            requests: Arc::clone(&self.requests),
        }
    }
}

impl<L> Recording<L>
where
    L: Loader,
{
    /// Wraps a loader.
    pub fn new(inner: L) -> Self {
        Self {
            inner: Arc::new(inner),
            requests: Arc::default(),
        }
    }

    /// Returns every load request received so far, in order.
    pub fn requests(&self) -> Vec<Vec<ModuleRef>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns every requested module so far, flattened in request order.
    pub fn modules(&self) -> Vec<ModuleRef> {
        self.requests().into_iter().flatten().collect()
    }

    /// Returns how many times the module was requested.
    pub fn count(&self, module: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .flatten()
            .filter(|requested| requested.as_str() == module)
            .count()
    }
}

impl<L> Loader for Recording<L>
where
    L: Loader,
{
    type Future = L::Future;

    fn load(&self, modules: Vec<ModuleRef>) -> Self::Future {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(modules.clone());
        self.inner.load(modules)
    }
}

//! Module loading: the default in-memory loader and the per-container module cache.

use std::collections::{BTreeMap, HashMap};
use std::future::{Ready, ready};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::OnceCell;

use ioc_core::error::{Error, Result};
use ioc_core::loader::{Loader, LoaderObject};
use ioc_core::module::{Implementation, ModuleRef};

/// An in-memory table of module implementations.
///
/// This is the default [`Loader`] of a container. Loading from a table completes immediately.
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    modules: BTreeMap<ModuleRef, Implementation>,
}

impl ModuleTable {
    pub const fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Adds or replaces a module.
    pub fn insert(&mut self, module: impl Into<ModuleRef>, implementation: Implementation) {
        self.modules.insert(module.into(), implementation);
    }

    /// Adds or replaces a module.
    #[must_use]
    pub fn with(mut self, module: impl Into<ModuleRef>, implementation: Implementation) -> Self {
        self.insert(module, implementation);
        self
    }

    pub fn get(&self, module: &str) -> Option<&Implementation> {
        self.modules.get(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Loader for ModuleTable {
    type Future = Ready<Result<Vec<Implementation>>>;

    fn load(&self, modules: Vec<ModuleRef>) -> Self::Future {
        ready(
            modules
                .into_iter()
                .map(|module| {
                    self.modules
                        .get(&module)
                        .cloned()
                        .ok_or(Error::ModuleNotFound(module))
                })
                .collect(),
        )
    }
}

/// Loads each module at most once per container.
///
/// Concurrent requests for a module that is still loading wait for the same load. A failed load is
/// not cached, so a later request tries again.
#[derive(Debug)]
pub(crate) struct ModuleCache {
    loader: RwLock<Arc<LoaderObject>>,
    loaded: Mutex<HashMap<ModuleRef, Arc<OnceCell<Implementation>>>>,
}

impl ModuleCache {
    pub(crate) fn new(loader: LoaderObject) -> Self {
        Self {
            loader: RwLock::new(Arc::new(loader)),
            loaded: Mutex::default(),
        }
    }

    /// Replaces the loader used for modules that are not loaded yet.
    pub(crate) fn set_loader(&self, loader: LoaderObject) {
        debug!(loader = loader.concrete_type(), "set loader");
        *self.loader.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(loader);
    }

    fn loader(&self) -> Arc<LoaderObject> {
        Arc::clone(&self.loader.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn cell(&self, module: &ModuleRef) -> Arc<OnceCell<Implementation>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(loaded.entry(module.clone()).or_default())
    }

    /// Returns the implementation of a module, loading it if needed.
    pub(crate) async fn load(&self, module: &ModuleRef) -> Result<Implementation> {
        let cell = self.cell(module);
        if let Some(implementation) = cell.get() {
            return Ok(implementation.clone());
        }

        cell.get_or_try_init(|| async {
            let loader = self.loader();
            trace!(%module, "load");

            let mut loaded = loader.load(vec![module.clone()]).await?;
            match (loaded.pop(), loaded.len()) {
                (Some(implementation), 0) => Ok(implementation),
                (implementation, rest) => Err(Error::LoaderContract {
                    expected: 1,
                    got: rest + usize::from(implementation.is_some()),
                }),
            }
        })
        .await
        .cloned()
    }
}

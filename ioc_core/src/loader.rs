//! [`Loader`] trait and its dispatchable object.

use std::any::type_name;

use crate::error::Result;
use crate::future::BoxFuture;
use crate::module::{Implementation, ModuleRef};

/// Loads module implementations asynchronously.
pub trait Loader: Send + Sync + 'static {
    /// The future returned by [`load`](Self::load) method.
    type Future: Future<Output = Result<Vec<Implementation>>> + Send + 'static;

    /// Loads the requested modules.
    ///
    /// The returned future must resolve to exactly one implementation per requested module, in the
    /// order they were requested.
    ///
    /// # Errors
    ///
    /// The semantics of the error returned by the future may vary between implementations. The
    /// container propagates it unchanged to the caller that requested the component.
    fn load(&self, modules: Vec<ModuleRef>) -> Self::Future;
}

impl<F, Fut> Loader for F
where
    F: Fn(Vec<ModuleRef>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Implementation>>> + Send + 'static,
{
    type Future = Fut;

    #[inline]
    fn load(&self, modules: Vec<ModuleRef>) -> Self::Future {
        self(modules)
    }
}

/// A dispatchable [`Loader`] trait object.
///
/// Use this instead of `Box<dyn Loader>`, as [`Loader`] has an associated future type.
pub struct LoaderObject {
    #[allow(clippy::type_complexity)]
    boxed: Box<
        dyn Fn(Vec<ModuleRef>) -> BoxFuture<'static, Result<Vec<Implementation>>> + Send + Sync,
    >,
    concrete_type: &'static str,
}

impl LoaderObject {
    /// Creates a new `LoaderObject` from a concrete loader.
    pub fn new<L>(loader: L) -> Self
    where
        L: Loader,
    {
        let wrapped_fn = move |modules: Vec<ModuleRef>| {
            Box::pin(loader.load(modules)) as BoxFuture<'static, Result<Vec<Implementation>>>
        };

        Self {
            boxed: Box::new(wrapped_fn),
            concrete_type: type_name::<L>(),
        }
    }

    /// Returns the name of the wrapped loader type.
    pub const fn concrete_type(&self) -> &'static str {
        self.concrete_type
    }
}

impl std::fmt::Debug for LoaderObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderObject")
            .field("concrete_type", &self.concrete_type)
            .finish_non_exhaustive()
    }
}

impl Loader for LoaderObject {
    type Future = BoxFuture<'static, Result<Vec<Implementation>>>;

    #[inline]
    fn load(&self, modules: Vec<ModuleRef>) -> Self::Future {
        (self.boxed)(modules)
    }
}

//! The container facade.

use std::sync::Arc;

use ioc_core::error::Result;
use ioc_core::loader::{Loader, LoaderObject};
use ioc_core::module::{Implementation, ModuleRef};
use ioc_core::runtime::Runtime;
use ioc_core::value::Value;

use crate::descriptor::Descriptor;
use crate::modules::ModuleTable;
use crate::registry::Registry;
use crate::resolver::Resolver;

/// The initial state of a container.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Components to register, in order. Later entries replace earlier ones with the same name.
    pub components: Vec<(String, Descriptor)>,
    /// Modules available to the default loader.
    pub modules: ModuleTable,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.components.push((name.into(), descriptor));
        self
    }

    #[must_use]
    pub fn with_module(
        mut self,
        module: impl Into<ModuleRef>,
        implementation: Implementation,
    ) -> Self {
        self.modules.insert(module, implementation);
        self
    }
}

/// One or more component names to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    One(String),
    Many(Vec<String>),
}

impl Request {
    /// Returns the requested names in order.
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

impl From<&str> for Request {
    fn from(name: &str) -> Self {
        Self::One(name.to_owned())
    }
}

impl From<String> for Request {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<Vec<String>> for Request {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for Request {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Request {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.into_iter().map(str::to_owned).collect())
    }
}

/// The values of a [`Request`], shaped like the request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    One(Value),
    Many(Vec<Value>),
}

impl Resolved {
    /// Returns the values in request order.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// An inversion of control container.
///
/// Components are registered by name with a [`Descriptor`], and resolved on request by loading
/// their modules and wiring their dependencies.
///
/// # Example
///
/// ```
/// # use std::time::Duration;
/// #
/// # use tokio::time::timeout;
/// #
/// use ioc::container::Container;
/// use ioc::descriptor::{Descriptor, reference};
/// use ioc::modules::ModuleTable;
/// use ioc::{Args, Component, Implementation, Value};
/// use ioc_util::runtime::TokioRuntime;
///
/// # const TIMEOUT: Duration = Duration::from_millis(500);
/// #
/// #[derive(Debug)]
/// struct Address(Value);
///
/// impl Component for Address {}
///
/// #[derive(Debug)]
/// struct Database {
///     address: Value,
/// }
///
/// impl Component for Database {}
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let modules = ModuleTable::new()
///     .with(
///         "Address",
///         Implementation::class(|mut args: Args| Ok(Address(args.take(0)))),
///     )
///     .with(
///         "Database",
///         Implementation::class(|mut args: Args| Ok(Database { address: args.take(0) })),
///     );
///
/// let container = Container::builder(TokioRuntime::new())
///     .with_modules(modules)
///     .with_component("address", Descriptor::new("Address").arg("localhost"))
///     .with_component("db", Descriptor::new("Database").arg(reference("address")))
///     .build();
///
/// # let db = timeout(TIMEOUT, async {
/// let db = container.get_component("db").await?;
/// # Ok::<Value, ioc::Error>(db)
/// # }).await??;
/// let db = db.downcast_ref::<Database>().unwrap();
/// let address = db.address.downcast_ref::<Address>().unwrap();
/// assert_eq!(address.0.as_str(), Some("localhost"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Container<R> {
    rt: R,
    resolver: Arc<Resolver>,
}

/// A builder for [`Container`].
#[derive(Debug)]
pub struct ContainerBuilder<R> {
    rt: R,
    config: Config,
    loader: Option<LoaderObject>,
}

impl<R> Container<R>
where
    R: Runtime,
{
    /// Returns a new builder for `Container`.
    #[must_use]
    pub fn builder(rt: R) -> ContainerBuilder<R> {
        ContainerBuilder {
            rt,
            config: Config::default(),
            loader: None,
        }
    }

    /// Creates an empty container.
    pub fn new(rt: R) -> Self {
        Self::builder(rt).build()
    }

    /// Creates a container from a configuration.
    pub fn from_config(rt: R, config: Config) -> Self {
        Self::builder(rt).with_config(config).build()
    }

    pub fn registry(&self) -> &Registry {
        self.resolver.registry()
    }

    /// Registers a component, replacing any component with the same name.
    ///
    /// A singleton that was already resolved under this name stays cached until the container
    /// is disposed.
    pub fn add_component(&self, name: impl Into<String>, descriptor: Descriptor) {
        self.registry().register(name, descriptor);
    }

    /// Registers several components in order.
    pub fn add_components<I, S>(&self, components: I)
    where
        I: IntoIterator<Item = (S, Descriptor)>,
        S: Into<String>,
    {
        for (name, descriptor) in components {
            self.add_component(name, descriptor);
        }
    }

    /// Replaces the loader for every module that is not loaded yet.
    pub fn set_loader<L>(&self, loader: L)
    where
        L: Loader,
    {
        self.resolver.modules().set_loader(LoaderObject::new(loader));
    }

    /// Resolves a component.
    ///
    /// The returned future resolves to [`Value::Null`] if no component is registered under
    /// `name`.
    ///
    /// # Errors
    ///
    /// Circular dependencies among explicitly referenced components are detected when this
    /// method is called, before any module is loaded; the returned future then fails with
    /// [`Error::Circular`](crate::Error::Circular) without doing any work. Load, construction
    /// and injection failures are propagated unchanged.
    pub fn get_component(
        &self,
        name: impl Into<String>,
    ) -> impl Future<Output = Result<Value>> + Send + '_ {
        let name = name.into();
        let checked = self.resolver.check_cycles([name.as_str()]);

        async move {
            checked?;
            self.resolver.resolve(name, Vec::new()).await
        }
    }

    /// Resolves several components, in request order.
    ///
    /// # Errors
    ///
    /// See [`get_component`](Self::get_component). The first failure fails the whole request.
    pub fn get_components<I, S>(
        &self,
        names: I,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send + '_
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let checked = self.resolver.check_cycles(names.iter().map(String::as_str));

        async move {
            checked?;
            self.resolver.resolve_all(names).await
        }
    }

    /// Resolves a request in the background and passes the result to `continuation`.
    ///
    /// The continuation is invoked exactly once, on the runtime of the container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Circular`](crate::Error::Circular) immediately, without spawning
    /// anything, if the request has a circular dependency among explicitly referenced
    /// components. The continuation is not invoked in that case.
    pub fn get_component_then<F>(
        &self,
        request: impl Into<Request>,
        continuation: F,
    ) -> Result<R::Task<()>>
    where
        F: FnOnce(Result<Resolved>) + Send + 'static,
    {
        let request = request.into();
        self.resolver
            .check_cycles(request.names().iter().map(String::as_str))?;

        let resolver = Arc::clone(&self.resolver);
        Ok(self.rt.spawn(async move {
            let result = match request {
                Request::One(name) => resolver.resolve(name, Vec::new()).await.map(Resolved::One),
                Request::Many(names) => resolver.resolve_all(names).await.map(Resolved::Many),
            };
            continuation(result);
        }))
    }

    /// Disposes every instance constructed by this container and clears the singleton cache.
    ///
    /// Returns the number of instances whose disposal hook was invoked.
    pub fn dispose(&self) -> usize {
        self.resolver.dispose()
    }
}

impl<R> ContainerBuilder<R>
where
    R: Runtime,
{
    /// Registers a component to the container.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.config.components.push((name.into(), descriptor));
        self
    }

    /// Registers several components to the container, in order.
    #[must_use]
    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = (S, Descriptor)>,
        S: Into<String>,
    {
        self.config.components.extend(
            components
                .into_iter()
                .map(|(name, descriptor)| (name.into(), descriptor)),
        );
        self
    }

    /// Sets the modules available to the default loader.
    #[must_use]
    pub fn with_modules(mut self, modules: ModuleTable) -> Self {
        self.config.modules = modules;
        self
    }

    /// Appends the components and replaces the modules of this builder with those of `config`.
    #[must_use]
    pub fn with_config(self, config: Config) -> Self {
        let Config {
            components,
            modules,
        } = config;
        self.with_components(components).with_modules(modules)
    }

    /// Uses a custom loader instead of the module table.
    #[must_use]
    pub fn with_loader<L>(mut self, loader: L) -> Self
    where
        L: Loader,
    {
        self.loader = Some(LoaderObject::new(loader));
        self
    }

    /// Finalizes the building process and returns the built container.
    #[must_use]
    pub fn build(self) -> Container<R> {
        let Self { rt, config, loader } = self;

        let registry = Registry::new();
        for (name, descriptor) in config.components {
            registry.register(name, descriptor);
        }

        let loader = loader.unwrap_or_else(|| LoaderObject::new(config.modules));
        debug!(
            components = registry.len(),
            loader = loader.concrete_type(),
            "build container"
        );

        Container {
            rt,
            resolver: Arc::new(Resolver::new(registry, loader)),
        }
    }
}

//! Dependency resolution.

use std::future::ready;

use ioc_core::error::{Error, Result};
use ioc_core::future::{BoxFuture, try_join_all};
use ioc_core::loader::LoaderObject;
use ioc_core::module::Slot;
use ioc_core::value::Value;

use crate::descriptor::{Descriptor, Scope, ValueSpec};
use crate::injector::{Dependencies, Injector};
use crate::lifecycle::Lifecycle;
use crate::modules::ModuleCache;
use crate::registry::Registry;
use crate::singletons::Singletons;

/// Names of the components being resolved, outermost first.
type Path = Vec<String>;

/// Resolves component names into values.
///
/// Owns the registry, the module cache, the singleton cache and the lifecycle of a single
/// container.
#[derive(Debug)]
pub(crate) struct Resolver {
    registry: Registry,
    modules: ModuleCache,
    singletons: Singletons,
    lifecycle: Lifecycle,
}

impl Resolver {
    pub(crate) fn new(registry: Registry, loader: LoaderObject) -> Self {
        Self {
            registry,
            modules: ModuleCache::new(loader),
            singletons: Singletons::default(),
            lifecycle: Lifecycle::default(),
        }
    }

    pub(crate) const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) const fn modules(&self) -> &ModuleCache {
        &self.modules
    }

    fn is_settled(&self, name: &str, descriptor: &Descriptor) -> bool {
        descriptor.scope == Scope::Singleton && self.singletons.contains(name)
    }

    /// Fails if the explicit references reachable from `names` contain a cycle.
    ///
    /// Singletons that are already cached are not followed, as resolving them does not recurse.
    pub(crate) fn check_cycles<'n, I>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'n str>,
    {
        match self
            .registry
            .find_cycle(names, |name, descriptor| self.is_settled(name, descriptor))
        {
            Some(path) => {
                debug!(?path, "circular dependency");
                Err(Error::Circular(path))
            }
            None => Ok(()),
        }
    }

    /// Resolves a component, with `path` holding the components that depend on it.
    ///
    /// Concurrent resolutions of the same singleton share one construction.
    pub(crate) fn resolve(&self, name: String, path: Path) -> BoxFuture<'_, Result<Value>> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("resolve", component = %name);

        let fut = async move {
            let Some(descriptor) = self.registry.lookup(&name) else {
                trace!("unregistered");
                return Ok(Value::Null);
            };

            if descriptor.scope == Scope::Singleton {
                if let Some(value) = self.singletons.get(&name) {
                    trace!("cached");
                    return Ok(value);
                }
            }

            if let Some(start) = path.iter().position(|visited| *visited == name) {
                let mut cycle = path[start..].to_vec();
                cycle.push(name);
                debug!(path = ?cycle, "circular dependency");
                return Err(Error::Circular(cycle));
            }

            let _waiting = match path.last() {
                Some(dependent) => Some(self.singletons.wait(dependent, &name)?),
                None => None,
            };

            let mut path = path;
            path.push(name.clone());

            match descriptor.scope {
                Scope::Singleton => {
                    let cell = self.singletons.cell(&name);
                    let value = cell
                        .get_or_try_init(|| async {
                            let value = self.build(&name, &descriptor, &path).await?;
                            self.track(&value);
                            Ok::<_, Error>(value)
                        })
                        .await?;
                    Ok(value.clone())
                }
                Scope::Transient => {
                    let value = self.build(&name, &descriptor, &path).await?;
                    self.track(&value);
                    Ok(value)
                }
            }
        };

        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(fut, span);

        Box::pin(fut)
    }

    /// Resolves every name in order, with `Null` for unregistered names.
    pub(crate) async fn resolve_all(&self, names: Vec<String>) -> Result<Vec<Value>> {
        try_join_all(names.into_iter().map(|name| self.resolve(name, Path::new()))).await
    }

    fn track(&self, value: &Value) {
        if let Value::Object(instance) = value {
            self.lifecycle.track(instance);
        }
    }

    /// Loads, constructs and injects one instance.
    ///
    /// Every dependency, auto-injected ones included, is resolved before construction.
    async fn build(&self, name: &str, descriptor: &Descriptor, path: &[String]) -> Result<Value> {
        let implementation = self.modules.load(&descriptor.module).await?;
        let injector = Injector::new(name, descriptor, &implementation);
        let slots = injector.candidate_slots();

        let values = try_join_all(
            descriptor
                .specs()
                .map(|spec| self.resolve_spec(spec, path))
                .chain(slots.iter().map(|slot| self.resolve_slot(name, slot, path))),
        )
        .await?;
        let Dependencies {
            args,
            properties,
            setters,
            auto,
        } = Dependencies::split(descriptor, values);

        let mut product = injector.construct(args)?;
        injector.inject(&mut product, properties, setters)?;
        injector.auto_inject(&mut product, &slots, auto)?;

        trace!(?product, "built");
        Ok(product.into_value())
    }

    fn resolve_spec<'a>(
        &'a self,
        spec: &'a ValueSpec,
        path: &'a [String],
    ) -> BoxFuture<'a, Result<Value>> {
        match spec {
            ValueSpec::Literal(value) => Box::pin(ready(Ok(value.clone()))),
            ValueSpec::Reference(name) => self.resolve(name.clone(), path.to_vec()),
            ValueSpec::List(specs) => Box::pin(async move {
                try_join_all(specs.iter().map(|spec| self.resolve_spec(spec, path)))
                    .await
                    .map(Value::List)
            }),
        }
    }

    /// Resolves the first other component whose module matches the slot, or `Null` if none does.
    fn resolve_slot(
        &self,
        name: &str,
        slot: &Slot,
        path: &[String],
    ) -> BoxFuture<'_, Result<Value>> {
        match self.registry.find_by_module(&slot.module, name) {
            Some(candidate) => {
                trace!(field = %slot.field, %candidate, "auto inject");
                self.resolve(candidate, path.to_vec())
            }
            None => Box::pin(ready(Ok(Value::Null))),
        }
    }

    /// Disposes every tracked instance and clears the singleton cache.
    pub(crate) fn dispose(&self) -> usize {
        let disposed = self.lifecycle.dispose_all();
        self.singletons.clear();
        disposed
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.lifecycle.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use crate::descriptor::{Descriptor, reference};
    use crate::fixtures::{self, A, Counted};

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(500);

    fn resolver() -> Resolver {
        let registry = Registry::new();
        for (name, descriptor) in fixtures::components() {
            registry.register(name, descriptor);
        }
        Resolver::new(registry, LoaderObject::new(fixtures::modules()))
    }

    #[tokio::test]
    async fn test_resolve_unregistered() {
        let resolver = resolver();
        let value = timeout(TIMEOUT, resolver.resolve("z".into(), Path::new()))
            .await
            .unwrap()
            .unwrap();
        assert!(value.is_null());
        assert_eq!(resolver.tracked(), 0);
    }

    #[tokio::test]
    async fn test_resolve_singleton_once() {
        let resolver = resolver();
        let values = timeout(TIMEOUT, resolver.resolve_all(vec!["a".into(), "a".into()]))
            .await
            .unwrap()
            .unwrap();
        assert!(values[0].downcast_ref::<A>().is_some());
        assert_eq!(values[0], values[1]);

        let again = timeout(TIMEOUT, resolver.resolve("a".into(), Path::new()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(values[0], again);
    }

    #[tokio::test]
    async fn test_transient_tracked_per_instance() {
        let resolver = resolver();
        resolver
            .registry()
            .register("counted", Descriptor::new("Counted").transient());

        let values = timeout(
            TIMEOUT,
            resolver.resolve_all(vec!["counted".into(), "counted".into()]),
        )
        .await
        .unwrap()
        .unwrap();
        assert_ne!(values[0], values[1]);
        assert!(values[0].downcast_ref::<Counted>().is_some());
        assert_eq!(resolver.tracked(), 2);
    }

    #[tokio::test]
    async fn test_dynamic_cycle_through_auto_inject() {
        let resolver = resolver();
        resolver.registry().register(
            "ping",
            Descriptor::new("Ping").auto_inject(),
        );
        resolver.registry().register(
            "pong",
            Descriptor::new("Pong").auto_inject(),
        );
        resolver.check_cycles(["ping"]).unwrap();

        let err = timeout(TIMEOUT, resolver.resolve("ping".into(), Path::new()))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(err.circular_path().unwrap(), ["ping", "pong", "ping"]);
        assert_eq!(resolver.tracked(), 0);
        assert_eq!(resolver.singletons.waiting(), 0);
    }

    #[test]
    fn test_check_cycles_skips_cached_singletons() {
        let resolver = resolver();
        assert!(resolver.check_cycles(["circular1"]).unwrap_err().is_circular());

        resolver.singletons.insert("circular2", Value::Null);
        resolver.check_cycles(["circular1"]).unwrap();
    }

    #[test]
    fn test_check_cycles_self_reference() {
        let resolver = resolver();
        resolver
            .registry()
            .register("me", Descriptor::new("Counted").property("me", reference("me")));
        let err = resolver.check_cycles(["me"]).unwrap_err();
        assert_eq!(err.circular_path().unwrap(), ["me", "me"]);
    }

    #[tokio::test]
    async fn test_dispose_clears_cache() {
        let resolver = resolver();
        let first = timeout(TIMEOUT, resolver.resolve("c".into(), Path::new()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolver.tracked(), 1);

        resolver.dispose();
        assert_eq!(resolver.tracked(), 0);

        let second = timeout(TIMEOUT, resolver.resolve("c".into(), Path::new()))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(first, second);
    }
}

//! Component descriptors.

use ioc_core::module::ModuleRef;
use ioc_core::value::Value;

/// The lifetime of instances resolved from a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance per container.
    #[default]
    Singleton,
    /// A new instance per request.
    Transient,
}

/// Describes how to obtain an injected value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    /// A literal value, injected as-is.
    Literal(Value),
    /// A reference to another component, resolved recursively.
    Reference(String),
    /// A list of specs, each resolved independently.
    List(Vec<ValueSpec>),
}

impl ValueSpec {
    /// Creates a reference to another component.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Calls `f` on every component name referenced by this spec, including nested lists.
    pub fn for_each_reference<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a str),
    {
        match self {
            Self::Literal(_) => {}
            Self::Reference(name) => f(name),
            Self::List(specs) => {
                for spec in specs {
                    spec.for_each_reference(f);
                }
            }
        }
    }
}

impl Default for ValueSpec {
    fn default() -> Self {
        Self::Literal(Value::Null)
    }
}

macro_rules! impl_from_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ValueSpec {
                fn from(value: $ty) -> Self {
                    Self::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_from_literal!(bool, f64, i32, u32, &str, String, ());

impl From<Value> for ValueSpec {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// Creates a [`ValueSpec::Reference`] to another component.
pub fn reference(name: impl Into<String>) -> ValueSpec {
    ValueSpec::reference(name)
}

/// Creates a [`ValueSpec::List`] of specs.
pub fn list<I>(specs: I) -> ValueSpec
where
    I: IntoIterator,
    I::Item: Into<ValueSpec>,
{
    ValueSpec::List(specs.into_iter().map(Into::into).collect())
}

/// The declarative description of a component.
///
/// # Example
///
/// ```
/// use ioc::descriptor::{Descriptor, Scope, reference};
///
/// let descriptor = Descriptor::new("B")
///     .arg(reference("c"))
///     .property("name", "Tony Blair")
///     .setter("setUtil", reference("myUtil"))
///     .transient();
///
/// assert_eq!(descriptor.module.as_str(), "B");
/// assert_eq!(descriptor.scope, Scope::Transient);
/// assert_eq!(descriptor.references().collect::<Vec<_>>(), ["c", "myUtil"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// The module the implementation is loaded from.
    pub module: ModuleRef,
    pub scope: Scope,
    /// Positional constructor arguments.
    pub args: Vec<ValueSpec>,
    /// Properties assigned after construction, in order.
    pub properties: Vec<(String, ValueSpec)>,
    /// Setter methods invoked after properties are assigned, in order.
    pub setters: Vec<(String, ValueSpec)>,
    /// Whether the implementation is a creator function to invoke rather than a class.
    pub creator: bool,
    /// Whether declared dependency slots are populated by module type.
    pub auto_inject: bool,
}

impl Descriptor {
    /// Creates a singleton descriptor for a module, without any injection.
    pub fn new(module: impl Into<ModuleRef>) -> Self {
        Self {
            module: module.into(),
            scope: Scope::default(),
            args: Vec::new(),
            properties: Vec::new(),
            setters: Vec::new(),
            creator: false,
            auto_inject: false,
        }
    }

    #[must_use]
    pub const fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn transient(self) -> Self {
        self.scope(Scope::Transient)
    }

    /// Appends a constructor argument.
    #[must_use]
    pub fn arg(mut self, spec: impl Into<ValueSpec>) -> Self {
        self.args.push(spec.into());
        self
    }

    /// Appends constructor arguments.
    #[must_use]
    pub fn args<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ValueSpec>,
    {
        self.args.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Sets a property, replacing an earlier spec for the same property in place.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, spec: impl Into<ValueSpec>) -> Self {
        upsert(&mut self.properties, name.into(), spec.into());
        self
    }

    /// Sets a setter method call, replacing an earlier spec for the same method in place.
    #[must_use]
    pub fn setter(mut self, method: impl Into<String>, spec: impl Into<ValueSpec>) -> Self {
        upsert(&mut self.setters, method.into(), spec.into());
        self
    }

    /// Marks the implementation as a creator function.
    #[must_use]
    pub const fn creator(mut self) -> Self {
        self.creator = true;
        self
    }

    /// Enables auto-injection of declared dependency slots.
    #[must_use]
    pub const fn auto_inject(mut self) -> Self {
        self.auto_inject = true;
        self
    }

    /// Returns every component name explicitly referenced by this descriptor, in injection order.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        let mut names = Vec::new();
        for spec in self.specs() {
            spec.for_each_reference(&mut |name| names.push(name));
        }

        names.into_iter()
    }

    /// Returns every value spec in injection order: constructor arguments, properties, then
    /// setters.
    pub fn specs(&self) -> impl Iterator<Item = &ValueSpec> {
        self.args
            .iter()
            .chain(self.properties.iter().map(|(_, spec)| spec))
            .chain(self.setters.iter().map(|(_, spec)| spec))
    }

    /// Returns `true` if a property or setter explicitly targets `field`.
    pub fn targets(&self, field: &str) -> bool {
        self.properties.iter().any(|(name, _)| name == field)
            || self
                .setters
                .iter()
                .any(|(method, _)| setter_field(method).as_deref() == Some(field))
    }
}

fn upsert(entries: &mut Vec<(String, ValueSpec)>, key: String, spec: ValueSpec) {
    if let Some(entry) = entries.iter_mut().find(|(name, _)| *name == key) {
        entry.1 = spec;
    } else {
        entries.push((key, spec));
    }
}

/// Returns the field a setter method targets by convention: `setFoo` targets `foo`.
pub fn setter_field(method: &str) -> Option<String> {
    let rest = method.strip_prefix("set")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

//! Loaded module implementations.
//!
//! A module is identified by a [`ModuleRef`] and, once loaded, yields an [`Implementation`]: a
//! class to construct, a creator function to invoke, or a plain value to use as-is.

use std::borrow::Borrow;
use std::sync::Arc;

use crate::error::Result;
use crate::value::{BoxedComponent, Component, Value};

/// An opaque module identifier.
///
/// A module reference is also the declared type identity of the implementation it resolves to:
/// auto-injection matches [`Slot`]s against the module references of registered components.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleRef(Arc<str>);

impl ModuleRef {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModuleRef {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Borrow<str> for ModuleRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dependency slot declared by an implementation for auto-injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// The field the dependency is assigned to.
    pub field: String,
    /// The expected module of the dependency.
    pub module: ModuleRef,
}

impl Slot {
    pub fn new(field: impl Into<String>, module: impl Into<ModuleRef>) -> Self {
        Self {
            field: field.into(),
            module: module.into(),
        }
    }
}

/// Positional arguments passed to a constructor or creator function.
///
/// Positions past the end of the argument list read as [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

static NULL: Value = Value::Null;

impl Args {
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Returns a reference to the argument at `index`.
    pub fn get(&self, index: usize) -> &Value {
        self.0.get(index).unwrap_or(&NULL)
    }

    /// Takes the argument at `index`, leaving [`Value::Null`] in its place.
    pub fn take(&mut self, index: usize) -> Value {
        self.0.get_mut(index).map(std::mem::take).unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// The result of constructing or invoking an implementation, before it is shared.
pub enum Product {
    Component(BoxedComponent),
    Value(Value),
}

impl Product {
    pub fn component<T>(component: T) -> Self
    where
        T: Component,
    {
        Self::Component(Box::new(component))
    }

    /// Finalizes the product into a shareable value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Component(component) => Value::Object(component.into()),
            Self::Value(value) => value,
        }
    }
}

impl std::fmt::Debug for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component(component) => f
                .debug_tuple("Component")
                .field(&component.type_name())
                .finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// A constructible implementation.
pub trait Class: Send + Sync + 'static {
    /// Constructs a new component from constructor arguments.
    ///
    /// # Errors
    ///
    /// Implementations may reject arguments they cannot use.
    fn construct(&self, args: Args) -> Result<BoxedComponent>;

    /// Returns the dependency slots declared for auto-injection.
    fn slots(&self) -> &[Slot] {
        &[]
    }
}

/// A factory-style implementation that is invoked rather than constructed.
pub trait Creator: Send + Sync + 'static {
    /// Invokes the creator function.
    ///
    /// # Errors
    ///
    /// Implementations may reject arguments they cannot use.
    fn create(&self, args: Args) -> Result<Product>;

    /// Returns the dependency slots declared for auto-injection.
    fn slots(&self) -> &[Slot] {
        &[]
    }
}

struct FnClass<F> {
    ctor: F,
    slots: Vec<Slot>,
}

impl<F, T> Class for FnClass<F>
where
    F: Fn(Args) -> Result<T> + Send + Sync + 'static,
    T: Component,
{
    fn construct(&self, args: Args) -> Result<BoxedComponent> {
        Ok(Box::new((self.ctor)(args)?))
    }

    fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

struct FnCreator<F> {
    create: F,
    slots: Vec<Slot>,
}

impl<F> Creator for FnCreator<F>
where
    F: Fn(Args) -> Result<Product> + Send + Sync + 'static,
{
    fn create(&self, args: Args) -> Result<Product> {
        (self.create)(args)
    }

    fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

/// A loaded module.
#[derive(Clone)]
pub enum Implementation {
    Class(Arc<dyn Class>),
    Creator(Arc<dyn Creator>),
    Value(Value),
}

impl Implementation {
    /// Creates a class implementation from a constructor function.
    pub fn class<F, T>(ctor: F) -> Self
    where
        F: Fn(Args) -> Result<T> + Send + Sync + 'static,
        T: Component,
    {
        Self::class_with_slots(ctor, [])
    }

    /// Creates a class implementation that declares auto-injection slots.
    pub fn class_with_slots<F, T, S>(ctor: F, slots: S) -> Self
    where
        F: Fn(Args) -> Result<T> + Send + Sync + 'static,
        T: Component,
        S: IntoIterator<Item = Slot>,
    {
        Self::Class(Arc::new(FnClass {
            ctor,
            slots: slots.into_iter().collect(),
        }))
    }

    /// Creates a creator implementation from a factory function.
    pub fn creator<F>(create: F) -> Self
    where
        F: Fn(Args) -> Result<Product> + Send + Sync + 'static,
    {
        Self::creator_with_slots(create, [])
    }

    /// Creates a creator implementation that declares auto-injection slots.
    pub fn creator_with_slots<F, S>(create: F, slots: S) -> Self
    where
        F: Fn(Args) -> Result<Product> + Send + Sync + 'static,
        S: IntoIterator<Item = Slot>,
    {
        Self::Creator(Arc::new(FnCreator {
            create,
            slots: slots.into_iter().collect(),
        }))
    }

    /// Creates an implementation that resolves to the given value as-is.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Returns the dependency slots declared for auto-injection.
    pub fn slots(&self) -> &[Slot] {
        match self {
            Self::Class(class) => class.slots(),
            Self::Creator(creator) => creator.slots(),
            Self::Value(_) => &[],
        }
    }

    pub const fn is_creator(&self) -> bool {
        matches!(self, Self::Creator(_))
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(class) => f
                .debug_struct("Class")
                .field("slots", &class.slots())
                .finish_non_exhaustive(),
            Self::Creator(creator) => f
                .debug_struct("Creator")
                .field("slots", &creator.slots())
                .finish_non_exhaustive(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

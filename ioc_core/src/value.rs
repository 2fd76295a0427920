//! Runtime values produced and consumed by the container.

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::error::{Error, Result};

/// An object that can be constructed and wired by the container.
///
/// Every method has a default implementation, so a component only has to implement the
/// capabilities it actually offers. Fields that are not known to the component should be reported
/// as errors rather than silently ignored.
pub trait Component: Any + Send + Sync {
    /// Assigns a value directly to a field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchField`] if the component has no such field.
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        drop(value);
        Err(Error::no_such_field(type_name::<Self>(), field))
    }

    /// Reads the current value of a field, returning `None` if it is unknown or unset.
    fn get(&self, field: &str) -> Option<Value> {
        let _ = field;
        None
    }

    /// Invokes a setter method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchMethod`] if the component has no such method.
    fn call(&mut self, method: &str, value: Value) -> Result<()> {
        drop(value);
        Err(Error::no_such_method(type_name::<Self>(), method))
    }

    /// Returns the disposal capability of this component, if it offers one.
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        None
    }

    /// Returns the name of the concrete type.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// A component that releases resources when its container is disposed.
pub trait Dispose {
    fn dispose(&self);
}

/// A shared handle to a constructed [`Component`].
///
/// Cloning an `Instance` clones the handle, not the component. Two instances are equal only if
/// they point to the same component.
#[derive(Clone)]
pub struct Instance(Arc<dyn Component + Send + Sync>);

/// A boxed, not yet shared [`Component`].
pub type BoxedComponent = Box<dyn Component + Send + Sync>;

impl Instance {
    /// Wraps a component in a new `Instance`.
    pub fn new<T>(component: T) -> Self
    where
        T: Component,
    {
        Self(Arc::new(component))
    }

    /// Returns `true` if both instances point to the same component.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the address of the underlying component, unique among live instances.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>().addr()
    }

    /// Returns `true` if the underlying component is of type `T`.
    #[inline]
    pub fn is<T>(&self) -> bool
    where
        T: Component,
    {
        (&*self.0 as &dyn Any).is::<T>()
    }

    /// Returns a reference to the underlying component if it is of type `T`.
    #[inline]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Component,
    {
        (&*self.0 as &dyn Any).downcast_ref()
    }

    /// Tries to downcast `self` into a shared handle of type `T`.
    ///
    /// # Errors
    ///
    /// If the underlying component is not of type `T`, this method will return
    /// itself as error.
    pub fn downcast<T>(self) -> Result<Arc<T>, Self>
    where
        T: Component,
    {
        if self.is::<T>() {
            #[expect(clippy::missing_panics_doc, reason = "already checked")]
            let concrete = (self.0 as Arc<dyn Any + Send + Sync>)
                .downcast::<T>()
                .expect("the concrete type of this instance should be `T` as it was checked before downcasting.");
            Ok(concrete)
        } else {
            Err(self)
        }
    }

    /// Returns the name of the concrete type of the underlying component.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Returns the disposal capability of the underlying component, if it offers one.
    #[inline]
    pub fn as_dispose(&self) -> Option<&dyn Dispose> {
        self.0.as_dispose()
    }

    /// Reads a field of the underlying component.
    #[inline]
    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.get(field)
    }
}

impl From<BoxedComponent> for Instance {
    fn from(component: BoxedComponent) -> Self {
        Self(Arc::from(component))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// A value that can be injected into or resolved from the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Object(Instance),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a reference to the component if this value is an object of type `T`.
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Component,
    {
        self.as_instance().and_then(Instance::downcast_ref)
    }

    /// Returns a shared handle to the component if this value is an object of type `T`.
    pub fn downcast<T>(self) -> Option<Arc<T>>
    where
        T: Component,
    {
        match self {
            Self::Object(instance) => instance.downcast().ok(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Object(v)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Self>,
{
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

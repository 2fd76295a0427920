//! Error types.

use std::error::Error as StdError;
use std::sync::Arc;

use crate::module::ModuleRef;

/// [`Error`] is an error that can be raised by functions and methods from this library.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A component was requested while already being resolved. Holds the resolution path,
    /// ending with the repeated component name.
    Circular(Vec<String>),
    /// The loader does not know the requested module.
    ModuleNotFound(ModuleRef),
    /// A loader returned a different number of implementations than requested.
    LoaderContract { expected: usize, got: usize },
    /// The creator flag of a descriptor does not match the kind of the loaded implementation.
    KindMismatch { module: ModuleRef, creator: bool },
    /// A property has no target field on the constructed instance.
    NoSuchField { type_name: &'static str, field: String },
    /// A setter has no target method on the constructed instance.
    NoSuchMethod {
        type_name: &'static str,
        method: String,
    },
    /// Properties or setters were configured on a component whose product is a plain value.
    NotInjectable(String),
    Other(Arc<dyn StdError + Send + Sync + 'static>),
}

impl Error {
    pub fn circular<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Circular(path.into_iter().map(Into::into).collect())
    }

    pub fn no_such_field(type_name: &'static str, field: impl Into<String>) -> Self {
        Self::NoSuchField {
            type_name,
            field: field.into(),
        }
    }

    pub fn no_such_method(type_name: &'static str, method: impl Into<String>) -> Self {
        Self::NoSuchMethod {
            type_name,
            method: method.into(),
        }
    }

    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Other(Arc::from(err.into()))
    }

    pub const fn is_circular(&self) -> bool {
        matches!(self, Self::Circular(_))
    }

    /// Returns the resolution path of a circular dependency error.
    pub fn circular_path(&self) -> Option<&[String]> {
        match self {
            Self::Circular(path) => Some(path),
            _ => None,
        }
    }

    pub const fn is_module_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound(_))
    }

    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Circular(path) => {
                write!(f, "circular dependency: {}", path.join(" -> "))
            }
            Self::ModuleNotFound(module) => write!(f, "module `{module}` not found"),
            Self::LoaderContract { expected, got } => {
                write!(f, "loader returned {got} implementations, expected {expected}")
            }
            Self::KindMismatch { module, creator } => {
                if *creator {
                    write!(f, "module `{module}` is not a creator function")
                } else {
                    write!(f, "module `{module}` is a creator function, not a class")
                }
            }
            Self::NoSuchField { type_name, field } => {
                write!(f, "type `{type_name}` has no field `{field}`")
            }
            Self::NoSuchMethod { type_name, method } => {
                write!(f, "type `{type_name}` has no method `{method}`")
            }
            Self::NotInjectable(name) => {
                write!(f, "component `{name}` is a plain value and cannot be injected into")
            }
            Self::Other(error) => error.fmt(f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Other(error) => Some(error),
            _ => None,
        }
    }
}

/// [`Result`] is an alias to [`core::result::Result`] with [`Error`] as the
/// default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

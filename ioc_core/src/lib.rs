//! Core types and traits for `ioc` library.
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod future;
pub mod loader;
pub mod module;
pub mod runtime;
pub mod value;

pub use error::{Error, Result};
pub use loader::{Loader, LoaderObject};
pub use module::{Args, Class, Creator, Implementation, ModuleRef, Product, Slot};
pub use runtime::Runtime;
pub use value::{BoxedComponent, Component, Dispose, Instance, Value};

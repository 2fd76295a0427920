//! Asynchronous inversion of control container.
//!
//! Components are described declaratively with a [`Descriptor`](descriptor::Descriptor) and
//! registered by name. Resolving a component loads its module through a pluggable
//! [`Loader`], wires constructor arguments, properties, setters and auto-injected slots, and caches
//! singletons per [`Container`](container::Container).
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
pub(crate) mod macros;

pub mod container;
pub mod descriptor;
pub mod modules;
pub mod registry;

mod injector;
mod lifecycle;
mod resolver;
mod singletons;

#[cfg(test)]
mod fixtures;

pub use ioc_core::{
    Args, BoxedComponent, Class, Component, Creator, Dispose, Error, Implementation, Instance,
    Loader, LoaderObject, ModuleRef, Product, Result, Runtime, Slot, Value,
};

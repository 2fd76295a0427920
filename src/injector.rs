//! Construction and injection of a single component.
//!
//! The [`Injector`] is synchronous: the resolver resolves every dependency first, auto-injected
//! slots included, and only then hands the values over in the order they must be applied.

use ioc_core::error::{Error, Result};
use ioc_core::module::{Args, Implementation, Product, Slot};
use ioc_core::value::Value;

use crate::descriptor::Descriptor;

/// Explicitly configured dependencies of a component, resolved in declaration order.
#[derive(Debug, Default)]
pub(crate) struct Dependencies {
    pub(crate) args: Vec<Value>,
    pub(crate) properties: Vec<Value>,
    pub(crate) setters: Vec<Value>,
    /// Values for the candidate slots, in slot order.
    pub(crate) auto: Vec<Value>,
}

impl Dependencies {
    /// Splits values resolved from [`Descriptor::specs`], followed by the values of the
    /// candidate slots, into their groups.
    pub(crate) fn split(descriptor: &Descriptor, mut values: Vec<Value>) -> Self {
        let explicit = descriptor.args.len() + descriptor.properties.len();
        let auto = values.split_off(explicit + descriptor.setters.len());
        let setters = values.split_off(explicit);
        let properties = values.split_off(descriptor.args.len());

        Self {
            args: values,
            properties,
            setters,
            auto,
        }
    }
}

/// Constructs and injects one component according to its descriptor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Injector<'a> {
    name: &'a str,
    descriptor: &'a Descriptor,
    implementation: &'a Implementation,
}

impl<'a> Injector<'a> {
    pub(crate) const fn new(
        name: &'a str,
        descriptor: &'a Descriptor,
        implementation: &'a Implementation,
    ) -> Self {
        Self {
            name,
            descriptor,
            implementation,
        }
    }

    /// Constructs the product with the resolved constructor arguments.
    ///
    /// Classes are constructed, creator functions are invoked and plain values are used as-is.
    pub(crate) fn construct(&self, args: Vec<Value>) -> Result<Product> {
        match (self.implementation, self.descriptor.creator) {
            (Implementation::Class(class), false) => {
                Ok(Product::Component(class.construct(Args::from(args))?))
            }
            (Implementation::Creator(creator), true) => creator.create(Args::from(args)),
            (Implementation::Value(value), false) => Ok(Product::Value(value.clone())),
            (_, creator) => Err(Error::KindMismatch {
                module: self.descriptor.module.clone(),
                creator,
            }),
        }
    }

    /// Assigns properties, then invokes setters, each in declaration order.
    pub(crate) fn inject(
        &self,
        product: &mut Product,
        properties: Vec<Value>,
        setters: Vec<Value>,
    ) -> Result<()> {
        let component = match product {
            Product::Component(component) => component,
            Product::Value(_) if properties.is_empty() && setters.is_empty() => return Ok(()),
            Product::Value(_) => return Err(Error::NotInjectable(self.name.to_owned())),
        };

        for ((field, _), value) in self.descriptor.properties.iter().zip(properties) {
            component.set(field, value)?;
        }

        for ((method, _), value) in self.descriptor.setters.iter().zip(setters) {
            component.call(method, value)?;
        }

        Ok(())
    }

    /// Returns the slots that auto-injection may fill: none unless auto-injection is enabled,
    /// otherwise every declared slot whose field no property or setter targets.
    ///
    /// Known as soon as the module is loaded, so their values can be resolved before construction.
    pub(crate) fn candidate_slots(&self) -> Vec<&'a Slot> {
        if !self.descriptor.auto_inject {
            return Vec::new();
        }

        self.implementation
            .slots()
            .iter()
            .filter(|slot| !self.descriptor.targets(&slot.field))
            .collect()
    }

    /// Assigns auto-injected values directly to the fields the product left empty, bypassing
    /// setters.
    pub(crate) fn auto_inject(
        &self,
        product: &mut Product,
        slots: &[&Slot],
        values: Vec<Value>,
    ) -> Result<()> {
        let Product::Component(component) = product else {
            return Ok(());
        };

        for (slot, value) in slots.iter().zip(values) {
            if component
                .get(&slot.field)
                .is_none_or(|current| current.is_null())
            {
                component.set(&slot.field, value)?;
            }
        }

        Ok(())
    }
}

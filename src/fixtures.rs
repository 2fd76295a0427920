//! Components shared by the tests of this crate.

use std::sync::atomic::{AtomicUsize, Ordering};

use ioc_core::error::{Error, Result};
use ioc_core::module::{Args, Implementation, Product, Slot};
use ioc_core::value::{Component, Dispose, Value};

use crate::descriptor::{Descriptor, list, reference};
use crate::modules::ModuleTable;

#[derive(Debug, Default)]
pub struct A {
    pub b: Value,
}

impl Component for A {
    fn get(&self, field: &str) -> Option<Value> {
        (field == "b").then(|| self.b.clone())
    }
}

#[derive(Debug, Default)]
pub struct B {
    pub c: Value,
    pub name: Value,
    pub util: Value,
}

impl Component for B {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "name" => self.name = value,
            "util" => self.util = value,
            _ => return Err(Error::no_such_field(self.type_name(), field)),
        }
        Ok(())
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "c" => Some(self.c.clone()),
            "name" => Some(self.name.clone()),
            "util" => Some(self.util.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct B3 {
    pub util: Value,
}

impl B3 {
    pub fn use_util(&self) -> bool {
        self.util
            .downcast_ref::<MyUtil>()
            .is_some_and(|util| util.is_number(&Value::from(1)))
    }
}

impl Component for B3 {}

#[derive(Debug, Default)]
pub struct C {
    pub str: Value,
    pub number: Value,
    pub bool: Value,
    pub nully: Value,
}

impl Component for C {}

#[derive(Debug, Default)]
pub struct D {
    pub str: Value,
    pub number: Value,
    pub bool: Value,
    pub nully: Value,
    pub b: Value,
    pub from_method: Value,
    pub from_method_array: Value,
}

impl Component for D {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "str" => self.str = value,
            "number" => self.number = value,
            "bool" => self.bool = value,
            "nully" => self.nully = value,
            "b" => self.b = value,
            _ => return Err(Error::no_such_field(self.type_name(), field)),
        }
        Ok(())
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "str" => Some(self.str.clone()),
            "number" => Some(self.number.clone()),
            "bool" => Some(self.bool.clone()),
            "nully" => Some(self.nully.clone()),
            "b" => Some(self.b.clone()),
            _ => None,
        }
    }

    fn call(&mut self, method: &str, value: Value) -> Result<()> {
        match method {
            "setFromMethod" => self.from_method = value,
            "setFromMethodArray" => self.from_method_array = value,
            _ => return Err(Error::no_such_method(self.type_name(), method)),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MyUtil;

impl MyUtil {
    pub fn is_number(&self, value: &Value) -> bool {
        value.as_f64().is_some_and(f64::is_finite)
    }
}

impl Component for MyUtil {}

#[derive(Debug, Default)]
pub struct MyFactory;

impl Component for MyFactory {}

/// Built by a creator function, disposable.
#[derive(Debug, Default)]
pub struct CreatorFn {
    pub a: Value,
    pub b: Value,
    pub disposed: AtomicUsize,
}

impl Component for CreatorFn {
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for CreatorFn {
    fn dispose(&self) {
        self.disposed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Built by a creator function, wired through properties.
#[derive(Debug, Default)]
pub struct UtilCreated {
    pub a: Value,
    pub b: Value,
    pub c: Value,
}

impl Component for UtilCreated {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "a" => self.a = value,
            "b" => self.b = value,
            "c" => self.c = value,
            _ => return Err(Error::no_such_field(self.type_name(), field)),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Circular {
    pub other: Value,
}

impl Component for Circular {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "circular2" => {
                self.other = value;
                Ok(())
            }
            _ => Err(Error::no_such_field(self.type_name(), field)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Counted {
    pub me: Value,
}

impl Component for Counted {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "me" => {
                self.me = value;
                Ok(())
            }
            _ => Err(Error::no_such_field(self.type_name(), field)),
        }
    }
}

/// Declares slots for every fixture type, and setters that auto-injection must leave alone.
#[derive(Debug, Default)]
pub struct AutoInject {
    pub a: Value,
    pub b: Value,
    pub c: Value,
    pub d: Value,
    pub e: Value,
    pub my_factory: Value,
    pub another_auto_inject: Value,
    pub set_c_called_count: usize,
    pub setd_calls: usize,
    pub settest_calls: usize,
}

impl AutoInject {
    fn slots() -> [Slot; 7] {
        [
            Slot::new("a", "A"),
            Slot::new("b", "B"),
            Slot::new("c", "C"),
            Slot::new("d", "D"),
            Slot::new("e", "E"),
            Slot::new("myFactory", "MyFactory"),
            Slot::new("anotherAutoInject", "AutoInject1"),
        ]
    }

    fn field(&mut self, field: &str) -> Option<&mut Value> {
        match field {
            "a" => Some(&mut self.a),
            "b" => Some(&mut self.b),
            "c" => Some(&mut self.c),
            "d" => Some(&mut self.d),
            "e" => Some(&mut self.e),
            "myFactory" => Some(&mut self.my_factory),
            "anotherAutoInject" => Some(&mut self.another_auto_inject),
            _ => None,
        }
    }
}

impl Component for AutoInject {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        let type_name = self.type_name();
        let target = self
            .field(field)
            .ok_or_else(|| Error::no_such_field(type_name, field))?;
        *target = value;
        Ok(())
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "a" => Some(self.a.clone()),
            "b" => Some(self.b.clone()),
            "c" => Some(self.c.clone()),
            "d" => Some(self.d.clone()),
            "e" => Some(self.e.clone()),
            "myFactory" => Some(self.my_factory.clone()),
            "anotherAutoInject" => Some(self.another_auto_inject.clone()),
            _ => None,
        }
    }

    fn call(&mut self, method: &str, value: Value) -> Result<()> {
        match method {
            "setC" => {
                self.set_c_called_count += 1;
                self.c = value;
            }
            "setd" => {
                self.setd_calls += 1;
                self.d = value;
            }
            "settest" => self.settest_calls += 1,
            _ => return Err(Error::no_such_method(self.type_name(), method)),
        }
        Ok(())
    }
}

/// Extends [`AutoInject`] with no additional fields.
#[derive(Debug, Default)]
pub struct AutoInject1 {
    pub base: AutoInject,
}

impl Component for AutoInject1 {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        self.base.set(field, value)
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.base.get(field)
    }

    fn call(&mut self, method: &str, value: Value) -> Result<()> {
        self.base.call(method, value)
    }
}

#[derive(Debug, Default)]
pub struct Ping {
    pub pong: Value,
}

impl Component for Ping {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "pong" => {
                self.pong = value;
                Ok(())
            }
            _ => Err(Error::no_such_field(self.type_name(), field)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Pong {
    pub ping: Value,
}

impl Component for Pong {
    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "ping" => {
                self.ping = value;
                Ok(())
            }
            _ => Err(Error::no_such_field(self.type_name(), field)),
        }
    }
}

/// A disposable resource shared by several [`User`]s.
#[derive(Debug, Default)]
pub struct Connection {
    pub closed: AtomicUsize,
}

impl Component for Connection {
    fn as_dispose(&self) -> Option<&dyn Dispose> {
        Some(self)
    }
}

impl Dispose for Connection {
    fn dispose(&self) {
        self.closed.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct User {
    pub connection: Value,
}

impl Component for User {}

/// Every fixture module.
pub fn modules() -> ModuleTable {
    ModuleTable::new()
        .with(
            "A",
            Implementation::class(|mut args: Args| Ok(A { b: args.take(0) })),
        )
        .with(
            "B",
            Implementation::class(|mut args: Args| {
                Ok(B {
                    c: args.take(0),
                    ..B::default()
                })
            }),
        )
        .with(
            "B3",
            Implementation::class(|mut args: Args| Ok(B3 { util: args.take(0) })),
        )
        .with(
            "C",
            Implementation::class(|mut args: Args| {
                Ok(C {
                    str: args.take(0),
                    number: args.take(1),
                    bool: args.take(2),
                    nully: args.take(3),
                })
            }),
        )
        .with("D", Implementation::class(|_| Ok(D::default())))
        .with("MyUtil", Implementation::class(|_| Ok(MyUtil)))
        .with("MyFactory", Implementation::class(|_| Ok(MyFactory)))
        .with(
            "CreatorFn",
            Implementation::creator(|mut args: Args| {
                Ok(Product::component(CreatorFn {
                    a: args.take(0),
                    b: args.take(1),
                    ..CreatorFn::default()
                }))
            }),
        )
        .with(
            "UtilCreator",
            Implementation::creator(|_| Ok(Product::component(UtilCreated::default()))),
        )
        .with("Helpers", Implementation::value(vec!["isNumber", "isString"]))
        .with(
            "Circular1",
            Implementation::class(|_| Ok(Circular::default())),
        )
        .with(
            "Circular2",
            Implementation::class(|mut args: Args| Ok(Circular { other: args.take(0) })),
        )
        .with("Counted", Implementation::class(|_| Ok(Counted::default())))
        .with(
            "AutoInject",
            Implementation::class_with_slots(|_| Ok(AutoInject::default()), AutoInject::slots()),
        )
        .with(
            "AutoInject1",
            Implementation::class_with_slots(|_| Ok(AutoInject1::default()), AutoInject::slots()),
        )
        .with(
            "Ping",
            Implementation::class_with_slots(|_| Ok(Ping::default()), [Slot::new("pong", "Pong")]),
        )
        .with(
            "Pong",
            Implementation::class_with_slots(|_| Ok(Pong::default()), [Slot::new("ping", "Ping")]),
        )
}

/// The fixture component graph.
pub fn components() -> Vec<(&'static str, Descriptor)> {
    vec![
        ("a", Descriptor::new("A").arg(reference("b"))),
        ("a2", Descriptor::new("A").arg(reference("b"))),
        (
            "b",
            Descriptor::new("B")
                .arg(reference("c"))
                .property("name", "Tony Blair")
                .property("util", reference("myUtil")),
        ),
        ("b3", Descriptor::new("B3").arg(reference("myUtil"))),
        (
            "c",
            Descriptor::new("C")
                .arg("String")
                .arg(99)
                .arg(true)
                .arg(()),
        ),
        (
            "d",
            Descriptor::new("D")
                .property("str", "hi")
                .property("number", 88)
                .property("bool", false)
                .property("nully", ())
                .property("b", reference("b"))
                .setter("setFromMethod", "set")
                .setter("setFromMethodArray", list(["one", "two"])),
        ),
        ("myUtil", Descriptor::new("MyUtil")),
        ("myFactory", Descriptor::new("MyFactory")),
        (
            "creatorFn",
            Descriptor::new("CreatorFn")
                .creator()
                .arg(reference("a"))
                .arg(reference("b")),
        ),
        (
            "utilCreator",
            Descriptor::new("UtilCreator")
                .creator()
                .property("a", reference("a"))
                .property("b", reference("b"))
                .property("c", reference("c")),
        ),
        ("f", Descriptor::new("Helpers")),
        (
            "circular1",
            Descriptor::new("Circular1").property("circular2", reference("circular2")),
        ),
        ("circular2", Descriptor::new("Circular2").arg(reference("circular1"))),
        (
            "autoInject",
            Descriptor::new("AutoInject")
                .property("myFactory", "myFactory")
                .setter("setC", reference("c"))
                .auto_inject(),
        ),
        ("anotherAutoInject", Descriptor::new("AutoInject1").auto_inject()),
    ]
}

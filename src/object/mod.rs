use crate::ast::Statement;
use crate::context::Context;
use crate::environment::Environment;
use crate::evaluator;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

mod eval_error;
pub use eval_error::EvalError;

pub type Result<T> = std::result::Result<T, EvalError>;

pub const INIT_METHOD: &str = "__init__";
pub const STR_METHOD: &str = "__str__";
pub const ADD_METHOD: &str = "__add__";
pub const EQ_METHOD: &str = "__eq__";
pub const LT_METHOD: &str = "__lt__";

#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Number(i32),
    String(String),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
}

/// Host-level equality, for tests and assertions: structural on
/// primitives, identity on classes and instances. Language-level
/// equality is `equal`, which dispatches to `__eq__`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Class(_) => "class",
            Self::Instance(_) => "instance",
        }
    }

    /// `True`, non-zero numbers and non-empty strings count as true;
    /// everything else, classes and instances included, does not.
    pub fn truth_value(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0,
            Self::String(s) => !s.is_empty(),
            _ => false,
        }
    }

    /// The text `print` produces for this value. An instance with a
    /// nullary `__str__` renders as whatever that method returns;
    /// without one it renders as its address, which is stable but not
    /// predictable.
    pub fn display_string(&self, ctx: &mut dyn Context) -> Result<String> {
        Ok(match self {
            Self::None => "None".to_owned(),
            Self::Bool(true) => "True".to_owned(),
            Self::Bool(false) => "False".to_owned(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
            Self::Class(class) => format!("Class {}", class.name()),
            Self::Instance(instance) => {
                if instance.has_method(STR_METHOD, 0) {
                    let repr = Instance::call(instance, STR_METHOD, vec![], ctx)?;
                    repr.display_string(ctx)?
                } else {
                    format!("{:p}", Rc::as_ptr(instance))
                }
            }
        })
    }
}

/// A named method: parameter names (the implicit `self` is not listed)
/// and the body it executes. Immutable once its class is built.
#[derive(Debug)]
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Statement,
}

#[derive(Debug)]
pub struct Class {
    name: String,
    methods: HashMap<String, Rc<Method>>,
    parent: Option<Rc<Class>>,
}

impl Class {
    /// Inheritance is resolved here, once: the parent's table is
    /// snapshotted and the class's own methods overlaid, so lookup is a
    /// single map probe with no parent walk.
    pub fn new(name: &str, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Rc<Self> {
        let mut table = match &parent {
            Some(parent) => parent.methods.clone(),
            None => HashMap::new(),
        };
        for method in methods {
            table.insert(method.name.clone(), Rc::new(method));
        }
        Rc::new(Self {
            name: name.to_owned(),
            methods: table,
            parent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&Rc<Method>> {
        self.methods.get(name)
    }

    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }
}

/// A class instance: the class it was built from and its fields, which
/// grow on first assignment.
#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
    fields: RefCell<Environment>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Rc<Self> {
        Rc::new(Self {
            class,
            fields: RefCell::new(Environment::new()),
        })
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn fields(&self) -> Ref<Environment> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<Environment> {
        self.fields.borrow_mut()
    }

    pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
        self.class
            .method(method)
            .map_or(false, |m| m.formal_params.len() == argument_count)
    }

    /// Invokes a method on an instance: a fresh frame binds `self` and
    /// the formal parameters, then the body runs. The frame dies with
    /// the call, which is what keeps `self` from outliving it.
    pub fn call(
        instance: &Rc<Self>,
        method: &str,
        args: Vec<Value>,
        ctx: &mut dyn Context,
    ) -> Result<Value> {
        let resolved = match instance.class.method(method) {
            Some(resolved) if resolved.formal_params.len() == args.len() => Rc::clone(resolved),
            _ => {
                return Err(EvalError::MethodNotFound {
                    method: method.to_owned(),
                    arity: args.len(),
                })
            }
        };

        let mut frame = Environment::new();
        frame.set("self", Value::Instance(Rc::clone(instance)));
        for (param, arg) in resolved.formal_params.iter().zip(args) {
            frame.set(param, arg);
        }
        Ok(evaluator::execute(&resolved.body, &mut frame, ctx)?.into_value())
    }
}

/// Equality: both `None`, matching primitives, or `__eq__` on a
/// left-hand instance. Anything else cannot be compared.
pub fn equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool> {
    match (lhs, rhs) {
        (Value::None, Value::None) => Ok(true),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Instance(instance), _) if instance.has_method(EQ_METHOD, 1) => {
            as_bool(Instance::call(instance, EQ_METHOD, vec![rhs.clone()], ctx)?)
        }
        _ => Err(EvalError::Incomparable),
    }
}

/// Ordering by `<`: matching primitives (strings lexicographically), or
/// `__lt__` on a left-hand instance.
pub fn less(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a < b),
        (Value::Number(a), Value::Number(b)) => Ok(a < b),
        (Value::String(a), Value::String(b)) => Ok(a < b),
        (Value::Instance(instance), _) if instance.has_method(LT_METHOD, 1) => {
            as_bool(Instance::call(instance, LT_METHOD, vec![rhs.clone()], ctx)?)
        }
        _ => Err(EvalError::Incomparable),
    }
}

pub fn not_equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool> {
    Ok(!equal(lhs, rhs, ctx)?)
}

pub fn greater(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool> {
    Ok(!(less(lhs, rhs, ctx)? || equal(lhs, rhs, ctx)?))
}

pub fn less_or_equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool> {
    Ok(less(lhs, rhs, ctx)? || equal(lhs, rhs, ctx)?)
}

pub fn greater_or_equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool> {
    Ok(!less(lhs, rhs, ctx)?)
}

fn as_bool(value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(EvalError::Incomparable),
    }
}

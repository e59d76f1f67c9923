use crate::ast::{ArithmeticOp, ComparisonOp, Expression, LogicalOp, Statement, VariableValue};
use crate::context::Context;
use crate::environment::Environment;
use crate::object::{self, EvalError, Instance, Result, Value, ADD_METHOD, INIT_METHOD};
use std::io::Write;
use std::rc::Rc;

/// What a statement hands back to its enclosing block: a plain value,
/// or one that a `return` is carrying out of the method.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Normal(Value),
    Propagate(Value),
}

impl Outcome {
    pub fn into_value(self) -> Value {
        match self {
            Self::Normal(value) | Self::Propagate(value) => value,
        }
    }
}

/// Runs a whole program. A `return` escaping to the top level is not an
/// error; its value simply becomes the program's result.
pub fn run(program: &Statement, env: &mut Environment, ctx: &mut dyn Context) -> Result<Value> {
    Ok(execute(program, env, ctx)?.into_value())
}

pub fn execute(
    statement: &Statement,
    env: &mut Environment,
    ctx: &mut dyn Context,
) -> Result<Outcome> {
    match statement {
        Statement::Expr(expression) => Ok(Outcome::Normal(evaluate(expression, env, ctx)?)),
        Statement::Assignment { variable, value } => {
            let value = evaluate(value, env, ctx)?;
            env.set(variable, value.clone());
            Ok(Outcome::Normal(value))
        }
        Statement::FieldAssignment {
            object,
            field,
            value,
        } => {
            // The target instance is resolved before the value runs.
            let instance = match variable_value(object, env)? {
                Value::Instance(instance) => instance,
                _ => return Err(EvalError::NotAnInstance),
            };
            let value = evaluate(value, env, ctx)?;
            instance.fields_mut().set(field, value.clone());
            Ok(Outcome::Normal(value))
        }
        Statement::Print(args) => {
            for (i, arg) in args.iter().enumerate() {
                let value = evaluate(arg, env, ctx)?;
                let text = value.display_string(ctx)?;
                let out = ctx.output();
                if i > 0 {
                    write(out, " ")?;
                }
                write(out, &text)?;
            }
            write(ctx.output(), "\n")?;
            Ok(Outcome::Normal(Value::None))
        }
        Statement::Return(expression) => match evaluate(expression, env, ctx)? {
            // A bare `return None` does not leave the enclosing block.
            Value::None => Ok(Outcome::Normal(Value::None)),
            value => Ok(Outcome::Propagate(value)),
        },
        Statement::IfElse {
            condition,
            if_body,
            else_body,
        } => {
            if evaluate(condition, env, ctx)?.truth_value() {
                execute(if_body, env, ctx)
            } else if let Some(else_body) = else_body {
                execute(else_body, env, ctx)
            } else {
                Ok(Outcome::Normal(Value::None))
            }
        }
        Statement::Compound(statements) => {
            for statement in statements {
                if let Outcome::Propagate(value) = execute(statement, env, ctx)? {
                    return Ok(Outcome::Propagate(value));
                }
            }
            Ok(Outcome::Normal(Value::None))
        }
        Statement::ClassDefinition(class) => {
            env.set(class.name(), Value::Class(Rc::clone(class)));
            Ok(Outcome::Normal(Value::None))
        }
        Statement::MethodBody(body) => {
            // The method boundary: a propagating return stops here and
            // becomes the method's result.
            match execute(body, env, ctx)? {
                Outcome::Propagate(value) => Ok(Outcome::Normal(value)),
                Outcome::Normal(_) => Ok(Outcome::Normal(Value::None)),
            }
        }
    }
}

pub fn evaluate(
    expression: &Expression,
    env: &Environment,
    ctx: &mut dyn Context,
) -> Result<Value> {
    match expression {
        Expression::NumericConst(n) => Ok(Value::Number(*n)),
        Expression::StringConst(s) => Ok(Value::String(s.clone())),
        Expression::BoolConst(b) => Ok(Value::Bool(*b)),
        Expression::None => Ok(Value::None),
        Expression::Variable(variable) => variable_value(variable, env),
        Expression::Arithmetic {
            operator,
            left,
            right,
        } => {
            let left = evaluate(left, env, ctx)?;
            let right = evaluate(right, env, ctx)?;
            arithmetic(*operator, left, right, ctx)
        }
        Expression::Logical {
            operator,
            left,
            right,
        } => {
            let left = evaluate(left, env, ctx)?.truth_value();
            let result = match operator {
                LogicalOp::And => left && evaluate(right, env, ctx)?.truth_value(),
                LogicalOp::Or => left || evaluate(right, env, ctx)?.truth_value(),
            };
            Ok(Value::Bool(result))
        }
        Expression::Not(arg) => Ok(Value::Bool(!evaluate(arg, env, ctx)?.truth_value())),
        Expression::Comparison {
            operator,
            left,
            right,
        } => {
            let left = evaluate(left, env, ctx)?;
            let right = evaluate(right, env, ctx)?;
            Ok(Value::Bool(compare(*operator, &left, &right, ctx)?))
        }
        Expression::Stringify(arg) => {
            let value = evaluate(arg, env, ctx)?;
            Ok(Value::String(value.display_string(ctx)?))
        }
        Expression::MethodCall {
            object,
            method,
            args,
        } => {
            // Arguments first, then the receiver.
            let mut arg_values = Vec::with_capacity(args.len());
            for arg in args {
                arg_values.push(evaluate(arg, env, ctx)?);
            }
            match evaluate(object, env, ctx)? {
                Value::Instance(instance) if instance.has_method(method, arg_values.len()) => {
                    Instance::call(&instance, method, arg_values, ctx)
                }
                _ => Err(EvalError::WrongMethodCall {
                    method: method.clone(),
                }),
            }
        }
        Expression::NewInstance { class, args } => {
            let instance = Instance::new(Rc::clone(class));
            // Arguments only run when a matching __init__ does; without
            // one the instance starts with no fields.
            if let Some(init) = class.method(INIT_METHOD) {
                if init.formal_params.len() == args.len() {
                    let mut arg_values = Vec::with_capacity(args.len());
                    for arg in args {
                        arg_values.push(evaluate(arg, env, ctx)?);
                    }
                    Instance::call(&instance, INIT_METHOD, arg_values, ctx)?;
                }
            }
            Ok(Value::Instance(instance))
        }
    }
}

fn variable_value(variable: &VariableValue, env: &Environment) -> Result<Value> {
    let mut names = variable.chain.iter();
    let first = names.next().ok_or_else(|| EvalError::UnknownVariable {
        name: String::new(),
    })?;
    let mut value = env.get(first).ok_or_else(|| EvalError::UnknownVariable {
        name: first.clone(),
    })?;

    for name in names {
        let instance = match &value {
            Value::Instance(instance) => Rc::clone(instance),
            _ => return Err(EvalError::NotAnInstance),
        };
        let field = instance.fields().get(name);
        value = field.ok_or_else(|| EvalError::UnknownVariable { name: name.clone() })?;
    }
    Ok(value)
}

fn arithmetic(
    operator: ArithmeticOp,
    left: Value,
    right: Value,
    ctx: &mut dyn Context,
) -> Result<Value> {
    match (operator, left, right) {
        (operator, Value::Number(a), Value::Number(b)) => match operator {
            ArithmeticOp::Add => Ok(Value::Number(a + b)),
            ArithmeticOp::Sub => Ok(Value::Number(a - b)),
            ArithmeticOp::Mult => Ok(Value::Number(a * b)),
            ArithmeticOp::Div => {
                if b == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    // Truncates toward zero; wrapping keeps MIN / -1 total.
                    Ok(Value::Number(a.wrapping_div(b)))
                }
            }
        },
        (ArithmeticOp::Add, Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (ArithmeticOp::Add, Value::Instance(instance), right)
            if instance.has_method(ADD_METHOD, 1) =>
        {
            Instance::call(&instance, ADD_METHOD, vec![right], ctx)
        }
        (operator, left, right) => Err(EvalError::UnsupportedOperands {
            operator,
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

fn compare(
    operator: ComparisonOp,
    lhs: &Value,
    rhs: &Value,
    ctx: &mut dyn Context,
) -> Result<bool> {
    match operator {
        ComparisonOp::Equal => object::equal(lhs, rhs, ctx),
        ComparisonOp::NotEqual => object::not_equal(lhs, rhs, ctx),
        ComparisonOp::Less => object::less(lhs, rhs, ctx),
        ComparisonOp::Greater => object::greater(lhs, rhs, ctx),
        ComparisonOp::LessOrEqual => object::less_or_equal(lhs, rhs, ctx),
        ComparisonOp::GreaterOrEqual => object::greater_or_equal(lhs, rhs, ctx),
    }
}

fn write(out: &mut dyn Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .map_err(|_| EvalError::BrokenOutput)
}

use crate::ast::ArithmeticOp;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    UnknownVariable{name: String} = "unknown variable: {name}",
    NotAnInstance = "object is not a class instance",
    WrongMethodCall{method: String} = "wrong method call: {method}",
    MethodNotFound{method: String, arity: usize} = "no method {method} taking {arity} arguments",
    Incomparable = "objects cannot be compared",
    UnsupportedOperands{operator: ArithmeticOp, left: &'static str, right: &'static str}
        = "unsupported operand types: {left} {operator} {right}",
    DivisionByZero = "division by zero",
    BrokenOutput = "cannot write to the output stream",
}

mod ast;
mod context;
mod environment;
pub mod evaluator;
mod lexer;
mod object;
mod token;

pub use ast::{ArithmeticOp, ComparisonOp, Expression, LogicalOp, Statement, VariableValue};
pub use context::{CapturingContext, Context, StreamContext};
pub use environment::Environment;
pub use lexer::{Lexer, LexerError};
pub use object::{
    equal, greater, greater_or_equal, less, less_or_equal, not_equal, Class, EvalError, Instance,
    Method, Value,
};
pub use token::{Token, TokenType};

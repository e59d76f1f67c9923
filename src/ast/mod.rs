mod expression;
mod statement;
pub use expression::*;
pub use statement::*;

/// A variable reference, possibly reaching through instance fields:
/// `x`, `self.count`, `order.customer.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableValue {
    pub chain: Vec<String>,
}

impl VariableValue {
    pub fn dotted(names: &[&str]) -> Self {
        Self {
            chain: names.iter().map(|name| (*name).to_owned()).collect(),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(name: &str) -> Self {
        Self {
            chain: vec![name.to_owned()],
        }
    }
}

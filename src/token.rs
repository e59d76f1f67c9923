use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::{self, Formatter};
use strum_macros::{Display, EnumDiscriminants};

#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(derive(Hash, Display))]
#[strum_discriminants(name(TokenType))]
pub enum Token {
    // Valued tokens
    Number(i32),
    Id(String),
    String(String),
    Char(char),

    // Keywords
    Class,
    Return,
    If,
    Else,
    Def,
    Print,
    And,
    Or,
    Not,
    None,
    True,
    False,

    // Two-character comparison operators
    Eq,
    NotEq,
    LessOrEq,
    GreaterOrEq,

    // Layout
    Newline,
    Indent,
    Dedent,
    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Token> = vec![
        ("class", Token::Class),
        ("return", Token::Return),
        ("if", Token::If),
        ("else", Token::Else),
        ("def", Token::Def),
        ("print", Token::Print),
        ("and", Token::And),
        ("or", Token::Or),
        ("not", Token::Not),
        ("None", Token::None),
        ("True", Token::True),
        ("False", Token::False),
    ]
    .into_iter()
    .collect();
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        KEYWORDS
            .get(text)
            .cloned()
            .unwrap_or_else(|| Self::Id(text.to_owned()))
    }
}

impl Token {
    pub fn is(&self, token_type: TokenType) -> bool {
        TokenType::from(self) == token_type
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "Number{{{}}}", value),
            Self::Id(name) => write!(f, "Id{{{}}}", name),
            Self::String(value) => write!(f, "String{{{}}}", value),
            Self::Char(value) => write!(f, "Char{{{}}}", value),
            other => write!(f, "{}", TokenType::from(other)),
        }
    }
}

use crate::token::{Token, TokenType};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexerError

    Indentation = "odd number of leading spaces",
    StringBroken = "line break inside a string literal",
    StringUnterminated = "string literal is not terminated",
    NumberRange{literal: String} = "number does not fit in 32 bits: {literal}",
    MalformedOperator{found: char} = "malformed operator: {found}",
    UnexpectedCharacter{found: char} = "unexpected character: {found}",
    WrongTokenType{expected: TokenType, found: Token} = "expected a {expected} token, found {found}",
    WrongToken{expected: Token, found: Token} = "expected {expected}, found {found}",
}

type Result<T> = std::result::Result<T, LexerError>;

/// Splits a source text into tokens, synthesizing `Newline`, `Indent` and
/// `Dedent` tokens from line breaks and leading whitespace. Indentation
/// uses groups of exactly two spaces; an odd count is an error.
pub struct Lexer {
    input: String,
    position: usize,
    read_position: usize,
    ch: u8,
    current: Token,
    // Indentation level already emitted vs. the level of the pending line.
    indent_level: usize,
    pending_level: usize,
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_name_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

impl Lexer {
    pub fn new(input: String) -> Result<Self> {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: 0,
            // The sentinel makes the first line lex as if a Newline had
            // just been emitted, so its indentation is synthesized too.
            current: Token::Newline,
            indent_level: 0,
            pending_level: 0,
        };
        lexer.read_char();
        lexer.read_indent()?;
        lexer.next_token()?;
        Ok(lexer)
    }

    pub fn current_token(&self) -> &Token {
        &self.current
    }

    pub fn next_token(&mut self) -> Result<Token> {
        let token = self.produce_token()?;
        self.current = token.clone();
        Ok(token)
    }

    /// Fails unless the current token has the requested type.
    pub fn expect(&self, token_type: TokenType) -> Result<&Token> {
        if self.current.is(token_type) {
            Ok(&self.current)
        } else {
            Err(LexerError::WrongTokenType {
                expected: token_type,
                found: self.current.clone(),
            })
        }
    }

    /// Fails unless the current token equals `token`, payload included.
    pub fn expect_token(&self, token: &Token) -> Result<()> {
        if &self.current == token {
            Ok(())
        } else {
            Err(LexerError::WrongToken {
                expected: token.clone(),
                found: self.current.clone(),
            })
        }
    }

    pub fn expect_next(&mut self, token_type: TokenType) -> Result<&Token> {
        self.next_token()?;
        self.expect(token_type)
    }

    pub fn expect_next_token(&mut self, token: &Token) -> Result<()> {
        self.next_token()?;
        self.expect_token(token)
    }

    fn read_char(&mut self) {
        self.ch = *self.input.as_bytes().get(self.read_position).unwrap_or(&0);
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn produce_token(&mut self) -> Result<Token> {
        loop {
            // A comment runs up to, but not through, the line break.
            if self.ch == b'#' {
                while self.ch != b'\n' && self.ch != 0 {
                    self.read_char();
                }
            }

            if self.ch == b'\n' {
                self.read_char();
                self.read_indent()?;
                if self.current != Token::Newline {
                    return Ok(Token::Newline);
                }
                // Consecutive line breaks collapse into one Newline.
                continue;
            }

            if self.ch == 0 {
                return Ok(self.wind_down());
            }

            if self.pending_level > self.indent_level {
                self.indent_level += 1;
                return Ok(Token::Indent);
            }
            if self.pending_level < self.indent_level {
                self.indent_level -= 1;
                return Ok(Token::Dedent);
            }

            if self.ch == b' ' {
                while self.ch == b' ' {
                    self.read_char();
                }
                continue;
            }

            return self.read_content();
        }
    }

    // Input is exhausted: close the last line, unwind the indentation,
    // then report Eof forever.
    fn wind_down(&mut self) -> Token {
        match self.current {
            Token::Newline | Token::Dedent | Token::Eof => {
                if self.indent_level > 0 {
                    self.indent_level -= 1;
                    Token::Dedent
                } else {
                    Token::Eof
                }
            }
            _ => Token::Newline,
        }
    }

    fn read_indent(&mut self) -> Result<()> {
        let mut spaces = 0;
        while self.ch == b' ' {
            spaces += 1;
            self.read_char();
        }
        if spaces % 2 == 1 {
            return Err(LexerError::Indentation);
        }
        self.pending_level = spaces / 2;
        Ok(())
    }

    fn read_content(&mut self) -> Result<Token> {
        match self.ch {
            b'0'..=b'9' => self.read_number(),
            b'\'' | b'"' => {
                let quote = self.ch;
                self.read_char();
                self.read_string(quote)
            }
            b'=' | b'<' | b'>' | b'!' => self.read_comparison(),
            b'+' | b'-' | b'*' | b'/' | b':' | b'(' | b')' | b'.' | b',' => {
                let c = self.ch;
                self.read_char();
                Ok(Token::Char(c as char))
            }
            c if is_name_start(c) => Ok(self.read_identifier()),
            c => Err(LexerError::UnexpectedCharacter { found: c as char }),
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        let literal = &self.input[start..self.position];
        literal
            .parse()
            .map(Token::Number)
            .map_err(|_| LexerError::NumberRange {
                literal: literal.to_owned(),
            })
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while is_name_continue(self.ch) {
            self.read_char();
        }
        Token::from(&self.input[start..self.position])
    }

    fn read_string(&mut self, quote: u8) -> Result<Token> {
        let mut value = Vec::new();
        loop {
            match self.ch {
                0 => return Err(LexerError::StringUnterminated),
                b'\n' | b'\r' => return Err(LexerError::StringBroken),
                b'\\' => {
                    self.read_char();
                    match self.ch {
                        0 => return Err(LexerError::StringUnterminated),
                        b'n' => value.push(b'\n'),
                        b't' => value.push(b'\t'),
                        b'\'' => value.push(b'\''),
                        b'"' => value.push(b'"'),
                        // Unrecognized escapes contribute nothing.
                        _ => {}
                    }
                    self.read_char();
                }
                c if c == quote => {
                    self.read_char();
                    return Ok(Token::String(String::from_utf8_lossy(&value).into_owned()));
                }
                c => {
                    value.push(c);
                    self.read_char();
                }
            }
        }
    }

    fn read_comparison(&mut self) -> Result<Token> {
        let first = self.ch;
        self.read_char();
        if self.ch == b'=' {
            self.read_char();
            return match first {
                b'=' => Ok(Token::Eq),
                b'!' => Ok(Token::NotEq),
                b'<' => Ok(Token::LessOrEq),
                b'>' => Ok(Token::GreaterOrEq),
                c => Err(LexerError::MalformedOperator { found: c as char }),
            };
        }
        match first {
            b'=' | b'<' | b'>' => Ok(Token::Char(first as char)),
            c => Err(LexerError::MalformedOperator { found: c as char }),
        }
    }
}

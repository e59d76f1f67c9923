use mython::{Lexer, Token};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    let source = match read_source() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("cannot read input: {}", err);
            process::exit(1);
        }
    };

    let mut lexer = match Lexer::new(source) {
        Ok(lexer) => lexer,
        Err(err) => {
            eprintln!("lexer error: {}", err);
            process::exit(1);
        }
    };

    loop {
        println!("{}", lexer.current_token());
        if *lexer.current_token() == Token::Eof {
            break;
        }
        if let Err(err) = lexer.next_token() {
            eprintln!("lexer error: {}", err);
            process::exit(1);
        }
    }
}

// Reads the file named on the command line, or stdin. CR-LF sources are
// normalized so they lex the same as LF ones.
fn read_source() -> io::Result<String> {
    let source = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(source.replace("\r\n", "\n"))
}

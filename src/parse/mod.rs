mod error;
mod lexer;
mod parser;
mod token;

pub use error::ParseError;

use crate::types::{Engine, FuncMap, ValueMap};

/// Parse rule lines into an [`Engine`] AST.
///
/// The three maps supply the namespaces the parser resolves names against:
/// assignment targets must not collide with inputs or functions, right-hand
/// identifiers must resolve to exactly one of inputs or outputs, and call
/// names must resolve to a function. Names must be disjoint across the three
/// maps.
///
/// # Errors
///
/// Returns [`ParseError`] on the first lexing or parsing failure.
pub fn parse<S: AsRef<str>>(
    lines: &[S],
    funcs: &FuncMap,
    inputs: &ValueMap,
    outputs: &ValueMap,
) -> Result<Engine, ParseError> {
    check_disjoint(funcs, inputs, outputs)?;
    parser::Parser::new(lexer::Lexer::new(lines), funcs, inputs, outputs).parse()
}

fn check_disjoint(
    funcs: &FuncMap,
    inputs: &ValueMap,
    outputs: &ValueMap,
) -> Result<(), ParseError> {
    for name in inputs.keys() {
        if outputs.contains_key(name) || funcs.contains_key(name) {
            return Err(ParseError::NameCollision { name: name.clone() });
        }
    }
    for name in outputs.keys() {
        if funcs.contains_key(name) {
            return Err(ParseError::NameCollision { name: name.clone() });
        }
    }
    Ok(())
}

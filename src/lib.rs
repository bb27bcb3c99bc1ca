//! Edict, a small rule-evaluation engine.
//!
//! A rule is a single line: an optional condition, the ` | ` separator
//! (space, pipe, space), and one or more comma-separated `name = expression`
//! actions. Rules are parsed into an AST and evaluated against three
//! caller-supplied maps — read-only inputs, mutable outputs, and host
//! functions — producing an updated output map:
//!
//! ```
//! use std::collections::HashMap;
//! use edict::{run, Value};
//!
//! let inputs: HashMap<String, Value> = [("qty".to_owned(), Value::Number(3.0))].into();
//! let outputs: HashMap<String, Value> = [("price".to_owned(), Value::Number(0.0))].into();
//!
//! let result = run(&["qty > 2 | price = qty * 10"], HashMap::new(), inputs, outputs).unwrap();
//! assert_eq!(result["price"], Value::Number(30.0));
//! ```
//!
//! Expressions support arithmetic (`+ - * / %`, recognized only when the
//! operator is followed by whitespace), comparisons, `&&`/`||`, `!`, string
//! and boolean literals, decimal/hex/octal/binary numbers, and calls to host
//! functions. All arithmetic runs on 64-bit floats; `==`/`!=` compare values
//! structurally without coercion.
//!
//! Parsing and evaluation are separate phases; a parsed program can be
//! persisted as an ASCII string and reloaded later:
//!
//! ```
//! use std::collections::HashMap;
//! use edict::{deserialize, parse, serialize, Evaluator, Value};
//!
//! let outputs: HashMap<String, Value> = [("total".to_owned(), Value::Number(0.0))].into();
//! let program = parse(&["total = 2 + 3"], &HashMap::new(), &HashMap::new(), &outputs).unwrap();
//!
//! let blob = serialize(&program).unwrap();
//! let restored = deserialize(&blob).unwrap();
//!
//! let evaluator = Evaluator::new(HashMap::new(), HashMap::new(), outputs);
//! assert_eq!(evaluator.eval(&restored).unwrap()["total"], Value::Number(5.0));
//! ```

mod error;
mod evaluate;
mod parse;
mod serial;
mod types;

pub use error::EdictError;
pub use evaluate::{EvalError, Evaluator};
pub use parse::{ParseError, parse};
pub use serial::{DeserializeError, SerializeError, deserialize, serialize};
pub use types::{
    Assignment, BoolLit, CallError, CondClass, CondExpr, CondOp, Engine, Expression, FuncMap,
    Function, FunctionCall, HostError, IdentifierRef, MathClass, MathExpr, MathOp, Node, NotExpr,
    NumberLit, Position, Rule, StringLit, Value, ValueMap, VariableRef,
};

/// Parse and evaluate rule lines in one call.
///
/// Constructs a parser, then an [`Evaluator`] owning the three maps, and
/// returns the updated output map or the first error from either phase.
///
/// # Errors
///
/// Returns [`EdictError`] wrapping the parse or evaluation failure.
pub fn run<S: AsRef<str>>(
    lines: &[S],
    funcs: FuncMap,
    inputs: ValueMap,
    outputs: ValueMap,
) -> Result<ValueMap, EdictError> {
    let engine = parse(lines, &funcs, &inputs, &outputs)?;
    let evaluator = Evaluator::new(funcs, inputs, outputs);
    Ok(evaluator.eval(&engine)?)
}

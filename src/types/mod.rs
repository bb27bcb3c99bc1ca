mod ast;
mod function;
mod value;

use std::collections::HashMap;

pub use ast::{
    Assignment, BoolLit, CondClass, CondExpr, CondOp, Engine, Expression, FunctionCall,
    IdentifierRef, MathClass, MathExpr, MathOp, Node, NotExpr, NumberLit, Position, Rule,
    StringLit, VariableRef,
};
pub use function::{CallError, Function, HostError};
pub use value::Value;

/// Variable bindings, keyed by identifier.
pub type ValueMap = HashMap<String, Value>;

/// Host functions, keyed by identifier.
pub type FuncMap = HashMap<String, Function>;

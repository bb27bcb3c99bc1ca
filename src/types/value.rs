use std::fmt;

use serde::{Deserialize, Serialize};

/// A value flowing through rule evaluation.
///
/// All numeric literals and arithmetic results are carried as 64-bit floats;
/// there is no separate integer representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A 64-bit floating-point number.
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// The absent value. Reading an output name before its first assignment
    /// yields `Unit`.
    Unit,
}

impl Value {
    /// Truthiness used by rule conditions, `!`, `&&` and `||`:
    /// non-zero numbers, `true`, and non-empty strings and lists are truthy;
    /// `Unit` is falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Unit => false,
        }
    }

    /// The numeric view of this value, if it has one. Only `Number` converts;
    /// bools and strings do not coerce.
    #[must_use]
    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Unit => "unit",
        }
    }

    /// Whether two values share the same host type. Assignments must preserve
    /// the type of an existing output binding.
    #[must_use]
    pub(crate) fn same_type(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Unit => write!(f, "()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64() {
        assert_eq!(Value::from(3.14_f64), Value::Number(3.14));
    }

    #[test]
    fn from_i64_promotes_to_float() {
        assert_eq!(Value::from(42_i64), Value::Number(42.0));
    }

    #[test]
    fn from_bool() {
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn from_str() {
        assert_eq!(Value::from("hello"), Value::String("hello".to_owned()));
    }

    #[test]
    fn from_vec() {
        assert_eq!(
            Value::from(vec![Value::Number(1.0)]),
            Value::List(vec![Value::Number(1.0)])
        );
    }

    #[test]
    fn truthiness() {
        assert!(Value::Number(1.0).is_truthy());
        assert!(Value::Number(-0.5).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::String("x".into()).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(Value::List(vec![Value::Unit]).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(!Value::Unit.is_truthy());
    }

    #[test]
    fn as_number_only_for_numbers() {
        assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::String("1".into()).as_number(), None);
        assert_eq!(Value::Unit.as_number(), None);
    }

    #[test]
    fn same_type_ignores_payload() {
        assert!(Value::Number(1.0).same_type(&Value::Number(2.0)));
        assert!(!Value::Number(1.0).same_type(&Value::String("1".into())));
        assert!(Value::Unit.same_type(&Value::Unit));
    }

    #[test]
    fn structural_equality_does_not_coerce() {
        assert_ne!(Value::String("1".into()), Value::Number(1.0));
        assert_ne!(Value::Bool(true), Value::Number(1.0));
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String("hi".into()).to_string(), "\"hi\"");
        assert_eq!(
            Value::List(vec![Value::Number(1.0), Value::Bool(false)]).to_string(),
            "[1, false]"
        );
        assert_eq!(Value::Unit.to_string(), "()");
    }
}

use thiserror::Error;

use crate::types::Position;

/// Errors produced while turning rule lines into an AST. Lexer failures are
/// folded in: the lexer reports them as an error token, and the parser
/// surfaces that token as [`ParseError::Lex`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The lexer rejected the input.
    #[error("{pos}: {message}")]
    Lex {
        /// Where lexing stopped.
        pos: Position,
        /// The lexer's message.
        message: String,
    },

    /// The parser met a token it cannot use here.
    #[error("{pos}: unexpected token {found}, expected {expected}")]
    UnexpectedToken {
        pos: Position,
        /// Description of the offending token.
        found: String,
        /// Description of what would have been accepted.
        expected: String,
    },

    /// A name is bound in more than one of the three caller-supplied maps.
    #[error("name '{name}' is bound in more than one of inputs, outputs and functions")]
    NameCollision {
        /// The ambiguous name.
        name: String,
    },

    /// The left-hand side of an assignment collides with a non-output name.
    #[error("{pos}: cannot assign to '{name}': the name is bound as {bound_as}")]
    InvalidAssignTarget {
        pos: Position,
        name: String,
        /// `"an input"` or `"a function"`.
        bound_as: &'static str,
    },

    /// A right-hand identifier is not a known input or output.
    #[error("{pos}: unknown identifier '{name}'")]
    UnknownIdentifier { pos: Position, name: String },

    /// A call refers to a name that is not a registered function.
    #[error("{pos}: unknown function '{name}'")]
    UnknownFunction { pos: Position, name: String },

    /// An integer literal without a decimal point or exponent does not fit
    /// in 64 bits.
    #[error("{pos}: integer overflow: {text:?}")]
    IntegerOverflow { pos: Position, text: String },

    /// A number literal survived lexing but cannot be materialized.
    #[error("{pos}: illegal number syntax: {text:?}")]
    IllegalNumber { pos: Position, text: String },

    /// A string literal contains an unknown escape sequence.
    #[error("{pos}: invalid string literal {text}: unknown escape '\\{escape}'")]
    InvalidEscape {
        pos: Position,
        text: String,
        escape: char,
    },

    /// A condition or right-hand side contained no expression at all.
    #[error("{pos}: empty expression")]
    EmptyExpression { pos: Position },

    /// An operand arrived where only an operator could continue the
    /// expression (e.g. two literals back to back).
    #[error("{pos}: operand follows a completed expression")]
    DanglingOperand { pos: Position },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_message() {
        let err = ParseError::Lex {
            pos: Position::new(0, 7),
            message: "expected ||".to_owned(),
        };
        assert_eq!(err.to_string(), "rule 0 char 7: expected ||");
    }

    #[test]
    fn unexpected_token_message() {
        let err = ParseError::UnexpectedToken {
            pos: Position::new(1, 3),
            found: "\"true\"".to_owned(),
            expected: "variable".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "rule 1 char 3: unexpected token \"true\", expected variable"
        );
    }

    #[test]
    fn name_collision_message() {
        let err = ParseError::NameCollision {
            name: "score".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "name 'score' is bound in more than one of inputs, outputs and functions"
        );
    }

    #[test]
    fn integer_overflow_message() {
        let err = ParseError::IntegerOverflow {
            pos: Position::new(0, 21),
            text: "99999999999999999999".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "rule 0 char 21: integer overflow: \"99999999999999999999\""
        );
    }
}

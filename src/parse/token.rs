use std::fmt;

use crate::types::Position;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Lexing failed; the token text is the error message.
    Error,
    /// `true` or `false`.
    Bool,
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    Greater,
    /// `<`
    Lower,
    /// `>=`
    GreaterEquals,
    /// `<=`
    LowerEquals,
    /// `!`
    Not,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `=` introducing an assignment.
    Assign,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `+`
    Add,
    /// `-`
    Minus,
    /// `%`
    Mod,
    Eof,
    Identifier,
    /// An identifier immediately followed by `(`.
    Function,
    Number,
    /// A quoted string; the token text includes the quotes.
    Str,
    /// The left-hand name of an assignment.
    Variable,
    /// `,`
    Separator,
    LeftParen,
    RightParen,
    LeftRuleDelim,
    RightRuleDelim,
    LeftConditionDelim,
    RightConditionDelim,
    LeftActionDelim,
    RightActionDelim,
    LeftFunctionDelim,
    RightFunctionDelim,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Error => "error",
            TokenKind::Bool => "boolean",
            TokenKind::Equals => "'=='",
            TokenKind::NotEquals => "'!='",
            TokenKind::Greater => "'>'",
            TokenKind::Lower => "'<'",
            TokenKind::GreaterEquals => "'>='",
            TokenKind::LowerEquals => "'<='",
            TokenKind::Not => "'!'",
            TokenKind::Or => "'||'",
            TokenKind::And => "'&&'",
            TokenKind::Assign => "'='",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Add => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Mod => "'%'",
            TokenKind::Eof => "end of input",
            TokenKind::Identifier => "identifier",
            TokenKind::Function => "function",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Variable => "variable",
            TokenKind::Separator => "','",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftRuleDelim => "start of rule",
            TokenKind::RightRuleDelim => "end of rule",
            TokenKind::LeftConditionDelim => "start of condition",
            TokenKind::RightConditionDelim => "end of condition",
            TokenKind::LeftActionDelim => "start of actions",
            TokenKind::RightActionDelim => "end of actions",
            TokenKind::LeftFunctionDelim => "start of call",
            TokenKind::RightFunctionDelim => "end of call",
        };
        f.write_str(s)
    }
}

/// One lexical token with its source position. The position points at the
/// end of the lexeme, as the lexer emits tokens once it has read past them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
    pub text: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            _ if self.text.chars().count() > 10 => {
                let head: String = self.text.chars().take(10).collect();
                write!(f, "{head:?}...")
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_truncates_long_lexemes() {
        let tok = Token {
            kind: TokenKind::Str,
            pos: Position::default(),
            text: "\"a long string literal\"".to_owned(),
        };
        assert_eq!(tok.to_string(), "\"\\\"a long st\"...");
    }

    #[test]
    fn display_eof_and_error() {
        let eof = Token {
            kind: TokenKind::Eof,
            pos: Position::default(),
            text: String::new(),
        };
        assert_eq!(eof.to_string(), "EOF");

        let err = Token {
            kind: TokenKind::Error,
            pos: Position::default(),
            text: "bad number syntax".to_owned(),
        };
        assert_eq!(err.to_string(), "bad number syntax");
    }
}

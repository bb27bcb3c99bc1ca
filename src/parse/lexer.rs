use std::collections::VecDeque;

use super::token::{Token, TokenKind};
use crate::types::Position;

/// The condition/action separator. Exactly space, pipe, space.
const DELIM: &str = " | ";

/// Enclosing context of the expression currently being lexed. The stack of
/// scopes is what lets a `)` or `,` mean different things inside a condition,
/// an action, or a function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Condition,
    Action,
    Call,
}

/// One state of the scanning machine. Each maps to a `lex_*` method;
/// the machine runs until a state returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Block,
    ConditionOpen,
    ConditionClose,
    ActionOpen,
    ActionClose,
    Condition,
    Expression,
    Action,
    Space,
    Number,
    Quote,
    Identifier,
    Call,
}

/// A lazy token stream over a list of rule lines.
///
/// The stream always terminates: either with an `Eof` token, or with a single
/// `Error` token carrying a message, after which the stream closes.
pub(crate) struct Lexer {
    lines: Vec<String>,
    /// Index of the rule line being scanned.
    index: usize,
    /// Byte offset of the cursor inside the current line.
    pos: usize,
    /// Start offset of the in-progress lexeme.
    start: usize,
    /// Byte width of the last character read; 0 at end of line.
    width: usize,
    /// Nesting depth of `(` `)` in the current expression scope.
    paren_depth: i32,
    /// Saved paren depths of enclosing function calls.
    paren_stack: Vec<i32>,
    scopes: Vec<Scope>,
    state: Option<State>,
    pending: VecDeque<Token>,
}

impl Lexer {
    pub(crate) fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.as_ref().to_owned()).collect(),
            index: 0,
            pos: 0,
            start: 0,
            width: 0,
            paren_depth: 0,
            paren_stack: Vec::new(),
            scopes: Vec::new(),
            state: Some(State::Block),
            pending: VecDeque::new(),
        }
    }

    // -- Cursor primitives --------------------------------------------------

    fn next_char(&mut self) -> Option<char> {
        let line = &self.lines[self.index];
        let ch = match line[self.pos..].chars().next() {
            Some(c) => c,
            None => {
                self.width = 0;
                return None;
            }
        };
        self.width = ch.len_utf8();
        self.pos += self.width;
        Some(ch)
    }

    fn backup(&mut self) {
        self.pos -= self.width;
    }

    fn peek_char(&mut self) -> Option<char> {
        let ch = self.next_char();
        self.backup();
        ch
    }

    fn next_non_space(&mut self) -> Option<char> {
        loop {
            match self.next_char() {
                Some(c) if is_space(c) => {}
                other => return other,
            }
        }
    }

    fn peek_non_space(&mut self) -> Option<char> {
        let (pos, width) = (self.pos, self.width);
        let ch = self.next_non_space();
        self.pos = pos;
        self.width = width;
        ch
    }

    fn at_delim(&self) -> bool {
        self.lines[self.index][self.pos..].starts_with(DELIM)
    }

    fn accept(&mut self, valid: &str) -> bool {
        if let Some(c) = self.next_char() {
            if valid.contains(c) {
                return true;
            }
        }
        self.backup();
        false
    }

    fn accept_run(&mut self, valid: &str) {
        while self.accept(valid) {}
    }

    // -- Emission -----------------------------------------------------------

    fn cursor_position(&self) -> Position {
        Position::new(self.index, self.pos)
    }

    fn emit(&mut self, kind: TokenKind) {
        let text = self.lines[self.index][self.start..self.pos].to_owned();
        self.pending.push_back(Token {
            kind,
            pos: self.cursor_position(),
            text,
        });
        self.start = self.pos;
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn ignore_space(&mut self) {
        self.next_non_space();
        self.backup();
        self.ignore();
    }

    /// Emit an `Error` token and close the stream.
    fn error(&mut self, message: String) -> Option<State> {
        self.pending.push_back(Token {
            kind: TokenKind::Error,
            pos: self.cursor_position(),
            text: message,
        });
        None
    }

    // -- States -------------------------------------------------------------

    fn step(&mut self, state: State) -> Option<State> {
        match state {
            State::Block => self.lex_block(),
            State::ConditionOpen => self.lex_condition_open(),
            State::ConditionClose => self.lex_condition_close(),
            State::ActionOpen => self.lex_action_open(),
            State::ActionClose => self.lex_action_close(),
            State::Condition => self.lex_condition(),
            State::Expression => self.lex_expression(),
            State::Action => self.lex_action(),
            State::Space => self.lex_space(),
            State::Number => self.lex_number(),
            State::Quote => self.lex_quote(),
            State::Identifier => self.lex_identifier(),
            State::Call => self.lex_call(),
        }
    }

    fn lex_block(&mut self) -> Option<State> {
        if self.index < self.lines.len() {
            self.pos = 0;
            self.start = 0;
            self.width = 0;
            self.emit(TokenKind::LeftRuleDelim);
            if self.lines[self.index].contains(DELIM) {
                Some(State::ConditionOpen)
            } else {
                Some(State::ActionOpen)
            }
        } else {
            self.pending.push_back(Token {
                kind: TokenKind::Eof,
                pos: Position::new(self.index.saturating_sub(1), self.pos),
                text: String::new(),
            });
            None
        }
    }

    fn lex_condition_open(&mut self) -> Option<State> {
        self.emit(TokenKind::LeftConditionDelim);
        Some(State::Condition)
    }

    fn lex_condition(&mut self) -> Option<State> {
        self.scopes.push(Scope::Condition);
        Some(State::Expression)
    }

    fn lex_condition_close(&mut self) -> Option<State> {
        self.emit(TokenKind::RightConditionDelim);
        Some(State::ActionOpen)
    }

    fn lex_action_open(&mut self) -> Option<State> {
        if self.at_delim() {
            self.pos += DELIM.len();
        }
        self.emit(TokenKind::LeftActionDelim);
        Some(State::Action)
    }

    fn lex_action_close(&mut self) -> Option<State> {
        self.emit(TokenKind::RightActionDelim);
        self.emit(TokenKind::RightRuleDelim);
        self.index += 1;
        Some(State::Block)
    }

    /// Lex `variable =` at the start of an action, then hand the cursor back
    /// to expression scanning. The cursor is restored to the end of the
    /// variable name, so the `=` itself is re-read in expression context.
    fn lex_action(&mut self) -> Option<State> {
        if self.paren_depth != 0 {
            return self.error("unclosed paren".to_owned());
        }
        loop {
            match self.next_char() {
                Some(c) if is_alphanumeric(c) => {}
                _ => {
                    self.backup();
                    break;
                }
            }
        }
        if self.start == self.pos {
            return self.error("unexpected start of action".to_owned());
        }
        let (pos, width) = (self.pos, self.width);
        if self.next_non_space() == Some('=') {
            if self.peek_non_space() == Some('=') {
                return self.error("no assignment found".to_owned());
            }
            self.pos = pos;
            self.width = width;
            self.emit(TokenKind::Variable);
            self.scopes.push(Scope::Action);
            Some(State::Expression)
        } else {
            self.error("no assignment found".to_owned())
        }
    }

    fn lex_expression(&mut self) -> Option<State> {
        let parent = self.scopes.last().copied();
        if parent == Some(Scope::Condition) {
            if self.at_delim() {
                if self.paren_depth == 0 {
                    self.scopes.pop();
                    return Some(State::ConditionClose);
                }
                return self.error("unclosed left paren".to_owned());
            }
            if self.peek_char() == Some(',') {
                self.next_char();
                return self.error("unrecognized character in expression: ','".to_owned());
            }
        }
        match self.next_char() {
            None => {
                if parent == Some(Scope::Action) {
                    self.scopes.pop();
                    if self.paren_depth != 0
                        || !self.paren_stack.is_empty()
                        || !self.scopes.is_empty()
                    {
                        return self.error("unexpected end of rule".to_owned());
                    }
                    return Some(State::ActionClose);
                }
                self.error("unclosed expression".to_owned())
            }
            Some(c) if is_space(c) => {
                self.backup();
                Some(State::Space)
            }
            Some('!') => match self.peek_char() {
                Some(p) if is_alphanumeric(p) || p == '(' => {
                    self.emit(TokenKind::Not);
                    Some(State::Expression)
                }
                _ => {
                    if self.next_char() == Some('=') {
                        self.emit(TokenKind::NotEquals);
                        Some(State::Expression)
                    } else {
                        self.error("unrecognized character after '!'".to_owned())
                    }
                }
            },
            Some('>') => {
                if self.next_char() == Some('=') {
                    self.emit(TokenKind::GreaterEquals);
                } else {
                    self.backup();
                    self.emit(TokenKind::Greater);
                }
                Some(State::Expression)
            }
            Some('<') => {
                if self.next_char() == Some('=') {
                    self.emit(TokenKind::LowerEquals);
                } else {
                    self.backup();
                    self.emit(TokenKind::Lower);
                }
                Some(State::Expression)
            }
            Some('=') => {
                if self.next_char() == Some('=') {
                    self.emit(TokenKind::Equals);
                } else {
                    self.backup();
                    self.emit(TokenKind::Assign);
                }
                Some(State::Expression)
            }
            Some('|') => {
                if self.next_char() == Some('|') {
                    self.emit(TokenKind::Or);
                    Some(State::Expression)
                } else {
                    self.error("expected ||".to_owned())
                }
            }
            Some('&') => {
                if self.next_char() == Some('&') {
                    self.emit(TokenKind::And);
                    Some(State::Expression)
                } else {
                    self.error("expected &&".to_owned())
                }
            }
            // Arithmetic operators are only recognized when followed by
            // whitespace. Otherwise the character stays in the pending
            // lexeme and becomes the sign of the next number.
            Some('+') => {
                if self.peek_char().is_some_and(is_space) {
                    self.emit(TokenKind::Add);
                }
                Some(State::Expression)
            }
            Some('-') => {
                if self.peek_char().is_some_and(is_space) {
                    self.emit(TokenKind::Minus);
                }
                Some(State::Expression)
            }
            Some('*') => {
                if self.peek_char().is_some_and(is_space) {
                    self.emit(TokenKind::Mul);
                }
                Some(State::Expression)
            }
            Some('/') => {
                if self.peek_char().is_some_and(is_space) {
                    self.emit(TokenKind::Div);
                }
                Some(State::Expression)
            }
            Some('%') => {
                if self.peek_char().is_some_and(is_space) {
                    self.emit(TokenKind::Mod);
                }
                Some(State::Expression)
            }
            Some('"') => Some(State::Quote),
            Some(c) if c.is_ascii_digit() => {
                self.backup();
                Some(State::Number)
            }
            Some(c) if is_alphanumeric(c) => {
                self.backup();
                Some(State::Identifier)
            }
            Some('(') => {
                self.emit(TokenKind::LeftParen);
                self.paren_depth += 1;
                Some(State::Expression)
            }
            Some(')') => {
                self.paren_depth -= 1;
                if self.paren_depth == 0 && parent == Some(Scope::Call) {
                    self.emit(TokenKind::RightFunctionDelim);
                    self.paren_depth = self.paren_stack.pop().unwrap_or(-1);
                    self.scopes.pop();
                    return Some(State::Expression);
                }
                if self.paren_depth < 0 {
                    return self.error("unexpected right paren ')'".to_owned());
                }
                self.emit(TokenKind::RightParen);
                Some(State::Expression)
            }
            Some(',') => {
                self.emit(TokenKind::Separator);
                if parent == Some(Scope::Call) && self.paren_depth > 1 {
                    return self.error("unexpected end of parameter".to_owned());
                }
                if parent == Some(Scope::Action) {
                    if self.paren_depth != 0 {
                        return self.error("unexpected end of action".to_owned());
                    }
                    self.ignore_space();
                    self.scopes.pop();
                    return Some(State::Action);
                }
                Some(State::Expression)
            }
            Some(c) => self.error(format!("unrecognized character in expression: {c:?}")),
        }
    }

    /// Skip whitespace. Inside a condition, stop one character short when the
    /// run ends at the `" | "` delimiter, so the delimiter test can see it.
    fn lex_space(&mut self) -> Option<State> {
        let scope = self.scopes.last().copied();
        loop {
            match self.peek_char() {
                Some(c) if is_space(c) => {
                    self.next_char();
                }
                _ => break,
            }
        }
        if scope == Some(Scope::Condition)
            && self.pos > 0
            && self.lines[self.index][self.pos - 1..].starts_with(DELIM)
        {
            self.backup();
        }
        self.ignore();
        Some(State::Expression)
    }

    fn lex_number(&mut self) -> Option<State> {
        if !self.scan_number() {
            let text = self.lines[self.index][self.start..self.pos].to_owned();
            return self.error(format!("bad number syntax: {text:?}"));
        }
        self.emit(TokenKind::Number);
        Some(State::Expression)
    }

    fn scan_number(&mut self) -> bool {
        // Optional leading sign (already consumed into the lexeme by
        // expression scanning when present).
        self.accept("+-");
        let mut digits = "0123456789_";
        if self.accept("0") {
            // Leading 0 selects a base prefix, but not for floats.
            if self.accept("xX") {
                digits = "0123456789abcdefABCDEF_";
            } else if self.accept("oO") {
                digits = "01234567_";
            } else if self.accept("bB") {
                digits = "01_";
            }
        }
        self.accept_run(digits);
        if self.accept(".") {
            self.accept_run(digits);
        }
        if digits.len() == 11 && self.accept("eE") {
            self.accept("+-");
            self.accept_run("0123456789_");
        }
        if digits.len() == 23 && self.accept("pP") {
            self.accept("+-");
            self.accept_run("0123456789_");
        }
        // The character after the number must not be alphanumeric.
        match self.peek_char() {
            Some(c) if is_alphanumeric(c) => {
                self.next_char();
                false
            }
            _ => true,
        }
    }

    fn lex_quote(&mut self) -> Option<State> {
        loop {
            match self.next_char() {
                Some('\\') => match self.next_char() {
                    Some(c) if c != '\n' => {}
                    _ => return self.error("unterminated quoted string".to_owned()),
                },
                None | Some('\n') => {
                    return self.error("unterminated quoted string".to_owned());
                }
                Some('"') => break,
                Some(_) => {}
            }
        }
        self.emit(TokenKind::Str);
        Some(State::Expression)
    }

    fn lex_identifier(&mut self) -> Option<State> {
        loop {
            match self.next_char() {
                Some(c) if is_alphanumeric(c) => {}
                _ => {
                    self.backup();
                    break;
                }
            }
        }
        if self.peek_char() == Some('(') {
            self.emit(TokenKind::Function);
            return Some(State::Call);
        }
        let word = &self.lines[self.index][self.start..self.pos];
        if word == "true" || word == "false" {
            self.emit(TokenKind::Bool);
        } else {
            self.emit(TokenKind::Identifier);
        }
        Some(State::Expression)
    }

    /// Enter a function call: save the enclosing paren depth and start a
    /// fresh one, so the call's closing `)` is recognizable at depth zero.
    fn lex_call(&mut self) -> Option<State> {
        self.next_char();
        self.emit(TokenKind::LeftFunctionDelim);
        self.paren_stack.push(self.paren_depth);
        self.paren_depth = 1;
        self.scopes.push(Scope::Call);
        Some(State::Expression)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let state = self.state?;
            self.state = self.step(state);
        }
    }
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_alphanumeric(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::types::{
    Assignment, CallError, CondExpr, CondOp, Engine, Expression, FuncMap, FunctionCall, MathExpr,
    MathOp, Node, NotExpr, Rule, Value, ValueMap,
};

/// Errors produced while walking the AST.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An arithmetic or ordering operator was applied to non-numeric values.
    #[error("invalid operand combination for '{op}': {left} and {right}")]
    InvalidOperands {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    /// Both operands of `||` were falsy.
    #[error("neither operand of '||' is truthy")]
    NoTruthyOperand,

    /// An assignment would change the host type of an existing output.
    #[error("new value for '{name}' is not compatible with the old one: {old} vs {new}")]
    IncompatibleAssignment {
        name: String,
        old: &'static str,
        new: &'static str,
    },

    /// A call refers to a function that is not registered. The parser rules
    /// this out, but a deserialized AST might not have been through it.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    /// A host function failed: wrong arity, a returned error, or a panic.
    #[error("call to '{name}' failed: {source}")]
    Host {
        name: String,
        #[source]
        source: CallError,
    },

    /// An operator node is missing an operand.
    #[error("operator '{op}' is missing an operand")]
    MissingOperand { op: String },
}

/// Walks a parsed [`Engine`] under the three caller-supplied maps.
///
/// The evaluator owns the maps for its lifetime; outputs produced by one
/// [`eval`](Evaluator::eval) call are visible to the next. Calls on the same
/// instance are serialized by an internal mutex, so concurrent callers
/// observe each other's effects only at call boundaries.
pub struct Evaluator {
    state: Mutex<StateMaps>,
}

struct StateMaps {
    inputs: ValueMap,
    outputs: ValueMap,
    funcs: FuncMap,
}

impl Evaluator {
    #[must_use]
    pub fn new(funcs: FuncMap, inputs: ValueMap, outputs: ValueMap) -> Self {
        Self {
            state: Mutex::new(StateMaps {
                inputs,
                outputs,
                funcs,
            }),
        }
    }

    /// Run every rule in order and return a snapshot of the output map.
    ///
    /// Rules run in lexical order, actions within a rule in lexical order,
    /// and outputs written by rule *i* are visible to rule *i + 1*.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] on the first failing rule; outputs already
    /// written by earlier rules are kept for subsequent calls.
    pub fn eval(&self, engine: &Engine) -> Result<ValueMap, EvalError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        for rule in &engine.rules {
            state.eval_rule(rule)?;
        }
        Ok(state.outputs.clone())
    }
}

impl StateMaps {
    fn eval_rule(&mut self, rule: &Rule) -> Result<(), EvalError> {
        let fire = match &rule.condition {
            None => true,
            Some(condition) => self.eval_expression(condition)?.is_truthy(),
        };
        if fire {
            for action in &rule.actions {
                self.eval_action(action)?;
            }
        }
        Ok(())
    }

    /// Evaluate the right-hand side and bind it, preserving the host type of
    /// any existing binding.
    fn eval_action(&mut self, action: &Assignment) -> Result<(), EvalError> {
        let value = self.eval_expression(&action.rhs)?;
        if let Some(old) = self.outputs.get(&action.variable.name) {
            if !old.same_type(&value) {
                return Err(EvalError::IncompatibleAssignment {
                    name: action.variable.name.clone(),
                    old: old.type_name(),
                    new: value.type_name(),
                });
            }
        }
        self.outputs.insert(action.variable.name.clone(), value);
        Ok(())
    }

    fn eval_expression(&self, expr: &Expression) -> Result<Value, EvalError> {
        match expr.inner.as_deref() {
            Some(node) => self.eval_node(node),
            None => Err(EvalError::MissingOperand {
                op: "()".to_owned(),
            }),
        }
    }

    fn eval_node(&self, node: &Node) -> Result<Value, EvalError> {
        match node {
            Node::Expression(expr) => self.eval_expression(expr),
            Node::Number(n) => Ok(Value::Number(n.value)),
            Node::String(s) => Ok(Value::String(s.text.clone())),
            Node::Bool(b) => Ok(Value::Bool(b.value)),
            Node::Not(n) => self.eval_not(n),
            Node::Identifier(id) => {
                let map = if id.is_input { &self.inputs } else { &self.outputs };
                Ok(map.get(&id.name).cloned().unwrap_or(Value::Unit))
            }
            Node::Function(call) => self.eval_function(call),
            Node::Math(m) => self.eval_math(m),
            Node::Conditional(c) => self.eval_conditional(c),
        }
    }

    fn eval_not(&self, node: &NotExpr) -> Result<Value, EvalError> {
        let inner = match node.inner.as_deref() {
            Some(inner) => self.eval_node(inner)?,
            None => {
                return Err(EvalError::MissingOperand {
                    op: "!".to_owned(),
                });
            }
        };
        Ok(Value::Bool(!inner.is_truthy()))
    }

    fn eval_function(&self, call: &FunctionCall) -> Result<Value, EvalError> {
        let function = match self.funcs.get(&call.name) {
            Some(f) => f,
            None => {
                return Err(EvalError::UnknownFunction {
                    name: call.name.clone(),
                });
            }
        };
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expression(arg)?);
        }
        function.invoke(&args).map_err(|source| EvalError::Host {
            name: call.name.clone(),
            source,
        })
    }

    fn eval_math(&self, node: &MathExpr) -> Result<Value, EvalError> {
        let left = self.operand(node.left.as_deref(), &node.op.to_string())?;
        let right = self.operand(node.right.as_deref(), &node.op.to_string())?;
        let (l, r) = numeric_pair(&node.op.to_string(), &left, &right)?;
        let result = match node.op {
            MathOp::Add => l + r,
            MathOp::Sub => l - r,
            MathOp::Mul => l * r,
            // Division and remainder keep IEEE semantics: /0 is ±inf or NaN.
            MathOp::Div => l / r,
            MathOp::Mod => l % r,
        };
        Ok(Value::Number(result))
    }

    /// Both operands are always evaluated before the operator decides, so a
    /// host-function side effect on the right-hand side happens even when the
    /// left-hand side already settles the answer.
    fn eval_conditional(&self, node: &CondExpr) -> Result<Value, EvalError> {
        let left = self.operand(node.left.as_deref(), &node.op.to_string())?;
        let right = self.operand(node.right.as_deref(), &node.op.to_string())?;
        match node.op {
            CondOp::Gt => {
                let (l, r) = numeric_pair(">", &left, &right)?;
                Ok(Value::Bool(l > r))
            }
            CondOp::Ge => {
                let (l, r) = numeric_pair(">=", &left, &right)?;
                Ok(Value::Bool(l >= r))
            }
            CondOp::Lt => {
                let (l, r) = numeric_pair("<", &left, &right)?;
                Ok(Value::Bool(l < r))
            }
            CondOp::Le => {
                let (l, r) = numeric_pair("<=", &left, &right)?;
                Ok(Value::Bool(l <= r))
            }
            // Equality is structural on the uncoerced values: "1" != 1.
            CondOp::Eq => Ok(Value::Bool(left == right)),
            CondOp::Ne => Ok(Value::Bool(left != right)),
            CondOp::Or => {
                if left.is_truthy() || right.is_truthy() {
                    Ok(Value::Bool(true))
                } else {
                    Err(EvalError::NoTruthyOperand)
                }
            }
            CondOp::And => {
                if left.is_truthy() {
                    Ok(Value::Bool(right.is_truthy()))
                } else {
                    Ok(Value::Bool(false))
                }
            }
        }
    }

    fn operand(&self, node: Option<&Node>, op: &str) -> Result<Value, EvalError> {
        match node {
            Some(node) => self.eval_node(node),
            None => Err(EvalError::MissingOperand { op: op.to_owned() }),
        }
    }
}

fn numeric_pair(op: &str, left: &Value, right: &Value) -> Result<(f64, f64), EvalError> {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(EvalError::InvalidOperands {
            op: op.to_owned(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

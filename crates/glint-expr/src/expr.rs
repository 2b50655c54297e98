//! Expression tree and evaluator.
//!
//! Expression kinds form a closed set; each kind declares a supertype chain
//! that yields its placeholder (`$expr>variable` and so on), letting grammar
//! patterns authored against the base expression match every kind. Every
//! kind is a direct subtype of the root on purpose: the subtype suffix in
//! compiled patterns spans a single `>` level, so a deeper chain would stop
//! matching base-expression references.
//!
//! Nodes are built once from the arguments captured during reduction and
//! shared as `Arc`s: the element sequence, the position map, and evaluation
//! errors all reference the same node.

use std::sync::Arc;

use glint_data::{DataContext, DataKey, NumericRank, TypeHint, Value};

use crate::result::ParsedElement;
use crate::token::Token;

/// Shared reference to an expression node.
pub type ExprRef = Arc<Expression>;

/// Evaluation failure: a human-readable message plus the offending node,
/// so tooling can map the failure back to a source span.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct EvaluationError {
    pub message: String,
    pub expression: ExprRef,
}

impl EvaluationError {
    fn new(message: impl Into<String>, expression: &ExprRef) -> Self {
        Self {
            message: message.into(),
            expression: ExprRef::clone(expression),
        }
    }
}

pub type EvalResult = Result<Value, EvaluationError>;

/// The closed set of expression kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Variable,
    Bracket,
    StringLit,
    NumberLit,
    BooleanLit,
    Conditional,
    FieldAccess,
    Equals,
    NotEquals,
    Greater,
    GreaterOrEqual,
    Smaller,
    SmallerOrEqual,
    And,
    LogicalAnd,
    Or,
    LogicalOr,
    Not,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Power,
}

impl ExprKind {
    /// Placeholder of the base expression type; pattern references to "any
    /// expression" compile from this.
    pub const BASE_PLACEHOLDER: &'static str = "$expr";

    pub const VALUES: [ExprKind; 24] = [
        ExprKind::Variable,
        ExprKind::Bracket,
        ExprKind::StringLit,
        ExprKind::NumberLit,
        ExprKind::BooleanLit,
        ExprKind::Conditional,
        ExprKind::FieldAccess,
        ExprKind::Equals,
        ExprKind::NotEquals,
        ExprKind::Greater,
        ExprKind::GreaterOrEqual,
        ExprKind::Smaller,
        ExprKind::SmallerOrEqual,
        ExprKind::And,
        ExprKind::LogicalAnd,
        ExprKind::Or,
        ExprKind::LogicalOr,
        ExprKind::Not,
        ExprKind::Addition,
        ExprKind::Subtraction,
        ExprKind::Multiplication,
        ExprKind::Division,
        ExprKind::Modulo,
        ExprKind::Power,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::VALUES.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ExprKind::Variable => "variable",
            ExprKind::Bracket => "bracket",
            ExprKind::StringLit => "string",
            ExprKind::NumberLit => "number",
            ExprKind::BooleanLit => "boolean",
            ExprKind::Conditional => "conditional",
            ExprKind::FieldAccess => "fieldaccess",
            ExprKind::Equals => "equals",
            ExprKind::NotEquals => "notequals",
            ExprKind::Greater => "greater",
            ExprKind::GreaterOrEqual => "greaterorequal",
            ExprKind::Smaller => "smaller",
            ExprKind::SmallerOrEqual => "smallerorequal",
            ExprKind::And => "and",
            ExprKind::LogicalAnd => "logicaland",
            ExprKind::Or => "or",
            ExprKind::LogicalOr => "logicalor",
            ExprKind::Not => "not",
            ExprKind::Addition => "addition",
            ExprKind::Subtraction => "subtraction",
            ExprKind::Multiplication => "multiplication",
            ExprKind::Division => "division",
            ExprKind::Modulo => "modulo",
            ExprKind::Power => "power",
        }
    }

    /// Supertype chain, root first.
    pub fn chain(self) -> [&'static str; 2] {
        ["expr", self.name()]
    }

    /// The placeholder this kind contributes to the matching string.
    pub fn placeholder(self) -> String {
        let [root, leaf] = self.chain();
        format!("${root}>{leaf}")
    }
}

/// Binary operators, shared by the arithmetic, comparison, equality, and
/// boolean expression kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    AndAnd,
    Or,
    OrOr,
}

impl BinaryOp {
    fn kind(self) -> ExprKind {
        match self {
            BinaryOp::Add => ExprKind::Addition,
            BinaryOp::Sub => ExprKind::Subtraction,
            BinaryOp::Mul => ExprKind::Multiplication,
            BinaryOp::Div => ExprKind::Division,
            BinaryOp::Mod => ExprKind::Modulo,
            BinaryOp::Pow => ExprKind::Power,
            BinaryOp::Eq => ExprKind::Equals,
            BinaryOp::Neq => ExprKind::NotEquals,
            BinaryOp::Gt => ExprKind::Greater,
            BinaryOp::Gte => ExprKind::GreaterOrEqual,
            BinaryOp::Lt => ExprKind::Smaller,
            BinaryOp::Lte => ExprKind::SmallerOrEqual,
            BinaryOp::And => ExprKind::And,
            BinaryOp::AndAnd => ExprKind::LogicalAnd,
            BinaryOp::Or => ExprKind::Or,
            BinaryOp::OrOr => ExprKind::LogicalOr,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::And => "&",
            BinaryOp::AndAnd => "&&",
            BinaryOp::Or => "|",
            BinaryOp::OrOr => "||",
        }
    }
}

/// An argument captured during reduction: either one element, or a nested
/// list for a multi-element capture group.
#[derive(Debug, Clone)]
pub enum Arg {
    Element(ParsedElement),
    List(Vec<Arg>),
}

impl Arg {
    fn into_expr(self) -> ExprRef {
        match self {
            Arg::Element(ParsedElement::Expr(expr)) => expr,
            other => panic!("pattern captured {other:?} where an expression was expected"),
        }
    }

    fn into_token(self) -> Token {
        match self {
            Arg::Element(ParsedElement::Token(token)) => token,
            other => panic!("pattern captured {other:?} where a token was expected"),
        }
    }

    /// A capture group that spanned a single element arrives as `Element`;
    /// callers expecting a group treat it as a one-item list.
    fn into_list(self) -> Vec<Arg> {
        match self {
            Arg::List(list) => list,
            element => vec![element],
        }
    }
}

/// An expression node.
#[derive(Debug, PartialEq)]
pub struct Expression {
    op: Op,
}

#[derive(Debug, PartialEq)]
enum Op {
    Variable {
        name: String,
    },
    Bracket {
        inner: ExprRef,
    },
    StringLit {
        value: String,
    },
    NumberLit {
        value: Value,
    },
    BooleanLit {
        value: bool,
    },
    Conditional {
        condition: ExprRef,
        when_true: ExprRef,
        when_false: ExprRef,
    },
    FieldAccess {
        object: ExprRef,
        fields: Vec<String>,
    },
    Binary {
        op: BinaryOp,
        left: ExprRef,
        right: ExprRef,
    },
    Not {
        operand: ExprRef,
    },
}

impl Expression {
    /// Build a node of the given kind from the arguments captured by its
    /// pattern. Argument shapes are guaranteed by the registered grammar;
    /// a mismatch is a grammar bug, not a user error.
    pub(crate) fn build(kind: ExprKind, args: Vec<Arg>) -> Expression {
        let mut args = args.into_iter();
        let mut next = move || args.next().expect("pattern captured too few arguments");

        let op = match kind {
            ExprKind::Variable => match next().into_token() {
                Token::Identifier(name) => Op::Variable { name },
                other => panic!("variable pattern captured {other:?}"),
            },
            ExprKind::Bracket => Op::Bracket {
                inner: next().into_expr(),
            },
            ExprKind::StringLit => match next().into_token() {
                Token::Str(value) => Op::StringLit { value },
                other => panic!("string pattern captured {other:?}"),
            },
            ExprKind::NumberLit => match next().into_token() {
                Token::Number(value) => Op::NumberLit { value },
                other => panic!("number pattern captured {other:?}"),
            },
            ExprKind::BooleanLit => match next().into_token() {
                Token::Identifier(text) => Op::BooleanLit {
                    value: text == "true",
                },
                other => panic!("boolean pattern captured {other:?}"),
            },
            ExprKind::Conditional => Op::Conditional {
                condition: next().into_expr(),
                when_true: next().into_expr(),
                when_false: next().into_expr(),
            },
            ExprKind::FieldAccess => {
                let object = next().into_expr();
                let fields = next()
                    .into_list()
                    .into_iter()
                    .map(|arg| match &arg.into_expr().op {
                        Op::Variable { name } => name.clone(),
                        other => panic!("field access captured {other:?} as a segment"),
                    })
                    .collect();
                Op::FieldAccess { object, fields }
            }
            ExprKind::Not => Op::Not {
                operand: next().into_expr(),
            },
            binary => {
                let op = match binary {
                    ExprKind::Equals => BinaryOp::Eq,
                    ExprKind::NotEquals => BinaryOp::Neq,
                    ExprKind::Greater => BinaryOp::Gt,
                    ExprKind::GreaterOrEqual => BinaryOp::Gte,
                    ExprKind::Smaller => BinaryOp::Lt,
                    ExprKind::SmallerOrEqual => BinaryOp::Lte,
                    ExprKind::And => BinaryOp::And,
                    ExprKind::LogicalAnd => BinaryOp::AndAnd,
                    ExprKind::Or => BinaryOp::Or,
                    ExprKind::LogicalOr => BinaryOp::OrOr,
                    ExprKind::Addition => BinaryOp::Add,
                    ExprKind::Subtraction => BinaryOp::Sub,
                    ExprKind::Multiplication => BinaryOp::Mul,
                    ExprKind::Division => BinaryOp::Div,
                    ExprKind::Modulo => BinaryOp::Mod,
                    ExprKind::Power => BinaryOp::Pow,
                    other => panic!("{} is not a binary kind", other.name()),
                };
                Op::Binary {
                    op,
                    left: next().into_expr(),
                    right: next().into_expr(),
                }
            }
        };

        Expression { op }
    }

    pub fn kind(&self) -> ExprKind {
        match &self.op {
            Op::Variable { .. } => ExprKind::Variable,
            Op::Bracket { .. } => ExprKind::Bracket,
            Op::StringLit { .. } => ExprKind::StringLit,
            Op::NumberLit { .. } => ExprKind::NumberLit,
            Op::BooleanLit { .. } => ExprKind::BooleanLit,
            Op::Conditional { .. } => ExprKind::Conditional,
            Op::FieldAccess { .. } => ExprKind::FieldAccess,
            Op::Binary { op, .. } => op.kind(),
            Op::Not { .. } => ExprKind::Not,
        }
    }

    /// The placeholder this node contributes to the matching string.
    pub fn placeholder(&self) -> String {
        self.kind().placeholder()
    }

    /// Whether this node's position mapping should cover its children in
    /// the position → expression map.
    pub fn hides_inspected_children(&self) -> bool {
        false
    }

    /// Best-known result type before evaluation, for tooling only.
    pub fn expected_type(&self) -> TypeHint {
        match &self.op {
            Op::Variable { name } => DataKey::hint_of(name).unwrap_or(TypeHint::Unknown),
            Op::Bracket { inner } => inner.expected_type(),
            Op::StringLit { .. } => TypeHint::Str,
            Op::NumberLit { value } => value.hint(),
            Op::BooleanLit { .. } => TypeHint::Bool,
            _ => TypeHint::Unknown,
        }
    }

    /// Tooling query: is this variable known to resolve? `None` means
    /// unknown — the context accepts undeclared keys, so a missing
    /// declaration never marks a variable invalid.
    pub fn is_valid(&self) -> Option<bool> {
        match &self.op {
            Op::Variable { name } => DataKey::hint_of(name).map(|_| true),
            _ => None,
        }
    }

    /// The variable name, when this node is a variable lookup.
    pub fn variable_name(&self) -> Option<&str> {
        match &self.op {
            Op::Variable { name } => Some(name),
            _ => None,
        }
    }
}

/// Evaluation of expression trees against a variable context.
///
/// Implemented on `ExprRef` rather than `Expression` so errors can carry
/// the offending node by reference.
pub trait Evaluate {
    fn evaluate(&self, context: &DataContext) -> EvalResult;
}

impl Evaluate for ExprRef {
    fn evaluate(&self, context: &DataContext) -> EvalResult {
        match &self.op {
            Op::Variable { name } => Ok(context.get(name)),
            Op::Bracket { inner } => inner.evaluate(context),
            Op::StringLit { value } => Ok(Value::Str(value.clone())),
            Op::NumberLit { value } => Ok(value.clone()),
            Op::BooleanLit { value } => Ok(Value::Bool(*value)),

            Op::Conditional {
                condition,
                when_true,
                when_false,
            } => match condition.evaluate(context)? {
                // Unset condition degrades to the first branch rather than
                // erroring; bindings stay renderable while data is absent.
                Value::Absent => when_true.evaluate(context),
                Value::Bool(true) => when_true.evaluate(context),
                Value::Bool(false) => when_false.evaluate(context),
                _ => Err(EvaluationError::new(
                    "Conditional condition must be a boolean",
                    self,
                )),
            },

            Op::FieldAccess { object, fields } => {
                let mut value = object.evaluate(context)?;
                for name in fields {
                    if value.is_absent() {
                        return Err(EvaluationError::new(
                            "Trying to access field of null object",
                            self,
                        ));
                    }
                    let member = match &value {
                        Value::Object(handle) => handle.member(name),
                        _ => None,
                    };
                    value = member.ok_or_else(|| {
                        EvaluationError::new(
                            format!(
                                "Field or property '{name}' not found for type '{}'",
                                value.type_name()
                            ),
                            self,
                        )
                    })?;
                }
                Ok(value)
            }

            Op::Binary { op, left, right } => {
                // Both operands always evaluate, `&&`/`||` included.
                let lhs = left.evaluate(context)?;
                let rhs = right.evaluate(context)?;
                match op {
                    BinaryOp::Add
                    | BinaryOp::Sub
                    | BinaryOp::Mul
                    | BinaryOp::Div
                    | BinaryOp::Mod
                    | BinaryOp::Pow => arithmetic(*op, &lhs, &rhs, self),
                    BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte => {
                        comparison(*op, &lhs, &rhs, self)
                    }
                    // Equality never coerces: mismatched kinds are unequal,
                    // not an error.
                    BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
                    BinaryOp::Neq => Ok(Value::Bool(lhs != rhs)),
                    BinaryOp::And | BinaryOp::AndAnd | BinaryOp::Or | BinaryOp::OrOr => {
                        logical(*op, &lhs, &rhs, self)
                    }
                }
            }

            Op::Not { operand } => match operand.evaluate(context)? {
                Value::Bool(value) => Ok(Value::Bool(!value)),
                _ => Err(EvaluationError::new(
                    "Cannot perform NOT on non-boolean values",
                    self,
                )),
            },
        }
    }
}

/// Mixed-type arithmetic: classify both operands into the numeric rank
/// ladder and operate at the higher of the two ranks. Promotion, never
/// truncation: i64 * f32 = f32, not f64. `^` always computes in f64.
fn arithmetic(op: BinaryOp, left: &Value, right: &Value, node: &ExprRef) -> EvalResult {
    let mut rank = NumericRank::I16;
    for operand in [left, right] {
        match operand.numeric_rank() {
            Some(r) => rank = rank.max(r),
            None => {
                return Err(EvaluationError::new(
                    format!(
                        "Unsupported type for operation '{}': {}",
                        op.symbol(),
                        operand.type_name()
                    ),
                    node,
                ))
            }
        }
    }
    if op == BinaryOp::Pow {
        rank = NumericRank::F64;
    }

    match rank {
        NumericRank::F64 => {
            let (a, b) = (f64_of(left), f64_of(right));
            let value = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                BinaryOp::Pow => a.powf(b),
                _ => unreachable!("non-arithmetic operator"),
            };
            Ok(Value::F64(value))
        }
        NumericRank::F32 => {
            let (a, b) = (f32_of(left), f32_of(right));
            let value = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                _ => unreachable!("non-arithmetic operator"),
            };
            Ok(Value::F32(value))
        }
        _ => {
            let (a, b) = (i64_of(left), i64_of(right));
            if b == 0 && matches!(op, BinaryOp::Div | BinaryOp::Mod) {
                return Err(EvaluationError::new(
                    format!("Division by zero in operation '{}'", op.symbol()),
                    node,
                ));
            }
            let value = match op {
                BinaryOp::Add => a.wrapping_add(b),
                BinaryOp::Sub => a.wrapping_sub(b),
                BinaryOp::Mul => a.wrapping_mul(b),
                BinaryOp::Div => a.wrapping_div(b),
                BinaryOp::Mod => a.wrapping_rem(b),
                _ => unreachable!("non-arithmetic operator"),
            };
            Ok(match rank {
                NumericRank::I16 => Value::I16(value as i16),
                NumericRank::I32 => Value::I32(value as i32),
                _ => Value::I64(value),
            })
        }
    }
}

/// Ordering comparisons require numeric operands of any rank and compare
/// through f64.
fn comparison(op: BinaryOp, left: &Value, right: &Value, node: &ExprRef) -> EvalResult {
    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(EvaluationError::new(
            format!("Cannot perform {} on non-numeric values", op.symbol()),
            node,
        ));
    };
    Ok(Value::Bool(match op {
        BinaryOp::Gt => a > b,
        BinaryOp::Gte => a >= b,
        BinaryOp::Lt => a < b,
        BinaryOp::Lte => a <= b,
        _ => unreachable!("non-comparison operator"),
    }))
}

/// Boolean operators require boolean operands strictly; both operands have
/// already been evaluated by the caller.
fn logical(op: BinaryOp, left: &Value, right: &Value, node: &ExprRef) -> EvalResult {
    let (Value::Bool(a), Value::Bool(b)) = (left, right) else {
        let name = match op {
            BinaryOp::And | BinaryOp::AndAnd => "AND",
            _ => "OR",
        };
        return Err(EvaluationError::new(
            format!("Cannot perform {name} on non-boolean values"),
            node,
        ));
    };
    Ok(Value::Bool(match op {
        BinaryOp::And | BinaryOp::AndAnd => *a && *b,
        BinaryOp::Or | BinaryOp::OrOr => *a || *b,
        _ => unreachable!("non-boolean operator"),
    }))
}

fn i64_of(value: &Value) -> i64 {
    value.as_i64().expect("operand classified as numeric")
}

fn f64_of(value: &Value) -> f64 {
    value.as_f64().expect("operand classified as numeric")
}

fn f32_of(value: &Value) -> f32 {
    match value {
        Value::F32(v) => *v,
        other => f64_of(other) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(value: Value) -> ExprRef {
        Arc::new(Expression {
            op: Op::NumberLit { value },
        })
    }

    fn binary(op: BinaryOp, left: ExprRef, right: ExprRef) -> ExprRef {
        Arc::new(Expression {
            op: Op::Binary { op, left, right },
        })
    }

    fn boolean(value: bool) -> ExprRef {
        Arc::new(Expression {
            op: Op::BooleanLit { value },
        })
    }

    fn context() -> std::sync::Arc<DataContext> {
        DataContext::root()
    }

    #[test]
    fn test_placeholder_encodes_chain() {
        assert_eq!(ExprKind::Variable.placeholder(), "$expr>variable");
        assert_eq!(ExprKind::LogicalAnd.placeholder(), "$expr>logicaland");
        assert_eq!(ExprKind::Variable.chain(), ["expr", "variable"]);
    }

    #[test]
    fn test_rank_promotion_addition() {
        let ctx = context();
        let sum = binary(BinaryOp::Add, lit(Value::I32(1)), lit(Value::I32(2)));
        assert_eq!(sum.evaluate(&ctx).unwrap(), Value::I32(3));

        // i64 + f32 promotes to f32, not f64.
        let mixed = binary(BinaryOp::Add, lit(Value::I64(1)), lit(Value::F32(2.5)));
        assert_eq!(mixed.evaluate(&ctx).unwrap(), Value::F32(3.5));
    }

    #[test]
    fn test_power_always_f64() {
        let ctx = context();
        let pow = binary(BinaryOp::Pow, lit(Value::I32(2)), lit(Value::I32(10)));
        assert_eq!(pow.evaluate(&ctx).unwrap(), Value::F64(1024.0));
    }

    #[test]
    fn test_arithmetic_rejects_non_numeric() {
        let ctx = context();
        let bad = binary(
            BinaryOp::Mul,
            lit(Value::Str("two".into())),
            lit(Value::I32(3)),
        );
        let err = bad.evaluate(&ctx).unwrap_err();
        assert_eq!(err.message, "Unsupported type for operation '*': string");
        assert_eq!(err.expression.kind(), ExprKind::Multiplication);
    }

    #[test]
    fn test_integer_division_by_zero_is_an_error() {
        let ctx = context();
        let div = binary(BinaryOp::Div, lit(Value::I32(1)), lit(Value::I32(0)));
        let err = div.evaluate(&ctx).unwrap_err();
        assert_eq!(err.message, "Division by zero in operation '/'");
    }

    #[test]
    fn test_float_division_by_zero_is_infinite() {
        let ctx = context();
        let div = binary(BinaryOp::Div, lit(Value::F64(1.0)), lit(Value::F64(0.0)));
        assert_eq!(div.evaluate(&ctx).unwrap(), Value::F64(f64::INFINITY));
    }

    #[test]
    fn test_comparisons_convert_through_f64() {
        let ctx = context();
        let cmp = binary(BinaryOp::Gte, lit(Value::I64(3)), lit(Value::F32(3.0)));
        assert_eq!(cmp.evaluate(&ctx).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_comparison_rejects_non_numeric() {
        let ctx = context();
        let cmp = binary(BinaryOp::Lt, lit(Value::Str("a".into())), lit(Value::I32(1)));
        let err = cmp.evaluate(&ctx).unwrap_err();
        assert_eq!(err.message, "Cannot perform < on non-numeric values");
    }

    #[test]
    fn test_equality_has_no_coercion() {
        let ctx = context();
        let eq = binary(BinaryOp::Eq, lit(Value::Str("1".into())), lit(Value::I32(1)));
        assert_eq!(eq.evaluate(&ctx).unwrap(), Value::Bool(false));
        let neq = binary(BinaryOp::Neq, lit(Value::Str("1".into())), lit(Value::I32(1)));
        assert_eq!(neq.evaluate(&ctx).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical_operators() {
        let ctx = context();
        let and = binary(BinaryOp::AndAnd, boolean(true), boolean(false));
        assert_eq!(and.evaluate(&ctx).unwrap(), Value::Bool(false));
        let or = binary(BinaryOp::OrOr, boolean(true), boolean(false));
        assert_eq!(or.evaluate(&ctx).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_logical_rejects_non_boolean() {
        let ctx = context();
        let and = binary(BinaryOp::AndAnd, lit(Value::I32(1)), boolean(false));
        let err = and.evaluate(&ctx).unwrap_err();
        assert_eq!(err.message, "Cannot perform AND on non-boolean values");
        assert_eq!(err.expression.kind(), ExprKind::LogicalAnd);
    }

    #[test]
    fn test_variable_lookup_defaults_to_absent() {
        let ctx = context();
        let var = Arc::new(Expression {
            op: Op::Variable {
                name: "missing".into(),
            },
        });
        assert_eq!(var.evaluate(&ctx).unwrap(), Value::Absent);
    }

    #[test]
    fn test_conditional_absent_takes_first_branch() {
        let ctx = context();
        let var = Arc::new(Expression {
            op: Op::Variable { name: "x".into() },
        });
        let cond = Arc::new(Expression {
            op: Op::Conditional {
                condition: var,
                when_true: lit(Value::I32(1)),
                when_false: lit(Value::I32(2)),
            },
        });
        assert_eq!(cond.evaluate(&ctx).unwrap(), Value::I32(1));

        ctx.set_local("x", false);
        assert_eq!(cond.evaluate(&ctx).unwrap(), Value::I32(2));
    }

    #[test]
    fn test_conditional_untaken_branch_never_evaluates() {
        let ctx = context();
        // The untaken branch would fail if reached.
        let bad = binary(BinaryOp::AndAnd, lit(Value::I32(1)), boolean(true));
        let cond = Arc::new(Expression {
            op: Op::Conditional {
                condition: boolean(true),
                when_true: lit(Value::I32(7)),
                when_false: bad,
            },
        });
        assert_eq!(cond.evaluate(&ctx).unwrap(), Value::I32(7));
    }

    #[test]
    fn test_field_access_on_host_object() {
        use glint_data::{HostHandle, HostObject};

        struct Player;
        impl HostObject for Player {
            fn member(&self, name: &str) -> Option<Value> {
                (name == "health").then_some(Value::I32(80))
            }
            fn type_name(&self) -> &str {
                "Player"
            }
        }

        let ctx = context();
        ctx.set_local("player", Value::Object(HostHandle::new(Player)));
        let object = Arc::new(Expression {
            op: Op::Variable {
                name: "player".into(),
            },
        });
        let access = Arc::new(Expression {
            op: Op::FieldAccess {
                object: object.clone(),
                fields: vec!["health".into()],
            },
        });
        assert_eq!(access.evaluate(&ctx).unwrap(), Value::I32(80));

        let missing = Arc::new(Expression {
            op: Op::FieldAccess {
                object,
                fields: vec!["mana".into()],
            },
        });
        let err = missing.evaluate(&ctx).unwrap_err();
        assert_eq!(
            err.message,
            "Field or property 'mana' not found for type 'Player'"
        );
        assert_eq!(err.expression.kind(), ExprKind::FieldAccess);
    }

    #[test]
    fn test_field_access_on_absent_object() {
        let ctx = context();
        let object = Arc::new(Expression {
            op: Op::Variable {
                name: "nothing".into(),
            },
        });
        let access = Arc::new(Expression {
            op: Op::FieldAccess {
                object,
                fields: vec!["x".into()],
            },
        });
        let err = access.evaluate(&ctx).unwrap_err();
        assert_eq!(err.message, "Trying to access field of null object");
    }

    #[test]
    fn test_wrapping_integer_arithmetic() {
        let ctx = context();
        let overflow = binary(
            BinaryOp::Add,
            lit(Value::I32(i32::MAX)),
            lit(Value::I32(1)),
        );
        assert_eq!(overflow.evaluate(&ctx).unwrap(), Value::I32(i32::MIN));
    }
}

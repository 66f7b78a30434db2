use crate::syntax::{BinaryOperator, Expr, UnaryOperator, Variable};
use crate::EvalError;

/// Anything that can be sampled as a height field `f(x, y)`.
///
/// A failure at one point is local to that point; callers decide what to
/// substitute for it.
pub trait Evaluable {
  fn eval(&self, x: f64, y: f64) -> Result<f64, EvalError>;
}

impl<F> Evaluable for F
where
  F: Fn(f64, f64) -> Result<f64, EvalError>,
{
  fn eval(&self, x: f64, y: f64) -> Result<f64, EvalError> {
    self(x, y)
  }
}

/// The zero function, sampled when no valid formula is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSurface;

impl Evaluable for FlatSurface {
  fn eval(&self, _x: f64, _y: f64) -> Result<f64, EvalError> {
    Ok(0.0)
  }
}

/// A formula that passed compilation, together with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
  source: String,
  expr: Expr,
}

impl CompiledExpression {
  pub fn new(source: impl Into<String>, expr: Expr) -> Self {
    CompiledExpression {
      source: source.into(),
      expr,
    }
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn expr(&self) -> &Expr {
    &self.expr
  }
}

impl Evaluable for CompiledExpression {
  fn eval(&self, x: f64, y: f64) -> Result<f64, EvalError> {
    evaluate_expr(&self.expr, x, y)
  }
}

fn finite(value: f64) -> Result<f64, EvalError> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(EvalError::NonFinite)
  }
}

/// Tree-walking evaluation of a resolved expression at `(x, y)`.
pub fn evaluate_expr(expr: &Expr, x: f64, y: f64) -> Result<f64, EvalError> {
  match expr {
    Expr::Number(n) => Ok(*n),
    Expr::Variable(Variable::X) => Ok(x),
    Expr::Variable(Variable::Y) => Ok(y),
    Expr::Constant(c) => Ok(c.value()),
    Expr::UnaryOp { op, operand } => {
      let value = evaluate_expr(operand, x, y)?;
      Ok(match op {
        UnaryOperator::Minus => -value,
        UnaryOperator::Plus => value,
      })
    }
    Expr::BinaryOp { op, left, right } => {
      let lhs = evaluate_expr(left, x, y)?;
      let rhs = evaluate_expr(right, x, y)?;
      let value = match op {
        BinaryOperator::Plus => lhs + rhs,
        BinaryOperator::Minus => lhs - rhs,
        BinaryOperator::Times => lhs * rhs,
        BinaryOperator::Divide | BinaryOperator::Modulo if rhs == 0.0 => {
          return Err(EvalError::DivisionByZero);
        }
        BinaryOperator::Divide => lhs / rhs,
        BinaryOperator::Modulo => lhs % rhs,
        BinaryOperator::Power => lhs.powf(rhs),
      };
      finite(value)
    }
    Expr::FunctionCall { function, args } => {
      let values = args
        .iter()
        .map(|arg| evaluate_expr(arg, x, y))
        .collect::<Result<Vec<_>, _>>()?;
      function.apply(&values)
    }
  }
}

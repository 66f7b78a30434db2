use std::fmt;

use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::functions::math::{bare_name, Constant, Function};
use crate::{CompileError, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
  X,
  Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Minus,
  Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Modulo,
  Power,
}

impl BinaryOperator {
  fn symbol(self) -> &'static str {
    match self {
      BinaryOperator::Plus => " + ",
      BinaryOperator::Minus => " - ",
      BinaryOperator::Times => " * ",
      BinaryOperator::Divide => " / ",
      BinaryOperator::Modulo => " % ",
      BinaryOperator::Power => "^",
    }
  }

  fn precedence(self) -> u8 {
    match self {
      BinaryOperator::Plus | BinaryOperator::Minus => 1,
      BinaryOperator::Times
      | BinaryOperator::Divide
      | BinaryOperator::Modulo => 2,
      BinaryOperator::Power => 4,
    }
  }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

/// A resolved formula. Every name has already been checked against the
/// allow-list, so evaluating an `Expr` never looks anything up.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Number(f64),
  Variable(Variable),
  Constant(Constant),
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  FunctionCall {
    function: Function,
    args: Vec<Expr>,
  },
}

impl Expr {
  fn precedence(&self) -> u8 {
    match self {
      Expr::UnaryOp { .. } => UNARY_PRECEDENCE,
      Expr::BinaryOp { op, .. } => op.precedence(),
      _ => ATOM_PRECEDENCE,
    }
  }

  /// True if the expression references `x` or `y` anywhere.
  pub fn depends_on_variables(&self) -> bool {
    match self {
      Expr::Variable(_) => true,
      Expr::Number(_) | Expr::Constant(_) => false,
      Expr::UnaryOp { operand, .. } => operand.depends_on_variables(),
      Expr::BinaryOp { left, right, .. } => {
        left.depends_on_variables() || right.depends_on_variables()
      }
      Expr::FunctionCall { args, .. } => {
        args.iter().any(Expr::depends_on_variables)
      }
    }
  }
}

/// Write `child`, parenthesized when it binds looser than its parent.
fn write_operand(
  f: &mut fmt::Formatter<'_>,
  child: &Expr,
  needs_parens: bool,
) -> fmt::Result {
  if needs_parens {
    write!(f, "({child})")
  } else {
    write!(f, "{child}")
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Number(n) => write!(f, "{n}"),
      Expr::Variable(Variable::X) => f.write_str("x"),
      Expr::Variable(Variable::Y) => f.write_str("y"),
      Expr::Constant(c) => f.write_str(c.name()),
      Expr::UnaryOp { op, operand } => {
        f.write_str(match op {
          UnaryOperator::Minus => "-",
          UnaryOperator::Plus => "+",
        })?;
        write_operand(f, operand, operand.precedence() < UNARY_PRECEDENCE)
      }
      Expr::BinaryOp { op, left, right } => {
        let prec = op.precedence();
        // Power is right-associative, everything else left-associative
        let right_assoc = *op == BinaryOperator::Power;
        let left_parens = left.precedence() < prec
          || (right_assoc && left.precedence() == prec);
        let right_parens = right.precedence() < prec
          || (!right_assoc && right.precedence() == prec);
        write_operand(f, left, left_parens)?;
        f.write_str(op.symbol())?;
        write_operand(f, right, right_parens)
      }
      Expr::FunctionCall { function, args } => {
        write!(f, "{function}(")?;
        for (idx, arg) in args.iter().enumerate() {
          if idx > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{arg}")?;
        }
        f.write_str(")")
      }
    }
  }
}

fn pratt() -> PrattParser<Rule> {
  // Lowest precedence first. Unary signs bind looser than ^ so that
  // -x^2 reads as -(x^2).
  PrattParser::new()
    .op(
      Op::infix(Rule::Add, Assoc::Left)
        | Op::infix(Rule::Subtract, Assoc::Left),
    )
    .op(
      Op::infix(Rule::Multiply, Assoc::Left)
        | Op::infix(Rule::Divide, Assoc::Left)
        | Op::infix(Rule::Modulo, Assoc::Left),
    )
    .op(Op::prefix(Rule::Negate) | Op::prefix(Rule::Identity))
    .op(Op::infix(Rule::Power, Assoc::Right))
}

/// Convert an `Expression` pair into a resolved [`Expr`].
pub fn pair_to_expr(pair: Pair<'_, Rule>) -> Result<Expr, CompileError> {
  let pratt = pratt();
  expression_to_expr(pair, &pratt)
}

fn expression_to_expr(
  pair: Pair<'_, Rule>,
  pratt: &PrattParser<Rule>,
) -> Result<Expr, CompileError> {
  pratt
    .map_primary(|primary| primary_to_expr(primary, pratt))
    .map_prefix(|op, operand| {
      let op = match op.as_rule() {
        Rule::Negate => UnaryOperator::Minus,
        _ => UnaryOperator::Plus,
      };
      Ok(Expr::UnaryOp {
        op,
        operand: Box::new(operand?),
      })
    })
    .map_infix(|left, op, right| {
      let op = match op.as_rule() {
        Rule::Add => BinaryOperator::Plus,
        Rule::Subtract => BinaryOperator::Minus,
        Rule::Multiply => BinaryOperator::Times,
        Rule::Divide => BinaryOperator::Divide,
        Rule::Modulo => BinaryOperator::Modulo,
        Rule::Power => BinaryOperator::Power,
        rule => unreachable!("{rule:?} is not an infix operator"),
      };
      Ok(Expr::BinaryOp {
        op,
        left: Box::new(left?),
        right: Box::new(right?),
      })
    })
    .parse(pair.into_inner())
}

fn primary_to_expr(
  pair: Pair<'_, Rule>,
  pratt: &PrattParser<Rule>,
) -> Result<Expr, CompileError> {
  match pair.as_rule() {
    Rule::Number => {
      let text = pair.as_str();
      match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Expr::Number(n)),
        _ => Err(CompileError::InvalidNumber(text.to_string())),
      }
    }
    Rule::Identifier => resolve_identifier(pair.as_str()),
    Rule::Call => {
      let mut inner = pair.into_inner();
      let name = inner.next().map(|p| p.as_str()).unwrap_or_default();
      let args = inner
        .map(|arg| expression_to_expr(arg, pratt))
        .collect::<Result<Vec<_>, _>>()?;
      resolve_call(name, args)
    }
    Rule::Expression => expression_to_expr(pair, pratt),
    rule => unreachable!("{rule:?} is not a primary expression"),
  }
}

fn resolve_identifier(name: &str) -> Result<Expr, CompileError> {
  // Math.x is not a thing; only constants may carry the prefix
  match name {
    "x" => return Ok(Expr::Variable(Variable::X)),
    "y" => return Ok(Expr::Variable(Variable::Y)),
    _ => {}
  }
  if let Some(constant) = Constant::lookup(name) {
    return Ok(Expr::Constant(constant));
  }
  if Function::lookup(name).is_some() {
    return Err(CompileError::UnknownIdentifier(format!(
      "{} (function used without arguments)",
      bare_name(name)
    )));
  }
  Err(CompileError::UnknownIdentifier(name.to_string()))
}

fn resolve_call(name: &str, args: Vec<Expr>) -> Result<Expr, CompileError> {
  let function = Function::lookup(name)
    .ok_or_else(|| CompileError::UnknownFunction(name.to_string()))?;
  let arity = function.arity();
  if !arity.accepts(args.len()) {
    return Err(CompileError::Arity {
      function: function.name().to_string(),
      expected: arity.to_string(),
      found: args.len(),
    });
  }
  Ok(Expr::FunctionCall { function, args })
}

use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod evaluator;
pub mod functions;
pub mod mesh;
pub mod params;
pub mod surface;
pub mod syntax;

pub use evaluator::{CompiledExpression, Evaluable, FlatSurface};
pub use functions::plot3d::tessellate;
pub use mesh::MeshBuffer;
pub use params::{Control, PlotDomain, PlotParams};
pub use surface::SurfacePlot;

#[derive(Parser)]
#[grammar = "surface.pest"]
pub struct SurfaceParser;

/// Raised when formula text cannot be turned into an evaluable expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
  #[error("Parse error: {0}")]
  Syntax(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty expression")]
  EmptyExpression,
  #[error("Invalid number literal: {0}")]
  InvalidNumber(String),
  #[error("Unknown identifier: {0}")]
  UnknownIdentifier(String),
  #[error("Unknown function: {0}")]
  UnknownFunction(String),
  #[error("{function} expects {expected} argument(s), got {found}")]
  Arity {
    function: String,
    expected: String,
    found: usize,
  },
}

/// Failure while evaluating a compiled expression at a single (x, y).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
  #[error("Division by zero")]
  DivisionByZero,
  #[error("{function} is undefined at {argument}")]
  Domain {
    function: &'static str,
    argument: f64,
  },
  #[error("Result is not a finite number")]
  NonFinite,
}

#[derive(Error, Debug)]
pub enum PlotError {
  #[error("Invalid plot domain: {0}")]
  InvalidDomain(String),
  #[error(transparent)]
  Compile(#[from] CompileError),
  #[error("Invalid parameter file: {0}")]
  Config(#[from] serde_json::Error),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl SurfaceParser {
  pub fn parse_formula(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  SurfaceParser::parse_formula(input)
}

/// Compile formula text such as `sin(x) * cos(y)` into an evaluable
/// function of `x` and `y`.
///
/// Compilation is strict: syntax errors, unknown names and wrong arity
/// are reported here rather than at evaluation time.
pub fn compile(text: &str) -> Result<CompiledExpression, CompileError> {
  if text.trim().is_empty() {
    return Err(CompileError::EmptyExpression);
  }

  let mut pairs = parse(text)?;
  let program = pairs.next().ok_or(CompileError::EmptyExpression)?;
  let expression = program
    .into_inner()
    .find(|pair| pair.as_rule() == Rule::Expression)
    .ok_or(CompileError::EmptyExpression)?;

  let expr = syntax::pair_to_expr(expression)?;
  Ok(CompiledExpression::new(text.trim(), expr))
}

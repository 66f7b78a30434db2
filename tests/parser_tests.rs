use surfplot::{compile, parse, CompileError};

#[cfg(test)]
mod tests {
  use surfplot::Rule;

  use super::*;

  #[test]
  fn test_parse_calculation() {
    let pair = parse("1 + 2").unwrap().next().unwrap();
    assert_eq!(pair.as_rule(), Rule::Program);
  }

  #[test]
  fn test_parse_variables() {
    let pair = parse("x * y - 2").unwrap().next().unwrap();
    assert_eq!(pair.as_rule(), Rule::Program);
  }

  #[test]
  fn test_parse_nested_function_calls() {
    let pair = parse("cos(sin(x) + y)").unwrap().next().unwrap();
    assert_eq!(pair.as_rule(), Rule::Program);
  }

  #[test]
  fn test_parse_math_prefix() {
    let pair = parse("Math.sin(x) * Math.PI").unwrap().next().unwrap();
    assert_eq!(pair.as_rule(), Rule::Program);
  }

  #[test]
  fn test_parse_scientific_notation() {
    assert!(parse("1.5e-3 * x + .5").is_ok());
  }

  #[test]
  fn test_parse_rejects_dangling_operator() {
    assert!(parse("x +").is_err());
  }

  #[test]
  fn test_parse_rejects_unbalanced_parens() {
    assert!(parse("(x + y").is_err());
    assert!(parse("x + y)").is_err());
  }

  #[test]
  fn test_parse_rejects_implicit_multiplication() {
    assert!(parse("2x").is_err());
  }
}

mod compile_errors {
  use super::*;

  #[test]
  fn syntax_error() {
    assert!(matches!(compile("x +* y"), Err(CompileError::Syntax(_))));
  }

  #[test]
  fn empty_text() {
    assert_eq!(compile("   ").unwrap_err(), CompileError::EmptyExpression);
    assert_eq!(compile("").unwrap_err(), CompileError::EmptyExpression);
  }

  #[test]
  fn unknown_variable() {
    assert_eq!(
      compile("x + z").unwrap_err(),
      CompileError::UnknownIdentifier("z".to_string())
    );
  }

  #[test]
  fn host_code_is_rejected() {
    // Arbitrary calls are not part of the allow-list
    assert_eq!(
      compile("alert(1)").unwrap_err(),
      CompileError::UnknownFunction("alert".to_string())
    );
    assert!(compile("x; y").is_err());
    assert!(compile("window.close()").is_err());
  }

  #[test]
  fn wrong_arity() {
    assert!(matches!(
      compile("pow(x)"),
      Err(CompileError::Arity { found: 1, .. })
    ));
    assert!(matches!(
      compile("sin(x, y)"),
      Err(CompileError::Arity { found: 2, .. })
    ));
    assert!(matches!(
      compile("max()"),
      Err(CompileError::Arity { found: 0, .. })
    ));
  }

  #[test]
  fn function_without_call() {
    assert!(matches!(
      compile("sin + 1"),
      Err(CompileError::UnknownIdentifier(_))
    ));
  }

  #[test]
  fn out_of_range_literal() {
    assert_eq!(
      compile("1e400 * x").unwrap_err(),
      CompileError::InvalidNumber("1e400".to_string())
    );
    assert!(compile("1e300 * x").is_ok());
  }

  #[test]
  fn syntax_error_message() {
    let message = compile("x + (y").unwrap_err().to_string();
    assert!(
      message.starts_with("Parse error"),
      "Unexpected message: {message}"
    );
  }
}

mod normalized_form {
  use super::*;

  fn normalize(text: &str) -> String {
    compile(text).unwrap().expr().to_string()
  }

  #[test]
  fn operators_and_spacing() {
    assert_eq!(normalize("x*x+y*y"), "x * x + y * y");
  }

  #[test]
  fn math_prefix_is_dropped() {
    assert_eq!(normalize("Math.sin(x)*Math.PI"), "sin(x) * pi");
  }

  #[test]
  fn double_star_is_power() {
    assert_eq!(normalize("x**2"), "x^2");
  }

  #[test]
  fn unary_minus_binds_looser_than_power() {
    assert_eq!(normalize("-x^2"), "-x^2");
    assert_eq!(normalize("(-x)^2"), "(-x)^2");
  }

  #[test]
  fn power_is_right_associative() {
    assert_eq!(normalize("2^3^2"), "2^3^2");
    assert_eq!(normalize("(2^3)^2"), "(2^3)^2");
  }

  #[test]
  fn subtraction_keeps_grouping() {
    assert_eq!(normalize("x - (y - 1)"), "x - (y - 1)");
    assert_eq!(normalize("(x - y) - 1"), "x - y - 1");
  }

  #[test]
  fn redundant_parens_are_removed() {
    assert_eq!(normalize("((x)) * (y + 1)"), "x * (y + 1)");
  }

  #[test]
  fn constant_formula_has_no_variables() {
    assert!(!compile("2 * pi").unwrap().expr().depends_on_variables());
    assert!(compile("max(1, y)").unwrap().expr().depends_on_variables());
  }

  #[test]
  fn normalized_text_compiles_to_same_tree() {
    for text in ["sin(x)*cos(y)", "-x^2 + 3 % y", "max(x, y, 1) / (2 - x)"] {
      let first = compile(text).unwrap();
      let second = compile(&first.expr().to_string()).unwrap();
      assert_eq!(first.expr(), second.expr(), "for {text}");
    }
  }
}

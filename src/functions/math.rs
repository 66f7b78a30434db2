//! The allow-list of named constants and functions a formula may use.
//!
//! Names may be written bare (`sin`, `pi`) or with a `Math.` prefix
//! (`Math.sin`, `Math.PI`). Anything not listed here is rejected at
//! compile time.

use std::fmt;

use crate::EvalError;

/// Strip the optional `Math.` prefix from a name.
pub fn bare_name(name: &str) -> &str {
  name.strip_prefix("Math.").unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
  Pi,
  E,
}

impl Constant {
  pub fn lookup(name: &str) -> Option<Self> {
    match bare_name(name) {
      "pi" | "PI" => Some(Constant::Pi),
      "e" | "E" => Some(Constant::E),
      _ => None,
    }
  }

  pub fn value(self) -> f64 {
    match self {
      Constant::Pi => std::f64::consts::PI,
      Constant::E => std::f64::consts::E,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Constant::Pi => "pi",
      Constant::E => "e",
    }
  }
}

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  Exactly(usize),
  AtLeast(usize),
}

impl Arity {
  pub fn accepts(self, count: usize) -> bool {
    match self {
      Arity::Exactly(n) => count == n,
      Arity::AtLeast(n) => count >= n,
    }
  }
}

impl fmt::Display for Arity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Arity::Exactly(n) => write!(f, "{n}"),
      Arity::AtLeast(n) => write!(f, "at least {n}"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Sin,
  Cos,
  Tan,
  Asin,
  Acos,
  Atan,
  Atan2,
  Sinh,
  Cosh,
  Tanh,
  Sqrt,
  Cbrt,
  Abs,
  Exp,
  Log,
  Log10,
  Log2,
  Pow,
  Min,
  Max,
  Floor,
  Ceil,
  Round,
  Sign,
  Hypot,
}

impl Function {
  pub fn lookup(name: &str) -> Option<Self> {
    let function = match bare_name(name) {
      "sin" => Function::Sin,
      "cos" => Function::Cos,
      "tan" => Function::Tan,
      "asin" => Function::Asin,
      "acos" => Function::Acos,
      "atan" => Function::Atan,
      "atan2" => Function::Atan2,
      "sinh" => Function::Sinh,
      "cosh" => Function::Cosh,
      "tanh" => Function::Tanh,
      "sqrt" => Function::Sqrt,
      "cbrt" => Function::Cbrt,
      "abs" => Function::Abs,
      "exp" => Function::Exp,
      // ln and log are both the natural logarithm
      "ln" | "log" => Function::Log,
      "log10" => Function::Log10,
      "log2" => Function::Log2,
      "pow" => Function::Pow,
      "min" => Function::Min,
      "max" => Function::Max,
      "floor" => Function::Floor,
      "ceil" => Function::Ceil,
      "round" => Function::Round,
      "sign" => Function::Sign,
      "hypot" => Function::Hypot,
      _ => return None,
    };
    Some(function)
  }

  pub fn name(self) -> &'static str {
    match self {
      Function::Sin => "sin",
      Function::Cos => "cos",
      Function::Tan => "tan",
      Function::Asin => "asin",
      Function::Acos => "acos",
      Function::Atan => "atan",
      Function::Atan2 => "atan2",
      Function::Sinh => "sinh",
      Function::Cosh => "cosh",
      Function::Tanh => "tanh",
      Function::Sqrt => "sqrt",
      Function::Cbrt => "cbrt",
      Function::Abs => "abs",
      Function::Exp => "exp",
      Function::Log => "log",
      Function::Log10 => "log10",
      Function::Log2 => "log2",
      Function::Pow => "pow",
      Function::Min => "min",
      Function::Max => "max",
      Function::Floor => "floor",
      Function::Ceil => "ceil",
      Function::Round => "round",
      Function::Sign => "sign",
      Function::Hypot => "hypot",
    }
  }

  pub fn arity(self) -> Arity {
    match self {
      Function::Atan2 | Function::Pow | Function::Hypot => Arity::Exactly(2),
      Function::Min | Function::Max => Arity::AtLeast(1),
      _ => Arity::Exactly(1),
    }
  }

  /// Apply the function to already evaluated arguments.
  ///
  /// The caller guarantees `args.len()` satisfies [`Function::arity`].
  /// Arguments outside the real domain of the function are reported as
  /// [`EvalError::Domain`] instead of producing NaN.
  pub fn apply(self, args: &[f64]) -> Result<f64, EvalError> {
    let a = args.first().copied().unwrap_or(f64::NAN);
    let b = args.get(1).copied().unwrap_or(f64::NAN);

    let domain_error = |argument: f64| EvalError::Domain {
      function: self.name(),
      argument,
    };

    let value = match self {
      Function::Sin => a.sin(),
      Function::Cos => a.cos(),
      Function::Tan => a.tan(),
      Function::Asin | Function::Acos if !(-1.0..=1.0).contains(&a) => {
        return Err(domain_error(a));
      }
      Function::Asin => a.asin(),
      Function::Acos => a.acos(),
      Function::Atan => a.atan(),
      Function::Atan2 => a.atan2(b),
      Function::Sinh => a.sinh(),
      Function::Cosh => a.cosh(),
      Function::Tanh => a.tanh(),
      Function::Sqrt if a < 0.0 => return Err(domain_error(a)),
      Function::Sqrt => a.sqrt(),
      Function::Cbrt => a.cbrt(),
      Function::Abs => a.abs(),
      Function::Exp => a.exp(),
      Function::Log | Function::Log10 | Function::Log2 if a <= 0.0 => {
        return Err(domain_error(a));
      }
      Function::Log => a.ln(),
      Function::Log10 => a.log10(),
      Function::Log2 => a.log2(),
      Function::Pow => a.powf(b),
      Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
      Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
      Function::Floor => a.floor(),
      Function::Ceil => a.ceil(),
      // Halves round towards positive infinity: round(-2.5) == -2
      Function::Round => (a + 0.5).floor(),
      Function::Sign => {
        if a > 0.0 {
          1.0
        } else if a < 0.0 {
          -1.0
        } else {
          a
        }
      }
      Function::Hypot => a.hypot(b),
    };

    if value.is_finite() {
      Ok(value)
    } else {
      Err(EvalError::NonFinite)
    }
  }
}

impl fmt::Display for Function {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lookup_accepts_math_prefix() {
    assert_eq!(Function::lookup("Math.sin"), Some(Function::Sin));
    assert_eq!(Constant::lookup("Math.PI"), Some(Constant::Pi));
    assert_eq!(Function::lookup("ln"), Some(Function::Log));
    assert_eq!(Function::lookup("eval"), None);
    assert_eq!(Function::lookup("Sin"), None);
  }

  #[test]
  fn test_domain_errors() {
    assert!(matches!(
      Function::Sqrt.apply(&[-1.0]),
      Err(EvalError::Domain {
        function: "sqrt",
        ..
      })
    ));
    assert!(Function::Log.apply(&[0.0]).is_err());
    assert!(Function::Asin.apply(&[1.5]).is_err());
    assert_eq!(Function::Sqrt.apply(&[0.0]), Ok(0.0));
  }

  #[test]
  fn test_pow_overflow_is_non_finite() {
    assert_eq!(Function::Pow.apply(&[10.0, 400.0]), Err(EvalError::NonFinite));
  }

  #[test]
  fn test_variadic_min_max() {
    assert_eq!(Function::Min.apply(&[3.0, -1.0, 2.0]), Ok(-1.0));
    assert_eq!(Function::Max.apply(&[3.0]), Ok(3.0));
    assert!(Function::Max.arity().accepts(4));
    assert!(!Function::Pow.arity().accepts(1));
  }

  #[test]
  fn test_round_and_sign() {
    assert_eq!(Function::Round.apply(&[2.5]), Ok(3.0));
    assert_eq!(Function::Round.apply(&[-2.5]), Ok(-2.0));
    assert_eq!(Function::Sign.apply(&[-0.3]), Ok(-1.0));
    assert_eq!(Function::Sign.apply(&[0.0]), Ok(0.0));
  }
}

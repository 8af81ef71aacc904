//! # Response Curve
//!
//! Shapes a normalized stick magnitude with a sum of power terms so that
//! small deflections move the pointer gently while full deflection keeps
//! full speed.
//!
//! Curves are written as text in the configuration, e.g. the default
//! `"0.9x^5 + 0.1x"`, and parsed once at startup into a [`CurveSpec`].
//!
//! ## Term syntax
//!
//! | Term | Coefficient | Exponent |
//! |------|-------------|----------|
//! | `0.9x^5` | 0.9 | 5 |
//! | `0.1x` | 0.1 | 1 |
//! | `x^3` | 1.0 | 3 |
//! | `0.2` | 0.2 | 0 |
//!
//! ## Usage
//!
//! ```
//! use analog_mouse_bridge::motion::curve::CurveSpec;
//!
//! let curve: CurveSpec = "0.9x^5 + 0.1x".parse()?;
//! assert!((curve.shape(1.0) - 1.0).abs() < 1e-12);
//! assert_eq!(curve.shape(0.0), 0.0);
//! # Ok::<(), analog_mouse_bridge::error::BridgeError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::{BridgeError, Result};

/// Curve used when none is configured.
pub const DEFAULT_CURVE: &str = "0.9x^5 + 0.1x";

/// One `coefficient * x^exponent` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveTerm {
    pub coefficient: f64,
    pub exponent: u32,
}

impl CurveTerm {
    #[must_use]
    pub fn new(coefficient: f64, exponent: u32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    #[inline]
    fn eval(&self, magnitude: f64) -> f64 {
        // powi takes i32; exponents above i32::MAX are rejected at parse time
        self.coefficient * magnitude.powi(self.exponent as i32)
    }
}

/// Parsed response curve: an ordered list of power terms.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSpec {
    terms: Vec<CurveTerm>,
}

impl Default for CurveSpec {
    fn default() -> Self {
        Self {
            terms: vec![CurveTerm::new(0.9, 5), CurveTerm::new(0.1, 1)],
        }
    }
}

impl CurveSpec {
    /// Builds a curve from already structured terms.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CurveParse`] when `terms` is empty.
    pub fn from_terms(terms: Vec<CurveTerm>) -> Result<Self> {
        if terms.is_empty() {
            return Err(BridgeError::CurveParse(
                "curve must have at least one term".to_string(),
            ));
        }
        Ok(Self { terms })
    }

    /// The terms in evaluation order.
    #[must_use]
    pub fn terms(&self) -> &[CurveTerm] {
        &self.terms
    }

    /// Evaluates `Σ coefficient * magnitude^exponent`.
    ///
    /// `magnitude` is expected to be non-negative; the caller reattaches the
    /// sign of the original axis value.
    #[must_use]
    pub fn shape(&self, magnitude: f64) -> f64 {
        let shaped = self.terms.iter().map(|term| term.eval(magnitude)).sum();
        trace!("{}({}) = {}", self, magnitude, shaped);
        shaped
    }
}

impl FromStr for CurveSpec {
    type Err = BridgeError;

    fn from_str(text: &str) -> Result<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(BridgeError::CurveParse("curve is empty".to_string()));
        }

        let terms = compact
            .split('+')
            .map(parse_term)
            .collect::<Result<Vec<_>>>()?;

        Self::from_terms(terms)
    }
}

impl fmt::Display for CurveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match term.exponent {
                0 => write!(f, "{}", term.coefficient)?,
                1 => write!(f, "{}x", term.coefficient)?,
                exp => write!(f, "{}x^{}", term.coefficient, exp)?,
            }
        }
        Ok(())
    }
}

/// Parses one whitespace-free term such as `0.9x^5`, `x`, or `0.2`.
fn parse_term(term: &str) -> Result<CurveTerm> {
    if term.is_empty() {
        return Err(BridgeError::CurveParse("empty term".to_string()));
    }

    let Some((coef_text, rest)) = term.split_once('x') else {
        let coefficient = parse_coefficient(term, term)?;
        return Ok(CurveTerm::new(coefficient, 0));
    };

    let coefficient = match coef_text {
        "" => 1.0,
        "-" => -1.0,
        text => parse_coefficient(text, term)?,
    };

    let exponent = if rest.is_empty() {
        1
    } else if let Some(exp_text) = rest.strip_prefix('^') {
        exp_text
            .parse::<u32>()
            .ok()
            .filter(|&exp| i32::try_from(exp).is_ok())
            .ok_or_else(|| {
                BridgeError::CurveParse(format!("invalid exponent in term '{}'", term))
            })?
    } else {
        return Err(BridgeError::CurveParse(format!(
            "unexpected '{}' after x in term '{}'",
            rest, term
        )));
    };

    Ok(CurveTerm::new(coefficient, exponent))
}

fn parse_coefficient(text: &str, term: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|c| c.is_finite())
        .ok_or_else(|| BridgeError::CurveParse(format!("invalid coefficient in term '{}'", term)))
}

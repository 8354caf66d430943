//! WKT polygon parsing.
//!
//! Only the single-ring form is accepted:
//!
//! ```text
//! POLYGON ((19.29 43.51, 19.52 43.24, 20.17 42.82, 19.29 43.51))
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::{Polygon, ValidationError};

/// Regex for the `POLYGON ((...))` envelope. Captures the position list.
static POLYGON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*POLYGON\s*\(\(([^()]*)\)\)\s*$").expect("valid regex")
});

/// Parses and validates a WKT `POLYGON` string.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedWkt`] if the text does not match the
/// `POLYGON ((...))` envelope, [`ValidationError::NonNumericCoordinate`] for
/// any token that is not a float, and otherwise whatever
/// [`Polygon::from_positions`] rejects.
pub fn parse_wkt(text: &str) -> Result<Polygon, ValidationError> {
    let body = POLYGON_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(ValidationError::MalformedWkt)?
        .as_str();

    if body.trim().is_empty() {
        return Err(ValidationError::EmptyRing);
    }

    let positions = body
        .split(',')
        .map(|position| {
            position
                .split_whitespace()
                .map(|token| {
                    token
                        .parse::<f64>()
                        .map_err(|_| ValidationError::NonNumericCoordinate {
                            token: token.to_string(),
                        })
                })
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Polygon::from_positions(positions)
}

//! # Threshold Ranges
//!
//! Nagios range expressions (`[@][start:][end]`) as used by `--warning` and
//! `--critical`:
//!
//! | expression | alert when            |
//! |------------|-----------------------|
//! | `10`       | `< 0` or `> 10`       |
//! | `10:`      | `< 10`                |
//! | `~:10`     | `> 10`                |
//! | `10:20`    | `< 10` or `> 20`      |
//! | `@10:20`   | `>= 10` and `<= 20`   |

use std::fmt;
use std::str::FromStr;

use crate::error::{ProbeError, ProbeResult};

/// A parsed threshold range
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    start: f64,
    end: f64,
    invert: bool,
}

impl Range {
    /// Parse an optional range; an empty expression means "no threshold"
    pub fn parse_optional(expr: &str) -> ProbeResult<Option<Range>> {
        let expr = expr.trim();
        if expr.is_empty() {
            Ok(None)
        } else {
            expr.parse().map(Some)
        }
    }

    /// Whether `value` is acceptable, i.e. does not trigger an alert
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let inside = self.start <= value && value <= self.end;
        inside != self.invert
    }

    /// Hint describing a violation of this range
    #[must_use]
    pub fn violation(&self) -> String {
        if self.invert {
            format!("inside range {}", self)
        } else {
            format!("outside range {}", self)
        }
    }
}

fn parse_bound(range: &str, bound: &str) -> ProbeResult<f64> {
    bound
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ProbeError::invalid_threshold(range, format!("'{}' is not a number", bound)))
}

impl FromStr for Range {
    type Err = ProbeError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let (invert, body) = match expr.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, expr),
        };

        let (start, end) = match body.split_once(':') {
            Some((start, end)) => {
                let start = match start {
                    "~" => f64::NEG_INFINITY,
                    "" => 0.0,
                    s => parse_bound(expr, s)?,
                };
                let end = match end {
                    "" => f64::INFINITY,
                    e => parse_bound(expr, e)?,
                };
                (start, end)
            }
            None => (0.0, parse_bound(expr, body)?),
        };

        if start > end {
            return Err(ProbeError::invalid_threshold(
                expr,
                "start of range must not be greater than its end",
            ));
        }

        Ok(Self { start, end, invert })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_str("@")?;
        }
        if self.start == f64::NEG_INFINITY {
            f.write_str("~:")?;
        } else if self.start != 0.0 {
            write!(f, "{}:", self.start)?;
        }
        if self.end != f64::INFINITY {
            write!(f, "{}", self.end)?;
        }
        Ok(())
    }
}

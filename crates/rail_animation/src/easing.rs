//! Easing curves
//!
//! Timing functions attached to emitted transitions. The rail never samples
//! them itself when driving a style system that animates on its own, but
//! sinks that interpolate frames use [`Easing::apply`].

use rail_core::{RailError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A timing function mapping linear progress to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier with control points (x1, y1) and (x2, y2)
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Bouncy curve that overshoots the target before settling
    pub fn overshoot() -> Self {
        Easing::CubicBezier(0.34, 1.56, 0.64, 1.0)
    }

    /// Control points of the equivalent cubic bezier
    pub fn control_points(&self) -> Option<(f64, f64, f64, f64)> {
        match *self {
            Easing::Linear => None,
            Easing::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Easing::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Easing::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Easing::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Easing::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// Eased progress for linear progress `t` (clamped to 0.0..=1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.control_points() {
            None => t,
            Some(_) if t == 0.0 || t == 1.0 => t,
            Some((x1, y1, x2, y2)) => {
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }

    /// CSS `transition-timing-function` value
    pub fn to_css(&self) -> String {
        match *self {
            Easing::Linear => "linear".to_string(),
            Easing::Ease => "ease".to_string(),
            Easing::EaseIn => "ease-in".to_string(),
            Easing::EaseOut => "ease-out".to_string(),
            Easing::EaseInOut => "ease-in-out".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                format!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Easing {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "linear" => return Ok(Easing::Linear),
            "ease" => return Ok(Easing::Ease),
            "ease-in" => return Ok(Easing::EaseIn),
            "ease-out" => return Ok(Easing::EaseOut),
            "ease-in-out" => return Ok(Easing::EaseInOut),
            "overshoot" => return Ok(Easing::overshoot()),
            _ => {}
        }

        let args = value
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| RailError::Config(format!("unknown easing '{}'", s)))?;

        let points = args
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RailError::Config(format!("invalid easing '{}': {}", s, e)))?;

        let [x1, y1, x2, y2] = points[..] else {
            return Err(RailError::Config(format!(
                "cubic-bezier takes 4 values, got {} in '{}'",
                points.len(),
                s
            )));
        };

        // x coordinates must stay in range so the curve is a function of time
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(RailError::Config(format!(
                "cubic-bezier x values must be within 0..=1 in '{}'",
                s
            )));
        }
        if !(y1.is_finite() && y2.is_finite()) {
            return Err(RailError::Config(format!(
                "cubic-bezier y values must be finite in '{}'",
                s
            )));
        }

        Ok(Easing::CubicBezier(x1, y1, x2, y2))
    }
}

impl TryFrom<String> for Easing {
    type Error = RailError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_css()
    }
}

/// One coordinate of a cubic bezier anchored at 0 and 1
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate is `x`
fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    // Newton-Raphson converges in a few steps for well-behaved curves
    let mut s = x;
    for _ in 0..8 {
        let error = bezier(s, x1, x2) - x;
        if error.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        s -= error / slope;
    }

    // Fall back to bisection
    let (mut low, mut high) = (0.0, 1.0);
    s = x;
    while high - low > EPSILON {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) / 2.0;
    }
    s
}

//! Range entries and the parsers for their textual attributes.
//!
//! A GIBS `ColorMapEntry` carries its value interval as a bracketed string
//! (`"[96,97)"`, `"[-INF,0.00)"`, `"[250)"`) and its color as `"r,g,b"`.

use serde::{Deserialize, Serialize};

use crate::error::{GibsError, Result};

/// One parsed color range: a value interval and the color painted over it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    /// Lower bound, possibly negative infinity
    pub low: f64,
    /// Upper bound, possibly positive infinity
    pub high: f64,
    /// RGB color in 0..=255
    pub rgb: [u8; 3],
}

impl RangeEntry {
    /// Create an entry, rejecting NaN bounds and inverted intervals
    pub fn new(low: f64, high: f64, rgb: [u8; 3]) -> Result<Self> {
        if low.is_nan() || high.is_nan() {
            return Err(GibsError::InvalidRange {
                value: format!("[{}, {}]", low, high),
                message: "bounds must not be NaN".to_string(),
            });
        }
        if low > high {
            return Err(GibsError::InvalidRange {
                value: format!("[{}, {}]", low, high),
                message: "lower bound exceeds upper bound".to_string(),
            });
        }
        Ok(Self { low, high, rgb })
    }

    /// Parse an entry from its `value` and `rgb` attribute texts
    pub fn parse(value: &str, rgb: &str) -> Result<Self> {
        let [low, high] = parse_range(value)?;
        let rgb = parse_rgb(rgb)?;
        Self::new(low, high, rgb)
    }

    /// The color scaled into 0.0..=1.0
    pub fn unit_rgb(&self) -> [f64; 3] {
        [
            f64::from(self.rgb[0]) / 255.0,
            f64::from(self.rgb[1]) / 255.0,
            f64::from(self.rgb[2]) / 255.0,
        ]
    }
}

/// Parse a range string into `[low, high]`.
///
/// Enclosing brackets, parentheses, commas and spaces are stripped, the rest
/// is split on commas. `INF`/`-INF` tokens parse as infinities. A lone bound
/// `a` is completed to `[a, 0]` when `a <= 0` (the first entry, open below)
/// and to `[a, +inf]` when `a > 0` (the last entry, open above).
pub fn parse_range(s: &str) -> Result<[f64; 2]> {
    let invalid = |message: String| GibsError::InvalidRange {
        value: s.to_string(),
        message,
    };

    let inner = s
        .trim_start_matches(['[', '(', ',', ' '])
        .trim_end_matches([']', ')', ',', ' ']);
    if inner.is_empty() {
        return Err(invalid("no bounds".to_string()));
    }

    let bounds = inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            match part.parse::<f64>() {
                Ok(v) if v.is_nan() => Err(invalid(format!("'{}' is not a number", part))),
                Ok(v) => Ok(v),
                Err(e) => Err(invalid(format!("'{}': {}", part, e))),
            }
        })
        .collect::<Result<Vec<f64>>>()?;

    let range = match bounds.as_slice() {
        [low] if *low <= 0.0 => [*low, 0.0],
        [low] => [*low, f64::INFINITY],
        [low, high] => [*low, *high],
        _ => {
            return Err(invalid(format!(
                "expected one or two bounds, found {}",
                bounds.len()
            )))
        }
    };

    if range[0] > range[1] {
        return Err(invalid("lower bound exceeds upper bound".to_string()));
    }
    Ok(range)
}

/// Parse a `"r,g,b"` color attribute
pub fn parse_rgb(s: &str) -> Result<[u8; 3]> {
    let components = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|e| GibsError::InvalidColor {
                    value: s.to_string(),
                    message: format!("'{}': {}", part.trim(), e),
                })
        })
        .collect::<Result<Vec<u8>>>()?;

    match components.as_slice() {
        [r, g, b] => Ok([*r, *g, *b]),
        _ => Err(GibsError::InvalidColor {
            value: s.to_string(),
            message: format!("expected 3 components, found {}", components.len()),
        }),
    }
}

//! Piecewise-linear colormaps built from per-channel segment data.
//!
//! Each channel is a list of `(x, y0, y1)` segments: at position `x` the
//! channel approaches `y0` from below and leaves with `y1` above. Between two
//! consecutive segments the channel is interpolated linearly.

use serde::{Deserialize, Serialize};

use super::colormap::{to_rgba8, Colormap};
use crate::error::{GibsError, Result};

/// One breakpoint of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in 0.0..=1.0
    pub x: f64,
    /// Channel value approaching `x` from below
    pub y0: f64,
    /// Channel value leaving `x` toward above
    pub y1: f64,
}

/// Segment lists for the red, green and blue channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentData {
    pub red: Vec<Segment>,
    pub green: Vec<Segment>,
    pub blue: Vec<Segment>,
}

impl SegmentData {
    /// Build continuous channel curves from `(position, rgb)` breakpoints
    pub fn from_breakpoints(breakpoints: &[(f64, [f64; 3])]) -> Self {
        let channel = |c: usize| -> Vec<Segment> {
            breakpoints
                .iter()
                .map(|(x, rgb)| Segment {
                    x: *x,
                    y0: rgb[c],
                    y1: rgb[c],
                })
                .collect()
        };
        Self {
            red: channel(0),
            green: channel(1),
            blue: channel(2),
        }
    }

    /// Number of breakpoints per channel
    pub fn len(&self) -> usize {
        self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    /// Breakpoint positions, shared by all three channels
    pub fn positions(&self) -> Vec<f64> {
        self.red.iter().map(|s| s.x).collect()
    }
}

/// Evaluate one channel at a position already clamped to 0.0..=1.0
fn eval_channel(segments: &[Segment], x: f64) -> f64 {
    // First segment whose position lies strictly above x
    let upper = segments.partition_point(|s| s.x <= x);
    if upper == 0 {
        return segments[0].y0;
    }
    if upper == segments.len() {
        return segments[upper - 1].y1;
    }

    let left = &segments[upper - 1];
    let right = &segments[upper];
    let span = right.x - left.x;
    if span <= 0.0 {
        return right.y0;
    }
    let t = (x - left.x) / span;
    left.y1 + (right.y0 - left.y1) * t
}

/// A named continuous colormap with optional out-of-range colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedColormap {
    /// Catalog name (document name without suffix)
    pub name: String,
    /// Title of the scheme it was built from
    pub title: Option<String>,
    /// Channel curves over 0.0..=1.0
    pub segments: SegmentData,
    /// Color for positions below 0.0
    pub under: Option<[f64; 3]>,
    /// Color for positions above 1.0
    pub over: Option<[f64; 3]>,
}

impl SegmentedColormap {
    /// Create a colormap, refusing curves that do not cover 0.0..=1.0
    pub fn new(
        name: impl Into<String>,
        title: Option<String>,
        segments: SegmentData,
        under: Option<[f64; 3]>,
        over: Option<[f64; 3]>,
    ) -> Result<Self> {
        let name = name.into();
        let positions = segments.positions();
        let (first, last) = match (positions.first(), positions.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                return Err(GibsError::Normalization {
                    message: format!("{} has no breakpoints", name),
                })
            }
        };
        if positions.windows(2).any(|w| w[0] > w[1]) {
            return Err(GibsError::Normalization {
                message: format!("{} has breakpoints out of order", name),
            });
        }
        if first != 0.0 || last != 1.0 {
            return Err(GibsError::Normalization {
                message: format!(
                    "{} spans [{}, {}] instead of [0, 1]",
                    name, first, last
                ),
            });
        }
        if segments.green.len() != positions.len() || segments.blue.len() != positions.len() {
            return Err(GibsError::Normalization {
                message: format!("{} has channels of different lengths", name),
            });
        }

        Ok(Self {
            name,
            title,
            segments,
            under,
            over,
        })
    }

    /// Color at a normalized position, channels in 0.0..=1.0.
    ///
    /// Positions below 0.0 and above 1.0 answer with the under and over
    /// colors when they are set, and clamp to the curve ends otherwise.
    /// NaN has no color.
    pub fn color_at(&self, position: f64) -> Option<[f64; 3]> {
        if position.is_nan() {
            return None;
        }
        if position < 0.0 {
            if let Some(under) = self.under {
                return Some(under);
            }
        }
        if position > 1.0 {
            if let Some(over) = self.over {
                return Some(over);
            }
        }

        let x = position.clamp(0.0, 1.0);
        Some([
            eval_channel(&self.segments.red, x),
            eval_channel(&self.segments.green, x),
            eval_channel(&self.segments.blue, x),
        ])
    }

    /// Sample `n` evenly spaced colors over 0.0..=1.0
    pub fn sample(&self, n: usize) -> Vec<[f64; 3]> {
        match n {
            0 => Vec::new(),
            1 => self.color_at(0.0).into_iter().collect(),
            _ => (0..n)
                .filter_map(|i| self.color_at(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// Export the curve as a linear RGB `colorgrad` gradient.
    ///
    /// Stops come from the segments, so a step (two breakpoints at one
    /// position, or `y0 != y1`) keeps the colors on both of its sides.
    pub fn to_gradient(&self) -> Result<colorgrad::Gradient> {
        let SegmentData { red, green, blue } = &self.segments;
        let mut positions = Vec::with_capacity(red.len());
        let mut colors = Vec::with_capacity(red.len());
        for ((r, g), b) in red.iter().zip(green).zip(blue) {
            positions.push(r.x);
            colors.push(colorgrad::Color::new(r.y0, g.y0, b.y0, 1.0));
            if (r.y1, g.y1, b.y1) != (r.y0, g.y0, b.y0) {
                positions.push(r.x);
                colors.push(colorgrad::Color::new(r.y1, g.y1, b.y1, 1.0));
            }
        }

        colorgrad::CustomGradient::new()
            .colors(&colors)
            .domain(&positions)
            .mode(colorgrad::BlendMode::Rgb)
            .interpolation(colorgrad::Interpolation::Linear)
            .build()
            .map_err(|e| GibsError::Gradient {
                message: format!("{}: {}", self.name, e),
            })
    }
}

impl Colormap for SegmentedColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        match self.color_at(value) {
            Some(color) => to_rgba8(color),
            // Transparent black for NaN
            None => [0, 0, 0, 0],
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f64; 3] = [1.0, 0.0, 0.0];
    const GREEN: [f64; 3] = [0.0, 1.0, 0.0];
    const BLUE: [f64; 3] = [0.0, 0.0, 1.0];

    fn three_stop() -> SegmentedColormap {
        let segments = SegmentData::from_breakpoints(&[(0.0, RED), (0.5, GREEN), (1.0, BLUE)]);
        SegmentedColormap::new("test", None, segments, None, None).unwrap()
    }

    #[test]
    fn test_from_breakpoints_duplicates_values() {
        let data = SegmentData::from_breakpoints(&[(0.0, RED), (1.0, BLUE)]);
        assert_eq!(data.len(), 2);
        assert_eq!(data.red[0], Segment { x: 0.0, y0: 1.0, y1: 1.0 });
        assert_eq!(data.blue[1], Segment { x: 1.0, y0: 1.0, y1: 1.0 });
        assert_eq!(data.positions(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_color_at_breakpoints_and_between() {
        let cmap = three_stop();
        assert_eq!(cmap.color_at(0.0), Some(RED));
        assert_eq!(cmap.color_at(0.5), Some(GREEN));
        assert_eq!(cmap.color_at(1.0), Some(BLUE));

        let quarter = cmap.color_at(0.25).unwrap();
        assert!((quarter[0] - 0.5).abs() < 1e-12);
        assert!((quarter[1] - 0.5).abs() < 1e-12);
        assert_eq!(quarter[2], 0.0);
    }

    #[test]
    fn test_out_of_range_clamps_without_under_over() {
        let cmap = three_stop();
        assert_eq!(cmap.color_at(-1.0), Some(RED));
        assert_eq!(cmap.color_at(2.0), Some(BLUE));
        assert_eq!(cmap.color_at(f64::NAN), None);
        assert_eq!(cmap.map_normalized(f64::NAN), [0, 0, 0, 0]);
    }

    #[test]
    fn test_out_of_range_uses_under_over() {
        let segments = SegmentData::from_breakpoints(&[(0.0, GREEN), (1.0, GREEN)]);
        let cmap =
            SegmentedColormap::new("uo", None, segments, Some(RED), Some(BLUE)).unwrap();
        assert_eq!(cmap.color_at(-0.01), Some(RED));
        assert_eq!(cmap.color_at(1.01), Some(BLUE));
        assert_eq!(cmap.map_normalized(0.3), [0, 255, 0, 255]);
        assert_eq!(cmap.map(-5.0, 0.0, 10.0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_repeated_position_takes_later_color() {
        let segments =
            SegmentData::from_breakpoints(&[(0.0, RED), (0.5, GREEN), (0.5, BLUE), (1.0, BLUE)]);
        let cmap = SegmentedColormap::new("step", None, segments, None, None).unwrap();
        assert_eq!(cmap.color_at(0.5), Some(BLUE));
        let before = cmap.color_at(0.49).unwrap();
        assert!(before[1] > 0.9);
    }

    #[test]
    fn test_new_rejects_bad_curves() {
        let empty = SegmentData::from_breakpoints(&[]);
        assert!(SegmentedColormap::new("e", None, empty, None, None).is_err());

        let short = SegmentData::from_breakpoints(&[(0.0, RED), (0.8, BLUE)]);
        assert!(SegmentedColormap::new("s", None, short, None, None).is_err());

        let unordered = SegmentData::from_breakpoints(&[(0.0, RED), (0.7, GREEN), (0.3, BLUE), (1.0, BLUE)]);
        assert!(SegmentedColormap::new("u", None, unordered, None, None).is_err());
    }

    #[test]
    fn test_sample() {
        let cmap = three_stop();
        let colors = cmap.sample(3);
        assert_eq!(colors, vec![RED, GREEN, BLUE]);
        assert!(cmap.sample(0).is_empty());
        assert_eq!(cmap.sample(1), vec![RED]);
    }

    #[test]
    fn test_to_gradient_matches_breakpoints() {
        let cmap = three_stop();
        let gradient = cmap.to_gradient().unwrap();
        for x in [0.0, 0.5, 1.0] {
            let expected = cmap.map_normalized(x);
            assert_eq!(gradient.at(x).to_rgba8(), expected);
        }
    }

    #[test]
    fn test_to_gradient_keeps_both_sides_of_a_step() {
        // Red to green below the step at 0.5, flat blue above it
        let segments = SegmentData::from_breakpoints(&[
            (0.0, RED),
            (0.5, GREEN),
            (0.5, BLUE),
            (1.0, BLUE),
        ]);
        let cmap = SegmentedColormap::new("step", None, segments, None, None).unwrap();
        let gradient = cmap.to_gradient().unwrap();

        assert_eq!(cmap.map_normalized(0.25), [128, 128, 0, 255]);
        for x in [0.0, 0.1, 0.25, 0.4, 0.6, 0.75, 1.0] {
            assert_eq!(gradient.at(x).to_rgba8(), cmap.map_normalized(x), "at {}", x);
        }
    }
}

//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps.

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value to an RGBA color.
    ///
    /// Values outside 0.0..=1.0 are left to the implementation, which may
    /// clamp them or answer with dedicated out-of-range colors.
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            (value - min) / (max - min)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Convert a color with channels in 0.0..=1.0 to opaque RGBA bytes
pub fn to_rgba8(color: [f64; 3]) -> [u8; 4] {
    let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [byte(color[0]), byte(color[1]), byte(color[2]), 255]
}

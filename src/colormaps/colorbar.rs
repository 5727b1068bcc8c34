//! Colorbar rendering.
//!
//! Draws a horizontal strip sweeping a colormap from 0.0 at the left edge to
//! 1.0 at the right edge. When the colormap has under or over colors, a
//! small block at each end shows them.

use image::{ImageBuffer, RgbaImage};
use std::io::Cursor;

use super::colormap::Colormap;
use crate::error::{GibsError, Result};

/// Default colorbar dimensions
pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 32;

/// Largest accepted dimension, in pixels
pub const MAX_DIMENSION: u32 = 8192;

/// Check requested colorbar dimensions
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    for (param, value) in [("width", width), ("height", height)] {
        if value == 0 || value > MAX_DIMENSION {
            return Err(GibsError::InvalidParameter {
                param: param.to_string(),
                message: format!("must be between 1 and {}, got {}", MAX_DIMENSION, value),
            });
        }
    }
    Ok(())
}

/// Render a colormap as a horizontal colorbar.
///
/// `extend` reserves a block of `height` pixels at each end for the out-of-
/// range colors, sampled just outside 0.0..=1.0.
pub fn render_colorbar(
    colormap: &dyn Colormap,
    width: u32,
    height: u32,
    extend: bool,
) -> Result<RgbaImage> {
    validate_dimensions(width, height)?;

    let block = if extend { height.min(width / 4) } else { 0 };
    let inner = width - 2 * block;

    let mut img = ImageBuffer::new(width, height);
    for x in 0..width {
        let position = if x < block {
            -1.0
        } else if x >= block + inner {
            2.0
        } else if inner > 1 {
            (x - block) as f64 / (inner - 1) as f64
        } else {
            0.0
        };

        let color = colormap.map_normalized(position);
        for y in 0..height {
            img.put_pixel(x, y, image::Rgba(color));
        }
    }

    Ok(img)
}

/// Encode an image as PNG bytes
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|e| GibsError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;
    Ok(bytes)
}

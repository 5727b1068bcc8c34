//! Colormap construction and rendering.
//!
//! This module turns parsed GIBS documents into continuous colormaps and
//! draws them as colorbars.

pub mod builder;
pub mod colorbar;
pub mod colormap;
pub mod range;
pub mod segmented;

pub use builder::{build_colormap, build_from_entries, try_build_colormap};
pub use colorbar::{encode_png, render_colorbar};
pub use colormap::Colormap;
pub use range::{parse_range, parse_rgb, RangeEntry};
pub use segmented::{Segment, SegmentData, SegmentedColormap};

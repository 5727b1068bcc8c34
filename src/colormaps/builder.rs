//! Construction of continuous colormaps from parsed GIBS documents.
//!
//! The entries of a continuous scheme describe value intervals in data
//! units. They are rescaled jointly into 0.0..=1.0, with infinite bounds kept
//! out of the arithmetic: an entry open below paints the under color, an
//! entry open above paints the over color.

use tracing::{debug, warn};

use super::range::RangeEntry;
use super::segmented::{SegmentData, SegmentedColormap};
use crate::document::{ColorMapDocument, ColorScheme};
use crate::error::{GibsError, Result};

/// A range bound after normalization; `None` marks an infinite bound
type Bound = Option<f64>;

/// Build the colormap for a document, or `None` when the document yields
/// no colormap.
///
/// Failures are logged with the document name and reported as absence, so a
/// bad document never affects the rest of a catalog.
pub fn build_colormap(name: &str, document: &ColorMapDocument) -> Option<SegmentedColormap> {
    match try_build_colormap(name, document) {
        Ok(colormap) => colormap,
        Err(e) => {
            warn!(colormap = name, error = %e, "Failed to build colormap");
            None
        }
    }
}

/// Build the colormap for a document.
///
/// `Ok(None)` means the document is excluded by design: it has no scheme
/// besides the no-data one, or its scheme is not continuous.
pub fn try_build_colormap(
    name: &str,
    document: &ColorMapDocument,
) -> Result<Option<SegmentedColormap>> {
    let scheme = match document.primary_scheme() {
        Some(scheme) => scheme,
        None => {
            debug!(colormap = name, "No scheme besides no-data, skipping");
            return Ok(None);
        }
    };
    if !scheme.is_continuous() {
        debug!(
            colormap = name,
            legend = scheme.legend_type.as_deref().unwrap_or("none"),
            "Legend is not continuous, skipping"
        );
        return Ok(None);
    }

    let entries = parse_entries(name, scheme)?;
    build_from_entries(name, scheme.title.clone(), entries).map(Some)
}

/// Parse every entry that carries both a color and a value range
fn parse_entries(name: &str, scheme: &ColorScheme) -> Result<Vec<RangeEntry>> {
    let mut entries = Vec::with_capacity(scheme.entries.len());
    for raw in &scheme.entries {
        match (&raw.value, &raw.rgb) {
            (Some(value), Some(rgb)) => entries.push(RangeEntry::parse(value, rgb)?),
            _ => debug!(colormap = name, entry = ?raw, "Entry without rgb or value, skipping"),
        }
    }
    Ok(entries)
}

/// Close the curve above: when the last interval is bounded, repeat its
/// color on `[last_high, +inf]`.
fn close_above(entries: &mut Vec<RangeEntry>) {
    if let Some(last) = entries.last().copied() {
        if last.high != f64::INFINITY {
            entries.push(RangeEntry {
                low: last.high,
                high: f64::INFINITY,
                rgb: last.rgb,
            });
        }
    }
}

/// Rescale all finite bounds jointly into 0.0..=1.0.
///
/// Infinite bounds stay out of the min and peak-to-peak computation and come
/// back as `None`.
fn normalize(entries: &[RangeEntry]) -> Result<Vec<[Bound; 2]>> {
    let finite = entries
        .iter()
        .flat_map(|e| [e.low, e.high])
        .filter(|v| v.is_finite());

    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return Err(GibsError::Normalization {
            message: "no finite bounds".to_string(),
        });
    }

    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Err(GibsError::Normalization {
            message: format!("degenerate value range [{}, {}]", min, max),
        });
    }

    let rescale = |v: f64| v.is_finite().then(|| (v - min) / range);
    Ok(entries
        .iter()
        .map(|e| [rescale(e.low), rescale(e.high)])
        .collect())
}

/// Run the construction on already parsed entries
pub fn build_from_entries(
    name: &str,
    title: Option<String>,
    mut entries: Vec<RangeEntry>,
) -> Result<SegmentedColormap> {
    if entries.is_empty() {
        return Err(GibsError::EmptyScheme {
            name: name.to_string(),
        });
    }

    close_above(&mut entries);
    let bounds = normalize(&entries)?;

    let mut breakpoints = Vec::with_capacity(entries.len());
    let mut under = None;
    let mut over = None;
    for (entry, [low, high]) in entries.iter().zip(bounds) {
        let rgb = entry.unit_rgb();
        match low {
            None => under = Some(rgb),
            Some(position) => breakpoints.push((position, rgb)),
        }
        if high.is_none() {
            over = Some(rgb);
        }
    }

    debug!(
        colormap = name,
        breakpoints = breakpoints.len(),
        has_under = under.is_some(),
        has_over = over.is_some(),
        "Normalized colormap"
    );

    let segments = SegmentData::from_breakpoints(&breakpoints);
    SegmentedColormap::new(name, title, segments, under, over)
}

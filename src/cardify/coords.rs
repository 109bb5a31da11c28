//! Conversion between stored geometry and render-surface pixels.
//!
//! Templates store geometry either as absolute pixels or, when marked
//! relative, as percentages of the surface size. Horizontal values (`x`,
//! `width`) scale against the surface width and vertical values (`y`,
//! `height`) against its height. Rotation is never scaled.
//!
//! The two scalar functions are not exact inverses at `dimension == 0`:
//! [`pixel_to_percent`] returns `0` there, while [`percent_to_pixel`] with
//! `is_relative == false` passes the value through regardless of dimension.

use crate::model::{Document, Geometry, Metadata};

/// Converts a stored value to pixels. Non-relative values are already pixels.
///
/// No clamping: callers must ensure `dimension > 0` for relative values.
pub fn percent_to_pixel(value: f64, dimension: f64, is_relative: bool) -> f64 {
    if is_relative {
        (value / 100.0) * dimension
    } else {
        value
    }
}

pub fn pixel_to_percent(pixel: f64, dimension: f64) -> f64 {
    if dimension == 0.0 {
        return 0.0;
    }
    (pixel / dimension) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub relative: bool,
}

impl Surface {
    pub fn new(width: f64, height: f64, relative: bool) -> Self {
        Self {
            width,
            height,
            relative,
        }
    }

    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self::new(metadata.width, metadata.height, metadata.relative)
    }

    /// Stored geometry to pixel geometry.
    pub fn resolve(&self, geometry: &Geometry) -> Geometry {
        Geometry {
            x: percent_to_pixel(geometry.x, self.width, self.relative),
            y: percent_to_pixel(geometry.y, self.height, self.relative),
            width: percent_to_pixel(geometry.width, self.width, self.relative),
            height: percent_to_pixel(geometry.height, self.height, self.relative),
            rotation: geometry.rotation,
        }
    }

    /// Pixel geometry to percent-of-surface geometry.
    pub fn to_relative(&self, geometry: &Geometry) -> Geometry {
        Geometry {
            x: pixel_to_percent(geometry.x, self.width),
            y: pixel_to_percent(geometry.y, self.height),
            width: pixel_to_percent(geometry.width, self.width),
            height: pixel_to_percent(geometry.height, self.height),
            rotation: geometry.rotation,
        }
    }
}

/// A node resolved to pixels, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub index: usize,
    pub kind: &'static str,
    pub label: String,
    pub bounds: Geometry,
}

pub fn layout(document: &Document, surface: Surface) -> Vec<PlacedNode> {
    document
        .iter()
        .enumerate()
        .map(|(index, node)| PlacedNode {
            index,
            kind: node.kind(),
            label: node.label(),
            bounds: surface.resolve(node.geometry()),
        })
        .collect()
}

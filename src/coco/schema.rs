//! Serde types for the COCO annotation file.
//!
//! Only the fields the join needs are modeled. Everything else in the file
//! (`info`, `licenses`, `iscrowd`, `segmentation`, ...) is accepted and
//! ignored.

use serde::Deserialize;

use super::ids::{AnnotationId, CategoryId, ImageId};

/// Top-level COCO document.
#[derive(Debug, Deserialize)]
pub(crate) struct CocoFile {
    pub categories: Vec<CocoCategory>,
    pub images: Vec<ImageDescriptor>,
    pub annotations: Vec<AnnotationRecord>,
}

/// COCO category entry.
#[derive(Debug, Deserialize)]
pub(crate) struct CocoCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Metadata for one image, keyed by `file_name` during the join.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ImageDescriptor {
    pub id: ImageId,
    pub file_name: String,
    pub width: i32,
    pub height: i32,
}

/// One raw entry of the `annotations` array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,

    /// Object area in square pixels. Any JSON number is accepted.
    pub area: f64,

    /// `[x, y, width, height]` with `(x, y)` the top-left corner.
    pub bbox: [f64; 4],
}

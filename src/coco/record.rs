//! Output records produced by the join.

use std::path::PathBuf;

use serde::Serialize;

use super::ids::{AnnotationId, ImageId};
use crate::taxonomy::IconCategory;

/// Raw image content together with the path it was read from.
///
/// The bytes are passed through untouched; nothing is decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// A labeled bounding box on one image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectAnnotation {
    pub id: AnnotationId,
    pub area: i64,
    /// `[x, y, width, height]` in pixels.
    pub bbox: [f32; 4],
    pub category: IconCategory,
}

/// One image of the dataset with all of its objects.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRecord {
    pub image_id: ImageId,
    pub image: ImageData,
    pub width: i32,
    pub height: i32,
    pub objects: Vec<ObjectAnnotation>,
}

/// A record paired with its zero-based position in the generated sequence.
pub type IndexedRecord = (usize, ImageRecord);

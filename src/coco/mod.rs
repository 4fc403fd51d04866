//! COCO annotation join engine.
//!
//! Turns one COCO annotation file plus a list of candidate image files into a
//! lazy sequence of [`ImageRecord`]s. The work happens in two stages:
//!
//! 1. [`AnnotationIndex::load`] reads the annotation file once and builds the
//!    category, per-image annotation and file-name lookup tables.
//! 2. [`join`] walks the candidate files in order and emits a record for every
//!    file whose base name appears in the index.
//!
//! [`generate`] composes the two for a list of files that contains the
//! annotation file itself.
//!
//! # Example
//!
//! ```
//! use dbd_icons::coco::{join, AnnotationIndex};
//!
//! let index = AnnotationIndex::from_json_str(r#"{
//!     "categories": [{"id": 1, "name": "bleeding"}],
//!     "images": [{"id": 10, "file_name": "a.png", "width": 64, "height": 64}],
//!     "annotations": []
//! }"#).unwrap();
//!
//! // Nothing on disk is named like an indexed image, so nothing is read.
//! assert_eq!(join(index, ["notes.txt"]).count(), 0);
//! ```

mod ids;
mod index;
mod join;
mod record;
mod schema;

pub use ids::{AnnotationId, CategoryId, ImageId};
pub use index::AnnotationIndex;
pub use join::{generate, join, Join};
pub use record::{ImageData, ImageRecord, IndexedRecord, ObjectAnnotation};
pub use schema::{AnnotationRecord, ImageDescriptor};

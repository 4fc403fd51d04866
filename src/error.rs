use std::path::PathBuf;
use thiserror::Error;

use crate::coco::{AnnotationId, CategoryId};

/// The main error type for dbd-icons operations.
#[derive(Debug, Error)]
pub enum DbdIconsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse COCO annotations from {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Annotation {annotation_id} references unknown category id {category_id}")]
    UnknownCategoryId {
        annotation_id: AnnotationId,
        category_id: CategoryId,
    },

    #[error("Category {category_id} has name '{name}', which is not an icon category")]
    UnknownCategoryName { category_id: CategoryId, name: String },

    #[error("Annotation file '{annotation_file}' not found under {root}")]
    AnnotationFileNotFound {
        root: PathBuf,
        annotation_file: String,
    },

    #[error("Failed to scan {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("Failed to export to {path}: {message}")]
    ExportWrite { path: PathBuf, message: String },

    #[error("Unsupported split: {0}")]
    UnsupportedSplit(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}

impl DbdIconsError {
    /// Returns true for the lookup failures raised while joining records.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            DbdIconsError::UnknownCategoryId { .. } | DbdIconsError::UnknownCategoryName { .. }
        )
    }
}

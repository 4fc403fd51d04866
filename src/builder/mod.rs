//! Dataset registration: info, schema, splits and file discovery.
//!
//! [`DatasetBuilder`] ties a data root to the split table and hands each
//! split's annotation file name and candidate files to the join engine.

mod discover;
mod features;

pub use discover::discover_files;
pub use features::{Feature, FeatureType, Features};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::coco::{generate, Join};
use crate::error::DbdIconsError;

/// Directory the dataset is read from when no root is given.
pub const DEFAULT_ROOT: &str = "coco/images";

pub const DESCRIPTION: &str = "DBD Icons Dataset";

pub const CITATION: &str = r#"@inproceedings{DBDIcons,
    title={DBD Icons: A Large-Scale Dataset for Icon Detection and Recognition},
    author={Alessandro Bellia},
    year={2022}
}"#;

pub const VERSION: &str = "1.0.0";

/// Static metadata about the dataset.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetInfo {
    pub description: &'static str,
    pub citation: &'static str,
    pub version: &'static str,
    pub features: Features,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            description: DESCRIPTION,
            citation: CITATION,
            version: VERSION,
            features: Features::icons(),
        }
    }
}

/// A named partition of the dataset, backed by its own annotation file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }

    /// Name of the annotation file for this split.
    pub fn annotation_file(self) -> &'static str {
        match self {
            Split::Train => "train.json",
            Split::Test => "val.json",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DbdIconsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "test" | "val" | "validation" => Ok(Split::Test),
            other => Err(DbdIconsError::UnsupportedSplit(format!(
                "'{other}' (supported: train, test)"
            ))),
        }
    }
}

/// Everything one split's generation pass needs.
#[derive(Clone, Debug)]
pub struct SplitGenerator {
    pub split: Split,
    pub annotation_file_path: &'static str,
    pub files: Vec<PathBuf>,
}

impl SplitGenerator {
    /// Starts the generation pass for this split.
    pub fn generate(&self) -> Result<Join<std::vec::IntoIter<PathBuf>>, DbdIconsError> {
        tracing::info!(split = %self.split, annotation_file = self.annotation_file_path, "generating split");
        generate(self.annotation_file_path, &self.files)
    }
}

/// Entry point for producing the dataset from a data root.
#[derive(Clone, Debug)]
pub struct DatasetBuilder {
    root: PathBuf,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl DatasetBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo::default()
    }

    /// One generator per split, sharing a single directory listing.
    pub fn split_generators(&self) -> Result<Vec<SplitGenerator>, DbdIconsError> {
        let files = discover_files(&self.root)?;
        Ok(Split::ALL
            .into_iter()
            .map(|split| SplitGenerator {
                split,
                annotation_file_path: split.annotation_file(),
                files: files.clone(),
            })
            .collect())
    }

    pub fn split_generator(&self, split: Split) -> Result<SplitGenerator, DbdIconsError> {
        Ok(SplitGenerator {
            split,
            annotation_file_path: split.annotation_file(),
            files: discover_files(&self.root)?,
        })
    }

    /// Discovers the files under the root and starts a pass for `split`.
    pub fn generate(&self, split: Split) -> Result<Join<std::vec::IntoIter<PathBuf>>, DbdIconsError> {
        self.split_generator(split)?.generate()
    }

    /// Like [`generate`](Self::generate), but fails when the split's
    /// annotation file is not under the root instead of yielding nothing.
    pub fn generate_strict(
        &self,
        split: Split,
    ) -> Result<Join<std::vec::IntoIter<PathBuf>>, DbdIconsError> {
        let generator = self.split_generator(split)?;
        let found = generator
            .files
            .iter()
            .any(|path| path.to_string_lossy().contains(generator.annotation_file_path));
        if !found {
            return Err(DbdIconsError::AnnotationFileNotFound {
                root: self.root.clone(),
                annotation_file: generator.annotation_file_path.to_string(),
            });
        }
        generator.generate()
    }
}

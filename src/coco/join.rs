//! The join of an [`AnnotationIndex`] against a list of candidate files.

use std::fs;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use super::index::AnnotationIndex;
use super::record::{ImageData, ImageRecord, IndexedRecord};
use crate::error::DbdIconsError;

/// Joins `files` against `index`, lazily.
///
/// Each step reads at most one file. Files whose base name is not in the
/// index's `images` table are skipped without error.
pub fn join<I>(index: AnnotationIndex, files: I) -> Join<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    Join {
        index,
        files: files.into_iter(),
        annotation_pattern: None,
        next_index: 0,
        skipped: 0,
        done: false,
    }
}

/// Runs one generation pass for the annotation file named by
/// `annotation_file_path` over `files`.
///
/// The first path containing `annotation_file_path` is loaded as the index,
/// then every other path is joined against it in order, so the position of
/// the annotation file in `files` does not matter. When no path matches, the
/// returned sequence is empty.
///
/// # Errors
/// Fails up front if the annotation file cannot be read or parsed. Lookup
/// and image read failures surface as `Err` items of the sequence.
///
/// # Example
/// ```no_run
/// use dbd_icons::coco::generate;
///
/// let files = ["coco/images/train.json", "coco/images/a.png"];
/// for item in generate("train.json", files)? {
///     let (idx, record) = item?;
///     println!("{idx}: image {} has {} objects", record.image_id, record.objects.len());
/// }
/// # Ok::<(), dbd_icons::DbdIconsError>(())
/// ```
pub fn generate<I>(
    annotation_file_path: &str,
    files: I,
) -> Result<Join<std::vec::IntoIter<PathBuf>>, DbdIconsError>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    let files: Vec<PathBuf> = files
        .into_iter()
        .map(|path| path.as_ref().to_path_buf())
        .collect();

    let Some(annotation_path) = files
        .iter()
        .find(|path| matches_annotation(path, annotation_file_path))
    else {
        tracing::warn!(
            annotation_file = annotation_file_path,
            candidates = files.len(),
            "annotation file not found among candidate files; nothing to generate"
        );
        return Ok(join(AnnotationIndex::default(), Vec::new()));
    };

    let index = AnnotationIndex::load(annotation_path)?;
    let mut pass = join(index, files);
    pass.annotation_pattern = Some(annotation_file_path.to_string());
    Ok(pass)
}

fn matches_annotation(path: &Path, pattern: &str) -> bool {
    path.to_string_lossy().contains(pattern)
}

/// Lazy sequence of `(index, ImageRecord)` produced by [`join`] and
/// [`generate`].
///
/// The sequence stops after the first error.
#[derive(Debug)]
pub struct Join<I> {
    index: AnnotationIndex,
    files: I,
    annotation_pattern: Option<String>,
    next_index: usize,
    skipped: usize,
    done: bool,
}

impl<I> Join<I> {
    /// The index this pass joins against.
    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    /// Number of records emitted so far.
    pub fn emitted(&self) -> usize {
        self.next_index
    }
}

/// Builds the record for `path`, or `None` when its name is not indexed.
fn read_record(
    index: &AnnotationIndex,
    path: &Path,
    file_name: &str,
) -> Option<Result<ImageRecord, DbdIconsError>> {
    let descriptor = index.image(file_name)?;
    Some(index.resolve_objects(descriptor).and_then(|objects| {
        let bytes = fs::read(path).map_err(|source| DbdIconsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ImageRecord {
            image_id: descriptor.id,
            image: ImageData {
                path: path.to_path_buf(),
                bytes,
            },
            width: descriptor.width,
            height: descriptor.height,
            objects,
        })
    }))
}

impl<I> Iterator for Join<I>
where
    I: Iterator,
    I::Item: AsRef<Path>,
{
    type Item = Result<IndexedRecord, DbdIconsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for candidate in self.files.by_ref() {
            let path = candidate.as_ref();

            if let Some(pattern) = &self.annotation_pattern {
                if matches_annotation(path, pattern) {
                    continue;
                }
            }

            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                self.skipped += 1;
                continue;
            };

            match read_record(&self.index, path, file_name) {
                None => {
                    tracing::debug!(path = %path.display(), "skipping file not listed in annotations");
                    self.skipped += 1;
                }
                Some(Ok(record)) => {
                    let idx = self.next_index;
                    self.next_index += 1;
                    return Some(Ok((idx, record)));
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }

        self.done = true;
        tracing::debug!(
            records = self.next_index,
            skipped = self.skipped,
            "generation pass finished"
        );
        None
    }
}

impl<I> FusedIterator for Join<I>
where
    I: Iterator,
    I::Item: AsRef<Path>,
{
}

//! Materializes a generated split as a Hugging Face ImageFolder directory.
//!
//! Layout written for split `train` under `out`:
//!
//! ```text
//! out/train/metadata.jsonl
//! out/train/<file_name>   (one copy of each emitted image)
//! ```
//!
//! `metadata.jsonl` has one row per record, in generation order. The
//! `objects` column is stored column-wise (`{"id": [...], "bbox": [...]}`),
//! and `category` holds class labels rather than names.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::builder::{DatasetBuilder, Split};
use crate::coco::{ImageRecord, Join};
use crate::error::DbdIconsError;

const METADATA_FILE: &str = "metadata.jsonl";

/// What an export wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub split: Split,
    pub output_dir: PathBuf,
    pub images: usize,
    pub objects: usize,
}

/// Generates `split` from `builder` and writes it under `out`.
///
/// The split is written to a staging directory inside `out` and only moved
/// into `out/<split>/` once every record has been written, so a failed
/// export leaves no partial ImageFolder behind.
///
/// Fails if the split's annotation file is not under the builder's root.
pub fn export_split(
    builder: &DatasetBuilder,
    split: Split,
    out: &Path,
) -> Result<ExportSummary, DbdIconsError> {
    let pass = builder.generate_strict(split)?;

    fs::create_dir_all(out).map_err(|source| DbdIconsError::FileWrite {
        path: out.to_path_buf(),
        source,
    })?;
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{}-", split.as_str()))
        .tempdir_in(out)
        .map_err(|source| DbdIconsError::FileWrite {
            path: out.to_path_buf(),
            source,
        })?;

    let split_dir = out.join(split.as_str());
    let mut summary = ExportSummary {
        split,
        output_dir: split_dir.clone(),
        images: 0,
        objects: 0,
    };

    // Dropping `staging` on any early return removes what was written.
    let file_names = write_staged(pass, staging.path(), &mut summary)?;
    publish(staging.path(), &split_dir, &file_names)?;

    tracing::info!(
        split = %split,
        images = summary.images,
        objects = summary.objects,
        out = %split_dir.display(),
        "export finished"
    );
    Ok(summary)
}

/// Writes every record of `pass` into `dir` and returns the image file names.
fn write_staged(
    pass: Join<std::vec::IntoIter<PathBuf>>,
    dir: &Path,
    summary: &mut ExportSummary,
) -> Result<Vec<String>, DbdIconsError> {
    let metadata_path = dir.join(METADATA_FILE);
    let file = fs::File::create(&metadata_path).map_err(|source| DbdIconsError::FileWrite {
        path: metadata_path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let write_err = |source: std::io::Error| DbdIconsError::FileWrite {
        path: metadata_path.clone(),
        source,
    };

    let mut written_names = HashSet::new();
    let mut file_names = Vec::new();

    for item in pass {
        let (_, record) = item?;
        let file_name = record_file_name(&record)?;

        if !written_names.insert(file_name.clone()) {
            return Err(DbdIconsError::ExportWrite {
                path: summary.output_dir.clone(),
                message: format!(
                    "two source files are named '{file_name}' (second at {})",
                    record.image.path.display()
                ),
            });
        }

        let image_path = dir.join(&file_name);
        fs::write(&image_path, &record.image.bytes).map_err(|source| {
            DbdIconsError::FileWrite {
                path: image_path.clone(),
                source,
            }
        })?;

        serde_json::to_writer(&mut writer, &metadata_row(&file_name, &record)).map_err(|source| {
            DbdIconsError::ExportWrite {
                path: metadata_path.clone(),
                message: source.to_string(),
            }
        })?;
        writeln!(&mut writer).map_err(write_err)?;

        summary.images += 1;
        summary.objects += record.objects.len();
        file_names.push(file_name);
    }

    writer.flush().map_err(write_err)?;
    Ok(file_names)
}

/// Moves the staged images, then `metadata.jsonl`, into `split_dir`.
fn publish(staging: &Path, split_dir: &Path, file_names: &[String]) -> Result<(), DbdIconsError> {
    fs::create_dir_all(split_dir).map_err(|source| DbdIconsError::FileWrite {
        path: split_dir.to_path_buf(),
        source,
    })?;

    let names = file_names.iter().map(String::as_str).chain([METADATA_FILE]);
    for name in names {
        let target = split_dir.join(name);
        fs::rename(staging.join(name), &target)
            .map_err(|source| DbdIconsError::FileWrite { path: target, source })?;
    }
    Ok(())
}

fn record_file_name(record: &ImageRecord) -> Result<String, DbdIconsError> {
    record
        .image
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| DbdIconsError::ExportWrite {
            path: record.image.path.clone(),
            message: "image path has no UTF-8 file name".to_string(),
        })
}

fn metadata_row(file_name: &str, record: &ImageRecord) -> Value {
    let mut ids = Vec::with_capacity(record.objects.len());
    let mut areas = Vec::with_capacity(record.objects.len());
    let mut bboxes = Vec::with_capacity(record.objects.len());
    let mut categories = Vec::with_capacity(record.objects.len());

    for obj in &record.objects {
        ids.push(Value::from(obj.id.as_i64()));
        areas.push(Value::from(obj.area));
        bboxes.push(Value::Array(obj.bbox.iter().map(|v| Value::from(*v)).collect()));
        categories.push(Value::from(obj.category.label()));
    }

    let mut objects = Map::new();
    objects.insert("id".to_string(), Value::Array(ids));
    objects.insert("area".to_string(), Value::Array(areas));
    objects.insert("bbox".to_string(), Value::Array(bboxes));
    objects.insert("category".to_string(), Value::Array(categories));

    let mut row = Map::new();
    row.insert("file_name".to_string(), Value::String(file_name.to_string()));
    row.insert("image_id".to_string(), Value::from(record.image_id.as_i64()));
    row.insert("width".to_string(), Value::from(record.width));
    row.insert("height".to_string(), Value::from(record.height));
    row.insert("objects".to_string(), Value::Object(objects));
    Value::Object(row)
}

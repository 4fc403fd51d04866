#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub const FIXTURE_ROOT: &str = "tests/fixtures/icons";

/// A small uncompressed BMP, used as realistic image content.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&[0; 24]);

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Builds a COCO annotation document.
///
/// `images` are `(id, file_name, width, height)`, `annotations` are
/// `(id, image_id, category_id)` with a fixed 2x2 box.
pub fn coco_doc(
    categories: &[(i64, &str)],
    images: &[(i64, &str, i32, i32)],
    annotations: &[(i64, i64, i64)],
) -> Value {
    json!({
        "categories": categories
            .iter()
            .map(|(id, name)| json!({"id": id, "name": name}))
            .collect::<Vec<_>>(),
        "images": images
            .iter()
            .map(|(id, file_name, width, height)| {
                json!({"id": id, "file_name": file_name, "width": width, "height": height})
            })
            .collect::<Vec<_>>(),
        "annotations": annotations
            .iter()
            .map(|(id, image_id, category_id)| {
                json!({
                    "id": id,
                    "image_id": image_id,
                    "area": 4.0,
                    "bbox": [1.0, 1.0, 2.0, 2.0],
                    "category_id": category_id
                })
            })
            .collect::<Vec<_>>(),
    })
}

/// Writes `doc` to `root/name` and returns the path.
pub fn write_annotations(root: &Path, name: &str, doc: &Value) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, serde_json::to_vec_pretty(doc).expect("serialize doc"))
        .expect("write annotation file");
    path
}

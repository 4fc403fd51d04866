use std::fs;
use std::path::Path;

use dbd_icons::builder::{DatasetBuilder, Split};
use dbd_icons::coco::{generate, IndexedRecord};
use dbd_icons::DbdIconsError;

mod common;

fn collect(files: &[std::path::PathBuf], annotation_file: &str) -> Vec<IndexedRecord> {
    generate(annotation_file, files)
        .expect("load annotations")
        .collect::<Result<_, _>>()
        .expect("join failed")
}

#[test]
fn single_image_with_one_object() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut doc = common::coco_doc(&[(1, "bleeding")], &[(10, "a.png", 64, 64)], &[]);
    doc["annotations"] = serde_json::json!([
        {"id": 100, "image_id": 10, "area": 50.0, "bbox": [1, 2, 3, 4], "category_id": 1}
    ]);
    let ann = common::write_annotations(temp.path(), "train.json", &doc);
    let image = temp.path().join("a.png");
    common::write_bmp(&image, 64, 64);

    let records = collect(&[ann, image.clone()], "train.json");

    assert_eq!(records.len(), 1);
    let (idx, record) = &records[0];
    assert_eq!(*idx, 0);
    assert_eq!(record.image_id.as_i64(), 10);
    assert_eq!((record.width, record.height), (64, 64));
    assert_eq!(record.image.path, image);
    assert_eq!(record.image.bytes, common::bmp_bytes(64, 64));

    assert_eq!(record.objects.len(), 1);
    let obj = &record.objects[0];
    assert_eq!(obj.id.as_i64(), 100);
    assert_eq!(obj.area, 50);
    assert_eq!(obj.bbox, [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(obj.category.name(), "bleeding");
}

#[test]
fn image_without_annotations_has_no_objects() {
    let temp = tempfile::tempdir().expect("tempdir");
    let doc = common::coco_doc(&[(1, "bleeding")], &[(10, "a.png", 8, 8)], &[]);
    let ann = common::write_annotations(temp.path(), "train.json", &doc);
    let image = temp.path().join("a.png");
    common::write_bmp(&image, 8, 8);

    let records = collect(&[ann, image], "train.json");
    assert_eq!(records.len(), 1);
    assert!(records[0].1.objects.is_empty());
}

#[test]
fn image_missing_from_metadata_is_skipped() {
    let temp = tempfile::tempdir().expect("tempdir");
    let doc = common::coco_doc(&[(1, "bleeding")], &[(10, "a.png", 8, 8)], &[(1, 10, 1)]);
    let ann = common::write_annotations(temp.path(), "train.json", &doc);
    let stray = temp.path().join("stray.png");
    common::write_bmp(&stray, 8, 8);

    let records = collect(&[ann, stray], "train.json");
    assert!(records.is_empty());
}

#[test]
fn unknown_category_id_fails_with_lookup_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let doc = common::coco_doc(&[(1, "bleeding")], &[(10, "a.png", 8, 8)], &[(1, 10, 42)]);
    let ann = common::write_annotations(temp.path(), "train.json", &doc);
    let image = temp.path().join("a.png");
    common::write_bmp(&image, 8, 8);

    let mut pass = generate("train.json", [ann, image]).expect("load annotations");
    let err = pass.next().expect("one item").unwrap_err();
    assert!(err.is_lookup());
    assert!(err.to_string().contains("unknown category id 42"));
    assert!(pass.next().is_none());
}

#[test]
fn malformed_annotation_file_fails_to_parse() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ann = temp.path().join("train.json");
    fs::write(&ann, r#"{"categories": [], "images": [], "annotations": [{"id": 1}]}"#)
        .expect("write");

    let err = generate("train.json", [&ann]).unwrap_err();
    assert!(matches!(err, DbdIconsError::AnnotationParse { .. }));
}

#[test]
fn images_before_annotation_file_are_still_joined() {
    let temp = tempfile::tempdir().expect("tempdir");
    let doc = common::coco_doc(
        &[(1, "bleeding"), (2, "cursed")],
        &[(1, "a.png", 8, 8), (2, "b.png", 8, 8)],
        &[(1, 1, 1), (2, 2, 2), (3, 2, 1)],
    );
    let ann = common::write_annotations(temp.path(), "zz_train.json", &doc);
    let a = temp.path().join("a.png");
    let b = temp.path().join("b.png");
    common::write_bmp(&a, 8, 8);
    common::write_bmp(&b, 8, 8);

    let records = collect(&[a, b, ann], "train.json");
    let counts: Vec<usize> = records.iter().map(|(_, r)| r.objects.len()).collect();
    assert_eq!(counts, vec![1, 2]);
}

#[test]
fn records_follow_file_order_not_image_id() {
    let temp = tempfile::tempdir().expect("tempdir");
    let doc = common::coco_doc(
        &[(1, "bleeding")],
        &[(5, "a.png", 8, 8), (1, "b.png", 8, 8), (3, "c.png", 8, 8)],
        &[],
    );
    let ann = common::write_annotations(temp.path(), "train.json", &doc);
    let names = ["c.png", "a.png", "b.png"];
    let mut files = vec![ann];
    for name in names {
        let path = temp.path().join(name);
        common::write_bmp(&path, 8, 8);
        files.push(path);
    }

    let records = collect(&files, "train.json");
    let ids: Vec<i64> = records.iter().map(|(_, r)| r.image_id.as_i64()).collect();
    let indices: Vec<usize> = records.iter().map(|(i, _)| *i).collect();
    assert_eq!(ids, vec![3, 5, 1]);
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn fixture_dataset_splits() {
    let builder = DatasetBuilder::new(Path::new(common::FIXTURE_ROOT));

    let train: Vec<IndexedRecord> = builder
        .generate(Split::Train)
        .expect("start train pass")
        .collect::<Result<_, _>>()
        .expect("train join");
    let ids: Vec<i64> = train.iter().map(|(_, r)| r.image_id.as_i64()).collect();
    assert_eq!(ids, vec![10, 11, 12]);

    let first: Vec<&str> = train[0].1.objects.iter().map(|o| o.category.name()).collect();
    assert_eq!(first, vec!["bleeding", "exhaustion"]);
    assert_eq!(train[1].1.objects[0].bbox, [10.5, 4.0, 16.0, 16.0]);
    assert!(train[2].1.objects.is_empty());

    let test: Vec<IndexedRecord> = builder
        .generate(Split::Test)
        .expect("start test pass")
        .collect::<Result<_, _>>()
        .expect("test join");
    assert_eq!(test.len(), 1);
    assert_eq!(test[0].1.image.bytes, b"fake-png-004");
    assert_eq!(test[0].1.objects[0].category.name(), "vision");
}

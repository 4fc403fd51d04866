//! Fuzz target for COCO annotation indexing.
//!
//! Feeds arbitrary bytes to the annotation parser and, when they parse,
//! resolves the objects of every image to exercise the category lookups.
//!
//! Run with:
//!   cargo +nightly fuzz run annotation_index_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use dbd_icons::coco::AnnotationIndex;

fuzz_target!(|data: &[u8]| {
    // 10MB is generous for an annotation file.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(index) = AnnotationIndex::from_json_slice(data) else {
        return;
    };
    for image in index.images() {
        let _ = index.resolve_objects(image);
    }
});

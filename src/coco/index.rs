//! In-memory lookup tables built from one COCO annotation file.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::ids::{CategoryId, ImageId};
use super::record::ObjectAnnotation;
use super::schema::{AnnotationRecord, CocoFile, ImageDescriptor};
use crate::error::DbdIconsError;
use crate::taxonomy::IconCategory;

/// The three lookup tables the join runs against.
///
/// Built once from a single read of the annotation file and never mutated
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct AnnotationIndex {
    categories: HashMap<CategoryId, String>,
    /// Annotations grouped by image, file order preserved within a group.
    annotations_by_image: HashMap<ImageId, Vec<AnnotationRecord>>,
    /// Keyed by `file_name`, which is what image paths are matched on.
    images_by_file_name: HashMap<String, ImageDescriptor>,
    annotation_count: usize,
}

impl AnnotationIndex {
    /// Reads and indexes a COCO annotation file.
    ///
    /// # Errors
    /// Returns [`DbdIconsError::FileRead`] if the file cannot be opened and
    /// [`DbdIconsError::AnnotationParse`] if it is not valid COCO JSON.
    ///
    /// # Example
    /// ```no_run
    /// use std::path::Path;
    /// use dbd_icons::coco::AnnotationIndex;
    ///
    /// let index = AnnotationIndex::load(Path::new("coco/images/train.json"))?;
    /// println!("{} images", index.image_count());
    /// # Ok::<(), dbd_icons::DbdIconsError>(())
    /// ```
    pub fn load(path: &Path) -> Result<Self, DbdIconsError> {
        let file = File::open(path).map_err(|source| DbdIconsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        let coco: CocoFile =
            serde_json::from_reader(reader).map_err(|source| DbdIconsError::AnnotationParse {
                path: path.to_path_buf(),
                source,
            })?;

        let index = Self::from_coco(coco);
        tracing::info!(
            path = %path.display(),
            images = index.image_count(),
            annotations = index.annotation_count(),
            categories = index.category_count(),
            "loaded annotation index"
        );
        Ok(index)
    }

    /// Indexes a COCO annotation document held in a string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let coco: CocoFile = serde_json::from_str(json)?;
        Ok(Self::from_coco(coco))
    }

    /// Indexes a COCO annotation document held in a byte slice.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let coco: CocoFile = serde_json::from_slice(bytes)?;
        Ok(Self::from_coco(coco))
    }

    fn from_coco(coco: CocoFile) -> Self {
        let categories = coco
            .categories
            .into_iter()
            .map(|cat| (cat.id, cat.name))
            .collect();

        let annotation_count = coco.annotations.len();
        let mut annotations_by_image: HashMap<ImageId, Vec<AnnotationRecord>> = HashMap::new();
        for ann in coco.annotations {
            annotations_by_image.entry(ann.image_id).or_default().push(ann);
        }

        // Later entries with the same file name replace earlier ones.
        let images_by_file_name = coco
            .images
            .into_iter()
            .map(|img| (img.file_name.clone(), img))
            .collect();

        Self {
            categories,
            annotations_by_image,
            images_by_file_name,
            annotation_count,
        }
    }

    /// Looks up the image descriptor for a base file name.
    pub fn image(&self, file_name: &str) -> Option<&ImageDescriptor> {
        self.images_by_file_name.get(file_name)
    }

    /// Every indexed image descriptor, in no particular order.
    pub fn images(&self) -> impl Iterator<Item = &ImageDescriptor> {
        self.images_by_file_name.values()
    }

    /// Annotations of one image in file order; empty when it has none.
    pub fn annotations_for(&self, image_id: ImageId) -> &[AnnotationRecord] {
        self.annotations_by_image
            .get(&image_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn category_name(&self, category_id: CategoryId) -> Option<&str> {
        self.categories.get(&category_id).map(String::as_str)
    }

    /// Resolves an annotation's `category_id` to an icon category.
    ///
    /// # Errors
    /// [`DbdIconsError::UnknownCategoryId`] when the id is not in the
    /// `categories` table, [`DbdIconsError::UnknownCategoryName`] when its
    /// name is not one of the icon names.
    pub fn resolve_category(&self, ann: &AnnotationRecord) -> Result<IconCategory, DbdIconsError> {
        let name = self
            .category_name(ann.category_id)
            .ok_or(DbdIconsError::UnknownCategoryId {
                annotation_id: ann.id,
                category_id: ann.category_id,
            })?;

        IconCategory::from_name(name).ok_or_else(|| DbdIconsError::UnknownCategoryName {
            category_id: ann.category_id,
            name: name.to_string(),
        })
    }

    /// Builds the output objects of one image.
    pub fn resolve_objects(
        &self,
        image: &ImageDescriptor,
    ) -> Result<Vec<ObjectAnnotation>, DbdIconsError> {
        self.annotations_for(image.id)
            .iter()
            .map(|ann| {
                let [x, y, w, h] = ann.bbox;
                Ok(ObjectAnnotation {
                    id: ann.id,
                    area: ann.area.round() as i64,
                    bbox: [x as f32, y as f32, w as f32, h as f32],
                    category: self.resolve_category(ann)?,
                })
            })
            .collect()
    }

    /// Number of distinct file names in the `images` table.
    pub fn image_count(&self) -> usize {
        self.images_by_file_name.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotation_count
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

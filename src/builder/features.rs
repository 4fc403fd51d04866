//! Declaration of the output record schema.

use std::fmt;

use serde::Serialize;

use crate::taxonomy::NAMES;

/// Type of one column of the output schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureType {
    /// Scalar value with a storage type such as `int64` or `float32`.
    Value { dtype: &'static str },
    /// Raw image bytes plus the originating path.
    Image,
    /// Categorical label over a fixed list of names.
    ClassLabel { names: Vec<&'static str> },
    /// Variable-length sequence, or fixed-length when `length` is set.
    Sequence {
        feature: Box<FeatureType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        length: Option<usize>,
    },
    /// Named sub-fields, in declaration order.
    Struct { fields: Vec<Feature> },
}

/// A named column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: &'static str,
    #[serde(flatten)]
    pub ty: FeatureType,
}

impl Feature {
    fn new(name: &'static str, ty: FeatureType) -> Self {
        Self { name, ty }
    }
}

/// The full schema of an [`ImageRecord`](crate::coco::ImageRecord).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Features {
    pub fields: Vec<Feature>,
}

fn value(dtype: &'static str) -> FeatureType {
    FeatureType::Value { dtype }
}

impl Features {
    /// The schema every split of the dataset is generated with.
    pub fn icons() -> Self {
        let object = FeatureType::Struct {
            fields: vec![
                Feature::new("id", value("int64")),
                Feature::new("area", value("int64")),
                Feature::new(
                    "bbox",
                    FeatureType::Sequence {
                        feature: Box::new(value("float32")),
                        length: Some(4),
                    },
                ),
                Feature::new(
                    "category",
                    FeatureType::ClassLabel {
                        names: NAMES.to_vec(),
                    },
                ),
            ],
        };

        Self {
            fields: vec![
                Feature::new("image_id", value("int64")),
                Feature::new("image", FeatureType::Image),
                Feature::new("width", value("int32")),
                Feature::new("height", value("int32")),
                Feature::new(
                    "objects",
                    FeatureType::Sequence {
                        feature: Box::new(object),
                        length: None,
                    },
                ),
            ],
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Value { dtype } => write!(f, "{dtype}"),
            FeatureType::Image => write!(f, "image"),
            FeatureType::ClassLabel { names } => write!(f, "class_label({} names)", names.len()),
            FeatureType::Sequence {
                feature,
                length: Some(len),
            } => write!(f, "sequence<{feature}; {len}>"),
            FeatureType::Sequence {
                feature,
                length: None,
            } => write!(f, "sequence<{feature}>"),
            FeatureType::Struct { fields } => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            writeln!(f, "  {}: {}", field.name, field.ty)?;
        }
        Ok(())
    }
}

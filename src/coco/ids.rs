//! Newtype IDs for the integer keys of a COCO annotation file.
//!
//! Image ids, annotation ids and category ids all arrive as bare integers;
//! wrapping them keeps a category id from being used to look up an image.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! coco_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying i64 value.
            #[inline]
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

coco_id!(
    /// Identifier of an entry in the `images` array.
    ImageId
);
coco_id!(
    /// Identifier of an entry in the `annotations` array.
    AnnotationId
);
coco_id!(
    /// Identifier of an entry in the `categories` array.
    CategoryId
);

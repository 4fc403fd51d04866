//! The fixed icon taxonomy.
//!
//! Every object in the dataset is labeled with one of 21 status-effect icons.
//! The order of [`NAMES`] is significant: an icon's class label is its
//! zero-based position in that list.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Icon category names, in class-label order.
pub const NAMES: [&str; 21] = [
    "bleeding",
    "blessed",
    "blindness",
    "bloodlust",
    "broken",
    "cursed",
    "deepWound",
    "endurance",
    "exhaustion",
    "exposed",
    "gliph",
    "haste",
    "hearing",
    "hindered",
    "incapacitated",
    "madness",
    "mangled",
    "oblivious",
    "sleepPenalty",
    "undetectable",
    "vision",
];

/// One of the 21 icon categories.
///
/// Stored as its class label, so conversions to and from the name are a
/// table lookup.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IconCategory(u8);

impl IconCategory {
    /// Number of categories in the taxonomy.
    pub const COUNT: usize = NAMES.len();

    /// Looks up a category by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| Self(idx as u8))
    }

    /// Builds a category from its class label.
    pub fn from_label(label: usize) -> Option<Self> {
        (label < Self::COUNT).then_some(Self(label as u8))
    }

    /// Zero-based class label.
    #[inline]
    pub fn label(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn name(self) -> &'static str {
        NAMES[self.label()]
    }

    /// Iterates over every category in class-label order.
    pub fn all() -> impl Iterator<Item = IconCategory> {
        (0..Self::COUNT).map(|idx| Self(idx as u8))
    }
}

impl fmt::Debug for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IconCategory({})", self.name())
    }
}

impl fmt::Display for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IconCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown icon category '{s}'"))
    }
}

impl Serialize for IconCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut sorted = NAMES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), IconCategory::COUNT);
    }

    #[test]
    fn test_label_roundtrip() {
        for category in IconCategory::all() {
            assert_eq!(IconCategory::from_label(category.label()), Some(category));
            assert_eq!(IconCategory::from_name(category.name()), Some(category));
        }
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(IconCategory::from_name("bleeding").unwrap().label(), 0);
        assert_eq!(IconCategory::from_name("deepWound").unwrap().label(), 6);
        assert_eq!(IconCategory::from_name("vision").unwrap().label(), 20);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(IconCategory::from_name("deepwound").is_none());
        assert!(IconCategory::from_name("Bleeding").is_none());
        assert!(IconCategory::from_label(21).is_none());
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&IconCategory::from_name("haste").unwrap()).unwrap();
        assert_eq!(json, "\"haste\"");
    }
}

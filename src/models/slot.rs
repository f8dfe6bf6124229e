//! Slot model.
//!
//! A slot is an opaque, schedulable time unit (e.g. `"Mon-1"`, `"Tue 10:00"`).
//! Slots are read from input records as-is and never created by the engine.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A time slot identifier.
///
/// Normalization trims surrounding whitespace; case is preserved. Two slots
/// are equal iff their normalized strings are equal. Ordering is
/// lexicographic, which fixes the order in which shared slots are tried.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(String);

impl Slot {
    /// Creates a slot from raw text, trimming whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Normalized slot text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the slot is blank after normalization.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Slot {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Slot {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl Borrow<str> for Slot {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_trims_but_keeps_case() {
        assert_eq!(Slot::new("  Mon-1 ").as_str(), "Mon-1");
        assert_ne!(Slot::new("Mon"), Slot::new("mon"));
        assert_eq!(Slot::new("Mon"), Slot::from(" Mon"));
    }

    #[test]
    fn test_slot_ordering_is_lexicographic() {
        let mut slots = vec![Slot::new("Tue"), Slot::new("Mon"), Slot::new("Fri")];
        slots.sort();
        let names: Vec<&str> = slots.iter().map(Slot::as_str).collect();
        assert_eq!(names, vec!["Fri", "Mon", "Tue"]);
    }

    #[test]
    fn test_blank_slot() {
        assert!(Slot::new("   ").is_blank());
    }
}

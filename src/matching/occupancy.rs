//! Capacity bookkeeping.
//!
//! An explicit `(teacher, slot) -> students` ledger, owned by the caller
//! and threaded through matching and re-optimization instead of living in
//! shared state.

use std::collections::BTreeMap;

use crate::models::{Schedule, Slot, Teacher};

/// Occupancy of every (teacher, slot) bucket touched so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    counts: BTreeMap<(String, Slot), u32>,
}

impl Occupancy {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from the assignments of a schedule.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut occupancy = Self::new();
        for a in &schedule.assignments {
            occupancy.occupy(&a.teacher_id, &a.slot);
        }
        occupancy
    }

    /// Students currently in a bucket.
    pub fn count(&self, teacher_id: &str, slot: &Slot) -> u32 {
        self.counts
            .get(&(teacher_id.to_string(), slot.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the teacher can take one more student in `slot`.
    pub fn has_room(&self, teacher: &Teacher, slot: &Slot) -> bool {
        self.count(&teacher.id, slot) < teacher.max_students_per_slot
    }

    /// Adds a student to a bucket, returning the new count.
    pub fn occupy(&mut self, teacher_id: &str, slot: &Slot) -> u32 {
        let count = self
            .counts
            .entry((teacher_id.to_string(), slot.clone()))
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Removes a student from a bucket, returning the new count.
    pub fn release(&mut self, teacher_id: &str, slot: &Slot) -> u32 {
        let key = (teacher_id.to_string(), slot.clone());
        match self.counts.get_mut(&key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                self.counts.remove(&key);
                0
            }
            None => 0,
        }
    }

    /// Occupied buckets with their counts, ordered by teacher then slot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot, u32)> + '_ {
        self.counts
            .iter()
            .map(|((teacher_id, slot), &count)| (teacher_id.as_str(), slot, count))
    }

    /// Total students placed.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

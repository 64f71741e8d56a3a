//! Teacher model.
//!
//! A teacher carries the set of subjects they may teach and the slots
//! where they are unavailable (leave, blocked periods). Unavailable
//! slots are never assigned; the generator and clash inspector both
//! honor them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::TimeSlot;

/// A teacher who can be assigned to sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Subjects this teacher may teach.
    pub subject_ids: Vec<String>,
    /// Slots where this teacher cannot be scheduled.
    pub unavailable: HashSet<TimeSlot>,
}

impl Teacher {
    /// Creates a teacher with no subjects and full availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            subject_ids: Vec::new(),
            unavailable: HashSet::new(),
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a subject this teacher may teach.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_ids.push(subject_id.into());
        self
    }

    /// Marks a slot as unavailable.
    pub fn with_unavailable(mut self, slot: TimeSlot) -> Self {
        self.unavailable.insert(slot);
        self
    }

    /// Marks several slots as unavailable.
    pub fn with_unavailable_slots(mut self, slots: impl IntoIterator<Item = TimeSlot>) -> Self {
        self.unavailable.extend(slots);
        self
    }

    /// Whether this teacher may teach the given subject.
    pub fn can_teach(&self, subject_id: &str) -> bool {
        self.subject_ids.iter().any(|s| s == subject_id)
    }

    /// Whether this teacher is free of declared unavailability at a slot.
    pub fn is_available(&self, slot: TimeSlot) -> bool {
        !self.unavailable.contains(&slot)
    }
}

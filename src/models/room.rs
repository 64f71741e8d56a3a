//! Room model.
//!
//! Rooms are typed (lecture vs lab) and capacity-bounded: a room is
//! eligible for a section only when its capacity covers the section's
//! enrolled strength.

use serde::{Deserialize, Serialize};

use super::SubjectKind;

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    /// Regular classroom.
    Lecture,
    /// Laboratory.
    Lab,
}

/// A room sessions can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (e.g., "CR-101", "LAB-002").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Seats available.
    pub capacity: u32,
    /// Lecture room or lab.
    pub kind: RoomKind,
}

impl Room {
    /// Creates a lecture room.
    pub fn lecture(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            kind: RoomKind::Lecture,
        }
    }

    /// Creates a lab room.
    pub fn lab(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            kind: RoomKind::Lab,
            ..Self::lecture(id, capacity)
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this room's kind matches a subject's kind.
    pub fn suits(&self, subject_kind: SubjectKind) -> bool {
        match subject_kind {
            SubjectKind::Lecture => self.kind == RoomKind::Lecture,
            SubjectKind::Lab => self.kind == RoomKind::Lab,
        }
    }

    /// Whether this room seats a section of the given strength.
    pub fn fits(&self, strength: u32) -> bool {
        self.capacity >= strength
    }
}

//! Class section model.
//!
//! A section is one class group of students within a (branch, semester)
//! pair. All sections in a generation request belong to the same group;
//! each takes every subject of that group.

use serde::{Deserialize, Serialize};

/// A class group to build a weekly schedule for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier (e.g., "CSE-3A").
    pub id: String,
    /// Branch the section belongs to.
    pub branch: String,
    /// Semester the section is in.
    pub semester: u8,
    /// Enrolled head count. Rooms must seat at least this many.
    pub strength: u32,
}

impl Section {
    /// Creates a section with zero strength.
    pub fn new(id: impl Into<String>, branch: impl Into<String>, semester: u8) -> Self {
        Self {
            id: id.into(),
            branch: branch.into(),
            semester,
            strength: 0,
        }
    }

    /// Sets the enrolled strength.
    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_builder() {
        let s = Section::new("CSE-3A", "CSE", 3).with_strength(55);
        assert_eq!(s.id, "CSE-3A");
        assert_eq!(s.branch, "CSE");
        assert_eq!(s.semester, 3);
        assert_eq!(s.strength, 55);
    }
}

//! Timetable (solution) model.
//!
//! A timetable is a complete weekly schedule for one (branch, semester)
//! group: one assignment per occupied (day, period) cell per section,
//! with empty cells allowed. Once returned by the generator a timetable
//! is an immutable value; readers may share it freely across threads.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", §2.2

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::TimeSlot;

/// A (subject, teacher, room, section, slot) placement.
///
/// The atomic unit of a schedule. Multi-period sessions (labs) cover
/// `periods` consecutive cells of one day starting at `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Scheduled subject.
    pub subject_id: String,
    /// Assigned teacher.
    pub teacher_id: String,
    /// Assigned room.
    pub room_id: String,
    /// Section attending the session.
    pub section_id: String,
    /// First covered cell.
    pub slot: TimeSlot,
    /// Consecutive periods covered, starting at `slot`.
    pub periods: u8,
}

impl Assignment {
    /// Creates a single-period assignment.
    pub fn new(
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        room_id: impl Into<String>,
        section_id: impl Into<String>,
        slot: TimeSlot,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            room_id: room_id.into(),
            section_id: section_id.into(),
            slot,
            periods: 1,
        }
    }

    /// Sets the covered period count.
    pub fn with_periods(mut self, periods: u8) -> Self {
        self.periods = periods;
        self
    }

    /// Cells this assignment covers, in period order.
    pub fn covered_slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        (self.slot.period..self.slot.period + self.periods)
            .map(|p| TimeSlot::new(self.slot.day, p))
    }

    /// Whether this assignment covers a cell.
    pub fn covers(&self, slot: TimeSlot) -> bool {
        slot.day == self.slot.day
            && slot.period >= self.slot.period
            && slot.period < self.slot.period + self.periods
    }
}

/// A complete weekly schedule for one (branch, semester) group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// Branch this timetable belongs to.
    pub branch: String,
    /// Semester this timetable belongs to.
    pub semester: u8,
    /// Placements, kept sorted by (section, day, period).
    pub assignments: Vec<Assignment>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new(branch: impl Into<String>, semester: u8) -> Self {
        Self {
            branch: branch.into(),
            semester,
            assignments: Vec::new(),
        }
    }

    /// Adds an assignment and restores the sort order.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
        self.sort();
    }

    /// Sorts assignments by (section, day, period).
    pub fn sort(&mut self) {
        self.assignments
            .sort_by(|a, b| (&a.section_id, a.slot).cmp(&(&b.section_id, b.slot)));
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// All assignments for a teacher.
    pub fn assignments_for_teacher(&self, teacher_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.teacher_id == teacher_id)
            .collect()
    }

    /// All assignments for a room.
    pub fn assignments_for_room(&self, room_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.room_id == room_id)
            .collect()
    }

    /// All assignments for a section.
    pub fn assignments_for_section(&self, section_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.section_id == section_id)
            .collect()
    }

    /// The assignment covering a section's cell, if any.
    pub fn at(&self, section_id: &str, slot: TimeSlot) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.section_id == section_id && a.covers(slot))
    }

    /// Whether the three hard-constraint uniqueness rules hold: no two
    /// assignments share (teacher, slot), (room, slot), or (section, slot).
    pub fn is_conflict_free(&self) -> bool {
        let mut teacher_slots = HashSet::new();
        let mut room_slots = HashSet::new();
        let mut section_slots = HashSet::new();

        for a in &self.assignments {
            for slot in a.covered_slots() {
                if !teacher_slots.insert((a.teacher_id.as_str(), slot))
                    || !room_slots.insert((a.room_id.as_str(), slot))
                    || !section_slots.insert((a.section_id.as_str(), slot))
                {
                    return false;
                }
            }
        }
        true
    }
}

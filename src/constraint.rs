//! Hard-constraint checking.
//!
//! Three uniqueness rules define a valid timetable: no two assignments
//! may share (section, slot), (teacher, slot), or (room, slot). The
//! [`OccupancyIndex`] answers placement queries against a set of
//! assignments; queries are side-effect-free and safe to run
//! concurrently against independent indexes. The generator additionally
//! mutates its own private index through [`OccupancyIndex::place`] and
//! [`OccupancyIndex::remove`].
//!
//! Declared teacher unavailability counts as occupancy for placement
//! ([`OccupancyIndex::can_place`]) but is not a collision between two
//! assignments, so [`OccupancyIndex::find_clash`] reports only the
//! three uniqueness rules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{Assignment, Teacher, TimeSlot, Timetable};

/// Which uniqueness rule a clash violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The teacher is already assigned at the slot.
    #[serde(rename = "teacher_conflict")]
    Teacher,
    /// The room is already occupied at the slot.
    #[serde(rename = "room_conflict")]
    Room,
    /// The section already has a session at the slot.
    #[serde(rename = "class_conflict")]
    Section,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictKind::Teacher => "teacher conflict",
            ConflictKind::Room => "room conflict",
            ConflictKind::Section => "class conflict",
        };
        f.write_str(name)
    }
}

/// A detected hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clash {
    /// Violated rule.
    pub kind: ConflictKind,
    /// The assignment already occupying the contested slot.
    pub existing: Assignment,
    /// Human-readable explanation.
    pub message: String,
}

/// Per-slot occupancy of teachers, rooms, and sections.
///
/// Multi-period assignments occupy every covered slot.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    teacher: HashMap<String, HashMap<TimeSlot, Assignment>>,
    room: HashMap<String, HashMap<TimeSlot, Assignment>>,
    section: HashMap<String, HashMap<TimeSlot, Assignment>>,
}

impl OccupancyIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every assignment of a committed timetable.
    pub fn from_timetable(timetable: &Timetable) -> Self {
        let mut index = Self::new();
        for assignment in &timetable.assignments {
            index.place(assignment);
        }
        index
    }

    /// Whether `candidate` can be placed without violating a hard
    /// constraint.
    ///
    /// Checks in order, cheapest first, short-circuiting on the first
    /// violation: (a) the section is free on every covered slot, (b) the
    /// teacher is free and not declared unavailable, (c) the room is
    /// free.
    pub fn can_place(&self, candidate: &Assignment, teacher: &Teacher) -> bool {
        let section = self.section.get(&candidate.section_id);
        let teacher_busy = self.teacher.get(&candidate.teacher_id);
        let room = self.room.get(&candidate.room_id);

        candidate.covered_slots().all(|slot| {
            section.is_none_or(|m| !m.contains_key(&slot))
                && teacher_busy.is_none_or(|m| !m.contains_key(&slot))
                && teacher.is_available(slot)
                && room.is_none_or(|m| !m.contains_key(&slot))
        })
    }

    /// Finds the first uniqueness violation `candidate` would cause,
    /// reporting the colliding assignment and conflict kind.
    ///
    /// Checked per covered slot in the order teacher, room, section.
    pub fn find_clash(&self, candidate: &Assignment) -> Option<Clash> {
        for slot in candidate.covered_slots() {
            if let Some(existing) = self
                .teacher
                .get(&candidate.teacher_id)
                .and_then(|m| m.get(&slot))
            {
                return Some(Clash {
                    kind: ConflictKind::Teacher,
                    message: format!(
                        "Teacher '{}' already teaches section '{}' at {}",
                        candidate.teacher_id, existing.section_id, slot
                    ),
                    existing: existing.clone(),
                });
            }
            if let Some(existing) = self.room.get(&candidate.room_id).and_then(|m| m.get(&slot)) {
                return Some(Clash {
                    kind: ConflictKind::Room,
                    message: format!(
                        "Room '{}' is occupied by section '{}' at {}",
                        candidate.room_id, existing.section_id, slot
                    ),
                    existing: existing.clone(),
                });
            }
            if let Some(existing) = self
                .section
                .get(&candidate.section_id)
                .and_then(|m| m.get(&slot))
            {
                return Some(Clash {
                    kind: ConflictKind::Section,
                    message: format!(
                        "Section '{}' already attends '{}' at {}",
                        candidate.section_id, existing.subject_id, slot
                    ),
                    existing: existing.clone(),
                });
            }
        }
        None
    }

    /// Records an assignment in the index.
    pub fn place(&mut self, assignment: &Assignment) {
        for slot in assignment.covered_slots() {
            self.teacher
                .entry(assignment.teacher_id.clone())
                .or_default()
                .insert(slot, assignment.clone());
            self.room
                .entry(assignment.room_id.clone())
                .or_default()
                .insert(slot, assignment.clone());
            self.section
                .entry(assignment.section_id.clone())
                .or_default()
                .insert(slot, assignment.clone());
        }
    }

    /// Removes a previously placed assignment from the index.
    pub fn remove(&mut self, assignment: &Assignment) {
        for slot in assignment.covered_slots() {
            if let Some(m) = self.teacher.get_mut(&assignment.teacher_id) {
                m.remove(&slot);
            }
            if let Some(m) = self.room.get_mut(&assignment.room_id) {
                m.remove(&slot);
            }
            if let Some(m) = self.section.get_mut(&assignment.section_id) {
                m.remove(&slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    fn slot(day: Day, period: u8) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    fn assignment(
        subject: &str,
        teacher: &str,
        room: &str,
        section: &str,
        at: TimeSlot,
    ) -> Assignment {
        Assignment::new(subject, teacher, room, section, at)
    }

    #[test]
    fn test_can_place_empty_index() {
        let index = OccupancyIndex::new();
        let teacher = Teacher::new("T1").with_subject("CS-301");
        let a = assignment("CS-301", "T1", "CR-101", "CSE-3A", slot(Day::Monday, 0));
        assert!(index.can_place(&a, &teacher));
    }

    #[test]
    fn test_section_collision_blocks() {
        let mut index = OccupancyIndex::new();
        index.place(&assignment(
            "CS-301",
            "T1",
            "CR-101",
            "CSE-3A",
            slot(Day::Monday, 0),
        ));

        // Different teacher and room, same section and slot.
        let teacher = Teacher::new("T2");
        let b = assignment("CS-302", "T2", "CR-102", "CSE-3A", slot(Day::Monday, 0));
        assert!(!index.can_place(&b, &teacher));
    }

    #[test]
    fn test_teacher_collision_blocks() {
        let mut index = OccupancyIndex::new();
        index.place(&assignment(
            "CS-301",
            "T1",
            "CR-101",
            "CSE-3A",
            slot(Day::Monday, 0),
        ));

        let teacher = Teacher::new("T1");
        let b = assignment("CS-302", "T1", "CR-102", "CSE-3B", slot(Day::Monday, 0));
        assert!(!index.can_place(&b, &teacher));
    }

    #[test]
    fn test_room_collision_blocks() {
        let mut index = OccupancyIndex::new();
        index.place(&assignment(
            "CS-301",
            "T1",
            "CR-101",
            "CSE-3A",
            slot(Day::Monday, 0),
        ));

        let teacher = Teacher::new("T2");
        let b = assignment("CS-302", "T2", "CR-101", "CSE-3B", slot(Day::Monday, 0));
        assert!(!index.can_place(&b, &teacher));
    }

    #[test]
    fn test_declared_unavailability_blocks() {
        let index = OccupancyIndex::new();
        let teacher = Teacher::new("T1").with_unavailable(slot(Day::Friday, 2));
        let a = assignment("CS-301", "T1", "CR-101", "CSE-3A", slot(Day::Friday, 2));
        assert!(!index.can_place(&a, &teacher));
    }

    #[test]
    fn test_multi_period_collision_on_tail() {
        let mut index = OccupancyIndex::new();
        index.place(
            &assignment("CS-301L", "T1", "LAB-002", "CSE-3A", slot(Day::Monday, 4))
                .with_periods(2),
        );

        // Single period landing on the lab's second covered slot.
        let teacher = Teacher::new("T2");
        let b = assignment("CS-302", "T2", "LAB-002", "CSE-3B", slot(Day::Monday, 5));
        assert!(!index.can_place(&b, &teacher));
        assert_eq!(
            index.find_clash(&b).unwrap().kind,
            ConflictKind::Room
        );
    }

    #[test]
    fn test_remove_frees_slots() {
        let mut index = OccupancyIndex::new();
        let a = assignment("CS-301", "T1", "CR-101", "CSE-3A", slot(Day::Monday, 0));
        index.place(&a);
        index.remove(&a);

        let teacher = Teacher::new("T1");
        assert!(index.can_place(&a, &teacher));
        assert!(index.find_clash(&a).is_none());
    }

    #[test]
    fn test_find_clash_reports_existing_assignment() {
        let mut index = OccupancyIndex::new();
        let existing = assignment("CS-301", "T1", "CR-101", "CSE-3A", slot(Day::Monday, 2));
        index.place(&existing);

        let proposed = assignment("CS-302", "T1", "CR-102", "CSE-3B", slot(Day::Monday, 2));
        let clash = index.find_clash(&proposed).unwrap();
        assert_eq!(clash.kind, ConflictKind::Teacher);
        assert_eq!(clash.existing, existing);
        assert!(clash.message.contains("T1"));
        assert!(clash.message.contains("Monday P2"));
    }

    #[test]
    fn test_find_clash_ignores_unavailability() {
        // find_clash reports collisions between assignments only.
        let index = OccupancyIndex::new();
        let proposed = assignment("CS-301", "T1", "CR-101", "CSE-3A", slot(Day::Monday, 0));
        assert!(index.find_clash(&proposed).is_none());
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ConflictKind::Teacher).unwrap(),
            "\"teacher_conflict\""
        );
        assert_eq!(
            serde_json::to_string(&ConflictKind::Section).unwrap(),
            "\"class_conflict\""
        );
    }
}

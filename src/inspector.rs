//! Clash inspection for committed timetables.
//!
//! Answers "would this single assignment clash?" against an already
//! finalized timetable — e.g., a leave substitution proposal — without
//! regenerating anything. Runs the same three uniqueness checks as the
//! generator but reports the specific colliding assignment and conflict
//! kind so the caller can present a precise reason.
//!
//! Pure and stateless: the same inputs always produce the same report,
//! and no synchronization is needed beyond the immutability of the
//! timetable being read.

use serde::{Deserialize, Serialize};

use crate::constraint::{Clash, ConflictKind, OccupancyIndex};
use crate::models::{Assignment, Teacher, Timetable};

/// A clash between a committed timetable and a proposed assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashReport {
    /// Violated rule.
    pub kind: ConflictKind,
    /// The committed assignment being collided with. `None` when the
    /// clash is a declared teacher unavailability rather than a
    /// collision between two assignments.
    pub existing: Option<Assignment>,
    /// The proposal that collides.
    pub proposed: Assignment,
    /// Human-readable explanation.
    pub message: String,
}

/// The boundary shape consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClashOutcome {
    /// Whether the proposal clashes.
    pub has_clash: bool,
    /// Conflict kind, when clashing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConflictKind>,
    /// Explanation, when clashing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Option<ClashReport>> for ClashOutcome {
    fn from(report: Option<ClashReport>) -> Self {
        match report {
            Some(report) => Self {
                has_clash: true,
                kind: Some(report.kind),
                message: Some(report.message),
            },
            None => Self {
                has_clash: false,
                kind: None,
                message: None,
            },
        }
    }
}

/// Checks a proposed assignment against a committed timetable.
///
/// Returns the first violated uniqueness rule — teacher, room, or
/// section double-booking — naming the colliding assignment, or `None`
/// when the proposal is clash-free.
pub fn check_clash(timetable: &Timetable, proposed: &Assignment) -> Option<ClashReport> {
    let index = OccupancyIndex::from_timetable(timetable);
    index.find_clash(proposed).map(|clash| report(clash, proposed))
}

/// Like [`check_clash`], additionally consulting the teacher roster so
/// declared unavailability (leave) is reported as a teacher clash.
///
/// Used for substitution proposals: a teacher may be free of sessions
/// at a slot yet still on leave.
pub fn check_clash_with_roster(
    timetable: &Timetable,
    proposed: &Assignment,
    teachers: &[Teacher],
) -> Option<ClashReport> {
    if let Some(clash) = check_clash(timetable, proposed) {
        return Some(clash);
    }

    let teacher = teachers.iter().find(|t| t.id == proposed.teacher_id)?;
    proposed
        .covered_slots()
        .find(|&slot| !teacher.is_available(slot))
        .map(|slot| ClashReport {
            kind: ConflictKind::Teacher,
            existing: None,
            proposed: proposed.clone(),
            message: format!(
                "Teacher '{}' is marked unavailable at {}",
                teacher.id, slot
            ),
        })
}

fn report(clash: Clash, proposed: &Assignment) -> ClashReport {
    ClashReport {
        kind: clash.kind,
        existing: Some(clash.existing),
        proposed: proposed.clone(),
        message: clash.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, TimeSlot};

    fn slot(day: Day, period: u8) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    fn committed() -> Timetable {
        let mut t = Timetable::new("CSE", 3);
        t.add_assignment(Assignment::new(
            "CS-301",
            "T1",
            "CR-101",
            "CSE-3A",
            slot(Day::Monday, 2),
        ));
        t.add_assignment(
            Assignment::new("CS-301L", "T2", "LAB-002", "CSE-3A", slot(Day::Tuesday, 4))
                .with_periods(2),
        );
        t
    }

    #[test]
    fn test_teacher_clash_in_different_section() {
        let timetable = committed();
        // T1 already teaches CSE-3A at Monday P2.
        let proposed = Assignment::new("CS-305", "T1", "CR-102", "CSE-3B", slot(Day::Monday, 2));

        let report = check_clash(&timetable, &proposed).unwrap();
        assert_eq!(report.kind, ConflictKind::Teacher);
        let existing = report.existing.unwrap();
        assert_eq!(existing.subject_id, "CS-301");
        assert_eq!(existing.section_id, "CSE-3A");
        assert!(report.message.contains("T1"));
    }

    #[test]
    fn test_no_clash_on_free_slot() {
        let timetable = committed();
        let proposed = Assignment::new("CS-305", "T3", "CR-102", "CSE-3B", slot(Day::Monday, 4));
        assert!(check_clash(&timetable, &proposed).is_none());
    }

    #[test]
    fn test_room_clash_on_lab_tail_period() {
        let timetable = committed();
        // The lab occupies Tuesday P4-P5.
        let proposed = Assignment::new("CS-305", "T3", "LAB-002", "CSE-3B", slot(Day::Tuesday, 5));
        let report = check_clash(&timetable, &proposed).unwrap();
        assert_eq!(report.kind, ConflictKind::Room);
    }

    #[test]
    fn test_section_clash() {
        let timetable = committed();
        let proposed = Assignment::new("CS-305", "T3", "CR-102", "CSE-3A", slot(Day::Monday, 2));
        let report = check_clash(&timetable, &proposed).unwrap();
        assert_eq!(report.kind, ConflictKind::Section);
    }

    #[test]
    fn test_idempotent() {
        let timetable = committed();
        let proposed = Assignment::new("CS-305", "T1", "CR-102", "CSE-3B", slot(Day::Monday, 2));
        let first = check_clash(&timetable, &proposed);
        let second = check_clash(&timetable, &proposed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_roster_reports_leave() {
        let timetable = committed();
        let teachers = vec![Teacher::new("T3")
            .with_subject("CS-305")
            .with_unavailable(slot(Day::Friday, 1))];
        let proposed = Assignment::new("CS-305", "T3", "CR-102", "CSE-3B", slot(Day::Friday, 1));

        // Free of collisions, but the teacher is on leave.
        assert!(check_clash(&timetable, &proposed).is_none());
        let report = check_clash_with_roster(&timetable, &proposed, &teachers).unwrap();
        assert_eq!(report.kind, ConflictKind::Teacher);
        assert!(report.existing.is_none());
        assert!(report.message.contains("unavailable"));
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let timetable = committed();
        let proposed = Assignment::new("CS-305", "T1", "CR-102", "CSE-3B", slot(Day::Monday, 2));

        let outcome = ClashOutcome::from(check_clash(&timetable, &proposed));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["hasClash"], true);
        assert_eq!(json["kind"], "teacher_conflict");
        assert!(json["message"].as_str().unwrap().contains("T1"));

        let clear = ClashOutcome::from(check_clash(
            &timetable,
            &Assignment::new("CS-305", "T9", "CR-109", "CSE-3C", slot(Day::Friday, 0)),
        ));
        let json = serde_json::to_value(&clear).unwrap();
        assert_eq!(json["hasClash"], false);
        assert!(json.get("kind").is_none());
    }
}

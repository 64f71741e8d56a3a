//! Single-candidate construction.
//!
//! Constructive placement with backtracking repair: demands are
//! processed most-constrained-first, each session takes the first
//! (teacher, room, slot) triple the occupancy index accepts, and a
//! stuck session undoes the most recently placed assignment of a
//! different subject that shares a resource with it, then retries.
//! Every attempted triple and every undo consumes one step of the
//! backtracking budget; exhausting it abandons the candidate.
//!
//! # Reference
//! Carter & Laporte (1997), "Recent Developments in Practical Course
//! Timetabling"

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::constraint::OccupancyIndex;
use crate::models::{Assignment, InstitutionConfig, TimeSlot, Timetable};

use super::problem::Problem;

/// Slot and teacher ordering for one candidate.
///
/// Candidates differ only in their orderings; the first three use fixed
/// profiles (spread, morning-first, afternoon-first), later ones use a
/// seeded shuffle. Identical seed and index reproduce the ordering.
#[derive(Debug, Clone)]
pub(crate) struct OrderingProfile {
    /// Candidate index; also the teacher round-robin offset.
    pub candidate: usize,
    /// Preference rank per teaching slot (lower tried first).
    slot_rank: HashMap<TimeSlot, usize>,
}

impl OrderingProfile {
    pub fn for_candidate(candidate: usize, seed: u64, config: &InstitutionConfig) -> Self {
        let mut slots = config.teaching_slots();
        match candidate % 3 {
            // Spread: fill first periods across all days before later ones.
            0 => slots.sort_by_key(|s| (s.period, s.day)),
            // Morning-first: day by day, earliest period first.
            1 => slots.sort(),
            // Afternoon-first: day by day, latest period first.
            _ => slots.sort_by_key(|s| (s.day, std::cmp::Reverse(s.period))),
        }
        if candidate >= 3 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(candidate as u64));
            slots.shuffle(&mut rng);
        }

        let slot_rank = slots.into_iter().enumerate().map(|(i, s)| (s, i)).collect();
        Self {
            candidate,
            slot_rank,
        }
    }

    /// Orders a demand's start slots by this profile. The rank map is a
    /// total order over teaching slots, so the result is deterministic.
    fn order_slots(&self, starts: &[TimeSlot]) -> Vec<TimeSlot> {
        let mut ordered = starts.to_vec();
        ordered.sort_by_key(|s| self.slot_rank.get(s).copied().unwrap_or(usize::MAX));
        ordered
    }
}

/// Result of one candidate construction.
#[derive(Debug)]
pub(crate) struct CandidateOutcome {
    /// The completed timetable, if construction finished.
    pub timetable: Option<Timetable>,
    /// Subjects left unplaced when the candidate was abandoned.
    pub unplaceable: Vec<String>,
    /// Whether the candidate was abandoned on budget or deadline.
    pub aborted: bool,
}

/// Builds one candidate timetable.
pub(crate) fn construct(
    problem: &Problem<'_>,
    profile: &OrderingProfile,
    budget: u64,
    deadline: Option<Instant>,
) -> CandidateOutcome {
    let catalog = problem.catalog;
    let group = catalog
        .sections
        .first()
        .map(|s| (s.branch.clone(), s.semester))
        .unwrap_or_default();

    let mut occupancy = OccupancyIndex::new();
    // Placement stack: (assignment, index of the demand that owns it).
    let mut placed: Vec<(Assignment, usize)> = Vec::new();
    let mut remaining: Vec<u32> = problem.demands.iter().map(|d| d.sessions).collect();
    let mut queue: VecDeque<usize> = (0..problem.demands.len()).collect();
    let mut steps: u64 = 0;

    loop {
        let Some(current) = queue.front().copied() else {
            break;
        };
        if remaining[current] == 0 {
            queue.pop_front();
            continue;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            debug!(
                candidate = profile.candidate,
                steps, "candidate aborted: deadline passed"
            );
            return abandoned(problem, current, &remaining);
        }

        let demand = &problem.demands[current];
        let subject = &catalog.subjects[demand.subject];
        let section = &catalog.sections[demand.section];
        // Round-robin: rotate the teacher list per candidate and per
        // session already placed, to balance load across teachers.
        let rotation = profile.candidate + (demand.sessions - remaining[current]) as usize;
        let slots = profile.order_slots(&demand.start_slots);

        let mut placed_session = false;
        'search: for i in 0..demand.eligible_teachers.len() {
            let teacher_idx =
                demand.eligible_teachers[(i + rotation) % demand.eligible_teachers.len()];
            let teacher = &catalog.teachers[teacher_idx];
            for &room_idx in &demand.eligible_rooms {
                let room = &catalog.rooms[room_idx];
                for &slot in &slots {
                    steps += 1;
                    if steps > budget {
                        debug!(
                            candidate = profile.candidate,
                            subject = %subject.id,
                            "candidate abandoned: backtrack budget exhausted"
                        );
                        return abandoned(problem, current, &remaining);
                    }

                    let candidate =
                        Assignment::new(&subject.id, &teacher.id, &room.id, &section.id, slot)
                            .with_periods(subject.periods_per_session);
                    if occupancy.can_place(&candidate, teacher) {
                        occupancy.place(&candidate);
                        placed.push((candidate, current));
                        remaining[current] -= 1;
                        placed_session = true;
                        break 'search;
                    }
                }
            }
        }

        if !placed_session {
            steps += 1;
            if steps > budget
                || !undo_conflicting(
                    problem,
                    current,
                    &mut occupancy,
                    &mut placed,
                    &mut remaining,
                    &mut queue,
                )
            {
                debug!(
                    candidate = profile.candidate,
                    subject = %subject.id,
                    "candidate abandoned: no repair available"
                );
                return abandoned(problem, current, &remaining);
            }
        }
    }

    let mut timetable = Timetable::new(group.0, group.1);
    timetable.assignments = placed.into_iter().map(|(a, _)| a).collect();
    timetable.sort();
    debug_assert!(timetable.is_conflict_free());

    CandidateOutcome {
        timetable: Some(timetable),
        unplaceable: Vec::new(),
        aborted: false,
    }
}

/// Undoes the most recently placed assignment of a *different* subject
/// that shares a resource with the stuck demand (its section, or one of
/// its eligible teachers or rooms), re-queueing the owner for a retry.
fn undo_conflicting(
    problem: &Problem<'_>,
    stuck: usize,
    occupancy: &mut OccupancyIndex,
    placed: &mut Vec<(Assignment, usize)>,
    remaining: &mut [u32],
    queue: &mut VecDeque<usize>,
) -> bool {
    let catalog = problem.catalog;
    let demand = &problem.demands[stuck];
    let stuck_subject = &catalog.subjects[demand.subject].id;
    let stuck_section = &catalog.sections[demand.section].id;

    let shares_resource = |a: &Assignment| {
        a.section_id == *stuck_section
            || demand
                .eligible_teachers
                .iter()
                .any(|&t| catalog.teachers[t].id == a.teacher_id)
            || demand
                .eligible_rooms
                .iter()
                .any(|&r| catalog.rooms[r].id == a.room_id)
    };

    let victim = placed
        .iter()
        .rposition(|(a, _)| a.subject_id != *stuck_subject && shares_resource(a));

    match victim {
        Some(i) => {
            let (assignment, owner) = placed.remove(i);
            debug!(
                undone = %assignment.subject_id,
                slot = %assignment.slot,
                stuck = %stuck_subject,
                "backtracking"
            );
            occupancy.remove(&assignment);
            remaining[owner] += 1;
            if !queue.contains(&owner) {
                queue.push_back(owner);
            }
            true
        }
        None => false,
    }
}

fn abandoned(problem: &Problem<'_>, stuck: usize, remaining: &[u32]) -> CandidateOutcome {
    // Report every subject with sessions still unplaced, the stuck one
    // included.
    let mut unplaceable: BTreeSet<String> = remaining
        .iter()
        .enumerate()
        .filter(|&(_, &r)| r > 0)
        .map(|(i, _)| problem.catalog.subjects[problem.demands[i].subject].id.clone())
        .collect();
    unplaceable.insert(
        problem.catalog.subjects[problem.demands[stuck].subject]
            .id
            .clone(),
    );

    CandidateOutcome {
        timetable: None,
        unplaceable: unplaceable.into_iter().collect(),
        aborted: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::problem::Problem;
    use crate::models::{Catalog, Day, Room, Section, Subject, Teacher};

    fn tiny_catalog() -> Catalog {
        Catalog::new()
            .with_subject(Subject::lecture("CS-301", "CSE", 3).with_weekly_sessions(5))
            .with_teacher(Teacher::new("T1").with_subject("CS-301"))
            .with_room(Room::lecture("CR-101", 60))
            .with_section(Section::new("CSE-3A", "CSE", 3).with_strength(50))
    }

    fn build_one(catalog: &Catalog, candidate: usize) -> CandidateOutcome {
        let problem = Problem::build(catalog).unwrap();
        let profile = OrderingProfile::for_candidate(candidate, 0, &catalog.config);
        construct(&problem, &profile, 20_000, None)
    }

    #[test]
    fn test_places_all_sessions() {
        let outcome = build_one(&tiny_catalog(), 0);
        let timetable = outcome.timetable.expect("satisfiable catalog");
        assert_eq!(timetable.assignment_count(), 5);
        assert!(timetable.is_conflict_free());
        assert!(!outcome.aborted);
    }

    #[test]
    fn test_profiles_produce_distinct_layouts() {
        let catalog = tiny_catalog();
        let morning = build_one(&catalog, 1).timetable.unwrap();
        let afternoon = build_one(&catalog, 2).timetable.unwrap();
        assert_ne!(morning.assignments, afternoon.assignments);
    }

    #[test]
    fn test_deterministic_for_same_profile() {
        let catalog = tiny_catalog();
        let a = build_one(&catalog, 4).timetable.unwrap();
        let b = build_one(&catalog, 4).timetable.unwrap();
        assert_eq!(a.assignments, b.assignments);
    }

    #[test]
    fn test_lab_sessions_take_consecutive_periods() {
        let catalog = Catalog::new()
            .with_subject(Subject::lab("CS-301L", "CSE", 3).with_weekly_sessions(2))
            .with_teacher(Teacher::new("T1").with_subject("CS-301L"))
            .with_room(Room::lab("LAB-002", 60))
            .with_section(Section::new("CSE-3A", "CSE", 3).with_strength(50));

        let timetable = build_one(&catalog, 0).timetable.unwrap();
        assert_eq!(timetable.assignment_count(), 2);
        for a in &timetable.assignments {
            assert_eq!(a.periods, 2);
            assert_eq!(a.room_id, "LAB-002");
            // Never straddles the default lunch period (P3).
            assert!(a.covered_slots().all(|s| s.period != 3));
        }
        assert!(timetable.is_conflict_free());
    }

    #[test]
    fn test_cross_section_contention_fills_grid() {
        // Two sections, two subjects, one teacher each, and a 1×2 grid:
        // the full construction must pack the grid exactly.
        let config = crate::models::InstitutionConfig::new(1, 2);
        let catalog = Catalog::new()
            .with_config(config)
            .with_subject(Subject::lecture("CS-301", "CSE", 3))
            .with_subject(Subject::lecture("CS-302", "CSE", 3))
            .with_teacher(Teacher::new("T1").with_subject("CS-301"))
            .with_teacher(Teacher::new("T2").with_subject("CS-302"))
            .with_room(Room::lecture("CR-101", 60))
            .with_room(Room::lecture("CR-102", 60))
            .with_section(Section::new("CSE-3A", "CSE", 3).with_strength(50))
            .with_section(Section::new("CSE-3B", "CSE", 3).with_strength(50));

        let timetable = build_one(&catalog, 0).timetable.unwrap();
        // 2 sections × 2 subjects × 1 session each fills the 2×2 grid.
        assert_eq!(timetable.assignment_count(), 4);
        assert!(timetable.is_conflict_free());
    }

    #[test]
    fn test_undo_picks_most_recent_other_subject_sharing_a_resource() {
        let catalog = Catalog::new()
            .with_subject(Subject::lecture("CS-301", "CSE", 3).with_weekly_sessions(2))
            .with_subject(Subject::lecture("CS-302", "CSE", 3))
            .with_teacher(Teacher::new("T1").with_subject("CS-301"))
            .with_teacher(Teacher::new("T2").with_subject("CS-302"))
            .with_room(Room::lecture("CR-101", 60))
            .with_section(Section::new("CSE-3A", "CSE", 3).with_strength(50));
        let problem = Problem::build(&catalog).unwrap();

        let d301 = problem
            .demands
            .iter()
            .position(|d| catalog.subjects[d.subject].id == "CS-301")
            .unwrap();
        let d302 = problem
            .demands
            .iter()
            .position(|d| catalog.subjects[d.subject].id == "CS-302")
            .unwrap();

        let slot0 = TimeSlot::new(Day::Monday, 0);
        let slot1 = TimeSlot::new(Day::Monday, 1);
        let a301 = Assignment::new("CS-301", "T1", "CR-101", "CSE-3A", slot0);
        let a302 = Assignment::new("CS-302", "T2", "CR-101", "CSE-3A", slot1);

        let mut occupancy = OccupancyIndex::new();
        occupancy.place(&a301);
        occupancy.place(&a302);
        let mut placed = vec![(a301.clone(), d301), (a302.clone(), d302)];
        let mut remaining = vec![0u32; problem.demands.len()];
        let mut queue = VecDeque::new();

        // CS-301 is stuck: the undone victim must be the most recent
        // assignment of a *different* subject, i.e. CS-302, not CS-301.
        let repaired = undo_conflicting(
            &problem,
            d301,
            &mut occupancy,
            &mut placed,
            &mut remaining,
            &mut queue,
        );
        assert!(repaired);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0.subject_id, "CS-301");
        assert_eq!(remaining[d302], 1);
        assert!(queue.contains(&d302));
        // The freed slot accepts CS-301 again.
        let teacher = &catalog.teachers[0];
        assert!(occupancy.can_place(
            &Assignment::new("CS-301", "T1", "CR-101", "CSE-3A", slot1),
            teacher
        ));
    }

    #[test]
    fn test_budget_exhaustion_reports_stuck_subjects() {
        let problem_catalog = tiny_catalog();
        let problem = Problem::build(&problem_catalog).unwrap();
        let profile = OrderingProfile::for_candidate(0, 0, &problem_catalog.config);
        // A one-step budget cannot place five sessions.
        let outcome = construct(&problem, &profile, 1, None);
        assert!(outcome.aborted);
        assert!(outcome.timetable.is_none());
        assert_eq!(outcome.unplaceable, vec!["CS-301".to_string()]);
    }

    #[test]
    fn test_expired_deadline_aborts() {
        let catalog = tiny_catalog();
        let problem = Problem::build(&catalog).unwrap();
        let profile = OrderingProfile::for_candidate(0, 0, &catalog.config);
        let outcome = construct(&problem, &profile, 20_000, Some(Instant::now()));
        assert!(outcome.aborted);
        assert!(outcome.timetable.is_none());
    }
}

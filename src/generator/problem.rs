//! Demand extraction and eligibility precompute.
//!
//! Flattens the catalog into one demand per (section, subject) pair and
//! precomputes, per demand, the teachers, rooms, and start slots that
//! could ever host it. Infeasibility that is visible before any search
//! (a demand with zero eligible triples, or a sole teacher whose
//! dependents jointly outstrip their availability) fails fast here
//! instead of burning the backtracking budget.
//!
//! # Reference
//! Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//! Constraint Satisfaction Problems" — the fail-first principle behind
//! the most-constrained-first demand order.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Catalog, TimeSlot};

use super::GenerateError;

/// One (section, subject) scheduling demand.
#[derive(Debug, Clone)]
pub(crate) struct Demand {
    /// Index into `catalog.sections`.
    pub section: usize,
    /// Index into `catalog.subjects`.
    pub subject: usize,
    /// Sessions still to place (the subject's weekly count).
    pub sessions: u32,
    /// Indexes into `catalog.teachers`, ordered by teacher id.
    pub eligible_teachers: Vec<usize>,
    /// Indexes into `catalog.rooms`, ordered by room id.
    pub eligible_rooms: Vec<usize>,
    /// Start slots that fit the session length, earliest first.
    pub start_slots: Vec<TimeSlot>,
    /// Number of feasible (teacher, room, slot) triples; the scarcity
    /// metric for demand ordering.
    pub combos: usize,
}

/// A catalog flattened for construction.
#[derive(Debug)]
pub(crate) struct Problem<'a> {
    pub catalog: &'a Catalog,
    /// Demands ordered most-constrained-first.
    pub demands: Vec<Demand>,
}

impl<'a> Problem<'a> {
    /// Builds the demand list, failing fast on infeasibility the
    /// catalog-level validation cannot see (availability-driven).
    pub fn build(catalog: &'a Catalog) -> Result<Self, GenerateError> {
        let mut demands = Vec::new();
        let mut unplaceable = BTreeSet::new();

        for (section_idx, section) in catalog.sections.iter().enumerate() {
            for (subject_idx, subject) in catalog.subjects.iter().enumerate() {
                let mut eligible_teachers: Vec<usize> = catalog
                    .teachers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.can_teach(&subject.id))
                    .map(|(i, _)| i)
                    .collect();
                eligible_teachers
                    .sort_by(|&a, &b| catalog.teachers[a].id.cmp(&catalog.teachers[b].id));

                let mut eligible_rooms: Vec<usize> = catalog
                    .rooms
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.suits(subject.kind) && r.fits(section.strength))
                    .map(|(i, _)| i)
                    .collect();
                eligible_rooms.sort_by(|&a, &b| catalog.rooms[a].id.cmp(&catalog.rooms[b].id));
                let start_slots = catalog.config.session_start_slots(subject.periods_per_session);

                // Exact scarcity count: a (teacher, slot) pairing only
                // counts when the teacher is free for the whole run.
                let combos: usize = eligible_teachers
                    .iter()
                    .map(|&t| {
                        let teacher = &catalog.teachers[t];
                        start_slots
                            .iter()
                            .filter(|start| {
                                run_slots(start, subject.periods_per_session)
                                    .all(|s| teacher.is_available(s))
                            })
                            .count()
                    })
                    .sum::<usize>()
                    * eligible_rooms.len();

                if combos == 0 {
                    unplaceable.insert(subject.id.clone());
                }

                demands.push(Demand {
                    section: section_idx,
                    subject: subject_idx,
                    sessions: subject.weekly_sessions,
                    eligible_teachers,
                    eligible_rooms,
                    start_slots,
                    combos,
                });
            }
        }

        if !unplaceable.is_empty() {
            return Err(GenerateError::Unsatisfiable {
                unplaceable: unplaceable.into_iter().collect(),
            });
        }

        check_sole_teacher_load(catalog, &demands)?;

        // Most-constrained-first; ties by subject id, then section id.
        demands.sort_by(|a, b| {
            let sa = &catalog.subjects[a.subject].id;
            let sb = &catalog.subjects[b.subject].id;
            let seca = &catalog.sections[a.section].id;
            let secb = &catalog.sections[b.section].id;
            (a.combos, sa, seca).cmp(&(b.combos, sb, secb))
        });

        Ok(Self { catalog, demands })
    }
}

fn run_slots(start: &TimeSlot, periods: u8) -> impl Iterator<Item = TimeSlot> + '_ {
    (start.period..start.period + periods).map(|p| TimeSlot::new(start.day, p))
}

/// Demands whose subject has exactly one eligible teacher compete for
/// that teacher's available periods. When they jointly need more than
/// the teacher has, no schedule exists; report every implicated subject.
fn check_sole_teacher_load(
    catalog: &Catalog,
    demands: &[Demand],
) -> Result<(), GenerateError> {
    let mut load: BTreeMap<usize, (u32, BTreeSet<String>)> = BTreeMap::new();

    for demand in demands {
        if let [sole] = demand.eligible_teachers[..] {
            let subject = &catalog.subjects[demand.subject];
            let entry = load.entry(sole).or_default();
            entry.0 += subject.weekly_periods();
            entry.1.insert(subject.id.clone());
        }
    }

    for (teacher_idx, (needed, subjects)) in load {
        let teacher = &catalog.teachers[teacher_idx];
        let available = catalog
            .config
            .teaching_slots()
            .into_iter()
            .filter(|&s| teacher.is_available(s))
            .count() as u32;
        if needed > available {
            return Err(GenerateError::Unsatisfiable {
                unplaceable: subjects.into_iter().collect(),
            });
        }
    }

    Ok(())
}

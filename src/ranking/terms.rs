//! Built-in scoring terms.
//!
//! # Categories
//!
//! - **Section-facing**: load balance across days, same-subject repetition
//! - **Teacher-facing**: idle gaps, over-long consecutive teaching runs
//! - **Preference**: morning/afternoon placement
//!
//! # Score Convention
//! All terms return penalties — lower is better.

use std::collections::{BTreeMap, BTreeSet};

use super::{Penalty, PreferredTime, ScoringContext, ScoringTerm};
use crate::models::Timetable;

/// Spread of daily session counts per section.
///
/// Computes the standard deviation of per-day session counts for each
/// section, averaged across sections. A section with all sessions
/// crammed into two days scores worse than one spread over the week.
#[derive(Debug, Clone, Copy)]
pub struct LoadBalance;

impl ScoringTerm for LoadBalance {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn penalty(&self, timetable: &Timetable, ctx: &ScoringContext<'_>) -> Penalty {
        let sections: BTreeSet<&str> = timetable
            .assignments
            .iter()
            .map(|a| a.section_id.as_str())
            .collect();
        if sections.is_empty() {
            return 0.0;
        }

        let days: Vec<_> = ctx.config.days().collect();
        let mut total = 0.0;
        for section in &sections {
            let mut counts: BTreeMap<_, u32> = days.iter().map(|&d| (d, 0)).collect();
            for a in timetable.assignments_for_section(section) {
                *counts.entry(a.slot.day).or_insert(0) += 1;
            }
            let n = days.len() as f64;
            let mean = counts.values().map(|&c| c as f64).sum::<f64>() / n;
            let variance = counts
                .values()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>()
                / n;
            total += variance.sqrt();
        }
        total / sections.len() as f64
    }

    fn description(&self) -> &'static str {
        "Per-day load balance across sections"
    }
}

/// Idle periods between a teacher's first and last session of a day.
///
/// The lunch period never counts as a gap.
#[derive(Debug, Clone, Copy)]
pub struct TeacherGaps;

impl ScoringTerm for TeacherGaps {
    fn name(&self) -> &'static str {
        "gaps"
    }

    fn penalty(&self, timetable: &Timetable, ctx: &ScoringContext<'_>) -> Penalty {
        let mut busy: BTreeMap<(&str, _), BTreeSet<u8>> = BTreeMap::new();
        for a in &timetable.assignments {
            for slot in a.covered_slots() {
                busy.entry((a.teacher_id.as_str(), slot.day))
                    .or_default()
                    .insert(slot.period);
            }
        }

        let mut total = 0u32;
        for periods in busy.values() {
            let (first, last) = match (periods.first(), periods.last()) {
                (Some(&f), Some(&l)) => (f, l),
                _ => continue,
            };
            let mut span = (last - first + 1) as u32;
            if let Some(lunch) = ctx.config.lunch_period {
                if lunch > first && lunch < last {
                    span -= 1;
                }
            }
            total += span.saturating_sub(periods.len() as u32);
        }
        total as Penalty
    }

    fn description(&self) -> &'static str {
        "Idle periods inside teachers' working days"
    }
}

/// Fraction of sessions placed outside the preferred half of the day.
#[derive(Debug, Clone, Copy)]
pub struct TimeOfDay;

impl ScoringTerm for TimeOfDay {
    fn name(&self) -> &'static str {
        "time-of-day"
    }

    fn penalty(&self, timetable: &Timetable, ctx: &ScoringContext<'_>) -> Penalty {
        if timetable.assignments.is_empty() || ctx.preferred_time == PreferredTime::Indifferent {
            return 0.0;
        }
        let misplaced = timetable
            .assignments
            .iter()
            .filter(|a| {
                let morning = ctx.config.is_morning(a.slot.period);
                match ctx.preferred_time {
                    PreferredTime::Morning => !morning,
                    PreferredTime::Afternoon => morning,
                    PreferredTime::Indifferent => false,
                }
            })
            .count();
        misplaced as Penalty / timetable.assignments.len() as Penalty
    }

    fn description(&self) -> &'static str {
        "Sessions outside the preferred half of the day"
    }
}

/// Same subject scheduled more than once per day for a section.
///
/// Multi-period sessions (labs) are exempt; their block placement is
/// intentional.
#[derive(Debug, Clone, Copy)]
pub struct DailyRepetition;

impl ScoringTerm for DailyRepetition {
    fn name(&self) -> &'static str {
        "repetition"
    }

    fn penalty(&self, timetable: &Timetable, _ctx: &ScoringContext<'_>) -> Penalty {
        let mut counts: BTreeMap<(&str, _, &str), u32> = BTreeMap::new();
        for a in &timetable.assignments {
            if a.periods > 1 {
                continue;
            }
            *counts
                .entry((a.section_id.as_str(), a.slot.day, a.subject_id.as_str()))
                .or_insert(0) += 1;
        }
        counts.values().map(|&c| c.saturating_sub(1)).sum::<u32>() as Penalty
    }

    fn description(&self) -> &'static str {
        "Repeated subject sessions within a day"
    }
}

/// Teacher runs of consecutive periods beyond the configured maximum.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveTeaching;

impl ScoringTerm for ConsecutiveTeaching {
    fn name(&self) -> &'static str {
        "consecutive"
    }

    fn penalty(&self, timetable: &Timetable, ctx: &ScoringContext<'_>) -> Penalty {
        let max = ctx.max_consecutive_periods as u32;
        let mut busy: BTreeMap<(&str, _), BTreeSet<u8>> = BTreeMap::new();
        for a in &timetable.assignments {
            for slot in a.covered_slots() {
                busy.entry((a.teacher_id.as_str(), slot.day))
                    .or_default()
                    .insert(slot.period);
            }
        }

        let mut total = 0u32;
        for periods in busy.values() {
            let mut run = 0u32;
            let mut prev: Option<u8> = None;
            for &p in periods {
                run = match prev {
                    Some(q) if p == q + 1 => run + 1,
                    _ => {
                        total += run.saturating_sub(max);
                        1
                    }
                };
                prev = Some(p);
            }
            total += run.saturating_sub(max);
        }
        total as Penalty
    }

    fn description(&self) -> &'static str {
        "Teaching runs longer than the configured maximum"
    }
}

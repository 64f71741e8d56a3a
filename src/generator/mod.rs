//! Timetable generation.
//!
//! Builds N conflict-free candidate timetables from a catalog using
//! constructive placement with backtracking repair, then ranks them.
//! Candidate constructions are independent and run in parallel; each
//! owns its mutable state (occupancy index and placement stack,
//! allocated per call and discarded on completion) while the catalog is
//! shared read-only.
//!
//! # Usage
//!
//! ```
//! use timetabler::generator::{generate, GeneratorOptions};
//! use timetabler::models::{Catalog, Room, Section, Subject, Teacher};
//!
//! let catalog = Catalog::new()
//!     .with_subject(Subject::lecture("CS-301", "CSE", 3).with_weekly_sessions(4))
//!     .with_teacher(Teacher::new("T1").with_subject("CS-301"))
//!     .with_room(Room::lecture("CR-101", 60))
//!     .with_section(Section::new("CSE-3A", "CSE", 3).with_strength(55));
//!
//! let generation = generate(&catalog, &GeneratorOptions::default()).unwrap();
//! assert!(!generation.options.is_empty());
//! assert!(generation.options[0].timetable.is_conflict_free());
//! ```
//!
//! # Reference
//! Carter & Laporte (1997), "Recent Developments in Practical Course
//! Timetabling"

mod construct;
mod problem;

use std::time::{Duration, Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Catalog;
use crate::ranking::{PreferredTime, Ranker, ScoringContext, ScoringWeights, TimetableOption};
use crate::validation::{validate_catalog, CatalogError};

use construct::{construct, OrderingProfile};
use problem::Problem;

/// Generation tuning knobs.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Candidates to construct. Defaults to 3.
    pub option_count: usize,
    /// Placement/undo steps before a candidate is abandoned.
    pub backtrack_budget: u64,
    /// Wall-clock deadline for the whole call, if any.
    pub time_budget: Option<Duration>,
    /// Seed for the diversified orderings of candidates beyond the
    /// built-in profiles.
    pub seed: u64,
    /// Time-of-day preference for ranking.
    pub preferred_time: PreferredTime,
    /// Longest acceptable consecutive teaching run, in periods.
    pub max_consecutive_periods: u8,
    /// Soft-constraint weights for ranking.
    pub weights: ScoringWeights,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            option_count: 3,
            backtrack_budget: 20_000,
            time_budget: None,
            seed: 0,
            preferred_time: PreferredTime::default(),
            max_consecutive_periods: 2,
            weights: ScoringWeights::default(),
        }
    }
}

impl GeneratorOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the candidate count.
    pub fn with_option_count(mut self, count: usize) -> Self {
        self.option_count = count;
        self
    }

    /// Sets the backtracking step budget.
    pub fn with_backtrack_budget(mut self, budget: u64) -> Self {
        self.backtrack_budget = budget;
        self
    }

    /// Sets the wall-clock deadline.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the diversification seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the time-of-day preference.
    pub fn with_preferred_time(mut self, preferred_time: PreferredTime) -> Self {
        self.preferred_time = preferred_time;
        self
    }

    /// Sets the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Why generation failed outright.
///
/// Budget or deadline exhaustion with at least one completed candidate
/// is not a failure; see [`Generation::budget_exceeded`].
/// Serializes with a `kind` tag for the consuming layer.
#[derive(Debug, Clone, Error, serde::Serialize)]
#[serde(tag = "kind")]
pub enum GenerateError {
    /// The catalog failed validation; nothing was attempted.
    #[error("invalid catalog: {}", format_catalog_errors(.errors))]
    InvalidCatalog {
        /// Everything the validator found, field-level detail included.
        errors: Vec<CatalogError>,
    },
    /// No complete candidate could be built within budget.
    #[error("no feasible timetable; unplaceable subjects: {}", .unplaceable.join(", "))]
    Unsatisfiable {
        /// Subjects that could not be scheduled.
        unplaceable: Vec<String>,
    },
}

fn format_catalog_errors(errors: &[CatalogError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A successful generation.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Ranked candidates, best first.
    pub options: Vec<TimetableOption>,
    /// True when some candidates were abandoned on budget or deadline;
    /// the returned options are still complete and conflict-free.
    pub budget_exceeded: bool,
}

/// Generates ranked candidate timetables from a catalog.
///
/// Validates the catalog, fails fast on infeasibility, constructs
/// `option_count` candidates in parallel with diversified orderings,
/// deduplicates identical results, and ranks the rest. Deterministic:
/// identical catalog and options (seed included) produce identical
/// output.
pub fn generate(
    catalog: &Catalog,
    options: &GeneratorOptions,
) -> Result<Generation, GenerateError> {
    validate_catalog(catalog).map_err(|errors| GenerateError::InvalidCatalog { errors })?;
    let problem = Problem::build(catalog)?;

    let count = options.option_count.max(1);
    let deadline = options.time_budget.map(|b| Instant::now() + b);
    info!(
        subjects = catalog.subjects.len(),
        sections = catalog.sections.len(),
        teachers = catalog.teachers.len(),
        rooms = catalog.rooms.len(),
        candidates = count,
        "generating timetables"
    );

    let outcomes: Vec<_> = (0..count)
        .into_par_iter()
        .map(|k| {
            let profile = OrderingProfile::for_candidate(k, options.seed, &catalog.config);
            construct(&problem, &profile, options.backtrack_budget, deadline)
        })
        .collect();

    let budget_exceeded = outcomes.iter().any(|o| o.aborted);
    let mut unplaceable: Vec<String> = Vec::new();
    let mut candidates = Vec::new();
    for outcome in outcomes {
        match outcome.timetable {
            Some(timetable) => {
                // Diversification can still converge; keep one copy of
                // identical candidates.
                if !candidates.contains(&timetable) {
                    candidates.push(timetable);
                }
            }
            None => unplaceable.extend(outcome.unplaceable),
        }
    }

    if candidates.is_empty() {
        unplaceable.sort();
        unplaceable.dedup();
        return Err(GenerateError::Unsatisfiable { unplaceable });
    }

    let ctx = ScoringContext::new(&catalog.config)
        .with_preferred_time(options.preferred_time)
        .with_max_consecutive(options.max_consecutive_periods);
    let ranked = Ranker::new(&options.weights).rank(candidates, &ctx);
    info!(
        returned = ranked.len(),
        budget_exceeded, "generation complete"
    );
    debug!(best_score = ranked.first().map(|o| o.score), "ranking done");

    Ok(Generation {
        options: ranked,
        budget_exceeded,
    })
}

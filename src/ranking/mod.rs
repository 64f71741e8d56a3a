//! Candidate ranking.
//!
//! Scores complete candidate timetables against soft objectives and
//! orders them for presentation. Soft objectives are [`ScoringTerm`]s
//! combined by weighted sum; weights come from configuration, never
//! from the terms themselves.
//!
//! # Usage
//!
//! ```
//! use timetabler::models::InstitutionConfig;
//! use timetabler::ranking::{Ranker, ScoringContext, ScoringWeights};
//!
//! let config = InstitutionConfig::default();
//! let ctx = ScoringContext::new(&config);
//! let ranker = Ranker::new(&ScoringWeights::default());
//! let ranked = ranker.rank(Vec::new(), &ctx);
//! assert!(ranked.is_empty());
//! ```
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent Research Directions in Automated
//! Timetabling"

pub mod terms;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

use crate::models::{InstitutionConfig, Timetable};

/// Penalty returned by a scoring term.
///
/// **Lower is better.** Terms measure how far a candidate strays from
/// the soft objective they encode.
pub type Penalty = f64;

/// Which half of the day sessions should favor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferredTime {
    /// Favor sessions before lunch.
    #[default]
    Morning,
    /// Favor sessions after lunch.
    Afternoon,
    /// No preference; the time-of-day term scores zero.
    Indifferent,
}

/// Read-only inputs shared by all scoring terms.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    /// Weekly grid bounds.
    pub config: &'a InstitutionConfig,
    /// Time-of-day preference.
    pub preferred_time: PreferredTime,
    /// Longest acceptable consecutive teaching run, in periods.
    pub max_consecutive_periods: u8,
}

impl<'a> ScoringContext<'a> {
    /// Creates a context with the default morning preference and a
    /// two-period consecutive-teaching limit.
    pub fn new(config: &'a InstitutionConfig) -> Self {
        Self {
            config,
            preferred_time: PreferredTime::default(),
            max_consecutive_periods: 2,
        }
    }

    /// Sets the time-of-day preference.
    pub fn with_preferred_time(mut self, preferred_time: PreferredTime) -> Self {
        self.preferred_time = preferred_time;
        self
    }

    /// Sets the consecutive-teaching limit.
    pub fn with_max_consecutive(mut self, periods: u8) -> Self {
        self.max_consecutive_periods = periods;
        self
    }
}

/// A soft objective evaluated over a complete timetable.
///
/// # Score Convention
/// **Lower penalty = better candidate.** Terms return raw magnitudes;
/// the [`Ranker`] applies configured weights.
pub trait ScoringTerm: Send + Sync + Debug {
    /// Term name (e.g., "balance", "gaps").
    fn name(&self) -> &'static str;

    /// Evaluates the penalty of a candidate.
    fn penalty(&self, timetable: &Timetable, ctx: &ScoringContext<'_>) -> Penalty;

    /// Term description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Weights for the built-in scoring terms.
///
/// Load balance is the reference objective at 1.0; the defaults weigh
/// teacher gaps 0.3, time-of-day 0.5, repetition 0.75, and consecutive
/// overruns 0.8 against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of per-day load balance.
    pub load_balance: f64,
    /// Weight of teacher idle gaps.
    pub teacher_gaps: f64,
    /// Weight of the time-of-day preference bonus.
    pub time_of_day: f64,
    /// Weight of same-day subject repetition.
    pub daily_repetition: f64,
    /// Weight of over-long consecutive teaching runs.
    pub consecutive_teaching: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            load_balance: 1.0,
            teacher_gaps: 0.3,
            time_of_day: 0.5,
            daily_repetition: 0.75,
            consecutive_teaching: 0.8,
        }
    }
}

/// A ranked candidate, in the shape the consuming layer expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableOption {
    /// Presentation id ("1", "2", ...), assigned after ordering.
    pub id: String,
    /// Label naming the candidate's strongest trait.
    pub label: String,
    /// Weighted penalty sum; lower is better.
    pub score: f64,
    /// The candidate itself (branch, semester, assignments).
    #[serde(flatten)]
    pub timetable: Timetable,
}

#[derive(Clone)]
struct WeightedTerm {
    term: Arc<dyn ScoringTerm>,
    weight: f64,
}

/// Orders candidates by weighted soft-constraint penalties.
pub struct Ranker {
    terms: Vec<WeightedTerm>,
}

impl Ranker {
    /// Creates a ranker with the five built-in terms at the given
    /// weights.
    pub fn new(weights: &ScoringWeights) -> Self {
        Self { terms: Vec::new() }
            .with_term(terms::LoadBalance, weights.load_balance)
            .with_term(terms::TeacherGaps, weights.teacher_gaps)
            .with_term(terms::TimeOfDay, weights.time_of_day)
            .with_term(terms::DailyRepetition, weights.daily_repetition)
            .with_term(terms::ConsecutiveTeaching, weights.consecutive_teaching)
    }

    /// Adds a weighted term.
    pub fn with_term<T: ScoringTerm + 'static>(mut self, term: T, weight: f64) -> Self {
        self.terms.push(WeightedTerm {
            term: Arc::new(term),
            weight,
        });
        self
    }

    /// Ranks candidates best-first.
    ///
    /// The label names the term where a candidate beats the candidate
    /// set's mean penalty by the widest weighted margin; a candidate
    /// that stands out nowhere is "Balanced". Ordering ties keep the
    /// construction order (stable sort), and ids are assigned after
    /// ordering.
    pub fn rank(
        &self,
        candidates: Vec<Timetable>,
        ctx: &ScoringContext<'_>,
    ) -> Vec<TimetableOption> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let breakdowns: Vec<Vec<Penalty>> = candidates
            .iter()
            .map(|t| {
                self.terms
                    .iter()
                    .map(|wt| wt.weight * wt.term.penalty(t, ctx))
                    .collect()
            })
            .collect();

        let n = candidates.len() as f64;
        let means: Vec<Penalty> = (0..self.terms.len())
            .map(|j| breakdowns.iter().map(|b| b[j]).sum::<Penalty>() / n)
            .collect();

        let mut ranked: Vec<TimetableOption> = candidates
            .into_iter()
            .zip(&breakdowns)
            .map(|(timetable, breakdown)| TimetableOption {
                id: String::new(),
                label: self.label_for(breakdown, &means, ctx),
                score: breakdown.iter().sum(),
                timetable,
            })
            .collect();

        ranked.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
        for (i, option) in ranked.iter_mut().enumerate() {
            option.id = (i + 1).to_string();
        }
        ranked
    }

    fn label_for(
        &self,
        breakdown: &[Penalty],
        means: &[Penalty],
        ctx: &ScoringContext<'_>,
    ) -> String {
        const EPSILON: f64 = 1e-9;

        let best = self
            .terms
            .iter()
            .enumerate()
            .map(|(j, wt)| (means[j] - breakdown[j], wt.term.name()))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((margin, name)) if margin > EPSILON => match name {
                "balance" => "Balanced".to_string(),
                "gaps" => "Compact".to_string(),
                "time-of-day" => match ctx.preferred_time {
                    PreferredTime::Morning => "Morning Heavy".to_string(),
                    PreferredTime::Afternoon => "Afternoon Focus".to_string(),
                    PreferredTime::Indifferent => "Even Spread".to_string(),
                },
                "repetition" => "Varied".to_string(),
                "consecutive" => "Steady".to_string(),
                other => other.to_string(),
            },
            _ => "Balanced".to_string(),
        }
    }
}

impl Debug for Ranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ranker")
            .field(
                "terms",
                &self
                    .terms
                    .iter()
                    .map(|wt| format!("{}(w={})", wt.term.name(), wt.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Day, TimeSlot};

    fn assignment(subject: &str, teacher: &str, day: Day, period: u8) -> Assignment {
        Assignment::new(
            subject,
            teacher,
            "CR-101",
            "CSE-3A",
            TimeSlot::new(day, period),
        )
    }

    /// Three sessions spread across mornings of distinct days.
    fn spread_candidate() -> Timetable {
        let mut t = Timetable::new("CSE", 3);
        t.add_assignment(assignment("CS-301", "T1", Day::Monday, 0));
        t.add_assignment(assignment("CS-302", "T2", Day::Tuesday, 0));
        t.add_assignment(assignment("CS-303", "T3", Day::Wednesday, 0));
        t
    }

    /// Three sessions crammed into one afternoon.
    fn crammed_candidate() -> Timetable {
        let mut t = Timetable::new("CSE", 3);
        t.add_assignment(assignment("CS-301", "T1", Day::Monday, 4));
        t.add_assignment(assignment("CS-302", "T2", Day::Monday, 5));
        t.add_assignment(assignment("CS-303", "T3", Day::Monday, 6));
        t
    }

    #[test]
    fn test_rank_orders_by_score() {
        let config = crate::models::InstitutionConfig::default();
        let ctx = ScoringContext::new(&config);
        let ranker = Ranker::new(&ScoringWeights::default());

        let ranked = ranker.rank(vec![crammed_candidate(), spread_candidate()], &ctx);
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].score <= ranked[1].score);
        // The spread morning candidate wins under the default weights.
        assert_eq!(ranked[0].timetable, spread_candidate());
        assert_eq!(ranked[0].id, "1");
        assert_eq!(ranked[1].id, "2");
    }

    #[test]
    fn test_single_candidate_is_balanced() {
        let config = crate::models::InstitutionConfig::default();
        let ctx = ScoringContext::new(&config);
        let ranker = Ranker::new(&ScoringWeights::default());

        let ranked = ranker.rank(vec![spread_candidate()], &ctx);
        // No candidate set to stand out from.
        assert_eq!(ranked[0].label, "Balanced");
    }

    #[test]
    fn test_labels_follow_dominant_term() {
        let config = crate::models::InstitutionConfig::default();
        let ctx = ScoringContext::new(&config);
        let ranker = Ranker::new(&ScoringWeights::default());

        let ranked = ranker.rank(vec![spread_candidate(), crammed_candidate()], &ctx);
        let spread = ranked
            .iter()
            .find(|o| o.timetable == spread_candidate())
            .unwrap();
        // The spread candidate's widest advantage is day balance.
        assert_eq!(spread.label, "Balanced");
    }

    #[test]
    fn test_weights_change_outcome() {
        let config = crate::models::InstitutionConfig::default();
        let ctx = ScoringContext::new(&config).with_preferred_time(PreferredTime::Afternoon);
        // Only time-of-day matters.
        let weights = ScoringWeights {
            load_balance: 0.0,
            teacher_gaps: 0.0,
            time_of_day: 1.0,
            daily_repetition: 0.0,
            consecutive_teaching: 0.0,
        };
        let ranker = Ranker::new(&weights);

        let ranked = ranker.rank(vec![spread_candidate(), crammed_candidate()], &ctx);
        // The crammed candidate is all-afternoon, so it wins outright.
        assert_eq!(ranked[0].timetable, crammed_candidate());
        assert_eq!(ranked[0].label, "Afternoon Focus");
    }

    #[test]
    fn test_option_serialization_shape() {
        let config = crate::models::InstitutionConfig::default();
        let ctx = ScoringContext::new(&config);
        let ranker = Ranker::new(&ScoringWeights::default());

        let ranked = ranker.rank(vec![spread_candidate()], &ctx);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert!(json.get("id").is_some());
        assert!(json.get("label").is_some());
        assert!(json.get("score").is_some());
        assert!(json.get("assignments").is_some());
    }

    #[test]
    fn test_custom_term_participates() {
        #[derive(Debug)]
        struct FlatTax;
        impl ScoringTerm for FlatTax {
            fn name(&self) -> &'static str {
                "flat-tax"
            }
            fn penalty(&self, _t: &Timetable, _ctx: &ScoringContext<'_>) -> Penalty {
                1.0
            }
        }

        let config = crate::models::InstitutionConfig::default();
        let ctx = ScoringContext::new(&config);
        let zero = ScoringWeights {
            load_balance: 0.0,
            teacher_gaps: 0.0,
            time_of_day: 0.0,
            daily_repetition: 0.0,
            consecutive_teaching: 0.0,
        };
        let ranker = Ranker::new(&zero).with_term(FlatTax, 2.0);

        let ranked = ranker.rank(vec![spread_candidate()], &ctx);
        assert!((ranked[0].score - 2.0).abs() < 1e-10);
    }
}

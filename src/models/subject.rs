//! Subject model.
//!
//! A subject is a course taught to one (branch, semester) group:
//! its weekly session count, session length in periods, and whether
//! it needs a lab room.

use serde::{Deserialize, Serialize};

/// Subject classification. Determines room eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    /// Taught in a lecture room, one period per session.
    Lecture,
    /// Taught in a lab room; lab sessions usually span two periods.
    Lab,
}

/// A subject to be placed on the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier (e.g., "CS-301").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Department/branch the subject belongs to (e.g., "CSE").
    pub branch: String,
    /// Semester the subject is taught in.
    pub semester: u8,
    /// Sessions required per week. Must be ≥ 1.
    pub weekly_sessions: u32,
    /// Consecutive periods one session spans. Must be ≥ 1.
    pub periods_per_session: u8,
    /// Lecture or lab.
    pub kind: SubjectKind,
}

impl Subject {
    /// Creates a single-period lecture subject with one weekly session.
    pub fn lecture(id: impl Into<String>, branch: impl Into<String>, semester: u8) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            branch: branch.into(),
            semester,
            weekly_sessions: 1,
            periods_per_session: 1,
            kind: SubjectKind::Lecture,
        }
    }

    /// Creates a lab subject. Lab sessions span two periods.
    pub fn lab(id: impl Into<String>, branch: impl Into<String>, semester: u8) -> Self {
        Self {
            periods_per_session: 2,
            kind: SubjectKind::Lab,
            ..Self::lecture(id, branch, semester)
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekly session count.
    pub fn with_weekly_sessions(mut self, sessions: u32) -> Self {
        self.weekly_sessions = sessions;
        self
    }

    /// Sets the session length in periods.
    pub fn with_periods_per_session(mut self, periods: u8) -> Self {
        self.periods_per_session = periods;
        self
    }

    /// Whether this subject needs a lab room.
    pub fn is_lab(&self) -> bool {
        self.kind == SubjectKind::Lab
    }

    /// Total periods this subject occupies per week.
    pub fn weekly_periods(&self) -> u32 {
        self.weekly_sessions * self.periods_per_session as u32
    }
}

//! Input validation for timetable generation.
//!
//! Checks structural integrity of the catalog before generation.
//! Detects:
//! - Duplicate IDs
//! - Broken subject references
//! - Subjects nobody can teach or no room can host
//! - Weekly demand that cannot fit the grid
//! - Sections spanning more than one (branch, semester) group
//!
//! Validation runs once per generation request and short-circuits the
//! generator on failure. Every problem found is reported, not just the
//! first.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::Catalog;

/// Validation result.
pub type ValidationResult = Result<(), Vec<CatalogError>>;

/// A catalog validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogError {
    /// Error category.
    pub kind: CatalogErrorKind,
    /// Human-readable description naming the offending field.
    pub message: String,
}

/// Categories of catalog errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// The grid config is unusable (no days, no teaching periods,
    /// lunch outside the day).
    InvalidConfig,
    /// No subjects or no sections to schedule.
    EmptyCatalog,
    /// A subject's session counts are out of range.
    InvalidSessionCount,
    /// A teacher references a subject that doesn't exist.
    UnknownSubject,
    /// No teacher may teach a subject.
    NoEligibleTeacher,
    /// No room suits a subject (kind mismatch or capacity short).
    NoEligibleRoom,
    /// A subject's weekly periods exceed the teaching slots in a week.
    ExcessiveSessions,
    /// A session is longer than any uninterrupted run of the day.
    SessionTooLong,
    /// Sections or subjects span more than one (branch, semester) group.
    GroupMismatch,
}

impl CatalogError {
    fn new(kind: CatalogErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a generation catalog.
///
/// Checks:
/// 1. Grid config is usable (days, periods, lunch in range)
/// 2. At least one subject and one section
/// 3. No duplicate subject/teacher/room/section IDs
/// 4. Subject session counts within range and within the grid
/// 5. Teacher subject references resolve
/// 6. Every subject has an eligible teacher and an eligible room
/// 7. Sections and subjects form a single (branch, semester) group
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();
    let config = &catalog.config;

    if config.days_per_week == 0 || config.days_per_week > 6 {
        errors.push(CatalogError::new(
            CatalogErrorKind::InvalidConfig,
            format!("days_per_week must be 1..=6, got {}", config.days_per_week),
        ));
    }
    if let Some(lunch) = config.lunch_period {
        if lunch >= config.periods_per_day {
            errors.push(CatalogError::new(
                CatalogErrorKind::InvalidConfig,
                format!(
                    "lunch_period {} outside the day (periods_per_day {})",
                    lunch, config.periods_per_day
                ),
            ));
        }
    }
    if config.teaching_slots_per_week() == 0 {
        errors.push(CatalogError::new(
            CatalogErrorKind::InvalidConfig,
            "config yields zero teaching slots per week",
        ));
    }

    if catalog.subjects.is_empty() {
        errors.push(CatalogError::new(
            CatalogErrorKind::EmptyCatalog,
            "catalog has no subjects",
        ));
    }
    if catalog.sections.is_empty() {
        errors.push(CatalogError::new(
            CatalogErrorKind::EmptyCatalog,
            "catalog has no sections",
        ));
    }

    check_duplicate_ids(catalog, &mut errors);
    check_group_homogeneity(catalog, &mut errors);

    // Teacher subject references
    let subject_ids: HashSet<&str> = catalog.subjects.iter().map(|s| s.id.as_str()).collect();
    for teacher in &catalog.teachers {
        for subject_id in &teacher.subject_ids {
            if !subject_ids.contains(subject_id.as_str()) {
                errors.push(CatalogError::new(
                    CatalogErrorKind::UnknownSubject,
                    format!(
                        "Teacher '{}' references unknown subject '{}'",
                        teacher.id, subject_id
                    ),
                ));
            }
        }
    }

    // Per-subject feasibility against the grid and the rosters.
    // Skip when the grid itself is broken; the messages would be noise.
    if config.teaching_slots_per_week() > 0 {
        check_subjects(catalog, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicate_ids(catalog: &Catalog, errors: &mut Vec<CatalogError>) {
    let mut seen = HashSet::new();
    for s in &catalog.subjects {
        if !seen.insert(s.id.as_str()) {
            errors.push(CatalogError::new(
                CatalogErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", s.id),
            ));
        }
    }

    let mut seen = HashSet::new();
    for t in &catalog.teachers {
        if !seen.insert(t.id.as_str()) {
            errors.push(CatalogError::new(
                CatalogErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", t.id),
            ));
        }
    }

    let mut seen = HashSet::new();
    for r in &catalog.rooms {
        if !seen.insert(r.id.as_str()) {
            errors.push(CatalogError::new(
                CatalogErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut seen = HashSet::new();
    for s in &catalog.sections {
        if !seen.insert(s.id.as_str()) {
            errors.push(CatalogError::new(
                CatalogErrorKind::DuplicateId,
                format!("Duplicate section ID: {}", s.id),
            ));
        }
    }
}

fn check_group_homogeneity(catalog: &Catalog, errors: &mut Vec<CatalogError>) {
    let group = match catalog.sections.first() {
        Some(first) => (first.branch.as_str(), first.semester),
        None => return,
    };

    for section in &catalog.sections[1..] {
        if (section.branch.as_str(), section.semester) != group {
            errors.push(CatalogError::new(
                CatalogErrorKind::GroupMismatch,
                format!(
                    "Section '{}' is {}/sem {}, expected {}/sem {}",
                    section.id, section.branch, section.semester, group.0, group.1
                ),
            ));
        }
    }

    for subject in &catalog.subjects {
        if (subject.branch.as_str(), subject.semester) != group {
            errors.push(CatalogError::new(
                CatalogErrorKind::GroupMismatch,
                format!(
                    "Subject '{}' is {}/sem {}, outside the {}/sem {} group being scheduled",
                    subject.id, subject.branch, subject.semester, group.0, group.1
                ),
            ));
        }
    }
}

fn check_subjects(catalog: &Catalog, errors: &mut Vec<CatalogError>) {
    let slots_per_week = catalog.config.teaching_slots_per_week() as u32;
    let longest_run = catalog.config.longest_run();
    let max_strength = catalog.max_strength();

    for subject in &catalog.subjects {
        if subject.weekly_sessions < 1 {
            errors.push(CatalogError::new(
                CatalogErrorKind::InvalidSessionCount,
                format!("Subject '{}' requires zero weekly sessions", subject.id),
            ));
        }
        if subject.periods_per_session < 1 {
            errors.push(CatalogError::new(
                CatalogErrorKind::InvalidSessionCount,
                format!("Subject '{}' has a zero-period session", subject.id),
            ));
            continue;
        }

        if subject.weekly_periods() > slots_per_week {
            errors.push(CatalogError::new(
                CatalogErrorKind::ExcessiveSessions,
                format!(
                    "Subject '{}' needs {} periods/week but the grid has {} teaching slots",
                    subject.id,
                    subject.weekly_periods(),
                    slots_per_week
                ),
            ));
        }

        if subject.periods_per_session > longest_run {
            errors.push(CatalogError::new(
                CatalogErrorKind::SessionTooLong,
                format!(
                    "Subject '{}' sessions span {} periods but the longest uninterrupted run is {}",
                    subject.id, subject.periods_per_session, longest_run
                ),
            ));
        }

        if catalog.eligible_teachers(&subject.id).is_empty() {
            errors.push(CatalogError::new(
                CatalogErrorKind::NoEligibleTeacher,
                format!("No teacher may teach subject '{}'", subject.id),
            ));
        }

        if catalog.eligible_rooms(subject, max_strength).is_empty() {
            errors.push(CatalogError::new(
                CatalogErrorKind::NoEligibleRoom,
                format!(
                    "No {} room seats {} for subject '{}'",
                    if subject.is_lab() { "lab" } else { "lecture" },
                    max_strength,
                    subject.id
                ),
            ));
        }
    }
}

//! Input catalog.
//!
//! The catalog bundles the read-only inputs of one generation request:
//! subjects, teachers, rooms, sections, and the institution's weekly
//! grid. It is shared across all candidate constructions and never
//! mutated during generation.

use serde::{Deserialize, Serialize};

use super::{InstitutionConfig, Room, Section, Subject, Teacher};

/// Read-only inputs for a generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Subjects to schedule.
    pub subjects: Vec<Subject>,
    /// Teaching staff.
    pub teachers: Vec<Teacher>,
    /// Available rooms.
    pub rooms: Vec<Room>,
    /// Class sections to build schedules for.
    pub sections: Vec<Section>,
    /// Weekly grid bounds.
    pub config: InstitutionConfig,
}

impl Catalog {
    /// Creates an empty catalog with the default grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Sets the institution config.
    pub fn with_config(mut self, config: InstitutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Finds a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Finds a teacher by id.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Finds a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Finds a section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Teachers who may teach a subject, sorted by id for deterministic
    /// enumeration order.
    pub fn eligible_teachers(&self, subject_id: &str) -> Vec<&Teacher> {
        let mut eligible: Vec<&Teacher> = self
            .teachers
            .iter()
            .filter(|t| t.can_teach(subject_id))
            .collect();
        eligible.sort_by(|a, b| a.id.cmp(&b.id));
        eligible
    }

    /// Rooms whose kind suits the subject and whose capacity seats the
    /// given strength, sorted by id.
    pub fn eligible_rooms(&self, subject: &Subject, strength: u32) -> Vec<&Room> {
        let mut eligible: Vec<&Room> = self
            .rooms
            .iter()
            .filter(|r| r.suits(subject.kind) && r.fits(strength))
            .collect();
        eligible.sort_by(|a, b| a.id.cmp(&b.id));
        eligible
    }

    /// Largest enrolled strength across sections.
    pub fn max_strength(&self) -> u32 {
        self.sections.iter().map(|s| s.strength).max().unwrap_or(0)
    }
}

//! Timetabling domain models.
//!
//! Core data types for representing timetable generation problems and
//! their solutions.
//!
//! # Entities
//!
//! | Type | Role |
//! |------|------|
//! | `Subject` | Course with weekly session demand |
//! | `Teacher` | Staff with teachable subjects and unavailability |
//! | `Room` | Typed, capacity-bounded venue |
//! | `Section` | Class group being scheduled |
//! | `TimeSlot` | (day, period) grid cell |
//! | `Assignment` | One placed session |
//! | `Timetable` | Complete weekly schedule (solution) |
//! | `Catalog` | Read-only generation inputs |

mod catalog;
mod room;
mod section;
mod slot;
mod subject;
mod teacher;
mod timetable;

pub use catalog::Catalog;
pub use room::{Room, RoomKind};
pub use section::Section;
pub use slot::{Day, InstitutionConfig, TimeSlot};
pub use subject::{Subject, SubjectKind};
pub use teacher::Teacher;
pub use timetable::{Assignment, Timetable};

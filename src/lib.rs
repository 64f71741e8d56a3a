//! Automated timetable generation with conflict detection.
//!
//! Given a catalog of subjects, teachers, rooms, and class sections,
//! produces multiple ranked, conflict-free weekly timetables and
//! answers single-assignment clash queries against committed schedules.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Subject`, `Teacher`, `Room`,
//!   `Section`, `TimeSlot`, `Assignment`, `Timetable`, `Catalog`
//! - **`validation`**: Catalog integrity checks (duplicate IDs, broken
//!   references, infeasible weekly demand)
//! - **`constraint`**: The hard-constraint checker — no teacher, room,
//!   or section double-booking
//! - **`generator`**: Constructive placement with backtracking repair;
//!   parallel diversified candidates
//! - **`ranking`**: Weighted soft-constraint scoring and candidate
//!   ordering
//! - **`inspector`**: Clash reports for proposed changes to a committed
//!   timetable
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Carter & Laporte (1997), "Recent Developments in Practical Course
//!   Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated
//!   Timetabling"

pub mod constraint;
pub mod generator;
pub mod inspector;
pub mod models;
pub mod ranking;
pub mod validation;

//! Days, periods, and the institution's weekly slot grid.
//!
//! A week is a grid of (day, period) cells. The institution config
//! bounds the grid and marks an optional lunch period that no session
//! may cover.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", §2

use serde::{Deserialize, Serialize};
use std::fmt;

/// A teaching day. Six-day weeks are common in the target institutions;
/// `days_per_week` in [`InstitutionConfig`] trims the tail for shorter weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Zero-based index within the week (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day for a zero-based week index, if in range.
    pub fn from_index(index: usize) -> Option<Day> {
        Day::ALL.get(index).copied()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}

/// One cell of the weekly grid.
///
/// Identity is the (day, period) pair. Slots order day-major, then by
/// period, so they are totally ordered within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of week.
    pub day: Day,
    /// Zero-based period index within the day.
    pub period: u8,
}

impl TimeSlot {
    /// Creates a slot.
    pub fn new(day: Day, period: u8) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P{}", self.day, self.period)
    }
}

/// Weekly grid bounds and the lunch break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionConfig {
    /// Teaching days per week (1..=6).
    pub days_per_week: u8,
    /// Periods per day.
    pub periods_per_day: u8,
    /// Period reserved for lunch, if any. No session may cover it.
    pub lunch_period: Option<u8>,
}

impl Default for InstitutionConfig {
    /// Six days, seven periods, lunch after the third period.
    fn default() -> Self {
        Self::new(6, 7).with_lunch_period(3)
    }
}

impl InstitutionConfig {
    /// Creates a config with no lunch break.
    pub fn new(days_per_week: u8, periods_per_day: u8) -> Self {
        Self {
            days_per_week,
            periods_per_day,
            lunch_period: None,
        }
    }

    /// Sets the lunch period.
    pub fn with_lunch_period(mut self, period: u8) -> Self {
        self.lunch_period = Some(period);
        self
    }

    /// Teaching days in week order.
    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        Day::ALL
            .into_iter()
            .take(self.days_per_week.min(6) as usize)
    }

    /// Whether a period index is a teaching period (in range, not lunch).
    pub fn is_teaching_period(&self, period: u8) -> bool {
        period < self.periods_per_day && Some(period) != self.lunch_period
    }

    /// All teaching slots, day-major, period ascending.
    pub fn teaching_slots(&self) -> Vec<TimeSlot> {
        let mut slots = Vec::new();
        for day in self.days() {
            for period in 0..self.periods_per_day {
                if self.is_teaching_period(period) {
                    slots.push(TimeSlot::new(day, period));
                }
            }
        }
        slots
    }

    /// Number of teaching slots in a week.
    pub fn teaching_slots_per_week(&self) -> usize {
        let per_day = self.teaching_periods_per_day();
        per_day * self.days_per_week.min(6) as usize
    }

    /// Teaching periods in one day.
    pub fn teaching_periods_per_day(&self) -> usize {
        (0..self.periods_per_day)
            .filter(|&p| self.is_teaching_period(p))
            .count()
    }

    /// Whether a run of `periods` consecutive periods starting at
    /// `start` stays within the day and covers only teaching periods.
    pub fn run_fits(&self, start: u8, periods: u8) -> bool {
        if periods == 0 || start as u32 + periods as u32 > self.periods_per_day as u32 {
            return false;
        }
        (start..start + periods).all(|p| self.is_teaching_period(p))
    }

    /// Valid start slots for a session spanning `periods` consecutive
    /// periods, day-major, period ascending.
    pub fn session_start_slots(&self, periods: u8) -> Vec<TimeSlot> {
        let mut slots = Vec::new();
        for day in self.days() {
            for start in 0..self.periods_per_day {
                if self.run_fits(start, periods) {
                    slots.push(TimeSlot::new(day, start));
                }
            }
        }
        slots
    }

    /// Longest uninterrupted run of teaching periods in a day.
    pub fn longest_run(&self) -> u8 {
        let mut longest = 0u8;
        let mut current = 0u8;
        for p in 0..self.periods_per_day {
            if self.is_teaching_period(p) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        longest
    }

    /// Whether a period falls in the morning half of the day.
    ///
    /// The lunch period is the divider when present; otherwise the
    /// midpoint of the day.
    pub fn is_morning(&self, period: u8) -> bool {
        match self.lunch_period {
            Some(lunch) => period < lunch,
            None => period < self.periods_per_day / 2,
        }
    }
}

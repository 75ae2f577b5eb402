use std::fmt;

use serde::{Deserialize, Serialize};

/// School day a timetable entry falls on. Weekends never appear in the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fortnightly timetable cycle. Serializes as `weekA` / `weekB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeekLabel {
    #[default]
    WeekA,
    WeekB,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub day: Weekday,
    pub period: String,
    pub course: String,
    pub class_code: String,
    pub teacher: String,
    pub room: String,
}

/// Both weeks of the timetable, each in page order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub week_a: Vec<TimetableEntry>,
    pub week_b: Vec<TimetableEntry>,
}

impl Timetable {
    pub fn week(&self, week: WeekLabel) -> &[TimetableEntry] {
        match week {
            WeekLabel::WeekA => &self.week_a,
            WeekLabel::WeekB => &self.week_b,
        }
    }

    pub fn week_mut(&mut self, week: WeekLabel) -> &mut Vec<TimetableEntry> {
        match week {
            WeekLabel::WeekA => &mut self.week_a,
            WeekLabel::WeekB => &mut self.week_b,
        }
    }

    pub fn len(&self) -> usize {
        self.week_a.len() + self.week_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

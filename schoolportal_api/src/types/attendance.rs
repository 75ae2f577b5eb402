use serde::{Deserialize, Serialize};

/// Whole-year attendance summary row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceYearly {
    /// Four digit year, e.g. `2024`.
    pub year: String,
    pub school_days: i64,
    pub whole_day_absences: i64,
    pub whole_day_percentage: f64,
    pub partial_absences: f64,
    pub total_percentage: f64,
}

/// Per-class roll statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSubject {
    pub class_code: String,
    pub rolls_marked: i64,
    pub absent: i64,
    pub percentage: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub yearly: Vec<AttendanceYearly>,
    pub subjects: Vec<AttendanceSubject>,
}

impl Attendance {
    pub fn is_empty(&self) -> bool {
        self.yearly.is_empty() && self.subjects.is_empty()
    }
}

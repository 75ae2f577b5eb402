use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attendance, CalendarEvent, ClassInfo, Grade, Notice, Report, Timetable};

/// Numeric portal user id; every page URL is parameterized by it.
pub type UserId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Everything one crawl collected, handed to the sync endpoint as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecord {
    pub user: UserInfo,
    pub timetable: Timetable,
    pub notices: Vec<Notice>,
    pub grades: Vec<Grade>,
    pub attendance: Attendance,
    pub reports: Vec<Report>,
    pub calendar: Vec<CalendarEvent>,
    pub classes: Vec<ClassInfo>,
    pub last_updated: DateTime<Utc>,
}

impl AggregateRecord {
    pub fn new(user: UserInfo) -> Self {
        Self {
            user,
            timetable: Timetable::default(),
            notices: Vec::new(),
            grades: Vec::new(),
            attendance: Attendance::default(),
            reports: Vec::new(),
            calendar: Vec::new(),
            classes: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

//! Normalized data model produced by one crawl of the portal.

mod attendance;
pub use self::attendance::{Attendance, AttendanceSubject, AttendanceYearly};

mod calendar;
pub use self::calendar::{CalendarEvent, EventKind};

mod class;
pub use self::class::ClassInfo;

mod grade;
pub use self::grade::Grade;

mod notice;
pub use self::notice::Notice;

mod record;
pub use self::record::{AggregateRecord, UserId, UserInfo};

mod report;
pub use self::report::Report;

mod timetable;
pub use self::timetable::{Timetable, TimetableEntry, WeekLabel, Weekday};

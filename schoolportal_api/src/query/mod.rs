mod common;
pub use self::common::{PageQuery, Query};

mod notice;
pub use self::notice::{encode_notice_date, NoticeQuery};

mod calendar;
pub use self::calendar::CalendarQuery;

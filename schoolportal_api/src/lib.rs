mod client;
mod errors;
mod query;
mod sync;
pub mod types;
pub mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{encode_notice_date, CalendarQuery, NoticeQuery, PageQuery, Query};
pub use self::sync::SyncClient;

pub mod decimal_utils;
pub mod time_utils;

pub use decimal_utils::{checked_add, checked_sub, checked_sum};
pub use time_utils::{end_of_day, start_of_day, today_utc, DateTimeRange};

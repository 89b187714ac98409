//! Schedule time handling: visit report dates and decimal years.

pub mod decimal_year;

pub use decimal_year::{
    decimal_year, from_decimal_year, parse_vsr_date, round3, ScheduleDate, SCHEDULE_FORMAT,
};

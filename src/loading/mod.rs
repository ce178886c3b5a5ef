//! This module is responsible for loading raw feed tables and building the
//! indexed timetable the search consults.

mod builder;
mod config;
pub mod gtfs;

pub use builder::load_timetable;
pub use config::TimetableConfig;

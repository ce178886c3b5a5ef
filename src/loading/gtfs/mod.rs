//! Raw feed tables and their conversion into the indexed timetable.

pub mod parser;
pub mod processor;
pub mod raw_types;

pub use parser::deserialize_feed_file;
pub use processor::build_timetable;
pub use raw_types::{Feed, FeedPathway, FeedRoute, FeedStop, FeedStopTime, FeedTransfer, FeedTrip};

pub mod error;
pub mod schedule;

// CSV row types
pub mod csv;

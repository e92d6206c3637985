pub mod schedule;
pub mod schedule_cache;

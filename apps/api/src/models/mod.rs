pub mod job;
pub mod optimization;
pub mod resume;

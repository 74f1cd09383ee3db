pub mod candidate;
pub mod resume;

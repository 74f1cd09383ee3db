// In-memory job board. Postings live only as long as the process.

pub mod board;
pub mod form;
pub mod handlers;
pub mod models;

pub use board::JobBoard;

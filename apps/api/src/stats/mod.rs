pub mod aggregation;
pub mod handlers;
pub mod leaderboard;

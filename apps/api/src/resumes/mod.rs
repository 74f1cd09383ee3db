// Resume library: resumes and analyses owned by signed-in users, stored in Postgres.

pub mod handlers;
pub mod input;
pub mod repository;

// Candidate directory: paginated listing from the analysis service, with search,
// category filter and sort applied to the loaded page only.

pub mod feed;
pub mod handlers;
pub mod query;

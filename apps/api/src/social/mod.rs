// Users and posts: the ingestion side that feeds the similarity graph.

pub mod handlers;
pub mod posts;
pub mod users;

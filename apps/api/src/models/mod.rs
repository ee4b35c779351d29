pub mod graph;
pub mod post;
pub mod user;

pub mod cast;
pub mod genre;
pub mod movie;
pub mod user;

pub mod prelude;

pub mod cast_members;
pub mod genres;
pub mod movie_casts;
pub mod movie_genres;
pub mod movies;
pub mod users;

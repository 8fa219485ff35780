pub use super::cast_members::Entity as CastMembers;
pub use super::genres::Entity as Genres;
pub use super::movie_casts::Entity as MovieCasts;
pub use super::movie_genres::Entity as MovieGenres;
pub use super::movies::Entity as Movies;
pub use super::users::Entity as Users;

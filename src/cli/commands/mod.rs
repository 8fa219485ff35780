mod list;
mod reconcile;
mod seed;
mod user;

pub use list::cmd_list_movies;
pub use reconcile::cmd_reconcile;
pub use seed::cmd_seed;
pub use user::cmd_create_user;

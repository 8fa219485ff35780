pub mod image;
pub use image::{ImageError, ImageService};

pub mod legacy;
pub use legacy::{LegacyCatalog, LegacyRecord};

pub mod reconcile;
pub use reconcile::{ReconcileReport, ReconcileService};

pub mod movie_service;
pub mod movie_service_impl;
pub use movie_service::{MovieError, MovieService};
pub use movie_service_impl::SeaOrmMovieService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

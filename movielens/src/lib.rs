pub mod config;
pub mod error;
pub mod films;
pub mod loader;
pub mod movies;

pub use config::DataConfig;
pub use error::{DataErr, Result};
pub use factorization::{Rating, rating::shape};
pub use films::FilmGroup;
pub use loader::{add_missing_ratings, load_data, load_ratings, load_test_data, load_train_data};
pub use movies::{Genre, Movie, MovieTable, load_movie_table, load_movies};

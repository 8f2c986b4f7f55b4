pub mod ports;
pub mod postgres;

pub use ports::{MovieRepository, UserRepository};
pub use postgres::{PostgresMovieRepository, PostgresUserRepository, connect, run_migrations};

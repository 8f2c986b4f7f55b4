pub mod handlers;
mod range;

pub use handlers::stream_movie;

mod normalizer;

pub use normalizer::{MEDIA_EXTENSIONS, clean_title, has_media_extension};

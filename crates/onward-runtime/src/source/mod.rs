mod dir;

pub use dir::{slugify, DirectorySource};

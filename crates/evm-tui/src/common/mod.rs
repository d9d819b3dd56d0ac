//! Helpers shared by render paths.

pub mod text;

pub use text::{display_width, truncate_with_ellipsis};

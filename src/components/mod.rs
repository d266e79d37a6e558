pub mod thumbnail;

pub use thumbnail::{RenderMode, ThumbnailComponent};

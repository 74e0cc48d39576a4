//! Command implementations for wikimovies CLI

mod crawl;
mod misc;
mod page;

pub use crawl::*;
pub use misc::*;
pub use page::*;

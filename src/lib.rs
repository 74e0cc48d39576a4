pub mod category;
pub mod cell;
pub mod claims;
pub mod clean;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod infobox;
pub mod normalize;
pub mod page;
pub mod record;
pub mod sink;
pub mod year;

pub use error::{Result, WikiMoviesError};
pub use record::MovieRecord;

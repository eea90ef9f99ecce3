pub mod chunk;
pub mod config;
pub mod document;

pub use chunk::*;
pub use config::Config;
pub use document::*;

pub mod config;
pub mod position;
pub mod vault;

pub use config::*;
pub use position::*;
pub use vault::*;

mod config;
mod timing;

pub use config::*;
pub use timing::*;

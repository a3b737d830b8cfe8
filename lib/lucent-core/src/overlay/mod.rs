pub use config::*;
pub use manager::*;
pub use window_set::*;

mod config;
mod manager;
mod window_set;

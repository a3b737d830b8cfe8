pub use common::*;
pub use traits::*;
pub use winit_host::*;

mod common;
pub mod mock;
mod native;
mod traits;
mod winit_host;

pub mod action;
pub mod config;
pub mod log_surface;
pub mod session;
pub mod sources;

pub use action::*;
pub use config::*;
pub use log_surface::*;
pub use session::*;
pub use sources::*;

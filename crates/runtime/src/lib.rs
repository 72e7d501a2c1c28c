pub mod event_bus;
pub mod feed;

pub use event_bus::*;
pub use feed::*;

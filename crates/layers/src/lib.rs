pub mod category;
pub mod error;
pub mod layer;
pub mod marker;
pub mod overlay;
pub mod presentation;
#[cfg(any(test, feature = "test-support"))]
pub mod recording;
pub mod registry;
pub mod route;
pub mod surface;
pub mod symbology;

pub use category::*;
pub use error::*;
pub use layer::*;
pub use marker::*;
pub use overlay::*;
pub use presentation::*;
pub use registry::*;
pub use route::*;
pub use surface::*;
pub use symbology::*;

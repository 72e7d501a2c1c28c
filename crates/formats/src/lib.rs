pub mod feature_collection;
pub mod route_records;

pub use feature_collection::*;
pub use route_records::*;

pub mod error;
pub mod reporting;
pub mod service;
pub mod summary;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use summary::*;

//! Type definitions

pub mod report;
pub mod route;
pub mod stop;

pub use report::*;
pub use route::*;
pub use stop::*;

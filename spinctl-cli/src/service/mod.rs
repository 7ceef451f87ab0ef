//! Service layer
//!
//! Services contain the business logic of spinctl. They orchestrate
//! repository calls and own the concurrency and failure policy of bulk
//! operations.
//!
//! All services are trait-based to enable testing and dependency injection.

mod spin;

pub use spin::{SpinService, StandardSpinService};

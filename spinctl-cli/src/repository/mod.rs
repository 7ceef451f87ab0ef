//! Repository layer
//!
//! Repositories wrap the Gate HTTP client with knowledge of the API's
//! resource paths and authentication. They contain no business logic and
//! pass client errors through untouched.
//!
//! Repositories are trait-based so services can be tested against fakes.

mod spin;

pub use spin::{EXECUTION_PAGE_SIZE, HttpSpinRepository, SpinRepository};

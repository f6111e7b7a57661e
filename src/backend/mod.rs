//! Backend abstraction layer
//!
//! Provides the traits a GPU backend implements to host mega mesh buffers,
//! plus a dummy backend for headless use.

pub mod dummy;
pub mod traits;
pub mod types;

pub use dummy::{DummyBackend, DummyBuffer, RecordedCommand};
pub use traits::*;
pub use types::*;

// Application layer: the ledger operations every client (CLI, tests) goes
// through. Validation lives here; SQL lives in `storage`.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;

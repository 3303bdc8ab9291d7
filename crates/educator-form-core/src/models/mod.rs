//! Domain models for the educator form.

mod contact;
mod document;
mod feedback;
mod field;
mod snapshot;

pub use contact::*;
pub use document::*;
pub use feedback::*;
pub use field::*;
pub use snapshot::*;

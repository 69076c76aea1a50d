//! Tracity API: the operations behind the HTTP surface.
//!
//! Every operation is a function of its inputs plus the two injected
//! collaborators (document store and text generator). Records are cleaned
//! of storage identity before they leave this crate.

pub mod chat;
pub mod envelopes;
pub mod service;

pub use envelopes::*;
pub use service::TracityApi;

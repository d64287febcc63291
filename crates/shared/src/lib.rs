//! Action vocabulary and data model shared by the REST wrappers and the
//! state-orchestration layer.

pub mod category;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod record;

pub use category::{Category, ErrorShape, Mode, Verb};
pub use protocol::{Action, Envelope, Payload, Request, ResponseKind, Ticket};
pub use record::{Page, Record};

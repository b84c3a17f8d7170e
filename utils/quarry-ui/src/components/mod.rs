//! Reusable [`Message`][crate::Message] implementations.

pub use status::*;
pub use typed::*;

mod status;
mod typed;

//! Telegram adapter: polling router and update handlers.
//!
//! The transport stays thin. Handlers translate teloxide updates into
//! `InboundMessage`s, hand them to the core conversation handler, and send
//! the returned text back verbatim.

mod handlers;
pub mod router;

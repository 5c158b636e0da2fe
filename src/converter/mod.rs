//!
//! Format conversion between the agent runtime and the chat-completion wire format.
//!
//! The runtime speaks in structured turns; OpenAI-compatible endpoints speak in flat,
//! role-tagged messages. Conversion only goes one way: replies come back as free text
//! and are decoded by [`crate::extractor`].
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- modules --------------------------------------------------------------------------------- */

pub mod turns_to_wire;

/* --- start of code -------------------------------------------------------------------------- */

pub use turns_to_wire::TurnsToWireConverter;

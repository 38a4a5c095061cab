//! Realtime channel: wire protocol and socket lifecycle.

pub mod connection;
pub mod protocol;

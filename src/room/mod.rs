//! Session registry and per-session coordination.

pub mod manager;

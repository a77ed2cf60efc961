//! WebRTC signaling relay library.
//!
//! Peers join named rooms over WebSocket and exchange SDP offers/answers and ICE
//! candidates through this server. Media never passes through it.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

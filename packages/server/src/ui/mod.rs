//! WebSocket signaling server and HTTP collaborator surface.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, build_router};
pub use state::AppState;

//! Server configuration.

use crate::domain::DuplicateJoinPolicy;

/// Runtime configuration of the signaling server
///
/// Built from command line arguments by the `tsunagi-server` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// What to do when a `(room, userId)` that is already present joins again
    pub duplicate_join_policy: DuplicateJoinPolicy,
    /// Emit `screen-share-stopped` for the previous sharer when a new one takes over
    pub announce_replaced_sharer: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            duplicate_join_policy: DuplicateJoinPolicy::default(),
            announce_replaced_sharer: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

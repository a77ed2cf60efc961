//! InMemory 実装（HashMap をインメモリ DB として使用）

mod connection_directory;
mod room_registry;

pub use connection_directory::InMemoryConnectionDirectory;
pub use room_registry::InMemoryRoomRegistry;

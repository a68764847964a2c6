//! Key-value store backends
//!
//! | Backend | Durability | Use |
//! |---------|------------|-----|
//! | [`MemoryStore`] | process lifetime | tests, one-off sessions |
//! | [`FileStore`] | one JSON file per key | default for the CLI |

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

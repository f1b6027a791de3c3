// ABOUTME: Modview credential store
// ABOUTME: An injectable session holding a durable user token and a volatile admin token

pub mod error;
pub mod session;
pub mod storage;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use session::Session;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenPersistence};

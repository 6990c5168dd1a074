mod session;

pub use session::{Identity, MemoryAuthSession, TokenStore};

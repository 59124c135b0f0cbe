//! Authentication layer: signature recovery, session credentials, and the
//! cookie-based auth gate.

pub mod middleware;
pub mod session;
pub mod verify;

pub use middleware::{AppState, AuthWallet, TOKEN_COOKIE};
pub use session::{generate_nonce, Claims, Sessions, TokenError};
pub use verify::recover_signer;

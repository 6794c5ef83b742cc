pub mod claims;
pub mod context;
pub mod middleware;
pub mod session;

pub use claims::Claims;
pub use context::AuthContext;
pub use middleware::RequireAuth;
pub use session::{IssuedSession, SessionError, SessionManager};

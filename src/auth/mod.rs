//! Account credentials and the per-request session state that gates access
//! to a user's own ledger data.

mod cookie;
mod credentials;
mod middleware;
mod password;
mod session;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_session_cookies, read_session, write_session};
pub use credentials::{User, create_user, create_users_table, get_user, update_password, verify_user};
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::PasswordHash;
pub use session::{Identity, Session};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_EXPIRY, COOKIE_IDENTITY};

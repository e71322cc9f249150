mod password;
mod session;
mod store;

pub use password::PasswordScheme;
pub use session::{AuthPage, Session, SessionState, SignupForm, RESET_ACK};
pub use store::{CredentialStore, UserRecord};

use super::store::CredentialStore;
use crate::error::AuthError;

/// Acknowledgement shown for every password reset request.
pub const RESET_ACK: &str = "If an account exists with this email, you'll receive a reset link";

/// Which auth form a logged-out visitor is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPage {
    Login,
    Signup,
    Forgot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut { page: AuthPage },
    LoggedIn { username: String },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::LoggedOut {
            page: AuthPage::Login,
        }
    }
}

/// Signup form contents.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// One visitor's session. Every transition goes through these methods; a
/// rejected action leaves the state untouched.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn { .. })
    }

    /// Identity of the current session, only while logged in.
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { username } => Some(username.as_str()),
            SessionState::LoggedOut { .. } => None,
        }
    }

    /// Current auth form, only while logged out.
    pub fn auth_page(&self) -> Option<AuthPage> {
        match self.state {
            SessionState::LoggedOut { page } => Some(page),
            SessionState::LoggedIn { .. } => None,
        }
    }

    /// Switch between auth forms. Never touches the store.
    pub fn navigate(&mut self, page: AuthPage) -> Result<(), AuthError> {
        match self.state {
            SessionState::LoggedOut { .. } => {
                self.state = SessionState::LoggedOut { page };
                Ok(())
            }
            SessionState::LoggedIn { .. } => Err(AuthError::NotAvailable("Navigation")),
        }
    }

    /// Submit the login form.
    pub fn login(
        &mut self,
        store: &CredentialStore,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.require_page(AuthPage::Login, "Login")?;

        if !store.verify(username, password)? {
            log::info!("Rejected login for '{username}'");
            return Err(AuthError::InvalidCredentials);
        }

        log::info!("User '{username}' logged in");
        self.state = SessionState::LoggedIn {
            username: username.to_string(),
        };
        Ok(())
    }

    /// Submit the signup form. On success the visitor lands on the login
    /// form; the new account is not logged in automatically.
    pub fn signup(&mut self, store: &CredentialStore, form: &SignupForm) -> Result<(), AuthError> {
        self.require_page(AuthPage::Signup, "Signup")?;

        if form.password != form.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        store.create(&form.username, &form.password, &form.email)?;
        self.state = SessionState::LoggedOut {
            page: AuthPage::Login,
        };
        Ok(())
    }

    /// Submit the forgot-password form. Nothing is looked up or sent.
    pub fn request_password_reset(&mut self, email: &str) -> Result<&'static str, AuthError> {
        self.require_page(AuthPage::Forgot, "Password reset")?;
        log::info!("Password reset requested ({} chars)", email.len());
        Ok(RESET_ACK)
    }

    /// End the session. Always lands on the login form.
    pub fn logout(&mut self) {
        if let Some(username) = self.username() {
            log::info!("User '{username}' logged out");
        }
        self.state = SessionState::default();
    }

    fn require_page(&self, page: AuthPage, action: &'static str) -> Result<(), AuthError> {
        if self.auth_page() == Some(page) {
            Ok(())
        } else {
            Err(AuthError::NotAvailable(action))
        }
    }
}

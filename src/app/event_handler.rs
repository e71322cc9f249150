use super::pipeline::{record_wav, set_text, transcribe, translate};
use super::state::{Action, AppState, Outcome, Processed, TextTool};
use crate::error::{AppError, AuthError};
use crate::text_tools;

/// Handle one user action. This is the core state machine: auth actions go
/// through the session gate, everything else requires a logged-in session.
pub fn handle_action(state: &mut AppState, action: Action) -> Result<Outcome, AppError> {
    match action {
        Action::Navigate(page) => {
            state.session.navigate(page)?;
            Ok(Outcome::PageChanged(page))
        }
        Action::Login { username, password } => {
            state.session.login(&state.store, &username, &password)?;
            Ok(Outcome::LoggedIn(username))
        }
        Action::Signup(form) => {
            state.session.signup(&state.store, &form)?;
            Ok(Outcome::AccountCreated(form.username))
        }
        Action::RequestReset { email } => {
            let ack = state.session.request_password_reset(&email)?;
            Ok(Outcome::ResetRequested(ack))
        }
        Action::Logout => {
            state.session.logout();
            state.original_text = None;
            Ok(Outcome::LoggedOut)
        }
        Action::Record { language } => {
            require_login(state)?;
            let wav = record_wav(state)?;
            handle_action(state, Action::Transcribe { wav, language })
        }
        Action::Transcribe { wav, language } => {
            require_login(state)?;
            transcribe(state, wav, language)
        }
        Action::SetText(text) => {
            require_login(state)?;
            if text.trim().is_empty() {
                return Err(AppError::EmptyText);
            }
            Ok(set_text(state, text))
        }
        Action::LoadFile { name, bytes } => {
            require_login(state)?;
            let text = text_tools::extract_text(&name, &bytes)?;
            Ok(set_text(state, text))
        }
        Action::Translate { target } => {
            require_login(state)?;
            translate(state, target)
        }
        Action::Process { tool, text } => {
            require_login(state)?;
            if text.trim().is_empty() {
                return Err(AppError::EmptyText);
            }
            let processed = match tool {
                TextTool::Summarize => Processed::Summary(text_tools::summarize(&text)),
                TextTool::Keywords => Processed::Keywords(text_tools::keywords(&text)),
                TextTool::Sentiment => Processed::Sentiment(text_tools::sentiment(&text)),
            };
            Ok(Outcome::Processed(processed))
        }
        Action::AnalyzeWord { word, language } => {
            require_login(state)?;
            if word.trim().is_empty() {
                return Err(AppError::EmptyText);
            }
            let relations = state
                .tokio_rt
                .block_on(state.services.thesaurus.lookup(&word, language));
            Ok(Outcome::WordAnalysis(relations))
        }
    }
}

fn require_login(state: &AppState) -> Result<(), AppError> {
    if state.session.is_logged_in() {
        Ok(())
    } else {
        Err(AuthError::NotAvailable("This feature").into())
    }
}

use std::io;
use std::path::Path;

use super::console::Prompt;
use crate::app::{handle_action, Action, AppState, Outcome, Processed, TextTool};
use crate::auth::{AuthPage, SignupForm};
use crate::error::AppError;
use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drive the app until the user quits or input ends.
pub fn run(state: &mut AppState, prompt: &mut dyn Prompt) -> io::Result<()> {
    prompt.say("Multilingual Voice Translator")?;
    loop {
        let flow = match state.session.auth_page() {
            Some(page) => auth_page(state, prompt, page)?,
            None => main_page(state, prompt)?,
        };
        if flow == Flow::Quit {
            log::info!("Console session ended");
            return Ok(());
        }
    }
}

fn auth_page(
    state: &mut AppState,
    prompt: &mut dyn Prompt,
    page: AuthPage,
) -> io::Result<Flow> {
    match page {
        AuthPage::Login => {
            let Some(choice) =
                prompt.select("Login", &["Log in", "Create Account", "Forgot Password", "Quit"], 0)?
            else {
                return Ok(Flow::Quit);
            };
            match choice {
                0 => {
                    let Some(username) = prompt.input("Username")? else {
                        return Ok(Flow::Quit);
                    };
                    let Some(password) = prompt.password("Password")? else {
                        return Ok(Flow::Quit);
                    };
                    submit(state, prompt, Action::Login { username, password })?;
                }
                1 => {
                    submit(state, prompt, Action::Navigate(AuthPage::Signup))?;
                }
                2 => {
                    submit(state, prompt, Action::Navigate(AuthPage::Forgot))?;
                }
                _ => return Ok(Flow::Quit),
            }
        }
        AuthPage::Signup => {
            let Some(choice) = prompt.select("Create Account", &["Sign up", "Back to Login"], 0)? else {
                return Ok(Flow::Quit);
            };
            if choice == 1 {
                submit(state, prompt, Action::Navigate(AuthPage::Login))?;
                return Ok(Flow::Continue);
            }
            let mut form = SignupForm::default();
            for (label, field, masked) in [
                ("Username", &mut form.username, false),
                ("Email", &mut form.email, false),
                ("Password", &mut form.password, true),
                ("Confirm Password", &mut form.confirm_password, true),
            ] {
                let answer = if masked {
                    prompt.password(label)?
                } else {
                    prompt.input(label)?
                };
                let Some(value) = answer else {
                    return Ok(Flow::Quit);
                };
                *field = value;
            }
            submit(state, prompt, Action::Signup(form))?;
        }
        AuthPage::Forgot => {
            let Some(choice) =
                prompt.select("Reset Password", &["Send Reset Link", "Back to Login"], 0)?
            else {
                return Ok(Flow::Quit);
            };
            if choice == 1 {
                submit(state, prompt, Action::Navigate(AuthPage::Login))?;
                return Ok(Flow::Continue);
            }
            let Some(email) = prompt.input("Email")? else {
                return Ok(Flow::Quit);
            };
            submit(state, prompt, Action::RequestReset { email })?;
        }
    }
    Ok(Flow::Continue)
}

fn main_page(state: &mut AppState, prompt: &mut dyn Prompt) -> io::Result<Flow> {
    let username = state.session.username().unwrap_or_default();
    let title = match state.store.get(username) {
        Ok(Some(user)) => format!(
            "Welcome, {} (member since {})",
            user.username,
            user.created_at.format("%Y-%m-%d")
        ),
        _ => format!("Welcome, {username}"),
    };
    let Some(choice) = prompt.select(
        &title,
        &[
            "Voice Input",
            "Text Input",
            "File Upload",
            "Text Processing",
            "Word Analysis",
            "Logout",
            "Quit",
        ],
        0,
    )?
    else {
        return Ok(Flow::Quit);
    };

    let default = state.config.default_target;
    match choice {
        0 => {
            let Some(language) = prompt.language("Spoken language", Language::En)? else {
                return Ok(Flow::Quit);
            };
            prompt.say(&format!(
                "Recording for {} seconds...",
                state.config.record_seconds()
            ))?;
            if submit(state, prompt, Action::Record { language })? {
                return translate(state, prompt, default);
            }
        }
        1 => {
            let Some(text) = prompt.input("Text to translate")? else {
                return Ok(Flow::Quit);
            };
            if text.trim().is_empty() {
                prompt.say("Please enter some text to translate")?;
                return Ok(Flow::Continue);
            }
            if submit(state, prompt, Action::SetText(text))? {
                return translate(state, prompt, default);
            }
        }
        2 => {
            let Some(path) = prompt.input("File path (.txt or .docx)")? else {
                return Ok(Flow::Quit);
            };
            let path = Path::new(path.trim());
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    prompt.say(&format!("Error: could not read {}: {e}", path.display()))?;
                    return Ok(Flow::Continue);
                }
            };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if submit(state, prompt, Action::LoadFile { name, bytes })? {
                return translate(state, prompt, default);
            }
        }
        3 => {
            let Some(tool) = prompt.select("Select operation", &["Summarize", "Keywords", "Sentiment"], 0)?
            else {
                return Ok(Flow::Quit);
            };
            let tool = [TextTool::Summarize, TextTool::Keywords, TextTool::Sentiment][tool];
            let Some(text) = prompt.input("Text to process")? else {
                return Ok(Flow::Quit);
            };
            if text.trim().is_empty() {
                prompt.say("Please enter some text to process")?;
                return Ok(Flow::Continue);
            }
            submit(state, prompt, Action::Process { tool, text })?;
        }
        4 => {
            let Some(word) = prompt.input("Word")? else {
                return Ok(Flow::Quit);
            };
            if word.trim().is_empty() {
                prompt.say("Please enter a word to analyze")?;
                return Ok(Flow::Continue);
            }
            let Some(language) = prompt.language("Word language", Language::En)? else {
                return Ok(Flow::Quit);
            };
            submit(state, prompt, Action::AnalyzeWord { word, language })?;
        }
        5 => {
            submit(state, prompt, Action::Logout)?;
        }
        _ => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Ask for a target language and translate the working text.
fn translate(
    state: &mut AppState,
    prompt: &mut dyn Prompt,
    default: Language,
) -> io::Result<Flow> {
    let Some(target) = prompt.language("Translate to", default)? else {
        return Ok(Flow::Quit);
    };
    submit(state, prompt, Action::Translate { target })?;
    Ok(Flow::Continue)
}

/// Run one action and print its result. Returns whether it succeeded.
fn submit(
    state: &mut AppState,
    prompt: &mut dyn Prompt,
    action: Action,
) -> io::Result<bool> {
    match handle_action(state, action) {
        Ok(outcome) => {
            if let Some(text) = render(&outcome) {
                prompt.say(&text)?;
            }
            Ok(true)
        }
        Err(e) => {
            log::error!("Action failed: {e}");
            prompt.say(&error_message(&e))?;
            Ok(false)
        }
    }
}

fn error_message(e: &AppError) -> String {
    format!("Error: {e}")
}

fn render(outcome: &Outcome) -> Option<String> {
    let text = match outcome {
        Outcome::PageChanged(_) => return None,
        Outcome::LoggedIn(_) => "Login successful!".to_string(),
        Outcome::AccountCreated(_) => "Account created successfully! Please login.".to_string(),
        Outcome::ResetRequested(ack) => ack.to_string(),
        Outcome::LoggedOut => "Logged out.".to_string(),
        Outcome::TextReady(text) => format!("\nRecognized Text\n{text}"),
        Outcome::Translated(t) => {
            let mut out = format!("\nTranslated Text ({})\n{}", t.target.display_name(), t.text);
            match (&t.audio_path, &t.speech_error) {
                (Some(path), _) => out.push_str(&format!("\nSpeech Output: {}", path.display())),
                (None, Some(err)) => out.push_str(&format!("\nText-to-speech error: {err}")),
                (None, None) => {}
            }
            out
        }
        Outcome::Processed(Processed::Summary(summary)) => format!("\nSummary\n{summary}"),
        Outcome::Processed(Processed::Keywords(words)) => {
            format!("\nKeywords\n{}", words.join(", "))
        }
        Outcome::Processed(Processed::Sentiment(sentiment)) => {
            format!("\nSentiment\nThe text sentiment appears to be {sentiment}")
        }
        Outcome::WordAnalysis(rel) if rel.is_empty() => {
            "No synonyms/antonyms found or language not supported (currently only English fully supported)"
                .to_string()
        }
        Outcome::WordAnalysis(rel) => format!(
            "\nSynonyms: {}\nAntonyms: {}",
            or_none(&rel.synonyms),
            or_none(&rel.antonyms)
        ),
    };
    Some(text)
}

fn or_none(words: &[String]) -> String {
    if words.is_empty() {
        "none".to_string()
    } else {
        words.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::test_state;
    use crate::auth::SessionState;
    use crate::ui::console::ScriptedPrompt;

    fn drive(state: &mut AppState, script: &str) -> String {
        let mut prompt = ScriptedPrompt::new(script);
        run(state, &mut prompt).unwrap();
        prompt.transcript
    }

    #[test]
    fn signup_login_translate_logout() {
        let (_tmp, mut state) = test_state(false);
        let script = "\
2
1
alice
a@x.com
pw
pw
1
alice
pw
2
hello there
3
6
";
        let out = drive(&mut state, script);
        assert!(out.contains("Account created successfully! Please login."));
        assert!(out.contains("Login successful!"));
        assert!(out.contains("Welcome, alice"));
        assert!(out.contains("Translated Text (Kannada)\n[kn] hello there"));
        assert!(out.contains("Speech Output:"));
        assert!(out.contains("Logged out."));
        assert_eq!(state.session.state(), &SessionState::default());
    }

    #[test]
    fn wrong_password_and_mismatch_are_reported() {
        let (_tmp, mut state) = test_state(false);
        state.store.create("bob", "right", "").unwrap();
        let script = "\
1
bob
wrong
2
1
carl
c@x.com
one
two
";
        let out = drive(&mut state, script);
        assert!(out.contains("Error: Invalid username or password"));
        assert!(out.contains("Error: Passwords don't match"));
        assert!(!state.session.is_logged_in());
        assert!(!state.store.exists("carl").unwrap());
    }

    #[test]
    fn passwords_never_reach_the_transcript() {
        let (_tmp, mut state) = test_state(false);
        let script = "\
2
1
frank
f@x.com
s3cret-pw
s3cret-pw
1
frank
s3cret-pw
6
";
        let out = drive(&mut state, script);
        assert!(out.contains("Login successful!"));
        assert!(out.contains("Username: frank"));
        assert_eq!(out.matches("Password: ********").count(), 3);
        assert!(out.contains("Confirm Password: ********"));
        assert!(!out.contains("s3cret-pw"));
    }

    #[test]
    fn forgot_password_shows_acknowledgement() {
        let (_tmp, mut state) = test_state(false);
        let out = drive(&mut state, "3\n1\nnobody@x.com\n2\n4\n");
        assert!(out.contains(crate::auth::RESET_ACK));
        assert_eq!(state.session.auth_page(), Some(AuthPage::Login));
    }

    #[test]
    fn text_tools_and_word_analysis() {
        let (_tmp, mut state) = test_state(true);
        state.store.create("dee", "pw", "").unwrap();
        let script = "\
1
dee
pw
4
3
What a great day
5
happy
English
5
happy
Hindi
2
bonjour

7
";
        let out = drive(&mut state, script);
        assert!(out.contains("The text sentiment appears to be positive"));
        assert!(out.contains("Synonyms: happy-syn\nAntonyms: happy-ant"));
        assert!(out.contains("No synonyms/antonyms found"));
        assert!(out.contains("Text-to-speech error: "));
        assert_eq!(state.session.username(), Some("dee"));
    }

    #[test]
    fn missing_file_is_reported_without_leaving_the_menu() {
        let (tmp, mut state) = test_state(false);
        state.store.create("eve", "pw", "").unwrap();
        let missing = tmp.path().join("nope.txt");
        let script = format!("1\neve\npw\n3\n{}\n", missing.display());
        let out = drive(&mut state, &script);
        assert!(out.contains("Error: could not read"));
        assert_eq!(state.original_text, None);
    }

    #[test]
    fn end_of_input_quits() {
        let (_tmp, mut state) = test_state(false);
        assert!(drive(&mut state, "").contains("Multilingual Voice Translator"));
    }
}

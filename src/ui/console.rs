use std::io::{self, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

use crate::language::Language;

/// Interactive prompts used by the pages. `None` means the user backed out
/// or input ended.
pub trait Prompt {
    fn say(&mut self, text: &str) -> io::Result<()>;

    fn input(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Like `input`, but nothing typed is echoed.
    fn password(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Pick one of `options`; returns its index.
    fn select(&mut self, title: &str, options: &[&str], default: usize) -> io::Result<Option<usize>>;

    fn language(&mut self, title: &str, default: Language) -> io::Result<Option<Language>> {
        let names: Vec<&str> = Language::ALL.iter().map(|l| l.display_name()).collect();
        let default = Language::ALL.iter().position(|l| *l == default).unwrap_or(0);
        Ok(self
            .select(title, &names, default)?
            .map(|i| Language::ALL[i]))
    }
}

/// The real terminal, driven through `dialoguer`.
pub struct Terminal {
    theme: ColorfulTheme,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompt for Terminal {
    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(io::stdout(), "{text}")
    }

    fn input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(Some(value))
    }

    fn password(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let value = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_error)?;
        Ok(Some(value))
    }

    fn select(&mut self, title: &str, options: &[&str], default: usize) -> io::Result<Option<usize>> {
        Select::with_theme(&self.theme)
            .with_prompt(title)
            .items(options)
            .default(default)
            .interact_opt()
            .map_err(prompt_error)
    }
}

fn prompt_error(e: dialoguer::Error) -> io::Error {
    io::Error::other(e)
}

/// Answers prompts from a fixed script and records a transcript. Menu
/// answers are 1-based numbers or option names; a blank answer takes the
/// default. Passwords are recorded masked.
#[cfg(test)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub transcript: String,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(script: &str) -> Self {
        Self {
            answers: script.lines().map(str::to_string).collect(),
            transcript: String::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn say(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        self.transcript.push('\n');
        Ok(())
    }

    fn input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let answer = self.answers.pop_front();
        if let Some(answer) = &answer {
            self.transcript.push_str(&format!("{prompt}: {answer}\n"));
        }
        Ok(answer)
    }

    fn password(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let answer = self.answers.pop_front();
        if answer.is_some() {
            self.transcript.push_str(&format!("{prompt}: ********\n"));
        }
        Ok(answer)
    }

    fn select(&mut self, title: &str, options: &[&str], default: usize) -> io::Result<Option<usize>> {
        self.transcript.push_str(&format!("\n{title}\n"));
        for (i, option) in options.iter().enumerate() {
            self.transcript.push_str(&format!("  {}) {option}\n", i + 1));
        }
        let Some(answer) = self.answers.pop_front() else {
            return Ok(None);
        };
        let answer = answer.trim();
        let picked = if answer.is_empty() {
            Some(default)
        } else {
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => Some(n - 1),
                _ => options.iter().position(|o| o.eq_ignore_ascii_case(answer)),
            }
        };
        match picked {
            Some(i) => Ok(Some(i)),
            None => panic!("script answer {answer:?} matches no option of {title:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwords_are_masked_in_the_transcript() {
        let mut p = ScriptedPrompt::new("alice\nhunter2\n");
        assert_eq!(p.input("Username").unwrap().as_deref(), Some("alice"));
        assert_eq!(p.password("Password").unwrap().as_deref(), Some("hunter2"));
        assert_eq!(p.password("Password").unwrap(), None);
        assert!(p.transcript.contains("Username: alice"));
        assert!(p.transcript.contains("Password: ********"));
        assert!(!p.transcript.contains("hunter2"));
    }

    #[test]
    fn select_by_number_name_or_default() {
        let mut p = ScriptedPrompt::new("2\nAPPLE\n\n");
        let opts = ["apple", "pear", "plum"];
        assert_eq!(p.select("Fruit", &opts, 2).unwrap(), Some(1));
        assert_eq!(p.select("Fruit", &opts, 2).unwrap(), Some(0));
        assert_eq!(p.select("Fruit", &opts, 2).unwrap(), Some(2));
        assert_eq!(p.select("Fruit", &opts, 2).unwrap(), None);
        assert!(p.transcript.contains("  3) plum"));
    }

    #[test]
    fn language_picker_uses_display_names() {
        let mut p = ScriptedPrompt::new("3\nBengali\n\n");
        assert_eq!(p.language("Lang", Language::En).unwrap(), Some(Language::Kn));
        assert_eq!(p.language("Lang", Language::En).unwrap(), Some(Language::Bn));
        assert_eq!(p.language("Lang", Language::Hi).unwrap(), Some(Language::Hi));
        assert_eq!(p.language("Lang", Language::En).unwrap(), None);
    }
}

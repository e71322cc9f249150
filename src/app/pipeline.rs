use super::state::{AppState, Outcome, Translation};
use crate::error::{AppError, ServiceError};
use crate::language::Language;

const SPEECH_FILE: &str = "translated_speech.mp3";

/// Record from the microphone for the configured duration as WAV bytes.
pub fn record_wav(state: &AppState) -> Result<Vec<u8>, AppError> {
    let audio = crate::recorder::record(state.config.record_seconds())?;
    if audio.samples.is_empty() {
        return Err(ServiceError::NoSpeechDetected.into());
    }
    Ok(audio.to_wav()?)
}

/// Speech-to-text; the recognized text becomes the working text.
pub fn transcribe(state: &mut AppState, wav: Vec<u8>, language: Language) -> Result<Outcome, AppError> {
    let text = state
        .tokio_rt
        .block_on(state.services.stt.transcribe(wav, language))?;
    log::info!("Transcript: {text}");
    Ok(set_text(state, text))
}

pub fn set_text(state: &mut AppState, text: String) -> Outcome {
    state.original_text = Some(text.clone());
    Outcome::TextReady(text)
}

/// Translate the working text, then synthesize speech for the result.
/// Speech failures are reported in the outcome but keep the translation.
pub fn translate(state: &mut AppState, target: Language) -> Result<Outcome, AppError> {
    let source = state
        .original_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::EmptyText)?;

    let text = state
        .tokio_rt
        .block_on(state.services.translator.translate(source, target))?;

    let (audio_path, speech_error) = match speak(state, &text, target) {
        Ok(path) => (Some(path), None),
        Err(e) => {
            log::warn!("Text-to-speech failed, showing translation only: {e}");
            (None, Some(e.to_string()))
        }
    };

    Ok(Outcome::Translated(Translation {
        text,
        target,
        audio_path,
        speech_error,
    }))
}

fn speak(state: &AppState, text: &str, language: Language) -> Result<std::path::PathBuf, AppError> {
    let audio = state
        .tokio_rt
        .block_on(state.services.tts.synthesize(text, language))?;

    let dir = state.config.output_dir();
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(SPEECH_FILE);
    std::fs::write(&path, audio)?;
    log::info!("Speech written to {}", path.display());
    Ok(path)
}

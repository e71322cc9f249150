use async_trait::async_trait;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::SpeechToText;
use crate::error::ServiceError;
use crate::language::Language;

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Whisper expects 16kHz mono f32.
const WHISPER_RATE: u32 = 16000;

/// Local speech recognition with a multilingual whisper model. The model is
/// downloaded on first use and loaded once.
pub struct WhisperTranscriber {
    models_dir: PathBuf,
    model_file: String,
    ctx: OnceCell<Arc<WhisperContext>>,
}

impl WhisperTranscriber {
    pub fn new(models_dir: PathBuf, model_file: impl Into<String>) -> Self {
        Self {
            models_dir,
            model_file: model_file.into(),
            ctx: OnceCell::new(),
        }
    }

    fn model_path(&self) -> PathBuf {
        self.models_dir.join(&self.model_file)
    }

    /// Check whether the whisper model file exists.
    pub fn model_exists(&self) -> bool {
        self.model_path().exists()
    }

    /// Download the model, reporting `on_progress(bytes_downloaded, total_bytes)`.
    /// Total may be 0 if unknown.
    pub async fn download_model<F>(&self, on_progress: F) -> Result<(), ServiceError>
    where
        F: Fn(u64, u64) + Send + 'static,
    {
        use futures_util::StreamExt;
        use tokio::io::AsyncWriteExt;

        let unavailable = |e: std::io::Error| ServiceError::ServiceUnavailable(e.to_string());

        tokio::fs::create_dir_all(&self.models_dir)
            .await
            .map_err(unavailable)?;

        let url = format!("{MODEL_BASE_URL}/{}", self.model_file);
        let response = reqwest::get(&url).await?.error_for_status()?;
        let total = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;

        // Write to a side file so an interrupted download is never loaded.
        let path = self.model_path();
        let partial = path.with_extension("part");
        let mut file = tokio::fs::File::create(&partial).await.map_err(unavailable)?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(unavailable)?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }

        file.flush().await.map_err(unavailable)?;
        tokio::fs::rename(&partial, &path).await.map_err(unavailable)?;
        log::info!("Model downloaded to {}", path.display());
        Ok(())
    }

    async fn context(&self) -> Result<Arc<WhisperContext>, ServiceError> {
        self.ctx
            .get_or_try_init(|| async {
                if !self.model_exists() {
                    log::info!("Whisper model not found, starting download");
                    self.download_model(log_progress()).await?;
                }
                let path = self.model_path();
                let ctx = tokio::task::spawn_blocking(move || load_model(&path))
                    .await
                    .map_err(|e| {
                        ServiceError::ServiceUnavailable(format!("Model load panicked: {e}"))
                    })??;
                Ok::<_, ServiceError>(Arc::new(ctx))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl SpeechToText for WhisperTranscriber {
    async fn transcribe(&self, wav: Vec<u8>, language: Language) -> Result<String, ServiceError> {
        let samples = decode_wav(&wav)?;
        if samples.is_empty() {
            return Err(ServiceError::NoSpeechDetected);
        }

        let ctx = self.context().await?;
        let text = tokio::task::spawn_blocking(move || transcribe(&ctx, &samples, language))
            .await
            .map_err(|e| {
                ServiceError::ServiceUnavailable(format!("Transcription task panicked: {e}"))
            })??;

        if is_silence(&text) {
            return Err(ServiceError::NoSpeechDetected);
        }
        Ok(text)
    }
}

/// Log download progress every 10%.
fn log_progress() -> impl Fn(u64, u64) + Send + 'static {
    let last = std::sync::atomic::AtomicU64::new(0);
    move |downloaded, total| {
        if total == 0 {
            return;
        }
        let pct = downloaded * 100 / total;
        if pct >= last.load(std::sync::atomic::Ordering::Relaxed) + 10 || downloaded == total {
            last.store(pct, std::sync::atomic::Ordering::Relaxed);
            let mb_done = downloaded as f64 / 1_048_576.0;
            let mb_total = total as f64 / 1_048_576.0;
            log::info!("Downloading model: {mb_done:.1} / {mb_total:.1} MB");
        }
    }
}

/// Load the whisper model from disk. This is CPU-heavy; call from a blocking context.
fn load_model(path: &std::path::Path) -> Result<WhisperContext, ServiceError> {
    let path = path
        .to_str()
        .ok_or_else(|| ServiceError::ServiceUnavailable("Invalid model path".into()))?;
    let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
        .map_err(|e| ServiceError::ServiceUnavailable(format!("Failed to load whisper model: {e}")))?;
    log::info!("Whisper model loaded");
    Ok(ctx)
}

/// Transcribe 16kHz mono samples. CPU-heavy; call from `spawn_blocking`.
fn transcribe(
    ctx: &WhisperContext,
    samples: &[f32],
    language: Language,
) -> Result<String, ServiceError> {
    let mut state = ctx
        .create_state()
        .map_err(|e| ServiceError::ServiceUnavailable(format!("State error: {e}")))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some(language.tag()));
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as i32)
        .unwrap_or(4);
    params.set_n_threads(cpus);

    state
        .full(params, samples)
        .map_err(|e| ServiceError::ServiceUnavailable(format!("Transcription failed: {e}")))?;

    let mut text = String::new();
    for segment in state.as_iter() {
        // WhisperSegment implements Display
        text.push_str(&format!("{segment}"));
        text.push(' ');
    }

    log::info!("Transcribed {} samples as {}", samples.len(), language.speech_locale());
    Ok(text.trim().to_string())
}

/// Whisper emits bracketed markers such as `[BLANK_AUDIO]` for silence.
fn is_silence(text: &str) -> bool {
    let stripped: String = text
        .split(['[', ']', '(', ')'])
        .enumerate()
        .filter(|(i, _)| i % 2 == 0)
        .map(|(_, part)| part)
        .collect();
    stripped.trim().is_empty()
}

/// Decode WAV bytes to 16kHz mono f32.
fn decode_wav(wav: &[u8]) -> Result<Vec<f32>, ServiceError> {
    let reader = hound::WavReader::new(Cursor::new(wav))
        .map_err(|e| ServiceError::InvalidInput(format!("Unreadable WAV audio: {e}")))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| ServiceError::InvalidInput(e.to_string()))?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok(resample(&mono, spec.sample_rate, WHISPER_RATE))
}

/// Linear-interpolation resampler.
fn resample(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
    if from == to || samples.is_empty() || from == 0 {
        return samples.to_vec();
    }
    let ratio = from as f64 / to as f64;
    let out_len = (samples.len() as u64 * to as u64 / from as u64) as usize;
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos.floor() as usize;
            let frac = (pos - idx as f64) as f32;
            let a = samples[idx];
            let b = samples.get(idx + 1).copied().unwrap_or(a);
            a + (b - a) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn decodes_and_downsamples_44k_stereo() {
        let frames = 44100;
        let samples: Vec<i16> = (0..frames).flat_map(|_| [16384i16, 0]).collect();
        let decoded = decode_wav(&wav_bytes(&samples, 44100, 2)).unwrap();

        assert_eq!(decoded.len(), 16000);
        assert!(decoded.iter().all(|&s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn native_rate_is_passed_through() {
        let samples = vec![0i16; 1600];
        assert_eq!(decode_wav(&wav_bytes(&samples, 16000, 1)).unwrap().len(), 1600);
    }

    #[test]
    fn garbage_is_invalid_input() {
        let err = decode_wav(b"definitely not RIFF").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn blank_markers_count_as_silence() {
        assert!(is_silence(""));
        assert!(is_silence(" [BLANK_AUDIO] "));
        assert!(is_silence("(wind blowing)"));
        assert!(!is_silence("hello [music] there"));
    }

    #[tokio::test]
    async fn empty_recording_is_no_speech() {
        let tmp = tempfile::TempDir::new().unwrap();
        let stt = WhisperTranscriber::new(tmp.path().to_path_buf(), "ggml-base.bin");
        let err = stt
            .transcribe(wav_bytes(&[], 16000, 1), Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoSpeechDetected));
        assert!(!stt.model_exists());
    }
}

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::RecordError;

/// Mono f32 audio captured from the microphone.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl RecordedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Encode as WAV bytes (mono 16-bit PCM).
    pub fn to_wav(&self) -> Result<Vec<u8>, RecordError> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in &self.samples {
            let clamped = s.clamp(-1.0, 1.0);
            let i16_val = (clamped * i16::MAX as f32) as i16;
            writer.write_sample(i16_val)?;
        }
        writer.finalize()?;
        Ok(cursor.into_inner())
    }
}

/// Record `seconds` of audio from the default input device. Blocks until
/// the recording is complete.
pub fn record(seconds: u32) -> Result<RecordedAudio, RecordError> {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let (stream, sample_rate) = start_capture(buffer.clone())?;

    log::info!("Recording for {seconds} seconds");
    std::thread::sleep(Duration::from_secs(u64::from(seconds)));
    drop(stream);

    let samples = std::mem::take(
        &mut *buffer
            .lock()
            .map_err(|_| RecordError::Device("audio buffer poisoned".into()))?,
    );
    let audio = RecordedAudio {
        samples,
        sample_rate,
    };
    log::info!(
        "Captured {} samples ({:.1}s at {}Hz)",
        audio.samples.len(),
        audio.duration_secs(),
        sample_rate
    );
    Ok(audio)
}

/// Start capturing audio from the default input device.
/// Samples are down-mixed to mono and appended to the shared buffer.
/// Drop the returned `Stream` to stop recording.
fn start_capture(buffer: Arc<Mutex<Vec<f32>>>) -> Result<(cpal::Stream, u32), RecordError> {
    let device_err = |e: &dyn std::fmt::Display| RecordError::Device(e.to_string());

    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(RecordError::NoInputDevice)?;

    log::info!("Input device: {:?}", device.description());

    let default_config = device.default_input_config().map_err(|e| device_err(&e))?;
    let sample_rate = default_config.sample_rate();
    let config = default_config.config();
    let channels = config.channels.max(1) as usize;

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    for chunk in data.chunks(channels) {
                        buf.push(chunk.iter().sum::<f32>() / chunk.len() as f32);
                    }
                }
            },
            |err| log::error!("Input stream error: {err}"),
            None,
        )
        .map_err(|e| device_err(&e))?;

    stream.play().map_err(|e| device_err(&e))?;
    Ok((stream, sample_rate))
}

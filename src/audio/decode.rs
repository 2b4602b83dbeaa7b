//! Recording decoding using symphonia.
//!
//! Bat detectors commonly write RF64 once a night's recording exceeds 4 GiB,
//! which is why the symphonia fork with RF64 support is used.

use crate::audio::{Recording, Signal};
use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Decode an audio file into a mono recording.
///
/// Multi-channel files are averaged to mono. Supports WAV (including RF64),
/// FLAC, MP3 and AAC.
pub fn load_recording(path: &Path) -> Result<Recording> {
    let stem = path.file_stem().map_or_else(
        || "recording".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    let signal = decode_audio_file(path)?;
    Ok(Recording { stem, signal })
}

/// Decode an audio file to mono `f64` samples in [-1.0, 1.0].
pub fn decode_audio_file(path: &Path) -> Result<Signal> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();
    let mut buffer: Option<SampleBuffer<f64>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);

        // Packets may grow past the first one's capacity
        let needs_new = buffer
            .as_ref()
            .is_none_or(|b| b.capacity() < decoded.capacity() * channels);
        if needs_new {
            buffer = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(buf) = buffer.as_mut() {
            buf.copy_interleaved_ref(decoded);
            mix_to_mono(buf.samples(), channels, &mut samples);
        }
    }

    let signal = Signal::new(samples, sample_rate)?;
    debug!(
        "Decoded {}: {} samples at {} Hz ({:.1}s)",
        path.display(),
        signal.len(),
        signal.sample_rate(),
        signal.duration_secs()
    );

    Ok(signal)
}

/// Average interleaved frames into mono samples.
#[allow(clippy::cast_precision_loss)]
fn mix_to_mono(interleaved: &[f64], channels: usize, output: &mut Vec<f64>) {
    if channels == 1 {
        output.extend_from_slice(interleaved);
        return;
    }

    let scale = 1.0 / channels as f64;
    output.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() * scale),
    );
}

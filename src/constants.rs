//! Application-wide constants.
//!
//! Pipeline defaults match the recorder setup the tool was written for:
//! 384 kHz ultrasonic recordings, band-limited to 5-191 kHz and reduced to
//! 44.1 kHz for listening and plotting.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "batcall";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "BATCALL_CONFIG";

/// Default clip duration in seconds.
pub const DEFAULT_CLIP_SECONDS: f64 = 5.0;

/// Default lower band-pass edge in Hz.
pub const DEFAULT_LOW_CUTOFF_HZ: f64 = 5_000.0;

/// Default upper band-pass edge in Hz.
///
/// Must stay below the Nyquist frequency of the recording (192 kHz for
/// 384 kHz recorders).
pub const DEFAULT_HIGH_CUTOFF_HZ: f64 = 191_000.0;

/// Default Butterworth order.
pub const DEFAULT_FILTER_ORDER: usize = 5;

/// Default output sample rate in Hz.
pub const DEFAULT_TARGET_RATE: u32 = 44_100;

/// Spectral analysis defaults.
pub mod spectrum {
    /// FFT length for spectrogram frames.
    pub const DEFAULT_NFFT: usize = 1024;

    /// Smallest usable FFT length.
    pub const MIN_NFFT: usize = 2;
}

/// Streaming resampler settings.
pub mod streaming {
    /// Input frames per rubato chunk.
    pub const CHUNK_SIZE: usize = 1024;

    /// Sub-chunks per rubato chunk.
    pub const SUB_CHUNKS: usize = 1;
}

/// Output file suffixes appended to the recording's file stem.
pub mod output_suffixes {
    /// Selected clip before filtering.
    pub const WAV_BEFORE: &str = "_before.wav";
    /// Clip after filtering and resampling.
    pub const WAV_AFTER: &str = "_after.wav";
    /// Spectrogram of the clip before filtering.
    pub const SPECTROGRAM_BEFORE: &str = "_before_spectrogram.csv";
    /// Spectrogram of the processed clip.
    pub const SPECTROGRAM_AFTER: &str = "_after_spectrogram.csv";
    /// Periodogram of the clip before filtering.
    pub const PSD_BEFORE: &str = "_before_psd.csv";
    /// Periodogram of the processed clip.
    pub const PSD_AFTER: &str = "_after_psd.csv";
    /// Periodogram of the whole unfiltered recording.
    pub const PSD_RECORDING: &str = "_recording_psd.csv";
    /// Per-recording processing summary.
    pub const SUMMARY: &str = ".summary.json";
}

/// Audio file extensions picked up when scanning directories.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];

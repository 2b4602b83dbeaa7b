//! Artifact renderers.

pub mod progress;
mod renderer;
mod spectral;
mod summary;
mod wav;

pub use renderer::{Renderer, artifact_path, artifact_suffixes, renderers_for};
pub use spectral::{PsdRenderer, SpectrogramRenderer};
pub use summary::{RunSummary, SignalStats, SummaryRenderer};
pub use wav::{WavRenderer, write_wav_file};

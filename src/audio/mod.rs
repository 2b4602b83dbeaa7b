//! Recording decoding, segmentation and sample-rate conversion.

mod decode;
mod resample;
mod segment;
mod signal;

pub use decode::{decode_audio_file, load_recording};
pub use resample::{ResampleMethod, output_len, resample};
pub use segment::{Clip, Segmentation, split_into_clips};
pub use signal::{Recording, Signal};

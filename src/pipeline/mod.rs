//! Processing pipeline components.

mod coordinator;
mod process;
mod processor;

pub use coordinator::{
    ProcessCheck, collect_input_files, input_stem, output_dir_for, output_paths_for,
    should_process,
};
pub use process::{ClipSelection, ProcessedResult, process, process_with_rng, select_clip};
pub use processor::{ProcessResult, process_file};

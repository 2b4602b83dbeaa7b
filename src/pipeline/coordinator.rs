//! Input discovery and output placement for batch runs.

use crate::config::OutputFormat;
use crate::constants::AUDIO_EXTENSIONS;
use crate::error::Result;
use crate::output::{artifact_path, artifact_suffixes};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of checking whether a file should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip - every requested artifact already exists.
    SkipExists,
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// File name stem used for every artifact of `input`.
pub fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "recording".to_string(), |s| s.to_string_lossy().into_owned())
}

/// All artifact paths a format produces for `input`.
pub fn output_paths_for(input: &Path, output_dir: &Path, format: OutputFormat) -> Vec<PathBuf> {
    let stem = input_stem(input);
    artifact_suffixes(format)
        .iter()
        .map(|suffix| artifact_path(output_dir, &stem, suffix))
        .collect()
}

/// Check if a file should be processed.
pub fn should_process(
    input: &Path,
    output_dir: &Path,
    formats: &[OutputFormat],
    force: bool,
) -> ProcessCheck {
    if force {
        return ProcessCheck::Process;
    }

    let all_exist = formats.iter().all(|fmt| {
        output_paths_for(input, output_dir, *fmt)
            .iter()
            .all(|p| p.exists())
    });
    if all_exist {
        ProcessCheck::SkipExists
    } else {
        ProcessCheck::Process
    }
}

/// Collect input files from paths (files and directories).
///
/// Directories are walked recursively and the result is sorted so runs
/// visit recordings in a stable order.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_audio_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            collect_audio_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_audio_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

//! Writing the transcript to disk under a collision-free name.

use std::path::{Path, PathBuf};

use pdfchat_api::Transcript;
use tracing::info;

/// Stem used when no document has been selected.
const FALLBACK_STEM: &str = "conversation";

/// First `<stem><suffix><N>.<extension>` in `dir` that does not exist yet,
/// counting `N` up from 0.
pub fn output_filename(dir: &Path, source: Option<&Path>, suffix: &str, extension: &str) -> PathBuf {
    let stem = source
        .and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_STEM.to_string());

    let mut counter: u32 = 0;
    loop {
        let candidate = dir.join(format!("{stem}{suffix}{counter}.{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Write the transcript's export text to `path`.
pub fn write_transcript(path: &Path, transcript: &Transcript) -> std::io::Result<()> {
    std::fs::write(path, transcript.to_export_text())?;
    info!(path = %path.display(), turns = transcript.len(), "Transcript exported");
    Ok(())
}

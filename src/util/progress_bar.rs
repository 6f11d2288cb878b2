
use indicatif::{ProgressState, ProgressStyle};

/// Shared function to pull our progress bar styling; `{msg}` holds the current dataset name
pub fn get_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({percent}); ETA: {eta_precise} {msg}")
        .unwrap_or_else(|_e| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}%", state.fraction()*100.0);
        })
        .progress_chars("##-")
}

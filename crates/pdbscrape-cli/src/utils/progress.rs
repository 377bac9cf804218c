use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pdbscrape::engine::outcome::OutcomeKind;
use pdbscrape::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Renders batch progress as a bar on stderr, with one status line per finished record.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::BatchStart { total } => {
                    pb_guard.reset();
                    pb_guard.set_length(total);
                    pb_guard.set_position(0);
                    pb_guard.set_message("");
                }
                Progress::RecordStart { id } => {
                    pb_guard.set_message(id);
                }
                Progress::RecordFinish { id, kind, detail } => {
                    pb_guard.println(status_line(&id, kind, &detail));
                    pb_guard.inc(1);
                }
                Progress::BatchFinish => {
                    let length = pb_guard.length().unwrap_or(0);
                    pb_guard.set_position(length);
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<8} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn status_line(id: &str, kind: OutcomeKind, detail: &str) -> String {
    let marker = match kind {
        OutcomeKind::Success | OutcomeKind::SuccessMultiLigand => "✓",
        OutcomeKind::Mismatch | OutcomeKind::Skipped => "!",
        OutcomeKind::Failed => "✗",
    };
    if detail.is_empty() {
        format!("{} {:<6} {}", marker, id, kind)
    } else {
        format!("{} {:<6} {:<16} {}", marker, id, kind.to_string(), detail)
    }
}

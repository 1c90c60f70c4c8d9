use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use voxeler::engine::progress::{Progress, ProgressCallback};

const SPINNER_TICK: Duration = Duration::from_millis(100);
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const BAR_TEMPLATE: &str = "{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({eta_precise})";

/// Renders engine progress events as an indicatif display on stderr.
///
/// A phase shows as a spinner until its task announces a step count, which
/// switches the display to a bounded bar. `ProgressBar` is internally
/// synchronized, so the callback may be driven from worker threads.
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.finish_and_clear();
        Self { bar }
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |event| apply(&bar, event))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(style(SPINNER_TEMPLATE));
            bar.enable_steady_tick(SPINNER_TICK);
            bar.set_message(name);
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("✓ complete");
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_style(style(BAR_TEMPLATE));
            bar.set_length(total_steps);
        }
        Progress::TaskAdvance { steps } => bar.inc(steps),
        Progress::TaskFinish => {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.finish();
        }
        Progress::Message(text) => {
            if bar.is_finished() {
                bar.set_message(text);
            } else {
                bar.println(text);
            }
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

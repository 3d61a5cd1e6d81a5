//! Progress reporting for chat runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use roundtable_application::ProgressNotifier;
use roundtable_domain::{Mode, Role, TaskCategory};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one bar per attempt and a spinner for master calls
pub struct ProgressReporter {
    multi: MultiProgress,
    attempt_bar: Mutex<Option<ProgressBar>>,
    master_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            attempt_bar: Mutex::new(None),
            master_spinner: Mutex::new(None),
        }
    }

    fn attempt_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finish_spinner(&self) {
        if let Ok(mut spinner) = self.master_spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_routed(&self, category: TaskCategory, mode: Mode, roles: &[Role]) {
        let roles = roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ");
        let _ = self.multi.println(format!(
            "{} {} ({}) -> {}",
            "->".cyan(),
            category.as_str().bold(),
            mode,
            roles
        ));
    }

    fn on_dispatch_start(&self, attempt: u8, roles: &[Role]) {
        self.finish_spinner();
        let pb = self.multi.add(ProgressBar::new(roles.len() as u64));
        pb.set_style(Self::attempt_style());
        pb.set_prefix(format!("Attempt {}", attempt));
        pb.set_message("dispatching...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut bar) = self.attempt_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_role_complete(&self, role: Role, duration_ms: u64, degraded: bool) {
        if let Ok(bar) = self.attempt_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if degraded {
                format!("{} {} ({}ms)", "~".yellow(), role, duration_ms)
            } else {
                format!("{} {} ({}ms)", "v".green(), role, duration_ms)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_attempt_complete(&self, attempt: u8, confidence: f64, retry: bool) {
        if let Ok(mut bar) = self.attempt_bar.lock()
            && let Some(pb) = bar.take()
        {
            let verdict = if retry {
                "retrying".yellow().to_string()
            } else {
                "done".green().to_string()
            };
            pb.finish_with_message(format!(
                "attempt {} confidence {:.2}, {}",
                attempt, confidence, verdict
            ));
        }
    }

    fn on_master_call(&self, stage: &str) {
        self.finish_spinner();
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Master");
        pb.set_message(format!("{}...", stage));
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut spinner) = self.master_spinner.lock() {
            *spinner = Some(pb);
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish_spinner();
    }
}

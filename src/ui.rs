//! Terminal output for the `estimate` command: a spinner while jobs are
//! fetched, then a colored summary.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{ErrorKind, EstimateError};
use crate::response::EstimateBody;

pub struct EstimateProgress {
    // Spinner shown until the last job detail comes back.
    pb: ProgressBar,
    // Success mark.
    green: Style,
    // Hard failures.
    red: Style,
    // Workflow still running.
    yellow: Style,
    // Disclaimer line.
    dim: Style,
}

impl EstimateProgress {
    pub fn start(workflow_id: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Estimating workflow {workflow_id}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    pub fn finish(&self, body: &EstimateBody) {
        self.pb.finish_and_clear();
        println!(
            "  {} {} credits, ${:.2} ({})",
            self.green.apply_to("✓"),
            body.total_credits,
            body.total_cost,
            body.total_runtime
        );
        for job in &body.jobs {
            println!(
                "    {:<32} #{:<8} {:>10.2} credits  {:>8}",
                job.job_name, job.job_number, job.total_credits, job.total_runtime
            );
        }
        println!("  {}", self.dim.apply_to(&body.disclaimer));
    }

    /// Not-ready workflows are shown as a warning, everything else as a failure.
    pub fn fail(&self, err: &EstimateError) {
        self.pb.finish_and_clear();
        match err.kind() {
            ErrorKind::NotReady => println!("  {} {err}", self.yellow.apply_to("…")),
            _ => println!("  {} {err}", self.red.apply_to("✗")),
        }
    }
}

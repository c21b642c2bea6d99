use std::time::Duration;

use crate::provider::Step;

/// Total foreground runtime of a job, rounded half-up to the nearest second.
///
/// Background actions overlap foreground work and are not billed separately.
/// Actions with no recorded runtime count as zero.
pub fn billable_runtime(steps: &[Step]) -> Duration {
    let millis: u64 = steps
        .iter()
        .flat_map(|step| step.actions.iter())
        .filter(|action| !action.background)
        .filter_map(|action| action.run_time_millis)
        .sum();
    Duration::from_secs((millis + 500) / 1000)
}

pub fn runtime_minutes(runtime: Duration) -> f64 {
    runtime.as_secs_f64() / 60.0
}

/// Render a duration the way the provider's UI does: `1h2m3s`, `2m20s`, `0s`.
pub fn format_runtime(runtime: Duration) -> String {
    let total = runtime.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

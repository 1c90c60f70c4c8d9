use std::thread;
use std::time::Duration;
use sysinfo::System;
use tracing::debug;

const BYTES_PER_GIB: f64 = 1_073_741_824.0;
// Headroom granted for the process baseline before the budget counts.
const BASELINE_GIB: f64 = 2.0;

/// Blocks until used memory minus the baseline fits the configured budget.
///
/// Coarse backpressure for grid allocation in parallel comparison tasks: the
/// gate polls once per second and never preempts running tasks. A budget of
/// zero or less disables the gate.
pub(crate) fn wait_for_budget(budget_gib: f64) {
    if budget_gib <= 0.0 {
        return;
    }
    let mut system = System::new();
    loop {
        system.refresh_memory();
        let used_gib = system.used_memory() as f64 / BYTES_PER_GIB;
        if used_gib - BASELINE_GIB <= budget_gib {
            return;
        }
        debug!(used_gib, budget_gib, "memory budget exceeded, waiting");
        thread::sleep(Duration::from_secs(1));
    }
}

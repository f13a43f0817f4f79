//! Human-readable text output

use crate::stats::RunReport;
use crate::throttle::ThrottleReport;
use crate::util::time::{calculate_rate, format_duration, format_rate};

/// Print pipeline results to console
///
/// Per-worker exit reasons and item counts, totals, and the final
/// `stopped by <label>` line.
pub fn print_run_report(report: &RunReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                    PIPELINE RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Started:      {}", report.started_at.to_rfc3339());
    println!("Elapsed Time: {}", format_duration(report.elapsed));
    println!("Stop Fired:   {}", format_duration(report.stop_observed));
    println!();

    println!("Producers:");
    for producer in &report.producers {
        println!(
            "  producer-{:<3} {:>8} item(s)  exit: {}",
            producer.index, producer.produced, producer.exit
        );
    }

    println!("Consumers:");
    for consumer in &report.consumers {
        let marker = if consumer.requested_stop { "  (requested stop)" } else { "" };
        println!(
            "  consumer-{:<3} {:>8} item(s)  exit: {}{}",
            consumer.index,
            consumer.consumed(),
            consumer.exit,
            marker
        );
    }
    println!();

    println!(
        "Total: {} item(s) handed off - {} items/s",
        report.consumed_total(),
        format_rate(calculate_rate(report.consumed_total(), report.elapsed))
    );
    println!();
    println!("stopped by {}", report.stopped_by);
}

/// Print throttle results to console
pub fn print_throttle_report(report: &ThrottleReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                    THROTTLE RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Signals:        {}", report.signals);
    println!("Drained:        {}", report.drained);
    println!("Work unit:      {}", format_duration(report.work_unit));
    println!(
        "Elapsed Time:   {} (minimum {})",
        format_duration(report.elapsed),
        format_duration(report.minimum_elapsed())
    );
    println!("Max in flight:  {}", report.max_in_flight);
    println!("Violations:     {}", report.violations);
    println!();

    if report.is_serialized() {
        println!("admission bound held: at most one unit in flight");
    } else {
        println!("admission bound VIOLATED");
    }
}

/// Print an owned sequence, one value per line
pub fn print_sequence(values: &[u64]) {
    for value in values {
        println!("{}", value);
    }
}

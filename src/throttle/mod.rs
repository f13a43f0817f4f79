//! Admission-control throttle
//!
//! A capacity-1 channel used as a binary semaphore. Admitting a unit puts a
//! token into the single slot, which blocks while another unit holds it;
//! releasing takes the token back out. At most one unit of work is ever in
//! flight.
//!
//! # Example
//!
//! ```
//! use stopline::throttle::AdmissionGate;
//!
//! let gate = AdmissionGate::new();
//! let permit = gate.admit();
//! assert!(gate.try_admit().is_none());
//! drop(permit);
//! assert!(gate.try_admit().is_some());
//! ```

use crate::config::ThrottleConfig;
use crate::Result;
use anyhow::Context;
use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info};
use serde::{Serialize, Serializer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct GateCounters {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Single-slot admission gate
#[derive(Clone)]
pub struct AdmissionGate {
    slot_tx: Sender<()>,
    slot_rx: Receiver<()>,
    counters: Arc<GateCounters>,
}

/// Proof of admission; dropping it frees the slot
pub struct Permit {
    slot: Receiver<()>,
    counters: Arc<GateCounters>,
}

impl AdmissionGate {
    pub fn new() -> Self {
        let (slot_tx, slot_rx) = channel::bounded(1);
        Self {
            slot_tx,
            slot_rx,
            counters: Arc::new(GateCounters::default()),
        }
    }

    /// Block until the slot is free, then take it
    pub fn admit(&self) -> Permit {
        // The gate holds both halves, so the channel never disconnects
        let _ = self.slot_tx.send(());
        self.permit()
    }

    /// Take the slot if it is free right now
    pub fn try_admit(&self) -> Option<Permit> {
        self.slot_tx.try_send(()).ok().map(|_| self.permit())
    }

    /// Units currently holding the slot (0 or 1)
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::Acquire)
    }

    /// Highest number of units ever in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::Acquire)
    }

    fn permit(&self) -> Permit {
        let now = self.counters.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.max_in_flight.fetch_max(now, Ordering::AcqRel);
        Permit {
            slot: self.slot_rx.clone(),
            counters: self.counters.clone(),
        }
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::AcqRel);
        let _ = self.slot.try_recv();
    }
}

/// Gate activity, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateEvent {
    Admitted,
    Released,
}

/// Running check that admissions and releases alternate
#[derive(Debug, Default)]
struct GateTrace {
    last: Option<GateEvent>,
    violations: u64,
}

impl GateTrace {
    fn record(&mut self, event: GateEvent) {
        let out_of_turn = match self.last {
            None => event == GateEvent::Released,
            Some(last) => last == event,
        };
        if out_of_turn {
            self.violations += 1;
        }
        self.last = Some(event);
    }
}

/// Result of a throttle run
#[derive(Debug, Clone, Serialize)]
pub struct ThrottleReport {
    pub signals: u64,
    pub drained: u64,
    #[serde(rename = "work_unit_secs", serialize_with = "serialize_secs")]
    pub work_unit: Duration,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub max_in_flight: usize,
    /// Two admissions or two releases without the other in between
    pub violations: u64,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl ThrottleReport {
    /// Lower bound on wall-clock time when units run one at a time
    pub fn minimum_elapsed(&self) -> Duration {
        self.work_unit
            .saturating_mul(u32::try_from(self.drained).unwrap_or(u32::MAX))
    }

    /// Whether the run honored the single in-flight unit bound
    pub fn is_serialized(&self) -> bool {
        self.max_in_flight <= 1 && self.violations == 0 && self.elapsed >= self.minimum_elapsed()
    }
}

/// Offer `signals` units as fast as possible to a single drainer that spends
/// `work_unit` on each
pub fn run_throttle(config: &ThrottleConfig) -> Result<ThrottleReport> {
    let gate = AdmissionGate::new();
    let work_unit = config.work_unit();
    let trace = Arc::new(Mutex::new(GateTrace::default()));
    let (unit_tx, unit_rx) = channel::unbounded::<Permit>();

    info!(
        "Starting throttle: {} signal(s), {:?} per unit",
        config.signals, work_unit
    );
    let start = Instant::now();

    let drainer_trace = trace.clone();
    let drainer = thread::Builder::new()
        .name("throttle-drainer".to_string())
        .spawn(move || {
            let mut drained = 0u64;
            for permit in unit_rx.iter() {
                thread::sleep(work_unit);
                drained += 1;
                record_event(&drainer_trace, GateEvent::Released);
                drop(permit);
            }
            drained
        })
        .context("Failed to spawn throttle drainer thread")?;

    for signal in 0..config.signals {
        let permit = gate.admit();
        record_event(&trace, GateEvent::Admitted);
        debug!("Signal {} admitted", signal);
        if unit_tx.send(permit).is_err() {
            break;
        }
    }
    drop(unit_tx);

    let drained = drainer
        .join()
        .map_err(|_| anyhow::anyhow!("Throttle drainer thread panicked"))?;
    let elapsed = start.elapsed();

    let violations = trace
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .violations;

    Ok(ThrottleReport {
        signals: config.signals,
        drained,
        work_unit,
        elapsed,
        max_in_flight: gate.max_in_flight(),
        violations,
    })
}

fn record_event(trace: &Mutex<GateTrace>, event: GateEvent) {
    trace
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .record(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_single_slot() {
        let gate = AdmissionGate::new();

        let permit = gate.admit();
        assert_eq!(gate.in_flight(), 1);
        assert!(gate.try_admit().is_none());

        drop(permit);
        assert_eq!(gate.in_flight(), 0);

        let again = gate.try_admit();
        assert!(again.is_some());
        assert_eq!(gate.max_in_flight(), 1);
    }

    #[test]
    fn test_admit_blocks_until_release() {
        let gate = AdmissionGate::new();
        let permit = gate.admit();

        let waiter = gate.clone();
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let _permit = waiter.admit();
            start.elapsed()
        });

        thread::sleep(Duration::from_millis(30));
        drop(permit);

        let waited = handle.join().unwrap();
        assert!(waited >= Duration::from_millis(25), "admit returned after {:?}", waited);
        assert_eq!(gate.max_in_flight(), 1);
    }

    #[test]
    fn test_throttle_hundred_signals() {
        let config = ThrottleConfig {
            signals: 100,
            work_unit_us: 1000,
        };

        let report = run_throttle(&config).unwrap();

        assert_eq!(report.drained, 100);
        assert!(report.elapsed >= Duration::from_millis(100), "elapsed {:?}", report.elapsed);
        assert_eq!(report.max_in_flight, 1);
        assert_eq!(report.violations, 0);
        assert!(report.is_serialized());
    }

    #[test]
    fn test_throttle_single_signal() {
        let config = ThrottleConfig {
            signals: 1,
            work_unit_us: 500,
        };

        let report = run_throttle(&config).unwrap();
        assert_eq!(report.drained, 1);
        assert_eq!(report.violations, 0);
    }

    fn violations(events: &[GateEvent]) -> u64 {
        let mut trace = GateTrace::default();
        for event in events {
            trace.record(*event);
        }
        trace.violations
    }

    #[test]
    fn test_gate_trace_violations() {
        use GateEvent::*;

        assert_eq!(violations(&[Admitted, Released, Admitted, Released]), 0);
        assert_eq!(violations(&[Admitted, Admitted, Released]), 1);
        assert_eq!(violations(&[Released, Admitted]), 1);
        assert_eq!(violations(&[Admitted, Released, Released]), 1);
        assert_eq!(violations(&[]), 0);
    }

    #[test]
    fn test_throttle_large_signal_count_validated() {
        use crate::config::validator::{validate_throttle, MAX_THROTTLE_SIGNALS};

        let mut config = ThrottleConfig {
            signals: u64::MAX,
            work_unit_us: 1,
        };
        let err = validate_throttle(&config).unwrap_err();
        assert!(err.to_string().contains("signals must be at most"));

        // The largest accepted count runs without pre-allocating per signal
        config.signals = MAX_THROTTLE_SIGNALS;
        assert!(validate_throttle(&config).is_ok());

        config.signals = 3;
        let report = run_throttle(&config).unwrap();
        assert_eq!(report.drained, 3);
        assert_eq!(report.violations, 0);
    }

    #[test]
    fn test_report_serialization() {
        let report = ThrottleReport {
            signals: 2,
            drained: 2,
            work_unit: Duration::from_millis(500),
            elapsed: Duration::from_secs(1),
            max_in_flight: 1,
            violations: 0,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["work_unit_secs"], 0.5);
        assert_eq!(json["elapsed_secs"], 1.0);
        assert!(report.is_serialized());
    }
}

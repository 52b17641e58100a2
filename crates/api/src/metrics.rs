use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds)
    total_parse_time_us: AtomicU64,

    // Counts
    total_parses: AtomicUsize,
    total_fields_matched: AtomicUsize,
    total_tasks_created: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_parse_time_us: AtomicU64::new(0),
            total_parses: AtomicUsize::new(0),
            total_fields_matched: AtomicUsize::new(0),
            total_tasks_created: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_parse(&self, duration: Duration, fields_matched: usize) {
        self.total_parse_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.total_parses.fetch_add(1, Ordering::Relaxed);
        self.total_fields_matched
            .fetch_add(fields_matched, Ordering::Relaxed);
    }

    pub fn record_task_created(&self) {
        self.total_tasks_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let parses = self.total_parses.load(Ordering::Relaxed);
        let fields = self.total_fields_matched.load(Ordering::Relaxed);

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_parses: parses,
            avg_parse_time_ms: self.avg_time_ms(&self.total_parse_time_us, parses),
            avg_fields_matched: if parses > 0 {
                fields as f64 / parses as f64
            } else {
                0.0
            },
            total_tasks_created: self.total_tasks_created.load(Ordering::Relaxed),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: usize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        if count > 0 {
            total / count as f64 / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_parses: usize,
    pub avg_parse_time_ms: f64,
    pub avg_fields_matched: f64,
    pub total_tasks_created: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

// Path: crates/telemetry/src/time.rs
use crate::sinks::MetricsSink;
use std::time::Instant;

/// An RAII timer that reports elapsed wall-clock time to a
/// [`MetricsSink`] when dropped, used to bracket `addEntry` calls
/// without threading timing logic through the call site.
pub struct AppendTimer<'a> {
    sink: &'a dyn MetricsSink,
    start: Instant,
}

impl<'a> AppendTimer<'a> {
    /// Starts a new timer reporting to `sink` on drop.
    pub fn new(sink: &'a dyn MetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for AppendTimer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_append_duration(self.start.elapsed().as_secs_f64());
    }
}

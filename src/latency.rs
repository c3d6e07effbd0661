//! Round-trip latency accounting.

use std::error::Error;
use std::fmt;
use std::time::Instant;

/// A round trip whose receive instant precedes its send instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeRoundTrip;

impl fmt::Display for NegativeRoundTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round trip received before it was sent")
    }
}

impl Error for NegativeRoundTrip {}

/// Running mean of observed round-trip latencies, in milliseconds.
///
/// Samples accumulate for the lifetime of a session; there is no reset.
#[derive(Debug, Default)]
pub struct LatencyStats {
    sum_ms: f64,
    samples: u32,
}

impl LatencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observed round trip and returns its length in ms.
    pub fn record_round_trip(
        &mut self,
        sent: Instant,
        received: Instant,
    ) -> Result<f64, NegativeRoundTrip> {
        let elapsed = received
            .checked_duration_since(sent)
            .ok_or(NegativeRoundTrip)?;
        let ms = elapsed.as_secs_f64() * 1000.0;
        self.sum_ms += ms;
        self.samples += 1;
        Ok(ms)
    }

    /// Arithmetic mean of all samples, None while no echo has arrived.
    pub fn average(&self) -> Option<f64> {
        if self.samples == 0 {
            None
        } else {
            Some(self.sum_ms / f64::from(self.samples))
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.samples
    }
}

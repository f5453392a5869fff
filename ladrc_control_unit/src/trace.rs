//! Caller-owned telemetry sinks.
//!
//! The loop driver pushes one [`TelemetrySample`] per tick into a
//! [`TraceSink`]. A sink that refuses a sample ends the run.
//!
//! Unbounded runs should use sinks with constant memory: [`JsonLinesSink`]
//! streams to a writer, [`TrackingErrorWindow`] keeps only the last `N`
//! tracking errors.

use std::io::{self, Write};

use heapless::Deque;
use ladrc_common::control::TelemetrySample;

/// Destination for per-tick telemetry.
pub trait TraceSink {
    /// Store one sample. Returns `false` if the sink is full and the sample
    /// was dropped.
    fn push(&mut self, sample: TelemetrySample) -> bool;

    /// `true` if the next `push` would be refused.
    fn is_full(&self) -> bool {
        false
    }
}

impl TraceSink for Vec<TelemetrySample> {
    #[inline]
    fn push(&mut self, sample: TelemetrySample) -> bool {
        Vec::push(self, sample);
        true
    }
}

/// Fixed capacity, no allocation after construction.
impl<const N: usize> TraceSink for heapless::Vec<TelemetrySample, N> {
    #[inline]
    fn push(&mut self, sample: TelemetrySample) -> bool {
        heapless::Vec::push(self, sample).is_ok()
    }

    #[inline]
    fn is_full(&self) -> bool {
        heapless::Vec::is_full(self)
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    #[inline]
    fn push(&mut self, sample: TelemetrySample) -> bool {
        (**self).push(sample)
    }

    #[inline]
    fn is_full(&self) -> bool {
        (**self).is_full()
    }
}

/// Discards every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    #[inline]
    fn push(&mut self, _sample: TelemetrySample) -> bool {
        true
    }
}

/// Feeds both sinks; refuses once either refuses.
impl<A: TraceSink, B: TraceSink> TraceSink for (A, B) {
    #[inline]
    fn push(&mut self, sample: TelemetrySample) -> bool {
        let a = self.0.push(sample);
        let b = self.1.push(sample);
        a && b
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.0.is_full() || self.1.is_full()
    }
}

// ─── Streaming ──────────────────────────────────────────────────────

/// Writes one JSON object per sample, newline separated.
///
/// The first write error is latched and the sink reports full, which ends
/// the run. [`finish`](Self::finish) returns that error.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap `writer`. Pass a `BufWriter` for files.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            error: None,
        }
    }

    /// Samples written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and return the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn push(&mut self, sample: TelemetrySample) -> bool {
        if self.error.is_some() {
            return false;
        }
        let result = serde_json::to_writer(&mut self.writer, &sample)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match result {
            Ok(()) => {
                self.written += 1;
                true
            }
            Err(e) => {
                self.error = Some(e);
                false
            }
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.error.is_some()
    }
}

// ─── Tracking Error ─────────────────────────────────────────────────

/// `|target - output|` of the last `N` samples. Never full.
#[derive(Debug)]
pub struct TrackingErrorWindow<const N: usize> {
    errors: Deque<f64, N>,
}

impl<const N: usize> Default for TrackingErrorWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrackingErrorWindow<N> {
    /// Empty window.
    pub const fn new() -> Self {
        Self {
            errors: Deque::new(),
        }
    }

    /// Samples currently held, at most `N`.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `true` before the first sample.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Largest error in the window, 0 when empty.
    pub fn max_error(&self) -> f64 {
        self.errors.iter().copied().fold(0.0, f64::max)
    }
}

impl<const N: usize> TraceSink for TrackingErrorWindow<N> {
    #[inline]
    fn push(&mut self, sample: TelemetrySample) -> bool {
        if self.errors.is_full() {
            self.errors.pop_front();
        }
        // Only fails for N = 0.
        let _ = self.errors.push_back((sample.target - sample.output).abs());
        true
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

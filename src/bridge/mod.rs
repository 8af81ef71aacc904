//! # Sample Loop Module
//!
//! Turns the stream of sample lines into pointer motion.
//!
//! Per line:
//!
//! 1. Decode two raw readings ([`crate::serial::protocol::decode_line`])
//! 2. For X then Y: range map, dead-zone gate, curve, velocity scale
//! 3. Feed the axis accumulator; emit at most one move per axis
//!
//! With the default axis mapping, axis index 1 drives X and axis index 0
//! drives Y. Each emitted move carries exactly one non-zero axis.
//!
//! ## Usage
//!
//! ```no_run
//! use analog_mouse_bridge::bridge::MotionBridge;
//! use analog_mouse_bridge::config::Config;
//! use analog_mouse_bridge::pointer::virtual_mouse::VirtualMouse;
//! use analog_mouse_bridge::serial::SampleSerial;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let mut bridge = MotionBridge::from_config(&config)?;
//!     let mut mouse = VirtualMouse::new(&config.pointer.device_name)?;
//!     let serial = SampleSerial::open(&config.serial)?;
//!
//!     bridge.run(serial.into_reader(), &mut mouse).await?;
//!     Ok(())
//! }
//! ```

mod stats;

pub use stats::BridgeStats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::{debug, info, warn};

use crate::config::{Config, ParseErrorPolicy};
use crate::error::{BridgeError, Result};
use crate::motion::accumulator::{AxisAccumulator, FlushMode};
use crate::motion::AxisTransform;
use crate::pointer::PointerSink;
use crate::serial::protocol::{decode_line, RawSample, MAX_LINE_LEN};

/// Sample loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next line
    Idle,
    /// One sample in flight
    Processing,
}

/// What happened to one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Line was processed; emitted pixels per axis (if any)
    Moved { dx: Option<i32>, dy: Option<i32> },
    /// Line was blank
    Empty,
    /// Line was malformed and skipped
    Skipped,
    /// Injection is disabled; line was discarded
    Disabled,
}

/// Sample loop: owns the transform and both axis accumulators
#[derive(Debug)]
pub struct MotionBridge {
    transform: AxisTransform,
    carry_x: AxisAccumulator,
    carry_y: AxisAccumulator,
    swap_axes: bool,
    parse_policy: ParseErrorPolicy,
    /// Shared with signal handlers; the carries themselves are never shared.
    enabled: Arc<AtomicBool>,
    state: LoopState,
    stats: BridgeStats,
    status_interval: u64,
}

impl MotionBridge {
    /// Creates a loop with the given transform and the default policies.
    #[must_use]
    pub fn new(transform: AxisTransform) -> Self {
        Self {
            transform,
            carry_x: AxisAccumulator::default(),
            carry_y: AxisAccumulator::default(),
            swap_axes: true,
            parse_policy: ParseErrorPolicy::Skip,
            enabled: Arc::new(AtomicBool::new(true)),
            state: LoopState::Idle,
            stats: BridgeStats::default(),
            status_interval: 0,
        }
    }

    /// Builds the loop from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configured curve does not parse.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transform = AxisTransform::from_config(config)?;
        let mode = config.motion.flush_mode;
        let idle_reset = config.motion.carry_idle_reset_samples;

        Ok(Self {
            carry_x: AxisAccumulator::new(mode, idle_reset),
            carry_y: AxisAccumulator::new(mode, idle_reset),
            swap_axes: config.input.swap_axes,
            parse_policy: config.errors.on_parse_error,
            enabled: Arc::new(AtomicBool::new(config.pointer.enabled)),
            status_interval: config.logging.status_interval_samples,
            ..Self::new(transform)
        })
    }

    /// Replaces both accumulators with the given carry policy.
    #[must_use]
    pub fn with_flush_mode(mut self, mode: FlushMode, idle_reset_samples: u32) -> Self {
        self.carry_x = AxisAccumulator::new(mode, idle_reset_samples);
        self.carry_y = AxisAccumulator::new(mode, idle_reset_samples);
        self
    }

    #[must_use]
    pub fn with_parse_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.parse_policy = policy;
        self
    }

    pub fn transform(&self) -> &AxisTransform {
        &self.transform
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enables or disables injection. While disabled, lines are discarded
    /// and carries are left as they are.
    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.swap(enabled, Ordering::Relaxed) != enabled {
            info!("Pointer injection {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    /// Handle for toggling injection while [`Self::run`] is borrowed.
    pub fn enabled_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }

    /// Banked sub-pixel motion as `(x, y)`.
    pub fn carries(&self) -> (f64, f64) {
        (self.carry_x.carry(), self.carry_y.carry())
    }

    /// Process one line from the transport
    ///
    /// # Errors
    ///
    /// - [`BridgeError::Parse`] if the line is malformed and the policy is `abort`
    /// - Any error returned by the pointer sink
    pub fn process_line<P: PointerSink + ?Sized>(
        &mut self,
        line: &str,
        pointer: &mut P,
    ) -> Result<SampleOutcome> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(SampleOutcome::Empty);
        }

        if !self.is_enabled() {
            return Ok(SampleOutcome::Disabled);
        }

        self.state = LoopState::Processing;
        let outcome = self.process_sample(line, pointer);
        self.state = LoopState::Idle;

        if let Ok(SampleOutcome::Moved { .. } | SampleOutcome::Skipped) = outcome {
            self.log_status();
        }
        outcome
    }

    fn process_sample<P: PointerSink + ?Sized>(
        &mut self,
        line: &str,
        pointer: &mut P,
    ) -> Result<SampleOutcome> {
        let sample = match decode_line(line) {
            Ok(sample) => sample,
            Err(e) => return self.reject_line(e),
        };

        self.stats.samples_processed += 1;

        let (raw_x, raw_y) = self.axis_readings(sample);

        // Compute both deltas before touching either carry
        let delta_x = self.transform.delta(raw_x);
        let delta_y = self.transform.delta(raw_y);

        // Each carry is committed only once its move has been delivered
        let mut next_x = self.carry_x.clone();
        let mut next_y = self.carry_y.clone();
        let dx = Self::step_axis(&mut next_x, delta_x);
        let dy = Self::step_axis(&mut next_y, delta_y);

        if let Some(dx) = dx {
            pointer.move_relative(dx, 0)?;
            self.stats.pixels_x += i64::from(dx);
        }
        self.carry_x = next_x;

        if let Some(dy) = dy {
            pointer.move_relative(0, dy)?;
            self.stats.pixels_y += i64::from(dy);
        }
        self.carry_y = next_y;

        if dx.is_some() || dy.is_some() {
            debug!("Sample {:?} -> dx={:?} dy={:?}", sample, dx, dy);
        }

        Ok(SampleOutcome::Moved { dx, dy })
    }

    /// Counts a bad line and applies the parse error policy.
    fn reject_line(&mut self, e: BridgeError) -> Result<SampleOutcome> {
        self.stats.samples_skipped += 1;
        match self.parse_policy {
            ParseErrorPolicy::Skip => {
                warn!("Skipping sample: {}", e);
                Ok(SampleOutcome::Skipped)
            }
            ParseErrorPolicy::Abort => Err(e),
        }
    }

    fn axis_readings(&self, sample: RawSample) -> (i32, i32) {
        if self.swap_axes {
            (sample.axis1, sample.axis0)
        } else {
            (sample.axis0, sample.axis1)
        }
    }

    /// Feeds one axis: dead-zoned axes leave their carry alone.
    fn step_axis(carry: &mut AxisAccumulator, delta: Option<f64>) -> Option<i32> {
        match delta {
            Some(delta) => carry.integrate(delta).filter(|&px| px != 0),
            None => {
                carry.mark_idle();
                None
            }
        }
    }

    fn log_status(&self) {
        let seen = self.stats.samples_processed + self.stats.samples_skipped;
        if self.status_interval > 0 && seen % self.status_interval == 0 {
            info!("{}", self.stats);
        }
    }

    /// Run the loop until the transport fails or closes
    ///
    /// Lines are handled strictly in arrival order. Each line is processed
    /// synchronously, so dropping this future between lines (e.g. on Ctrl+C)
    /// never leaves a carry half-updated.
    ///
    /// Lines longer than [`MAX_LINE_LEN`] are discarded up to the next
    /// newline and counted as skipped, so noise without terminators cannot
    /// grow the line buffer.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::TransportClosed`] at end of stream
    /// - [`BridgeError::Io`] if the read fails
    /// - Errors from [`Self::process_line`]
    pub async fn run<R, P>(&mut self, mut reader: R, pointer: &mut P) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        P: PointerSink + ?Sized,
    {
        let mut buf = Vec::with_capacity(64);
        // Inside an oversized line, waiting for its terminator
        let mut discarding = false;

        loop {
            buf.clear();
            let read = (&mut reader)
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', &mut buf)
                .await?;
            if read == 0 {
                info!("Transport closed after {} samples", self.stats.samples_processed);
                return Err(BridgeError::TransportClosed);
            }

            let terminated = buf.last() == Some(&b'\n');
            if !terminated && buf.len() >= MAX_LINE_LEN {
                if !discarding {
                    discarding = true;
                    self.reject_line(BridgeError::Parse(format!(
                        "line exceeds {} bytes",
                        MAX_LINE_LEN
                    )))?;
                }
                continue;
            }
            if discarding {
                // Tail of the oversized line
                discarding = false;
                continue;
            }

            let line = String::from_utf8_lossy(&buf);
            self.process_line(&line, pointer)?;
        }
    }
}

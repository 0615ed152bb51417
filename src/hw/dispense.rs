//! Dispense capability and motor telemetry.
//!
//! The state machine consumes [`Dispenser`]; [`MotorDispenser`] implements it
//! over any [`MotorDriver`] by composition, capturing a telemetry log for each
//! dispense while the motor's command buffer drains.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Result;

/// Buffer state reported once every queued move has completed
pub const BUFFER_IDLE: u8 = 0x80;

/// Default pause between telemetry samples
const SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// One buffered speed/distance motion segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommand {
    /// Target speed in encoder counts per second
    pub speed: i32,
    /// Travel distance in encoder counts
    pub distance: u32,
}

/// The motor-controller operations the dispenser needs.
///
/// Concrete serial drivers implement this; telemetry capture wraps an
/// implementation rather than extending one.
pub trait MotorDriver {
    /// Current encoder position
    fn position(&mut self) -> Result<i32>;

    /// Current speed in encoder counts per second
    fn speed(&mut self) -> Result<i32>;

    /// Motor current draw in milliamps
    fn current(&mut self) -> Result<i32>;

    /// Command buffer state; [`BUFFER_IDLE`] once the buffer has drained
    fn buffer_state(&mut self) -> Result<u8>;

    /// Queues one buffered motion segment
    fn queue_move(&mut self, mv: MoveCommand) -> Result<()>;
}

/// The dispense capability consumed by the vend state machine
pub trait Dispenser {
    /// Runs a product move sequence; `Ok(true)` on success.
    ///
    /// Blocks for `pre_wait`, then until every queued move completes, then
    /// for `post_wait`.
    fn dispense(
        &mut self,
        moves: &[MoveCommand],
        pre_wait: Duration,
        post_wait: Duration,
    ) -> Result<bool>;
}

/// One motor telemetry reading with its read window
#[derive(Debug, Clone, Copy)]
pub struct TelemetrySample {
    /// When the reads began
    pub read_start: DateTime<Local>,
    /// Encoder position
    pub position: i32,
    /// Speed in encoder counts per second
    pub speed: i32,
    /// Current draw in milliamps
    pub current: i32,
    /// When the reads finished
    pub read_end: DateTime<Local>,
}

/// CSV telemetry log, one file per dispense
pub struct TelemetryLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl TelemetryLog {
    /// Creates a timestamp-named log file in `dir`
    pub fn create(dir: &Path) -> Result<TelemetryLog> {
        let name = format!("{}.csv", Local::now().format("%Y%m%d%H%M%S%6f"));
        let path = dir.join(name);
        let file = File::create(&path)?;
        Ok(TelemetryLog {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Appends one sample row
    pub fn record(&mut self, sample: &TelemetrySample) -> Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{}",
            sample.read_start.format("%s%.6f"),
            sample.position,
            sample.speed,
            sample.current,
            sample.read_end.format("%s%.6f"),
        )?;
        Ok(())
    }

    /// The log file's path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and closes the log
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Dispenser over a motor driver, with per-dispense telemetry capture.
///
/// Wraps the driver by composition so any [`MotorDriver`] gains logging
/// without being subclassed or modified.
pub struct MotorDispenser<D> {
    driver: D,
    log_dir: PathBuf,
    sample_interval: Duration,
}

impl<D: MotorDriver> MotorDispenser<D> {
    /// Creates a dispenser writing telemetry logs under `log_dir`
    pub fn new(driver: D, log_dir: impl Into<PathBuf>) -> Self {
        MotorDispenser {
            driver,
            log_dir: log_dir.into(),
            sample_interval: SAMPLE_INTERVAL,
        }
    }

    /// Overrides the pause between telemetry samples
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Reads one position/speed/current sample from the driver
    fn sample(&mut self) -> Result<TelemetrySample> {
        let read_start = Local::now();
        let position = self.driver.position()?;
        let speed = self.driver.speed()?;
        let current = self.driver.current()?;
        let read_end = Local::now();
        Ok(TelemetrySample {
            read_start,
            position,
            speed,
            current,
            read_end,
        })
    }

    /// Samples telemetry until `window` has elapsed
    fn sample_for(&mut self, log: &mut TelemetryLog, window: Duration) -> Result<()> {
        let begin = Instant::now();
        while begin.elapsed() < window {
            let sample = self.sample()?;
            log.record(&sample)?;
            thread::sleep(self.sample_interval);
        }
        Ok(())
    }
}

impl<D: MotorDriver> Dispenser for MotorDispenser<D> {
    fn dispense(
        &mut self,
        moves: &[MoveCommand],
        pre_wait: Duration,
        post_wait: Duration,
    ) -> Result<bool> {
        let mut log = TelemetryLog::create(&self.log_dir)?;
        debug!(log = %log.path().display(), moves = moves.len(), "dispensing");

        self.sample_for(&mut log, pre_wait)?;

        for mv in moves {
            self.driver.queue_move(*mv)?;
        }

        // Sample until the command buffer reports idle.
        loop {
            let sample = self.sample()?;
            log.record(&sample)?;
            if self.driver.buffer_state()? == BUFFER_IDLE {
                break;
            }
            thread::sleep(self.sample_interval);
        }

        self.sample_for(&mut log, post_wait)?;
        log.finish()?;
        Ok(true)
    }
}

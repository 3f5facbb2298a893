//! Native frame pacing
//!
//! Turns wall-clock frame time into a whole number of fixed simulation ticks
//! and keeps the headless driver near the tick rate.

use std::time::{Duration, Instant};

use crate::consts::*;

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    step: f32,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Feed one frame's elapsed time; returns how many ticks to run.
    ///
    /// Long frames are clamped, and at most [`MAX_SUBSTEPS`] ticks are
    /// handed out per frame. Leftover time past the cap is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS && self.accumulator >= self.step {
            log::debug!("Frame clock behind, dropping {:.3}s", self.accumulator);
            self.accumulator %= self.step;
        }
        ticks
    }
}

/// Sleeps the calling thread to hold a fixed frame rate
#[derive(Debug)]
pub struct FramePacer {
    period: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// One frame per simulation step of `step` seconds. A step that is not
    /// a positive duration falls back to the default tick rate.
    pub fn from_step(step: f32) -> Self {
        let period = Duration::try_from_secs_f32(step)
            .ok()
            .filter(|p| !p.is_zero())
            .unwrap_or_else(|| {
                log::warn!("Invalid step {step}, pacing at {TICK_RATE_HZ} Hz");
                Duration::from_secs_f64(1.0 / f64::from(TICK_RATE_HZ))
            });
        Self::new(period)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the next frame boundary. Returns the time since the
    /// previous call, or one period if this frame ran late and was resynced.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        if now < self.next {
            std::thread::sleep(self.next - now);
            self.next += self.period;
            self.period
        } else {
            // Running behind: resync instead of bursting to catch up
            let late = now - self.next;
            if late > self.period {
                log::trace!("Frame late by {:?}", late);
            }
            self.next = now + self.period;
            self.period + late
        }
    }
}

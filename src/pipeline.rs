use std::time::{Duration, Instant};

use anyhow::Result;
use log::{error, warn};

use crate::axis::{self, AxisLabel};
use crate::calibration::CalibrationModel;
use crate::camera::FrameSource;
use crate::display::{SpectrumCurve, SpectrumView};
use crate::reducer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Too many consecutive acquisition failures; the loop no longer ticks.
    Faulted,
    Stopped,
}

/// What a single tick did, for the driver and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame reduced and pushed to the view.
    Presented,
    /// Region clamped to nothing; the view keeps its previous curve.
    SkippedEmptyRegion,
    /// Device delivered no frame; retried next tick.
    SkippedAcquisition,
    Faulted,
    Stopped,
}

/// Fixed-period driver of the acquisition-to-profile pipeline.
///
/// Each tick reads the region fresh from the view (the ROI may move between
/// ticks), acquires one frame, reduces it, applies the calibration model and
/// hands the result to the view. Frames are consumed within the tick; none
/// is retained.
pub struct RenderLoop<S: FrameSource> {
    source: S,
    period: Duration,
    /// `None` retries forever, matching the original behavior.
    failure_cutoff: Option<u32>,
    consecutive_failures: u32,
    state: LoopState,
    next_deadline: Instant,
}

impl<S: FrameSource> RenderLoop<S> {
    pub fn new(source: S, period: Duration, failure_cutoff: Option<u32>) -> Self {
        Self {
            source,
            period,
            failure_cutoff,
            consecutive_failures: 0,
            state: LoopState::Running,
            next_deadline: Instant::now(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// For between-tick operator input: flip toggles, property tweaks.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn tick<V: SpectrumView>(
        &mut self,
        view: &mut V,
        model: &CalibrationModel,
    ) -> Result<TickOutcome> {
        match self.state {
            LoopState::Stopped => return Ok(TickOutcome::Stopped),
            LoopState::Faulted => return Ok(TickOutcome::Faulted),
            LoopState::Running => {}
        }

        let frame = match self.source.next_frame() {
            Ok(frame) => {
                self.consecutive_failures = 0;
                frame
            }
            Err(e) => {
                self.consecutive_failures += 1;
                warn!(
                    "frame acquisition failed ({} in a row): {}",
                    self.consecutive_failures, e
                );
                view.acquisition_failed(&e);
                if let Some(cutoff) = self.failure_cutoff {
                    if self.consecutive_failures >= cutoff {
                        error!("acquisition failed {} consecutive ticks; loop faulted", cutoff);
                        self.state = LoopState::Faulted;
                        return Ok(TickOutcome::Faulted);
                    }
                }
                return Ok(TickOutcome::SkippedAcquisition);
            }
        };

        let region = view.region();
        let Some(profile) = reducer::reduce(&frame, &region) else {
            return Ok(TickOutcome::SkippedEmptyRegion);
        };

        let curve = SpectrumCurve {
            axis: axis::axis_for(profile.len(), model),
            label: AxisLabel::for_model(model),
            intensity: profile,
        };
        view.present(&frame, &curve)?;
        Ok(TickOutcome::Presented)
    }

    /// Cooperative pacing: sleep out the rest of the period. A slow tick
    /// simply delays the next deadline rather than bursting to catch up.
    pub fn wait_for_next_tick(&mut self) {
        if let Some(remaining) = self.next_deadline.checked_duration_since(Instant::now()) {
            std::thread::sleep(remaining);
        }
        self.next_deadline = Instant::now() + self.period;
    }
}

//! Plant-height growth animation.
//!
//! [`GrowthAnimation`] is a pure step machine; [`play`] drives it on a fixed
//! period. Once the last step has been produced the machine is finished and
//! yields nothing more.

use std::time::Duration;

use chrono::NaiveDateTime;

use crate::{health, plant::Plant, types::HealthState};

/// Drawn height every animation starts from, in pixels.
pub const START_HEIGHT_PX: f64 = 50.0;
/// Tallest drawable height in pixels.
pub const MAX_HEIGHT_PX: f64 = 250.0;
/// Pixels per centimeter of measured height.
pub const PX_PER_CM: f64 = 10.0;
/// Height assumed when a plant has no growth records, in centimeters.
pub const DEFAULT_HEIGHT_CM: f64 = 5.0;
/// Steps from start to target.
pub const STEPS: u32 = 20;
/// Delay between frames.
pub const FRAME_PERIOD: Duration = Duration::from_millis(50);
/// Vertical distance between spine rows in pixels.
pub const SPINE_SPACING_PX: f64 = 20.0;

/// One rendered step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Step index, `0..=STEPS`.
    pub step: u32,
    /// Drawn body height in pixels.
    pub height_px: f64,
    /// Body colour state.
    pub health: HealthState,
}

impl Frame {
    /// Offsets from the top of the body where spines are drawn.
    pub fn spine_rows(&self) -> Vec<f64> {
        let body = self.height_px - START_HEIGHT_PX;
        let mut rows = Vec::new();
        let mut y = 0.0;
        while y < body {
            rows.push(y);
            y += SPINE_SPACING_PX;
        }
        rows
    }
}

/// Step machine interpolating from [`START_HEIGHT_PX`] to the plant's target height.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthAnimation {
    target_px: f64,
    health: HealthState,
    next_step: u32,
}

impl GrowthAnimation {
    /// Animation toward an explicit target height and colour.
    pub fn new(target_px: f64, health: HealthState) -> Self {
        Self {
            target_px,
            health,
            next_step: 0,
        }
    }

    /// Animation for `plant` as of `now`.
    pub fn for_plant(plant: &Plant, now: NaiveDateTime) -> Self {
        let height_cm = plant.max_height().unwrap_or(DEFAULT_HEIGHT_CM);
        let target_px = (height_cm * PX_PER_CM).min(MAX_HEIGHT_PX);
        Self::new(target_px, health::health_state(plant, now))
    }

    /// Target height in pixels.
    pub fn target_px(&self) -> f64 {
        self.target_px
    }

    /// Returns true once every frame has been produced.
    pub fn is_finished(&self) -> bool {
        self.next_step > STEPS
    }

    /// Produces the next frame, or `None` once finished.
    pub fn next_frame(&mut self) -> Option<Frame> {
        if self.is_finished() {
            return None;
        }
        let step = self.next_step;
        self.next_step += 1;
        let height_px =
            START_HEIGHT_PX + (self.target_px - START_HEIGHT_PX) * f64::from(step) / f64::from(STEPS);
        Some(Frame {
            step,
            height_px,
            health: self.health,
        })
    }
}

impl Iterator for GrowthAnimation {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.next_frame()
    }
}

/// Plays `animation` to completion, sleeping `period` before each frame after the first.
///
/// Returns the number of frames delivered.
pub async fn play<F>(mut animation: GrowthAnimation, period: Duration, mut on_frame: F) -> u32
where
    F: FnMut(&Frame),
{
    let mut delivered = 0;
    while let Some(frame) = animation.next_frame() {
        if delivered > 0 {
            tokio::time::sleep(period).await;
        }
        on_frame(&frame);
        delivered += 1;
    }
    tracing::trace!(frames = delivered, "growth animation finished");
    delivered
}

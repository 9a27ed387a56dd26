use anyhow::Result;
use embedded_hal::delay::DelayNs;

use crate::motor::{clamp_speed, Motor, Speed};

/// Linear speed ramp, one unit of speed per tick.
///
/// Owns the commanded speed of the actuator. The step direction is fixed
/// whenever a new target is set, so a ramp never overshoots its target.
#[derive(Debug, Default)]
pub struct RampController {
    current: Speed,
    target: Speed,
    step: Speed,
}

impl RampController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Speed {
        self.current
    }

    pub fn target(&self) -> Speed {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn set_target(&mut self, target: i32) {
        self.target = clamp_speed(target);
        self.step = (self.target - self.current).signum();
        log::debug!("Ramp {} -> {}", self.current, self.target);
    }

    /// Advance one step towards the target. Returns `false` once settled,
    /// in which case the motor is not touched.
    pub fn tick<M: Motor>(&mut self, motor: &mut M) -> Result<bool> {
        if self.is_settled() {
            return Ok(false);
        }
        self.current += self.step;
        log::trace!("Speed {}", self.current);
        motor.drive(self.current)?;
        Ok(true)
    }

    /// Blocking ramp: step to `target`, waiting `step_ms` after every step.
    pub fn ramp_to<M: Motor, D: DelayNs>(
        &mut self,
        target: i32,
        motor: &mut M,
        delay: &mut D,
        step_ms: u32,
    ) -> Result<()> {
        self.set_target(target);
        while self.tick(motor)? {
            delay.delay_ms(step_ms);
        }
        Ok(())
    }

    /// Brake immediately, skipping the ramp.
    pub fn halt<M: Motor>(&mut self, motor: &mut M) -> Result<()> {
        self.current = 0;
        self.target = 0;
        self.step = 0;
        motor.drive(0)
    }
}

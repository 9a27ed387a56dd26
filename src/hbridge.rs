//! Dual-input H-bridge (L298N style) with a PWM enable line.
//!
//! | IN_A | IN_B | Function                 |
//! |------|------|--------------------------|
//! | H    | L    | Forward (actuator up)    |
//! | L    | H    | Reverse (actuator down)  |
//! | L    | L    | Brake                    |
//!
//! The enable line carries the duty cycle, `|speed| / 255` of full scale.

use anyhow::Result;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::motor::{Motor, Speed, MAX_SPEED};

pub struct HBridge<A, B, EN> {
    in_a: A,
    in_b: B,
    enable: EN,
}

impl<A, B, EN> HBridge<A, B, EN>
where
    A: OutputPin,
    B: OutputPin,
    EN: SetDutyCycle,
{
    pub fn new(in_a: A, in_b: B, enable: EN) -> Self {
        Self { in_a, in_b, enable }
    }

    pub fn brake(&mut self) -> Result<()> {
        self.in_a
            .set_low()
            .map_err(|e| anyhow::anyhow!("Failed to clear IN_A: {:?}", e))?;
        self.in_b
            .set_low()
            .map_err(|e| anyhow::anyhow!("Failed to clear IN_B: {:?}", e))?;
        Ok(())
    }

    fn set_direction(&mut self, forward: bool) -> Result<()> {
        // Release the active leg before energizing the other one
        if forward {
            self.in_b
                .set_low()
                .map_err(|e| anyhow::anyhow!("Failed to clear IN_B: {:?}", e))?;
            self.in_a
                .set_high()
                .map_err(|e| anyhow::anyhow!("Failed to set IN_A: {:?}", e))?;
        } else {
            self.in_a
                .set_low()
                .map_err(|e| anyhow::anyhow!("Failed to clear IN_A: {:?}", e))?;
            self.in_b
                .set_high()
                .map_err(|e| anyhow::anyhow!("Failed to set IN_B: {:?}", e))?;
        }
        Ok(())
    }
}

impl<A, B, EN> Motor for HBridge<A, B, EN>
where
    A: OutputPin,
    B: OutputPin,
    EN: SetDutyCycle,
{
    fn drive(&mut self, speed: Speed) -> Result<()> {
        if speed == 0 {
            return self.brake();
        }

        self.set_direction(speed > 0)?;
        let magnitude = speed.unsigned_abs().min(MAX_SPEED as u16);
        self.enable
            .set_duty_cycle_fraction(magnitude, MAX_SPEED as u16)
            .map_err(|e| anyhow::anyhow!("Failed to set duty cycle {}: {:?}", magnitude, e))?;
        Ok(())
    }
}

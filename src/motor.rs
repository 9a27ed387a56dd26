use anyhow::Result;

/// Signed motor speed. Positive drives the actuator up, negative down, 0 brakes.
pub type Speed = i16;

pub const MAX_SPEED: Speed = 255;

/// Saturate an arbitrary target into the valid speed range.
pub fn clamp_speed(target: i32) -> Speed {
    target.clamp(-(MAX_SPEED as i32), MAX_SPEED as i32) as Speed
}

pub trait Motor {
    /// Apply `speed` to the output stage. `0` brakes.
    fn drive(&mut self, speed: Speed) -> Result<()>;
}

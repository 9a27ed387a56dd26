//! Motion control for a limit-switch guarded linear actuator (TV lift),
//! commanded over a minimal HTTP interface.
//!
//! Everything in this crate is written against `embedded-hal` traits and
//! `std::io`, so it runs on the ESP32 as well as on a development host.

pub mod config;
pub mod hbridge;
pub mod http_api;
pub mod limit_switch;
pub mod motion;
pub mod motor;
pub mod ramp;

#[cfg(test)]
mod tests_mock;

pub use hbridge::HBridge;
pub use limit_switch::{LimitSensor, LimitSwitchBank, LimitSwitchState};
pub use motion::{Command, Direction, MotionExecutor, MotionState, Tick};
pub use motor::{Motor, Speed, MAX_SPEED};
pub use ramp::RampController;

use anyhow::Result;
use embedded_hal::delay::DelayNs;

use crate::config::MotionConfig;
use crate::limit_switch::{LimitSensor, LimitSwitchState};
use crate::motor::{Motor, Speed, MAX_SPEED};
use crate::ramp::RampController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Numeric speed setting, accepted but currently ignored.
    Speed,
    Up,
    Down,
    Stop,
    Unknown,
}

impl Command {
    /// Case-sensitive prefix match on the raw request body.
    pub fn parse(token: &str) -> Self {
        if token.starts_with("speed") {
            Command::Speed
        } else if token.starts_with("up") {
            Command::Up
        } else if token.starts_with("down") {
            Command::Down
        } else if token.starts_with("stop") {
            Command::Stop
        } else {
            Command::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Idle,
    /// Raising the ramp target in fixed increments while the way is clear.
    Accelerating { direction: Direction, target: Speed },
    /// Cruising until a limit switch on the active side trips.
    Holding { direction: Direction },
    /// Ramping back down to standstill.
    Stopping,
}

/// Outcome of one executor tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Call again after waiting this many milliseconds.
    Wait(u32),
    /// State changed, call again right away.
    Ready,
    /// Nothing in flight.
    Done,
}

pub struct MotionExecutor<M, L> {
    motor: M,
    switches: L,
    ramp: RampController,
    config: MotionConfig,
    state: MotionState,
}

impl<M: Motor, L: LimitSensor> MotionExecutor<M, L> {
    pub fn new(motor: M, switches: L, config: MotionConfig) -> Self {
        Self {
            motor,
            switches,
            ramp: RampController::new(),
            config,
            state: MotionState::Idle,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn current_speed(&self) -> Speed {
        self.ramp.current()
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn read_switches(&mut self) -> Result<LimitSwitchState> {
        self.switches.read()
    }

    /// Brake right away, without ramping.
    pub fn halt(&mut self) -> Result<()> {
        self.state = MotionState::Idle;
        self.ramp.halt(&mut self.motor)
    }

    /// Start servicing `command`. Returns `false` if a motion sequence is
    /// still in flight and the command was dropped.
    pub fn begin(&mut self, command: Command) -> Result<bool> {
        if self.state != MotionState::Idle {
            log::warn!("Busy ({:?}), ignoring {:?}", self.state, command);
            return Ok(false);
        }

        match command {
            Command::Up => self.start_move(Direction::Up),
            Command::Down => self.start_move(Direction::Down),
            Command::Stop => {
                log::info!("Stop");
                self.halt()?;
            }
            Command::Speed => log::info!("Speed command is disabled"),
            Command::Unknown => {}
        }
        Ok(true)
    }

    fn start_move(&mut self, direction: Direction) {
        log::info!("Moving {:?}", direction);
        self.state = MotionState::Accelerating {
            direction,
            target: self.ramp.current(),
        };
    }

    /// Advance the sequence in flight. On any failure the motor is braked
    /// and the executor returns to idle before the error is passed on.
    pub fn tick(&mut self) -> Result<Tick> {
        match self.step() {
            Ok(tick) => Ok(tick),
            Err(e) => {
                log::error!("Motion {:?} failed: {}", self.state, e);
                if let Err(brake_error) = self.halt() {
                    log::error!("Failed to brake: {}", brake_error);
                }
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<Tick> {
        match self.state {
            MotionState::Idle => Ok(Tick::Done),
            MotionState::Accelerating { direction, target } => {
                if self.ramp.tick(&mut self.motor)? {
                    return Ok(Tick::Wait(self.config.ramp_step_ms));
                }

                if target.abs() < MAX_SPEED && self.switches.read()?.is_clear(direction) {
                    let increment = self.config.acceleration_step.max(1) as i32;
                    let next = target as i32 + direction.sign() * increment;
                    self.ramp.set_target(next);
                    self.state = MotionState::Accelerating {
                        direction,
                        target: self.ramp.target(),
                    };
                } else {
                    log::info!("Holding {:?} at speed {}", direction, self.ramp.current());
                    self.state = MotionState::Holding { direction };
                }
                Ok(Tick::Ready)
            }
            MotionState::Holding { direction } => {
                if self.switches.read()?.is_clear(direction) {
                    return Ok(Tick::Wait(self.config.limit_poll_ms));
                }
                log::info!("{:?} limit reached, stopping", direction);
                self.ramp.set_target(0);
                self.state = MotionState::Stopping;
                Ok(Tick::Ready)
            }
            MotionState::Stopping => {
                if self.ramp.tick(&mut self.motor)? {
                    return Ok(Tick::Wait(self.config.ramp_step_ms));
                }
                log::info!("Stopped");
                self.state = MotionState::Idle;
                Ok(Tick::Done)
            }
        }
    }

    /// Service `command` to completion, sleeping on `delay` between ticks.
    pub fn execute<D: DelayNs>(&mut self, command: Command, delay: &mut D) -> Result<()> {
        if !self.begin(command)? {
            return Ok(());
        }
        loop {
            match self.tick()? {
                Tick::Wait(ms) => delay.delay_ms(ms),
                Tick::Ready => {}
                Tick::Done => return Ok(()),
            }
        }
    }
}

use anyhow::Result;
use embedded_hal::digital::InputPin;

use crate::motion::Direction;

/// Raw levels of the four travel limit switches, `true` = logic HIGH.
///
/// A HIGH input means the switch has tripped; the actuator may only move
/// towards a side while both switches on that side read LOW.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitSwitchState {
    pub upper_right: bool,
    pub lower_right: bool,
    pub upper_left: bool,
    pub lower_left: bool,
}

impl LimitSwitchState {
    pub fn upper_clear(&self) -> bool {
        !self.upper_right && !self.upper_left
    }

    pub fn lower_clear(&self) -> bool {
        !self.lower_right && !self.lower_left
    }

    pub fn is_clear(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.upper_clear(),
            Direction::Down => self.lower_clear(),
        }
    }
}

pub trait LimitSensor {
    /// Take a fresh snapshot of all four switches.
    fn read(&mut self) -> Result<LimitSwitchState>;
}

pub struct LimitSwitchBank<UR, LR, UL, LL> {
    upper_right: UR,
    lower_right: LR,
    upper_left: UL,
    lower_left: LL,
}

impl<UR, LR, UL, LL> LimitSwitchBank<UR, LR, UL, LL>
where
    UR: InputPin,
    LR: InputPin,
    UL: InputPin,
    LL: InputPin,
{
    pub fn new(upper_right: UR, lower_right: LR, upper_left: UL, lower_left: LL) -> Self {
        Self {
            upper_right,
            lower_right,
            upper_left,
            lower_left,
        }
    }
}

fn level<P: InputPin>(pin: &mut P, name: &str) -> Result<bool> {
    pin.is_high()
        .map_err(|e| anyhow::anyhow!("Failed to read {} limit switch: {:?}", name, e))
}

impl<UR, LR, UL, LL> LimitSensor for LimitSwitchBank<UR, LR, UL, LL>
where
    UR: InputPin,
    LR: InputPin,
    UL: InputPin,
    LL: InputPin,
{
    fn read(&mut self) -> Result<LimitSwitchState> {
        Ok(LimitSwitchState {
            upper_right: level(&mut self.upper_right, "upper right")?,
            lower_right: level(&mut self.lower_right, "lower right")?,
            upper_left: level(&mut self.upper_left, "upper left")?,
            lower_left: level(&mut self.lower_left, "lower left")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn bank_reads_every_switch_fresh() {
        let ur = PinMock::new(&[Transaction::get(State::High), Transaction::get(State::Low)]);
        let lr = PinMock::new(&[Transaction::get(State::Low), Transaction::get(State::Low)]);
        let ul = PinMock::new(&[Transaction::get(State::Low), Transaction::get(State::Low)]);
        let ll = PinMock::new(&[Transaction::get(State::Low), Transaction::get(State::High)]);
        let mut bank = LimitSwitchBank::new(ur.clone(), lr.clone(), ul.clone(), ll.clone());

        let first = bank.read().unwrap();
        assert!(first.upper_right);
        assert!(!first.upper_clear());
        assert!(first.lower_clear());

        let second = bank.read().unwrap();
        assert!(second.upper_clear());
        assert!(second.lower_left);
        assert!(!second.is_clear(Direction::Down));

        for mut pin in [ur, lr, ul, ll] {
            pin.done();
        }
    }

    #[test]
    fn one_tripped_switch_blocks_its_side() {
        let state = LimitSwitchState { upper_left: true, ..Default::default() };
        assert!(!state.is_clear(Direction::Up));
        assert!(state.is_clear(Direction::Down));

        let state = LimitSwitchState { lower_right: true, lower_left: true, ..Default::default() };
        assert!(state.is_clear(Direction::Up));
        assert!(!state.is_clear(Direction::Down));
    }
}

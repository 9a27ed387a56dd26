use anyhow::Result;

use crate::limit_switch::{LimitSensor, LimitSwitchState};
use crate::motor::{Motor, Speed};

/// Motor that records every speed it is driven with.
#[derive(Debug, Default)]
pub struct RecordingMotor {
    pub calls: Vec<Speed>,
}

impl Motor for RecordingMotor {
    fn drive(&mut self, speed: Speed) -> Result<()> {
        self.calls.push(speed);
        Ok(())
    }
}

/// Switches that stay clear for a number of reads, then report `tripped`.
#[derive(Debug)]
pub struct ScriptedSwitches {
    pub clear_reads: usize,
    pub tripped: LimitSwitchState,
    pub reads: usize,
}

impl ScriptedSwitches {
    pub fn trip_after(clear_reads: usize, tripped: LimitSwitchState) -> Self {
        Self { clear_reads, tripped, reads: 0 }
    }

    pub fn fixed(state: LimitSwitchState) -> Self {
        Self::trip_after(0, state)
    }
}

impl LimitSensor for ScriptedSwitches {
    fn read(&mut self) -> Result<LimitSwitchState> {
        self.reads += 1;
        if self.reads <= self.clear_reads {
            Ok(LimitSwitchState::default())
        } else {
            Ok(self.tripped)
        }
    }
}

pub const UPPER_TRIPPED: LimitSwitchState = LimitSwitchState {
    upper_right: true,
    lower_right: false,
    upper_left: true,
    lower_left: false,
};

pub const LOWER_TRIPPED: LimitSwitchState = LimitSwitchState {
    upper_right: false,
    lower_right: true,
    upper_left: false,
    lower_left: true,
};

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

// Network, fixed at build time
pub const HOSTNAME: &str = "tv-controller";
pub const LOCAL_IP: Ipv4Addr = Ipv4Addr::new(10, 200, 10, 35);
pub const GATEWAY: Ipv4Addr = Ipv4Addr::new(10, 200, 10, 1);
pub const SUBNET_PREFIX: u8 = 24;
pub const DNS_PRIMARY: Ipv4Addr = Ipv4Addr::new(10, 200, 10, 1);
pub const DNS_SECONDARY: Ipv4Addr = Ipv4Addr::new(1, 1, 1, 1);
pub const HTTP_PORT: u16 = 80;

/// GPIO assignments of the controller board.
pub mod pins {
    // H-bridge
    pub const IN3: u8 = 13; // forward leg
    pub const IN4: u8 = 16; // reverse leg
    pub const ENA: u8 = 4;  // PWM enable

    // limit switches, pulled up
    pub const SW_UR: u8 = 15;
    pub const SW_LR: u8 = 5;
    pub const SW_UL: u8 = 2;
    pub const SW_LL: u8 = 14;
}

pub const PWM_FREQUENCY_HZ: u32 = 1_000;

/// Timing and step sizes of the motion sequences.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    pub ramp_step_ms: u32,      // wait after every ±1 speed step
    pub acceleration_step: i16, // ramp target increment while accelerating
    pub limit_poll_ms: u32,     // poll interval while holding speed
    pub max_request_body: usize,
    pub read_timeout_ms: u64,   // per read on a client connection
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            ramp_step_ms: 4,
            acceleration_step: 5,
            limit_poll_ms: 10,
            max_request_body: 1024,
            read_timeout_ms: 1000,
        }
    }
}

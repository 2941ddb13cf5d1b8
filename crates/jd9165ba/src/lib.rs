#![cfg_attr(not(test), no_std)]

//! JD9165BA (10.1" 800x1280 MIPI-DSI panel controller) driver primitives.
//!
//! Transport-agnostic: everything reaches the controller through
//! [`CommandTransport`], which a board layer implements on top of its DBI
//! command channel. Register values and settle times live in [`command`]
//! as fixed data tables so they can be checked against the datasheet and
//! exercised without hardware.

pub mod command;

pub use command::{CommandStep, run_sequence};

/// Native panel width in pixels.
pub const PHYSICAL_WIDTH: u32 = 800;
/// Native panel height in pixels.
pub const PHYSICAL_HEIGHT: u32 = 1280;

/// Logical width once the power-on sequence has applied the landscape
/// orientation.
pub const LOGICAL_WIDTH: u32 = 800;
/// Logical height once the power-on sequence has applied the landscape
/// orientation.
pub const LOGICAL_HEIGHT: u32 = 480;

/// DSI data lanes the module is wired for.
pub const DATA_LANES: u8 = 2;
/// Per-lane bit rate in Mbps.
pub const LANE_BIT_RATE_MBPS: u32 = 1000;
/// DBI virtual channel carrying commands.
pub const VIRTUAL_CHANNEL: u8 = 0;
/// Command word width in bits.
pub const COMMAND_BITS: u8 = 8;
/// Parameter word width in bits.
pub const PARAMETER_BITS: u8 = 8;

/// Horizontal front porch in pixel clocks.
pub const HSYNC_FRONT_PORCH: u32 = 40;
/// Horizontal back porch in pixel clocks.
pub const HSYNC_BACK_PORCH: u32 = 140;
/// Horizontal sync pulse width in pixel clocks.
pub const HSYNC_PULSE_WIDTH: u32 = 40;
/// Vertical front porch in lines.
pub const VSYNC_FRONT_PORCH: u32 = 16;
/// Vertical back porch in lines.
pub const VSYNC_BACK_PORCH: u32 = 16;
/// Vertical sync pulse width in lines.
pub const VSYNC_PULSE_WIDTH: u32 = 4;

/// Command/parameter transport to the panel controller.
///
/// One call sends a single opcode plus its parameter bytes, synchronously.
/// Settle times are not the transport's job; [`command::run_sequence`]
/// applies them after each successful send.
pub trait CommandTransport {
    type Error;

    fn send(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error>;
}

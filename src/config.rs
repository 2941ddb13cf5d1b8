//! Compiled-in display configuration.
//!
//! One supported panel model, one configuration; everything here is fixed
//! at build time and consumed once during bring-up.

/// Physical signaling bus parameters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BusConfig {
    pub lane_count: u8,
    pub bit_rate_mbps: u32,
    /// PHY clock source selector, backend-defined.
    pub clock_source: u8,
}

/// Command channel parameters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChannelConfig {
    pub virtual_channel: u8,
    pub command_bits: u8,
    pub parameter_bits: u8,
}

/// Pixel encoding on the wire and in the framebuffers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    Rgb565,
    Rgb888,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb888 => 3,
        }
    }
}

/// Video timing, consumed once at panel construction.
///
/// `h_size`/`v_size` are the logical (post-rotation) resolution; the
/// orientation itself is applied by the controller command sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PanelTiming {
    pub h_size: u32,
    pub v_size: u32,
    pub h_front_porch: u32,
    pub h_back_porch: u32,
    pub h_pulse_width: u32,
    pub v_front_porch: u32,
    pub v_back_porch: u32,
    pub v_pulse_width: u32,
    pub pixel_format: PixelFormat,
    pub buffer_count: u8,
}

/// Everything the lifecycle controller needs to bring a panel up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisplayConfig {
    pub bus: BusConfig,
    pub channel: ChannelConfig,
    pub timing: PanelTiming,
}

impl DisplayConfig {
    /// Configuration for the JD9165BA module this stack supports.
    pub const fn jd9165ba() -> Self {
        Self {
            bus: BusConfig {
                lane_count: jd9165ba::DATA_LANES,
                bit_rate_mbps: jd9165ba::LANE_BIT_RATE_MBPS,
                clock_source: 0,
            },
            channel: ChannelConfig {
                virtual_channel: jd9165ba::VIRTUAL_CHANNEL,
                command_bits: jd9165ba::COMMAND_BITS,
                parameter_bits: jd9165ba::PARAMETER_BITS,
            },
            timing: PanelTiming {
                h_size: jd9165ba::LOGICAL_WIDTH,
                v_size: jd9165ba::LOGICAL_HEIGHT,
                h_front_porch: jd9165ba::HSYNC_FRONT_PORCH,
                h_back_porch: jd9165ba::HSYNC_BACK_PORCH,
                h_pulse_width: jd9165ba::HSYNC_PULSE_WIDTH,
                v_front_porch: jd9165ba::VSYNC_FRONT_PORCH,
                v_back_porch: jd9165ba::VSYNC_BACK_PORCH,
                v_pulse_width: jd9165ba::VSYNC_PULSE_WIDTH,
                pixel_format: PixelFormat::Rgb565,
                buffer_count: 2,
            },
        }
    }

    /// Size in bytes of one framebuffer.
    pub const fn frame_bytes(&self) -> usize {
        self.timing.h_size as usize
            * self.timing.v_size as usize
            * self.timing.pixel_format.bytes_per_pixel()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::jd9165ba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jd9165ba_config_matches_module_wiring() {
        let config = DisplayConfig::jd9165ba();

        assert_eq!(config.bus.lane_count, 2);
        assert_eq!(config.bus.bit_rate_mbps, 1000);
        assert_eq!(config.channel.virtual_channel, 0);
        assert_eq!((config.timing.h_size, config.timing.v_size), (800, 480));
        assert_eq!(config.timing.buffer_count, 2);
    }

    #[test]
    fn frame_bytes_covers_the_logical_surface() {
        let config = DisplayConfig::jd9165ba();
        assert_eq!(config.frame_bytes(), 800 * 480 * 2);
    }
}

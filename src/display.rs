//! Display lifecycle controller.

use embedded_hal::{delay::DelayNs, digital::OutputPin};
use jd9165ba::command::{
    self, POWER_OFF_SEQUENCE, POWER_ON_SEQUENCE, SLEEP_SEQUENCE, WAKE_SEQUENCE,
};
use log::{debug, info, warn};

use crate::{
    backlight::Backlight,
    config::DisplayConfig,
    error::Error,
    framebuffer::FramebufferPair,
    hal::{DsiHost, FrameAllocator, GraphicsHost},
};

/// Lifecycle position of the display stack.
///
/// Bring-up walks the first seven states in order. `Sleeping` is reachable
/// only from `Active`; teardown can start from any state past
/// `Uninitialized` and always ends in `Deinitialized`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisplayState {
    Uninitialized,
    BusReady,
    IoReady,
    PanelReady,
    ControllerConfigured,
    BacklightReady,
    Active,
    Sleeping,
    Deinitialized,
}

/// Owns every display resource and drives the bring-up/teardown protocol.
///
/// There is one display per system; all operations take `&mut self`, so a
/// single owner is enforced by the borrow checker rather than by locking.
/// Settle delays block the calling context; nothing here is async.
pub struct Display<H, P, A, G>
where
    H: DsiHost,
    P: OutputPin,
    A: FrameAllocator,
    G: GraphicsHost<A::Buffer>,
{
    host: H,
    allocator: A,
    graphics: G,
    config: DisplayConfig,
    state: DisplayState,
    bus: Option<H::Bus>,
    channel: Option<H::Channel>,
    panel: Option<H::Panel>,
    backlight: Backlight<P>,
    frames: Option<FramebufferPair<A::Buffer>>,
}

impl<H, P, A, G> Display<H, P, A, G>
where
    H: DsiHost,
    P: OutputPin,
    A: FrameAllocator,
    G: GraphicsHost<A::Buffer>,
{
    /// Creates an unpowered display stack. Nothing touches hardware until
    /// [`Display::init`].
    pub fn new(host: H, backlight_pin: P, allocator: A, graphics: G, config: DisplayConfig) -> Self {
        Self {
            host,
            allocator,
            graphics,
            config,
            state: DisplayState::Uninitialized,
            bus: None,
            channel: None,
            panel: None,
            backlight: Backlight::new(backlight_pin),
            frames: None,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Backlight line, for level queries.
    pub fn backlight(&self) -> &Backlight<P> {
        &self.backlight
    }

    /// Mutable access to the double-buffer pool while the display owns one.
    pub fn framebuffers_mut(&mut self) -> Option<&mut FramebufferPair<A::Buffer>> {
        self.frames.as_mut()
    }

    /// Brings the panel from unpowered to graphics-ready.
    ///
    /// Acquisition order: bus, command channel, video-timing panel,
    /// controller register sequence, backlight, framebuffer pair, graphics
    /// attach. The state advances after each successful stage. On failure
    /// the error names the failing stage and everything acquired so far
    /// stays held; call [`Display::deinit`] to release it before retrying.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<H::Error, P::Error>> {
        match self.state {
            DisplayState::Uninitialized | DisplayState::Deinitialized => {}
            state => {
                warn!("init: display already initialized (state {state:?})");
                return Err(Error::AlreadyInitialized);
            }
        }

        info!(
            "display bring-up: {} lanes @ {} Mbps, {}x{}",
            self.config.bus.lane_count,
            self.config.bus.bit_rate_mbps,
            self.config.timing.h_size,
            self.config.timing.v_size,
        );

        let bus = self.bus.insert(self.host.create_bus(&self.config.bus).map_err(Error::Bus)?);
        self.state = DisplayState::BusReady;

        let channel = self.channel.insert(
            self.host
                .create_channel(bus, &self.config.channel)
                .map_err(Error::Channel)?,
        );
        self.state = DisplayState::IoReady;

        // The panel streams pixel data from here on; what it shows is
        // whatever the backend scans out until the graphics layer draws.
        self.panel = Some(
            self.host
                .create_panel(bus, channel, &self.config.timing)
                .map_err(Error::Panel)?,
        );
        self.state = DisplayState::PanelReady;

        command::run_sequence(channel, delay, POWER_ON_SEQUENCE).map_err(Error::Transport)?;
        self.state = DisplayState::ControllerConfigured;
        debug!("controller register sequence complete");

        self.backlight.arm().map_err(Error::Backlight)?;
        self.state = DisplayState::BacklightReady;

        let frame_bytes = self.config.frame_bytes();
        let frames = self.frames.insert(
            FramebufferPair::allocate(&mut self.allocator, frame_bytes)
                .map_err(Error::Allocation)?,
        );

        self.graphics
            .attach(self.config.timing.h_size, self.config.timing.v_size, frames);
        self.state = DisplayState::Active;
        info!(
            "display active: {}x{}, 2x{} byte framebuffers",
            self.config.timing.h_size, self.config.timing.v_size, frame_bytes,
        );

        Ok(())
    }

    /// Puts the controller into sleep mode. The panel keeps its resources;
    /// the backlight is left wherever the caller set it.
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<H::Error, P::Error>> {
        if self.state != DisplayState::Active {
            warn!("sleep: display not active (state {:?})", self.state);
            return Err(Error::InvalidState(self.state));
        }

        let Some(channel) = self.channel.as_mut() else {
            return Err(Error::NotConnected);
        };
        command::run_sequence(channel, delay, SLEEP_SEQUENCE).map_err(Error::Transport)?;

        self.state = DisplayState::Sleeping;
        info!("panel sleeping");
        Ok(())
    }

    /// Wakes the controller, re-issuing sleep-out and display-on with
    /// their mandated settle times.
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<H::Error, P::Error>> {
        if self.state != DisplayState::Sleeping {
            warn!("wake: display not sleeping (state {:?})", self.state);
            return Err(Error::InvalidState(self.state));
        }

        let Some(channel) = self.channel.as_mut() else {
            return Err(Error::NotConnected);
        };
        command::run_sequence(channel, delay, WAKE_SEQUENCE).map_err(Error::Transport)?;

        self.state = DisplayState::Active;
        info!("panel awake");
        Ok(())
    }

    /// Tears the stack down to a cold state.
    ///
    /// Best-effort: the display-off/sleep-in commands are attempted but
    /// failures are only logged, since the point of teardown is releasing
    /// resources, not command acknowledgment. Resources are released in
    /// exact reverse acquisition order and each slot is emptied as it
    /// goes, so calling this again is a no-op rather than a double-free.
    pub fn deinit<D: DelayNs>(&mut self, delay: &mut D) {
        match self.state {
            DisplayState::Uninitialized | DisplayState::Deinitialized => {
                debug!("deinit: nothing to release (state {:?})", self.state);
                return;
            }
            state => info!("display teardown from {state:?}"),
        }

        if self.backlight.set(false).is_err() {
            warn!("deinit: backlight line did not go low");
        }

        if let Some(channel) = self.channel.as_mut() {
            if command::run_sequence(channel, delay, POWER_OFF_SEQUENCE).is_err() {
                warn!("deinit: power-off commands unacknowledged, releasing anyway");
            }
        }

        if let Some(frames) = self.frames.take() {
            self.graphics.detach();
            frames.release(&mut self.allocator);
        }
        if let Some(panel) = self.panel.take() {
            self.host.release_panel(panel);
        }
        if let Some(channel) = self.channel.take() {
            self.host.release_channel(channel);
        }
        if let Some(bus) = self.bus.take() {
            self.host.release_bus(bus);
        }

        self.state = DisplayState::Deinitialized;
        info!("display deinitialized");
    }

    /// Sets the backlight to `percent` of full brightness.
    ///
    /// The line is binary: any nonzero request drives it fully on and the
    /// truncation is logged. Usable from the moment the backlight is armed
    /// until teardown, sleeping or not.
    pub fn set_backlight(&mut self, percent: u8) -> Result<(), Error<H::Error, P::Error>> {
        if percent > 100 {
            return Err(Error::BrightnessOutOfRange(percent));
        }
        if !matches!(
            self.state,
            DisplayState::BacklightReady | DisplayState::Active | DisplayState::Sleeping
        ) {
            return Err(Error::NotReady);
        }

        if (1..100).contains(&percent) {
            warn!("backlight dimming unsupported; {percent}% treated as full on");
        }
        self.backlight.set(percent > 0).map_err(Error::Backlight)?;
        debug!("backlight {}", if percent > 0 { "on" } else { "off" });
        Ok(())
    }

    /// Logical (post-rotation) width in pixels.
    pub fn width(&self) -> Result<u32, Error<H::Error, P::Error>> {
        self.require_panel()?;
        Ok(self.config.timing.h_size)
    }

    /// Logical (post-rotation) height in pixels.
    pub fn height(&self) -> Result<u32, Error<H::Error, P::Error>> {
        self.require_panel()?;
        Ok(self.config.timing.v_size)
    }

    /// Acknowledges a graphics-layer buffer flush.
    ///
    /// The video-timing engine scans the framebuffers out autonomously, so
    /// there is no transfer to wait on; the acknowledgment returns
    /// immediately. This holds for streaming DPI panels only, not as a
    /// general flush-completion guarantee.
    pub fn acknowledge_flush(&mut self) -> Result<(), Error<H::Error, P::Error>> {
        if self.state != DisplayState::Active {
            return Err(Error::InvalidState(self.state));
        }
        Ok(())
    }

    fn require_panel(&self) -> Result<(), Error<H::Error, P::Error>> {
        if self.panel.is_some() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }
}

//! In-memory DSI backend used during bring-up and by the crate's tests.
//!
//! All parts share one [`MockState`] cell owned by the caller, so a test
//! can observe commands, release order and line levels at any point in
//! the lifecycle, and inject failures per stage.

use core::cell::RefCell;

use heapless::Vec;

use crate::{
    config::{BusConfig, ChannelConfig, PanelTiming},
    error::AllocationError,
    framebuffer::FramebufferPair,
    hal::{CommandTransport, DsiHost, FrameAllocator, GraphicsHost},
};

/// Error produced by any injected mock failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MockError(pub &'static str);

impl embedded_hal::digital::Error for MockError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// One command observed on the mock channel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentCommand {
    pub opcode: u8,
    pub params: Vec<u8, 32>,
}

/// A resource handed back to the backend, in observation order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Released {
    Framebuffer,
    Panel,
    Channel,
    Bus,
}

/// Shared observation and failure-injection state.
#[derive(Default)]
pub struct MockState {
    pub commands: Vec<SentCommand, 64>,
    pub released: Vec<Released, 8>,
    pub backlight_levels: Vec<bool, 16>,
    pub attached: Option<(u32, u32)>,
    pub detach_count: u8,
    pub allocation_count: usize,

    pub fail_bus: bool,
    pub fail_channel: bool,
    pub fail_panel: bool,
    /// Fail the send of this opcode.
    pub fail_command: Option<u8>,
    /// Fail the nth allocation, 1-based.
    pub fail_allocation_at: Option<usize>,
}

impl MockState {
    /// Fresh state cell to share across the mock parts.
    pub fn cell() -> RefCell<Self> {
        RefCell::new(Self::default())
    }
}

pub struct MockBus;

pub struct MockChannel<'a> {
    state: &'a RefCell<MockState>,
}

pub struct MockPanel;

impl CommandTransport for MockChannel<'_> {
    type Error = MockError;

    fn send(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_command == Some(opcode) {
            return Err(MockError("command send"));
        }

        let mut copied = Vec::new();
        copied.extend_from_slice(params).ok();
        state
            .commands
            .push(SentCommand {
                opcode,
                params: copied,
            })
            .ok();
        Ok(())
    }
}

/// Mock DSI backend.
pub struct MockHost<'a> {
    state: &'a RefCell<MockState>,
}

impl<'a> MockHost<'a> {
    pub fn new(state: &'a RefCell<MockState>) -> Self {
        Self { state }
    }
}

impl<'a> DsiHost for MockHost<'a> {
    type Bus = MockBus;
    type Channel = MockChannel<'a>;
    type Panel = MockPanel;
    type Error = MockError;

    fn create_bus(&mut self, _config: &BusConfig) -> Result<MockBus, MockError> {
        if self.state.borrow().fail_bus {
            return Err(MockError("bus"));
        }
        Ok(MockBus)
    }

    fn create_channel(
        &mut self,
        _bus: &mut MockBus,
        _config: &ChannelConfig,
    ) -> Result<MockChannel<'a>, MockError> {
        if self.state.borrow().fail_channel {
            return Err(MockError("channel"));
        }
        Ok(MockChannel { state: self.state })
    }

    fn create_panel(
        &mut self,
        _bus: &mut MockBus,
        _channel: &mut MockChannel<'a>,
        _timing: &PanelTiming,
    ) -> Result<MockPanel, MockError> {
        if self.state.borrow().fail_panel {
            return Err(MockError("panel"));
        }
        Ok(MockPanel)
    }

    fn release_panel(&mut self, _panel: MockPanel) {
        self.state.borrow_mut().released.push(Released::Panel).ok();
    }

    fn release_channel(&mut self, _channel: MockChannel<'a>) {
        self.state.borrow_mut().released.push(Released::Channel).ok();
    }

    fn release_bus(&mut self, _bus: MockBus) {
        self.state.borrow_mut().released.push(Released::Bus).ok();
    }
}

/// Framebuffer handle handed out by [`MockAllocator`]. Carries no memory;
/// the mock only tracks counts and release order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MockFrame {
    pub len: usize,
}

pub struct MockAllocator<'a> {
    state: &'a RefCell<MockState>,
}

impl<'a> MockAllocator<'a> {
    pub fn new(state: &'a RefCell<MockState>) -> Self {
        Self { state }
    }
}

impl FrameAllocator for MockAllocator<'_> {
    type Buffer = MockFrame;

    fn allocate(&mut self, len: usize) -> Result<MockFrame, AllocationError> {
        let mut state = self.state.borrow_mut();
        state.allocation_count += 1;
        if state.fail_allocation_at == Some(state.allocation_count) {
            return Err(AllocationError::OutOfMemory { requested: len });
        }
        Ok(MockFrame { len })
    }

    fn release(&mut self, _buffer: MockFrame) {
        self.state
            .borrow_mut()
            .released
            .push(Released::Framebuffer)
            .ok();
    }
}

/// Backlight pin recording every driven level.
pub struct MockPin<'a> {
    state: &'a RefCell<MockState>,
}

impl<'a> MockPin<'a> {
    pub fn new(state: &'a RefCell<MockState>) -> Self {
        Self { state }
    }
}

impl embedded_hal::digital::ErrorType for MockPin<'_> {
    type Error = MockError;
}

impl embedded_hal::digital::OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> Result<(), MockError> {
        self.state.borrow_mut().backlight_levels.push(false).ok();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockError> {
        self.state.borrow_mut().backlight_levels.push(true).ok();
        Ok(())
    }
}

/// Graphics collaborator recording attach/detach traffic.
pub struct MockGraphics<'a> {
    state: &'a RefCell<MockState>,
}

impl<'a> MockGraphics<'a> {
    pub fn new(state: &'a RefCell<MockState>) -> Self {
        Self { state }
    }
}

impl GraphicsHost<MockFrame> for MockGraphics<'_> {
    fn attach(&mut self, width: u32, height: u32, _frames: &mut FramebufferPair<MockFrame>) {
        self.state.borrow_mut().attached = Some((width, height));
    }

    fn detach(&mut self) {
        let mut state = self.state.borrow_mut();
        state.attached = None;
        state.detach_count += 1;
    }
}

/// Delay that records instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub slept_ms: Vec<u32, 32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.slept_ms.push(ns / 1_000_000).ok();
    }

    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms.push(ms).ok();
    }
}

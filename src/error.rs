//! Error taxonomy for the display stack.

use crate::display::DisplayState;

/// Framebuffer memory exhaustion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AllocationError {
    /// The backing allocator could not provide `requested` bytes.
    OutOfMemory { requested: usize },
}

/// Errors surfaced by display operations.
///
/// `HostErr` is the DSI backend's error type, `PinErr` the backlight
/// line's. The acquisition variants name the resource whose construction
/// failed; nothing is rolled back automatically, and the caller releases
/// whatever was built by calling `deinit`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error<HostErr, PinErr> {
    /// Signaling bus construction failed.
    Bus(HostErr),
    /// Command channel construction failed.
    Channel(HostErr),
    /// Video-timing panel construction failed.
    Panel(HostErr),
    /// A controller command was not delivered; the in-progress sequence
    /// was abandoned.
    Transport(HostErr),
    /// Command issued while no command channel is owned.
    NotConnected,
    /// Framebuffer allocation failed.
    Allocation(AllocationError),
    /// Backlight line operation failed.
    Backlight(PinErr),
    /// Operation not permitted in the current lifecycle state.
    InvalidState(DisplayState),
    /// Queried before the owning resource exists, or after teardown.
    NotReady,
    /// `init` called on an already-initialized display.
    AlreadyInitialized,
    /// Backlight percentage above 100.
    BrightnessOutOfRange(u8),
}

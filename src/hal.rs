//! Hardware seams for the DSI display stack.
//!
//! The lifecycle controller never touches registers itself; it drives
//! these traits. A board layer implements them over the platform's LCD
//! peripheral API, and [`crate::mock`] implements them in memory.

use crate::{
    config::{BusConfig, ChannelConfig, PanelTiming},
    error::AllocationError,
    framebuffer::FramebufferPair,
};

pub use jd9165ba::CommandTransport;

/// Platform backend owning the MIPI-DSI peripheral set.
///
/// Construction order is enforced by the borrows: a channel needs a live
/// bus, a panel needs both. Release runs in exact reverse order.
/// `create_panel` also starts the video-timing engine: a DPI panel
/// streams the current framebuffer contents continuously from the moment
/// it exists, and stops only when released.
pub trait DsiHost {
    type Bus;
    type Channel: CommandTransport<Error = Self::Error>;
    type Panel;
    type Error;

    fn create_bus(&mut self, config: &BusConfig) -> Result<Self::Bus, Self::Error>;

    fn create_channel(
        &mut self,
        bus: &mut Self::Bus,
        config: &ChannelConfig,
    ) -> Result<Self::Channel, Self::Error>;

    fn create_panel(
        &mut self,
        bus: &mut Self::Bus,
        channel: &mut Self::Channel,
        timing: &PanelTiming,
    ) -> Result<Self::Panel, Self::Error>;

    fn release_panel(&mut self, panel: Self::Panel);

    fn release_channel(&mut self, channel: Self::Channel);

    fn release_bus(&mut self, bus: Self::Bus);
}

/// Allocator for DMA-reachable framebuffer memory.
///
/// The video-timing engine scans buffers out autonomously, so they must
/// come from memory the display DMA can reach (external RAM on the
/// reference hardware).
pub trait FrameAllocator {
    type Buffer;

    fn allocate(&mut self, len: usize) -> Result<Self::Buffer, AllocationError>;

    fn release(&mut self, buffer: Self::Buffer);
}

/// Graphics-layer collaborator.
///
/// Attached once the display is fully up: it receives the logical
/// resolution and a non-owning view of the double-buffer pool, and is
/// detached during teardown before the buffers are released. Nothing the
/// collaborator holds may outlive that window.
pub trait GraphicsHost<B> {
    fn attach(&mut self, width: u32, height: u32, frames: &mut FramebufferPair<B>);

    fn detach(&mut self);
}

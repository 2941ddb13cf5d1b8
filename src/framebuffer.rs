//! Double-buffer pool backing the panel's continuous scan-out.

use crate::{error::AllocationError, hal::FrameAllocator};

/// Two equally-sized pixel buffers in DMA-reachable memory.
///
/// Owned by the lifecycle controller for its whole life; the graphics
/// layer only ever borrows it. Pixel contents are opaque here.
#[derive(Debug)]
pub struct FramebufferPair<B> {
    front: B,
    back: B,
    len: usize,
}

impl<B> FramebufferPair<B> {
    /// Allocates both buffers, or neither.
    ///
    /// If the second allocation fails, the first buffer goes back to the
    /// allocator before the error surfaces; a half-allocated pair must
    /// not leak.
    pub fn allocate<A>(allocator: &mut A, len: usize) -> Result<Self, AllocationError>
    where
        A: FrameAllocator<Buffer = B>,
    {
        let front = allocator.allocate(len)?;
        let back = match allocator.allocate(len) {
            Ok(back) => back,
            Err(err) => {
                allocator.release(front);
                return Err(err);
            }
        };

        Ok(Self { front, back, len })
    }

    /// Buffer length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Buffer currently scanned out.
    pub fn front(&self) -> &B {
        &self.front
    }

    pub fn front_mut(&mut self) -> &mut B {
        &mut self.front
    }

    /// Buffer the graphics layer draws into.
    pub fn back(&self) -> &B {
        &self.back
    }

    pub fn back_mut(&mut self) -> &mut B {
        &mut self.back
    }

    /// Promotes the back buffer to front after a completed frame.
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.front, &mut self.back);
    }

    /// Returns both buffers to the allocator, exactly once each.
    pub fn release<A>(self, allocator: &mut A)
    where
        A: FrameAllocator<Buffer = B>,
    {
        allocator.release(self.front);
        allocator.release(self.back);
    }
}

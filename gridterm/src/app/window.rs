use gridterm_core::ResizeCoalescer;
use log::debug;
use winit::dpi::PhysicalSize;

/// Handle window resize events
///
/// Only enqueues the new size; the coalescer applies it once the drag settles.
pub(super) fn handle_resize(size: PhysicalSize<u32>, coalescer: &ResizeCoalescer) {
    debug!("Window resized: {}x{}", size.width, size.height);
    let width = i32::try_from(size.width).unwrap_or(i32::MAX);
    let height = i32::try_from(size.height).unwrap_or(i32::MAX);
    coalescer.notify(width, height);
}

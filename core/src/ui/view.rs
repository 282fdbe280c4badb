extern crate alloc;

use alloc::vec::Vec;

use crate::display::{Display, RefreshMode};
use crate::framebuffer::ScreenBuffers;

use super::geom::Rect;

pub struct UiContext<'a> {
    pub buffers: &'a mut ScreenBuffers,
}

pub trait View {
    fn render(&mut self, ctx: &mut UiContext<'_>, rect: Rect, rq: &mut RenderQueue);
}

/// Regions touched during a render pass, with the refresh each asked for.
#[derive(Default)]
pub struct RenderQueue {
    regions: Vec<(Rect, RefreshMode)>,
}

impl RenderQueue {
    pub fn push(&mut self, rect: Rect, mode: RefreshMode) {
        if !rect.is_empty() {
            self.regions.push((rect, mode));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Presents the queued regions in one flush. Any region that asked for a
/// full refresh promotes the whole frame; otherwise `fallback` decides.
pub fn flush_queue(
    display: &mut impl Display,
    buffers: &mut ScreenBuffers,
    rq: &mut RenderQueue,
    fallback: RefreshMode,
) {
    if rq.regions.is_empty() {
        return;
    }
    let mode = if rq.regions.iter().any(|(_, m)| *m == RefreshMode::Full) {
        RefreshMode::Full
    } else {
        fallback
    };
    rq.regions.clear();
    display.flush(buffers, mode);
}

use crate::framebuffer::ScreenBuffers;

/// Refresh waveforms the application layer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Full refresh with the complete waveform; slow but artifact-free
    Full,
    /// Fast partial refresh
    Fast,
}

/// Panel flush boundary. An implementation presents the active plane and
/// records it as the previous frame once it is on glass.
pub trait Display {
    fn flush(&mut self, buffers: &mut ScreenBuffers, mode: RefreshMode);
}

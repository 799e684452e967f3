//! Audio volume seam

use devbridge_core::prelude::*;

/// Audio streams the bridge adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioStream {
    /// Media playback
    Music,
}

/// Host audio service
pub trait AudioControl: Send + Sync {
    /// Highest index accepted by [`AudioControl::set_volume`] for `stream`
    fn max_volume(&self, stream: AudioStream) -> Result<i32>;

    /// Current index
    fn volume(&self, stream: AudioStream) -> Result<i32>;

    /// Set the index; `show_ui` asks the host to display its volume panel
    fn set_volume(&self, stream: AudioStream, index: i32, show_ui: bool) -> Result<()>;
}

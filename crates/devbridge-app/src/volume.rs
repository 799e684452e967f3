//! Media volume

use std::sync::Arc;

use devbridge_core::prelude::*;
use devbridge_host::{AudioControl, AudioStream};

/// Level used when the caller omits one
pub const DEFAULT_VOLUME_LEVEL: i64 = 50;

/// Result of a volume change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeChange {
    /// Requested percentage after clamping
    pub level: u8,
    /// Index written to the stream
    pub index: i32,
    /// Stream maximum at the time of the write
    pub max: i32,
    /// Index read back from the host
    pub actual: i32,
}

/// Map a percentage onto a stream index in `[0, max]`, rounding down
pub fn volume_index(level: i64, max: i32) -> i32 {
    let fraction = level.clamp(0, 100) as f64 / 100.0;
    ((fraction * f64::from(max)) as i32).clamp(0, max.max(0))
}

#[derive(Clone)]
pub struct VolumeController {
    audio: Arc<dyn AudioControl>,
}

impl VolumeController {
    pub fn new(audio: Arc<dyn AudioControl>) -> Self {
        Self { audio }
    }

    /// Set the media stream to `level` percent, showing the host volume UI
    pub fn set_volume(&self, level: i64) -> Result<VolumeChange> {
        let stream = AudioStream::Music;
        let max = self.audio.max_volume(stream)?;
        let index = volume_index(level, max);

        self.audio.set_volume(stream, index, true)?;
        let actual = self.audio.volume(stream)?;

        if actual != index {
            warn!("Volume read back as {} after setting {}/{}", actual, index, max);
        } else {
            info!("Volume set to {}/{}", index, max);
        }

        Ok(VolumeChange {
            level: level.clamp(0, 100) as u8,
            index,
            max,
            actual,
        })
    }
}

impl std::fmt::Debug for VolumeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeController").finish_non_exhaustive()
    }
}

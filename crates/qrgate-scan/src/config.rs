use std::time::Duration;

/// Configuration for a scan session.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    width: u32,
    height: u32,
    timeout: Option<Duration>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            timeout: None,
        }
    }
}

impl ScannerConfig {
    /// Set the snapshot width. Frames are resampled to this size before decoding.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the snapshot height.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Give up with `ScanErrorKind::TimedOut` if nothing decodes within `timeout`.
    ///
    /// Sessions scan until stopped when unset.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    // Getters
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

//! Camera constraints requested when starting a scanner.

use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Rear camera (what you point at a product).
    #[default]
    Environment,
    /// Front camera.
    User,
}

/// Region of the frame the decoder looks at, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanBox {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub facing: Facing,
    /// Frames decoded per second.
    pub fps: u32,
    pub scan_box: Option<ScanBox>,
    pub aspect_ratio: Option<f32>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            fps: 10,
            scan_box: Some(ScanBox { width: 400, height: 300 }),
            aspect_ratio: Some(1.33),
        }
    }
}

impl Constraints {
    /// Smaller scan box and no aspect ratio. Most cameras that reject the
    /// defaults accept this.
    pub fn relaxed() -> Self {
        Self {
            facing: Facing::Environment,
            fps: 10,
            scan_box: Some(ScanBox { width: 300, height: 200 }),
            aspect_ratio: None,
        }
    }

    /// Check the constraints make sense at all, regardless of the device.
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            exn::bail!(ErrorKind::InvalidConstraints("fps must be greater than zero".to_string()));
        }
        if let Some(scan_box) = self.scan_box
            && (scan_box.width == 0 || scan_box.height == 0)
        {
            exn::bail!(ErrorKind::InvalidConstraints(format!(
                "scan box must not be empty ({}x{})",
                scan_box.width, scan_box.height
            )));
        }
        if let Some(ratio) = self.aspect_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            exn::bail!(ErrorKind::InvalidConstraints(format!("invalid aspect ratio {ratio}")));
        }
        Ok(())
    }
}

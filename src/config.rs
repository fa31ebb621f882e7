use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::Region;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub roi: RoiConfig,
    pub calibration: CalibrationDefaults,
    pub camera: CameraDefaults,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub flip_h: bool,
    pub flip_v: bool,
    /// Render loop period in milliseconds (~33 Hz by default).
    pub tick_ms: u64,
    /// Consecutive acquisition failures before the loop faults; 0 retries
    /// forever.
    pub failure_cutoff: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationDefaults {
    /// Reference wavelength under cursor 1 (mercury 436 nm line).
    pub lambda1_nm: f64,
    /// Reference wavelength under cursor 2 (mercury 546 nm line).
    pub lambda2_nm: f64,
}

/// Startup values for camera properties; `None` leaves the device default.
/// Not every webcam honors these, a rejected set is silently ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDefaults {
    pub exposure: Option<i64>,
    pub gain: Option<i64>,
    pub brightness: Option<i64>,
    pub contrast: Option<i64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            flip_h: false,
            flip_v: false,
            tick_ms: 30,
            failure_cutoff: 0,
        }
    }
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 200.0,
            width: 200.0,
            height: 100.0,
        }
    }
}

impl Default for CalibrationDefaults {
    fn default() -> Self {
        Self {
            lambda1_nm: 436.0,
            lambda2_nm: 546.0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            roi: RoiConfig::default(),
            calibration: CalibrationDefaults::default(),
            camera: CameraDefaults::default(),
        }
    }
}

impl AppConfig {
    const PATH: &'static str = "config.json";

    pub fn region(&self) -> Region {
        Region::new(self.roi.x, self.roi.y, self.roi.width, self.roi.height)
    }

    pub fn failure_cutoff(&self) -> Option<u32> {
        (self.defaults.failure_cutoff > 0).then_some(self.defaults.failure_cutoff)
    }

    pub fn load() -> Result<Self> {
        let config = if Path::new(Self::PATH).exists() {
            let content = fs::read_to_string(Self::PATH)?;
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    println!("Loaded configuration from {}", Self::PATH);
                    c
                }
                Err(e) => {
                    println!("Error parsing config: {}. Loading defaults.", e);
                    Self::default()
                }
            }
        } else {
            println!("Configuration file not found. Creating default at {}", Self::PATH);
            Self::default()
        };

        // Save back so newly added fields show up in the file.
        config.save()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::PATH, content)?;
        Ok(())
    }
}

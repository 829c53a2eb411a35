//! Error types for DroidPulse.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error(
        "no ADB devices found\n  - check the USB connection\n  - ensure USB debugging is enabled\n  - run 'adb devices' to verify"
    )]
    NoDevices,

    #[error("device {requested} not found (available: {})", .available.join(", "))]
    DeviceNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("could not find phone IP; ensure WiFi is connected on the device")]
    NoPhoneIp,

    #[error("wireless connection failed: {0}")]
    WirelessConnectFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

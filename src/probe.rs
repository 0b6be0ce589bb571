//! Host environment detection
//!
//! Queries the OS identity and the attached USB devices once, before any
//! mutation. The probe is read-only afterwards and never gates installation
//! by itself: a missing device only leads to a confirmation prompt, while a
//! non-Ubuntu platform is the one hard failure here.

use crate::config::SetupConfig;
use crate::error::{Result, SetupError};
use crate::report::LogSink;
use crate::system::System;

/// What one look at the host found
#[derive(Debug, Clone)]
pub struct EnvironmentProbe {
    pub distribution: String,
    pub version: String,
    /// `lsusb` lines matching the vendor signature
    pub devices: Vec<String>,
}

/// Probe the host; fails only for a non-Ubuntu-family platform.
pub fn detect(
    system: &dyn System,
    config: &SetupConfig,
    report: &mut LogSink,
) -> Result<EnvironmentProbe> {
    let os_release = system.os_release()?;
    let id = os_release_field(&os_release, "ID").unwrap_or_default();
    let id_like = os_release_field(&os_release, "ID_LIKE").unwrap_or_default();
    let version = os_release_field(&os_release, "VERSION_ID").unwrap_or_default();

    if !is_ubuntu_family(&id, &id_like) {
        let pretty = os_release_field(&os_release, "PRETTY_NAME").unwrap_or(id);
        return Err(SetupError::UnsupportedPlatform { detected: pretty });
    }

    let devices = match system.usb_listing() {
        Ok(listing) => {
            matching_devices(&listing, &config.usb_vendor_id, &config.usb_vendor_name)
        }
        Err(_) => {
            report.warn("could not query USB devices (is lsusb available?)");
            Vec::new()
        }
    };

    Ok(EnvironmentProbe {
        distribution: id,
        version,
        devices,
    })
}

/// Value of one `KEY=value` field in os-release, quotes stripped
fn os_release_field(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() != key {
            return None;
        }
        Some(v.trim().trim_matches('"').to_string())
    })
}

/// Ubuntu itself or any derivative declaring ubuntu ancestry
fn is_ubuntu_family(id: &str, id_like: &str) -> bool {
    id == "ubuntu" || id_like.split_whitespace().any(|ancestor| ancestor == "ubuntu")
}

/// Device listing lines carrying the vendor id or the vendor name
fn matching_devices(listing: &str, vendor_id: &str, vendor_name: &str) -> Vec<String> {
    let id_tag = format!("{vendor_id}:");
    listing
        .lines()
        .filter(|line| line.contains(&id_tag) || line.contains(vendor_name))
        .map(|line| line.trim().to_string())
        .collect()
}

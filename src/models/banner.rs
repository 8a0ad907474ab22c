// src/models/banner.rs
// DOCUMENTATION: Banner locations, banner images and hero banners

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Slot on the site a banner can be placed in (`banner_locations`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BannerLocation {
    pub id: i64,
    /// e.g. "hero", "moment"
    pub key: String,
    /// e.g. "Hero banner"
    pub name: String,
}

/// Device class a banner is cut for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Pc,
    Mobile,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Pc => "pc",
            Device::Mobile => "mobile",
        }
    }

    pub fn all() -> [Device; 2] {
        [Device::Pc, Device::Mobile]
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pc" => Ok(Device::Pc),
            "mobile" => Ok(Device::Mobile),
            other => Err(format!("invalid device: {}", other)),
        }
    }
}

/// Row of the `banner_images` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BannerImage {
    pub id: i64,
    /// Path inside the bucket (e.g. banners/home/pc/xxx.jpg)
    #[serde(default)]
    pub path: Option<String>,
    /// Public URL built from the path
    pub url: String,
    pub device: String,
    pub location: String,
}

/// Row inserted for every uploaded banner
#[derive(Debug, Clone, Serialize)]
pub struct NewBannerImage {
    pub path: String,
    pub url: String,
    pub device: Device,
    pub location: String,
    pub owner_id: Uuid,
}

/// Active banner from the `banners` table, rendered in the hero slider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeroBanner {
    pub id: i64,
    pub image_url: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub subheading: Option<String>,
    #[serde(default)]
    pub sort: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_parsing() {
        assert_eq!("pc".parse::<Device>(), Ok(Device::Pc));
        assert_eq!("mobile".parse::<Device>(), Ok(Device::Mobile));
        assert!("tablet".parse::<Device>().is_err());
        assert!("PC".parse::<Device>().is_err());
    }

    #[test]
    fn test_new_banner_serializes_device_lowercase() {
        let row = NewBannerImage {
            path: "banners/hero/mobile/1-a.jpg".to_string(),
            url: "u".to_string(),
            device: Device::Mobile,
            location: "hero".to_string(),
            owner_id: Uuid::nil(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["device"], "mobile");
    }
}

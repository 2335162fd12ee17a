//! List prices of the individual products a package is assembled from, in
//! agorot. The price audit rebuilds package prices from these.

use super::money::Money;
use super::package::{AiLevel, Hardware};

/// NVR price by channel count, largest first.
const NVR_PRICES: [(u32, Money); 6] = [
    (128, Money::new(800000)),
    (64, Money::new(450000)),
    (32, Money::new(280000)),
    (16, Money::new(150000)),
    (8, Money::new(90000)),
    (4, Money::new(60000)),
];

/// Hard drive price by capacity in TB, largest first.
const DRIVE_PRICES: [(u64, Money); 8] = [
    (128, Money::new(2200000)),
    (64, Money::new(1100000)),
    (32, Money::new(550000)),
    (16, Money::new(280000)),
    (8, Money::new(140000)),
    (4, Money::new(70000)),
    (2, Money::new(40000)),
    (1, Money::new(25000)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraGrade {
    Basic2Mp,
    Standard4Mp,
    Ai4Mp,
    Uhd4k,
    Uhd4kColorNight,
}

impl CameraGrade {
    /// The grade matching a package's camera features and AI level.
    pub fn for_hardware(hardware: &Hardware, ai: Option<AiLevel>) -> Self {
        let has = |feature: &str| {
            hardware
                .camera_types
                .iter()
                .any(|t| t.trim().eq_ignore_ascii_case(feature))
        };

        if has("4K") || has("8MP") {
            if has("Color Night") || has("Color") {
                CameraGrade::Uhd4kColorNight
            } else {
                CameraGrade::Uhd4k
            }
        } else if has("4MP") {
            match ai {
                Some(AiLevel::Advanced | AiLevel::Enterprise) => CameraGrade::Ai4Mp,
                _ => CameraGrade::Standard4Mp,
            }
        } else {
            CameraGrade::Basic2Mp
        }
    }

    pub fn unit_price(self) -> Money {
        match self {
            CameraGrade::Basic2Mp => Money::new(30000),
            CameraGrade::Standard4Mp => Money::new(45000),
            CameraGrade::Ai4Mp => Money::new(55000),
            CameraGrade::Uhd4k => Money::new(75000),
            CameraGrade::Uhd4kColorNight => Money::new(90000),
        }
    }
}

/// Price of the largest stocked NVR not above `channels`. Anything under four
/// channels is priced as the 4-channel unit.
pub fn nvr_price(channels: u32) -> Money {
    NVR_PRICES
        .iter()
        .find(|(size, _)| channels >= *size)
        .map(|(_, price)| *price)
        .unwrap_or(NVR_PRICES[NVR_PRICES.len() - 1].1)
}

/// Price of the largest stocked drive not above `capacity_tb`. Anything under
/// 1TB is priced as the 1TB drive.
pub fn drive_price(capacity_tb: u64) -> Money {
    DRIVE_PRICES
        .iter()
        .find(|(size, _)| capacity_tb >= *size)
        .map(|(_, price)| *price)
        .unwrap_or(DRIVE_PRICES[DRIVE_PRICES.len() - 1].1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsRating {
    Va500,
    Va1000,
    Va1500,
}

impl UpsRating {
    /// Reads the rating out of a model name such as `UPS-1000VA`.
    pub fn from_model(model: &str) -> Option<Self> {
        // "1500" contains "500", so the larger ratings are checked first.
        if model.contains("1500") {
            Some(UpsRating::Va1500)
        } else if model.contains("1000") {
            Some(UpsRating::Va1000)
        } else if model.contains("500") {
            Some(UpsRating::Va500)
        } else {
            None
        }
    }

    pub fn price(self) -> Money {
        match self {
            UpsRating::Va500 => Money::new(45000),
            UpsRating::Va1000 => Money::new(75000),
            UpsRating::Va1500 => Money::new(120000),
        }
    }
}

/// Service level for installation and annual maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServiceTier {
    Basic,
    Standard,
    Advanced,
    Enterprise,
}

impl ServiceTier {
    /// Installation effort grows with the number of cameras to mount.
    pub fn for_camera_count(cameras: u32) -> Self {
        match cameras {
            0..=4 => ServiceTier::Basic,
            5..=8 => ServiceTier::Standard,
            9..=16 => ServiceTier::Advanced,
            _ => ServiceTier::Enterprise,
        }
    }

    pub fn installation_price(self) -> Money {
        match self {
            ServiceTier::Basic => Money::new(80000),
            ServiceTier::Standard => Money::new(120000),
            ServiceTier::Advanced => Money::new(200000),
            ServiceTier::Enterprise => Money::new(350000),
        }
    }

    pub fn maintenance_price(self) -> Money {
        match self {
            ServiceTier::Basic => Money::new(50000),
            ServiceTier::Standard => Money::new(80000),
            ServiceTier::Advanced => Money::new(150000),
            ServiceTier::Enterprise => Money::new(400000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessory {
    Ups,
    AlarmBasic,
    AlarmAdvanced,
    AlarmEnterprise,
    AccessControlBasic,
    AccessControlEnterprise,
    GateIntercom,
    GateIntercomPro,
}

impl Accessory {
    /// The stocked product an addon id refers to. Service addons such as
    /// cash-register coverage have no product and map to `None`.
    pub fn from_addon_id(id: &str) -> Option<Self> {
        let enterprise = id.contains("enterprise");
        if id.contains("ups") {
            Some(Accessory::Ups)
        } else if id.contains("alarm") {
            Some(if enterprise {
                Accessory::AlarmEnterprise
            } else if id.contains("advanced") {
                Accessory::AlarmAdvanced
            } else {
                Accessory::AlarmBasic
            })
        } else if id.contains("access-control") {
            Some(if enterprise {
                Accessory::AccessControlEnterprise
            } else {
                Accessory::AccessControlBasic
            })
        } else if id.contains("intercom") {
            Some(if id.contains("pro") {
                Accessory::GateIntercomPro
            } else {
                Accessory::GateIntercom
            })
        } else {
            None
        }
    }

    pub fn price(self) -> Money {
        match self {
            Accessory::Ups => UpsRating::Va1000.price(),
            Accessory::AlarmBasic => Money::new(120000),
            Accessory::AlarmAdvanced => Money::new(250000),
            Accessory::AlarmEnterprise => Money::new(450000),
            Accessory::AccessControlBasic => Money::new(350000),
            Accessory::AccessControlEnterprise => Money::new(550000),
            Accessory::GateIntercom => Money::new(180000),
            Accessory::GateIntercomPro => Money::new(240000),
        }
    }
}

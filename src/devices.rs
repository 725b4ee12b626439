use serde::{Deserialize, Serialize};

/// Desktop viewport width used when no device emulation applies
pub const DESKTOP_WIDTH: u32 = 1366;

/// Desktop viewport height used when no device emulation applies
pub const DESKTOP_HEIGHT: u32 = 768;

/// Device category picked by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Pc,
    Mobile,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Pc => "pc",
            DeviceType::Mobile => "mobile",
        }
    }
}

/// Screen metrics applied to the page before capture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub is_mobile: bool,
    pub has_touch: bool,
    pub is_landscape: bool,
}

impl Viewport {
    /// The fixed desktop viewport
    pub const fn desktop() -> Self {
        Self {
            width: DESKTOP_WIDTH,
            height: DESKTOP_HEIGHT,
            device_scale_factor: 1.0,
            is_mobile: false,
            has_touch: false,
            is_landscape: false,
        }
    }
}

/// A named mobile device preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileDevice {
    pub name: String,
    pub user_agent: String,
    pub viewport: Viewport,
}

/// Emulation settings applied to every page of a crawl
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceProfile {
    Desktop { viewport: Viewport },
    Mobile(MobileDevice),
}

impl DeviceProfile {
    pub fn desktop() -> Self {
        DeviceProfile::Desktop {
            viewport: Viewport::desktop(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        match self {
            DeviceProfile::Desktop { viewport } => viewport,
            DeviceProfile::Mobile(device) => &device.viewport,
        }
    }

    pub fn user_agent(&self) -> Option<&str> {
        match self {
            DeviceProfile::Desktop { .. } => None,
            DeviceProfile::Mobile(device) => Some(&device.user_agent),
        }
    }
}

/// The operator's choice together with the profile it resolved to.
///
/// Artifact names follow `device_type`/`device_name` even when an unknown
/// mobile name degraded the profile to desktop.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSelection {
    pub device_type: DeviceType,
    pub device_name: Option<String>,
    pub profile: DeviceProfile,
}

impl DeviceSelection {
    pub fn desktop() -> Self {
        resolve(DeviceType::Pc, None)
    }
}

/// Resolve the operator's choice into a concrete device profile.
///
/// Unknown or missing mobile device names fall back to the desktop viewport.
pub fn resolve(device_type: DeviceType, device_name: Option<&str>) -> DeviceSelection {
    let profile = match device_type {
        DeviceType::Pc => DeviceProfile::desktop(),
        DeviceType::Mobile => match device_name.and_then(find) {
            Some(device) => DeviceProfile::Mobile(device),
            None => {
                ::log::warn!(
                    "Unknown mobile device {:?}, using the desktop viewport",
                    device_name.unwrap_or_default()
                );
                DeviceProfile::desktop()
            }
        },
    };

    DeviceSelection {
        device_type,
        device_name: match device_type {
            DeviceType::Pc => None,
            DeviceType::Mobile => device_name.map(str::to_string),
        },
        profile,
    }
}

/// Look up a preset by its exact name
pub fn find(name: &str) -> Option<MobileDevice> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .map(Preset::to_device)
}

/// Names of all known presets, in catalog order
pub fn catalog() -> Vec<&'static str> {
    PRESETS.iter().map(|preset| preset.name).collect()
}

struct Preset {
    name: &'static str,
    user_agent: &'static str,
    width: u32,
    height: u32,
    scale: f64,
    landscape: bool,
}

impl Preset {
    fn to_device(&self) -> MobileDevice {
        MobileDevice {
            name: self.name.to_string(),
            user_agent: self.user_agent.to_string(),
            viewport: Viewport {
                width: self.width,
                height: self.height,
                device_scale_factor: self.scale,
                is_mobile: true,
                has_touch: true,
                is_landscape: self.landscape,
            },
        }
    }
}

const IOS_11_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 11_0 like Mac OS X) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Mobile/15A372 Safari/604.1";
const IOS_14_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Mobile/15E148 Safari/604.1";
const IOS_15_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";
const IOS_16_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";
const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 11_0 like Mac OS X) AppleWebKit/604.1.34 (KHTML, like Gecko) Version/11.0 Mobile/15A5341f Safari/604.1";
const IOS_12_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 12_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.0 Mobile/15E148 Safari/604.1";
const IOS_13_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_7 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.1 Mobile/15E148 Safari/604.1";
const GALAXY_S9_PLUS_UA: &str = "Mozilla/5.0 (Linux; Android 8.0.0; SM-G965U Build/R16NW) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/63.0.3239.111 Mobile Safari/537.36";
const PIXEL_5_UA: &str = "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4420.0 Mobile Safari/537.36";

const PRESETS: &[Preset] = &[
    Preset {
        name: "iPhone SE",
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 10_3_1 like Mac OS X) AppleWebKit/603.1.30 (KHTML, like Gecko) Version/10.0 Mobile/14E304 Safari/602.1",
        width: 320,
        height: 568,
        scale: 2.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 8",
        user_agent: IOS_11_UA,
        width: 375,
        height: 667,
        scale: 2.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 8 landscape",
        user_agent: IOS_11_UA,
        width: 667,
        height: 375,
        scale: 2.0,
        landscape: true,
    },
    Preset {
        name: "iPhone X",
        user_agent: IOS_11_UA,
        width: 375,
        height: 812,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "iPhone X landscape",
        user_agent: IOS_11_UA,
        width: 812,
        height: 375,
        scale: 3.0,
        landscape: true,
    },
    Preset {
        name: "iPhone XR",
        user_agent: IOS_12_UA,
        width: 414,
        height: 896,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 11",
        user_agent: IOS_13_UA,
        width: 414,
        height: 828,
        scale: 2.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 11 landscape",
        user_agent: IOS_13_UA,
        width: 828,
        height: 414,
        scale: 2.0,
        landscape: true,
    },
    Preset {
        name: "iPhone 11 Pro",
        user_agent: IOS_13_UA,
        width: 375,
        height: 812,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 12 Pro",
        user_agent: IOS_14_UA,
        width: 390,
        height: 844,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 13",
        user_agent: IOS_15_UA,
        width: 390,
        height: 844,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "iPhone 14 Pro Max",
        user_agent: IOS_16_UA,
        width: 430,
        height: 932,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "iPad",
        user_agent: IPAD_UA,
        width: 768,
        height: 1024,
        scale: 2.0,
        landscape: false,
    },
    Preset {
        name: "iPad landscape",
        user_agent: IPAD_UA,
        width: 1024,
        height: 768,
        scale: 2.0,
        landscape: true,
    },
    Preset {
        name: "iPad Mini",
        user_agent: IPAD_UA,
        width: 768,
        height: 1024,
        scale: 2.0,
        landscape: false,
    },
    Preset {
        name: "iPad Mini landscape",
        user_agent: IPAD_UA,
        width: 1024,
        height: 768,
        scale: 2.0,
        landscape: true,
    },
    Preset {
        name: "iPad Pro",
        user_agent: IPAD_UA,
        width: 1024,
        height: 1366,
        scale: 2.0,
        landscape: false,
    },
    Preset {
        name: "iPad Pro landscape",
        user_agent: IPAD_UA,
        width: 1366,
        height: 1024,
        scale: 2.0,
        landscape: true,
    },
    Preset {
        name: "Pixel 2",
        user_agent: "Mozilla/5.0 (Linux; Android 8.0; Pixel 2 Build/OPD3.170816.012) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
        width: 411,
        height: 731,
        scale: 2.625,
        landscape: false,
    },
    Preset {
        name: "Pixel 2 XL",
        user_agent: "Mozilla/5.0 (Linux; Android 8.0.0; Pixel 2 XL Build/OPD1.170816.004) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
        width: 411,
        height: 823,
        scale: 3.5,
        landscape: false,
    },
    Preset {
        name: "Pixel 3",
        user_agent: "Mozilla/5.0 (Linux; Android 9; Pixel 3 Build/PQ1A.181105.017.A1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/66.0.3359.158 Mobile Safari/537.36",
        width: 393,
        height: 786,
        scale: 2.75,
        landscape: false,
    },
    Preset {
        name: "Pixel 4",
        user_agent: "Mozilla/5.0 (Linux; Android 10; Pixel 4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/81.0.4044.138 Mobile Safari/537.36",
        width: 353,
        height: 745,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "Pixel 5",
        user_agent: PIXEL_5_UA,
        width: 393,
        height: 851,
        scale: 2.75,
        landscape: false,
    },
    Preset {
        name: "Pixel 5 landscape",
        user_agent: PIXEL_5_UA,
        width: 851,
        height: 393,
        scale: 2.75,
        landscape: true,
    },
    Preset {
        name: "Galaxy S5",
        user_agent: "Mozilla/5.0 (Linux; Android 5.0; SM-G900P Build/LRX21T) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
        width: 360,
        height: 640,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "Galaxy S8",
        user_agent: "Mozilla/5.0 (Linux; Android 7.0; SM-G950U Build/NRD90M) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/62.0.3202.84 Mobile Safari/537.36",
        width: 360,
        height: 740,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "Galaxy S9+",
        user_agent: GALAXY_S9_PLUS_UA,
        width: 320,
        height: 658,
        scale: 4.5,
        landscape: false,
    },
    Preset {
        name: "Galaxy S9+ landscape",
        user_agent: GALAXY_S9_PLUS_UA,
        width: 658,
        height: 320,
        scale: 4.5,
        landscape: true,
    },
    Preset {
        name: "Galaxy Tab S4",
        user_agent: "Mozilla/5.0 (Linux; Android 8.1.0; SM-T837A) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.80 Safari/537.36",
        width: 712,
        height: 1138,
        scale: 2.25,
        landscape: false,
    },
    Preset {
        name: "Nexus 5",
        user_agent: "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
        width: 360,
        height: 640,
        scale: 3.0,
        landscape: false,
    },
    Preset {
        name: "Moto G4",
        user_agent: "Mozilla/5.0 (Linux; Android 7.0; Moto G (4)) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3765.0 Mobile Safari/537.36",
        width: 360,
        height: 640,
        scale: 3.0,
        landscape: false,
    },
];

use crate::devices::{DeviceSelection, DeviceType};
use std::path::{Path, PathBuf};

/// Default root directory for captured screenshots
pub const DEFAULT_OUTPUT_DIR: &str = "screenshots";

/// Longest URL-derived stem kept in a file name, in characters
const MAX_STEM_CHARS: usize = 100;

/// Where a single page capture is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureArtifact {
    /// URL the capture was taken from
    pub source_url: String,
    /// Device part of the name (`pc` or the lowercased device name)
    pub device_portion: String,
    /// Full path of the PNG file
    pub file_path: PathBuf,
}

impl CaptureArtifact {
    /// Compute the artifact for `url` under `output_root`
    pub fn for_url(url: &str, selection: &DeviceSelection, output_root: &Path) -> Self {
        let device_name = selection.device_name.as_deref();
        let directory = directory_for(output_root, selection.device_type, device_name);
        Self {
            source_url: url.to_string(),
            device_portion: device_portion(selection.device_type, device_name),
            file_path: directory.join(file_name_for(url, selection.device_type, device_name)),
        }
    }

    /// Directory the artifact lives in
    pub fn directory(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Convert a URL into a screenshot file name.
///
/// Distinct URLs may map to the same name; the later capture overwrites.
pub fn file_name_for(url: &str, device_type: DeviceType, device_name: Option<&str>) -> String {
    let stem = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let stem = stem.strip_prefix("www.").unwrap_or(stem);
    let stem = stem.strip_suffix('/').unwrap_or(stem);

    let mut name: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | ':' | '.') { '_' } else { c })
        .take(MAX_STEM_CHARS)
        .collect();

    name.push('_');
    name.push_str(&device_portion(device_type, device_name));
    name.push_str(".png");
    name
}

/// Directory for a device's screenshots under `output_root`
pub fn directory_for(output_root: &Path, device_type: DeviceType, device_name: Option<&str>) -> PathBuf {
    output_root.join(format!("{}-screenshot", device_portion(device_type, device_name)))
}

fn device_portion(device_type: DeviceType, device_name: Option<&str>) -> String {
    match (device_type, device_name) {
        (DeviceType::Mobile, Some(name)) => name.to_lowercase(),
        _ => DeviceType::Pc.as_str().to_string(),
    }
}

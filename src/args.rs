use clap::{Parser, ValueEnum};
use pagesnap::DeviceType;
use pagesnap::config::CrawlConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pagesnap")]
#[command(about = "Crawls a website and saves a full-page screenshot of every page it visits")]
#[command(version)]
pub struct Args {
    /// URL to start crawling from
    pub url: Option<String>,

    /// Device type to capture as (prompted when omitted)
    #[arg(long, value_enum)]
    pub device_type: Option<DeviceTypeArg>,

    /// Mobile device preset to emulate (implies --device-type mobile)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Path to a JSON crawl configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Root directory for screenshot folders
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Stop after this many distinct pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Capture the seed page only once
    #[arg(long)]
    pub no_recapture_seed: bool,

    /// Print the known mobile device presets and exit
    #[arg(long)]
    pub list_devices: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceTypeArg {
    Pc,
    Mobile,
}

/// Convert from CLI argument device type to internal device type
pub fn convert_device_type(arg_type: DeviceTypeArg) -> DeviceType {
    match arg_type {
        DeviceTypeArg::Pc => DeviceType::Pc,
        DeviceTypeArg::Mobile => DeviceType::Mobile,
    }
}

impl Args {
    /// Device type chosen on the command line, if any
    pub fn device_type(&self) -> Option<DeviceType> {
        self.device_type
            .map(convert_device_type)
            .or(self.device.as_ref().map(|_| DeviceType::Mobile))
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut CrawlConfig) {
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = Some(max_pages);
        }
        if self.no_recapture_seed {
            config.recapture_seed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_optional() {
        let args = Args::try_parse_from(["pagesnap"]).unwrap();
        assert_eq!(args.url, None);
        assert_eq!(args.device_type(), None);
    }

    #[test]
    fn test_device_flags() {
        let args = Args::try_parse_from(["pagesnap", "https://a.test/", "--device", "iPhone X"])
            .unwrap();
        assert_eq!(args.url.as_deref(), Some("https://a.test/"));
        assert_eq!(args.device_type(), Some(DeviceType::Mobile));

        let args =
            Args::try_parse_from(["pagesnap", "https://a.test/", "--device-type", "pc"]).unwrap();
        assert_eq!(args.device_type(), Some(DeviceType::Pc));
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "pagesnap",
            "https://a.test/",
            "--output-dir",
            "shots",
            "--max-pages",
            "3",
            "--no-recapture-seed",
        ])
        .unwrap();
        let mut config = CrawlConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.output_dir, PathBuf::from("shots"));
        assert_eq!(config.max_pages, Some(3));
        assert!(!config.recapture_seed);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }
}

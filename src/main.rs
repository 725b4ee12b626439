use clap::Parser;
use pagesnap::config::CrawlConfig;
use pagesnap::{DeviceSelection, DeviceType, ScreenshotCrawl, SeedUrl, devices, prompt};
use std::io;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    run_cli(args).await
}

/// Everything after argument parsing; returns the process exit status
async fn run_cli(args: Args) -> ExitCode {
    if args.list_devices {
        for name in devices::catalog() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    // Validate the seed before anything else runs
    let seed = match SeedUrl::parse(args.url.as_deref()) {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("Invalid URL provided. ({})", e);
            return ExitCode::from(1);
        }
    };

    let mut config = match &args.config {
        Some(path) => match CrawlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration: {}", e);
                return ExitCode::from(1);
            }
        },
        None => CrawlConfig::default(),
    };
    config.apply_env();
    args.apply_overrides(&mut config);

    let selection = match select_device(&args) {
        Ok(selection) => selection,
        Err(e) => {
            ::log::error!("Device selection failed: {}", e);
            return ExitCode::from(1);
        }
    };

    println!("Note: capturing requires a Chromium WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using {}",
        config.webdriver_url
    );

    let start_time = std::time::Instant::now();
    let report = match ScreenshotCrawl::new(seed)
        .with_device(selection)
        .with_config(config)
        .run()
        .await
    {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Failed to start crawler: {}", e);
            return ExitCode::from(1);
        }
    };

    ::log::info!(
        "Crawling complete - {} pages, {} screenshots saved, {} failed in {:.2} seconds",
        report.visited.len(),
        report.succeeded(),
        report.failed(),
        start_time.elapsed().as_secs_f64()
    );
    ExitCode::SUCCESS
}

/// Device choice from the command line, prompting for whatever is missing
fn select_device(args: &Args) -> io::Result<DeviceSelection> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let device_type = match args.device_type() {
        Some(device_type) => device_type,
        None => prompt::choose_device_type(&mut input, &mut output)?,
    };

    let device_name = match (device_type, &args.device) {
        (DeviceType::Pc, _) => None,
        (DeviceType::Mobile, Some(name)) => Some(name.clone()),
        (DeviceType::Mobile, None) => Some(prompt::choose_mobile_device(&mut input, &mut output)?),
    };

    Ok(devices::resolve(device_type, device_name.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_seed_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("shots");
        let output_arg = output.to_str().unwrap();

        let code = run_cli(parse(&["pagesnap", "not a url", "--output-dir", output_arg])).await;
        assert_eq!(code, ExitCode::from(1));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_seed_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let output_arg = dir.path().to_str().unwrap();

        let code = run_cli(parse(&["pagesnap", "--output-dir", output_arg])).await;
        assert_eq!(code, ExitCode::from(1));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_config_file_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("missing.json");

        let code = run_cli(parse(&[
            "pagesnap",
            "https://example.com/",
            "--device-type",
            "pc",
            "--config",
            config.to_str().unwrap(),
        ]))
        .await;
        assert_eq!(code, ExitCode::from(1));
    }

    #[tokio::test]
    async fn test_list_devices_succeeds_without_seed() {
        let code = run_cli(parse(&["pagesnap", "--list-devices"])).await;
        assert_eq!(code, ExitCode::SUCCESS);
    }
}

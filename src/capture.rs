use crate::devices::DeviceSelection;
use crate::error::CaptureError;
use crate::naming::CaptureArtifact;
use crate::readiness::ReadinessPolicy;
use crate::session::BrowserSession;
use std::path::Path;

/// Result of one capture attempt
#[derive(Debug)]
pub struct CaptureOutcome {
    /// URL the capture was attempted for
    pub url: String,
    /// Written artifact, or why the capture failed
    pub result: Result<CaptureArtifact, CaptureError>,
}

impl CaptureOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Capture a full-page screenshot of `url` into the output tree.
///
/// Failures are logged and reported in the outcome; they never abort the
/// caller.
pub async fn capture<S: BrowserSession>(
    session: &mut S,
    url: &str,
    selection: &DeviceSelection,
    output_root: &Path,
    readiness: &ReadinessPolicy,
) -> CaptureOutcome {
    ::log::info!("Taking screenshot of {}...", url);

    let result = try_capture(session, url, selection, output_root, readiness).await;
    match &result {
        Ok(artifact) => {
            ::log::info!("Screenshot saved as {}", artifact.file_path.display());
        }
        Err(e) => {
            ::log::error!("Error taking screenshot of {}: {}", url, e);
        }
    }

    CaptureOutcome {
        url: url.to_string(),
        result,
    }
}

async fn try_capture<S: BrowserSession>(
    session: &mut S,
    url: &str,
    selection: &DeviceSelection,
    output_root: &Path,
    readiness: &ReadinessPolicy,
) -> Result<CaptureArtifact, CaptureError> {
    let artifact = CaptureArtifact::for_url(url, selection, output_root);

    let directory = artifact.directory().to_path_buf();
    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|source| CaptureError::Io {
            path: directory,
            source,
        })?;

    session.apply_profile(&selection.profile).await?;
    session.navigate(url, readiness).await?;
    let png = session.capture_full_page().await?;

    tokio::fs::write(&artifact.file_path, &png)
        .await
        .map_err(|source| CaptureError::Io {
            path: artifact.file_path.clone(),
            source,
        })?;

    ::log::debug!("Wrote {} bytes for {}", png.len(), url);
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{self, DeviceProfile, DeviceType};
    use crate::error::SessionError;
    use crate::session::fake::{FakeSession, quick_readiness};

    #[tokio::test]
    async fn test_capture_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = FakeSession::new().page("https://example.com/", &[]);
        let log = session.log();
        let selection = DeviceSelection::desktop();

        let outcome = capture(
            &mut session,
            "https://example.com/",
            &selection,
            dir.path(),
            &quick_readiness(),
        )
        .await;

        let artifact = outcome.result.expect("capture should succeed");
        let expected = dir.path().join("pc-screenshot").join("example_com_pc.png");
        assert_eq!(artifact.file_path, expected);
        assert_eq!(
            std::fs::read(&expected).unwrap(),
            b"png:https://example.com/".to_vec()
        );

        let log = log.lock().unwrap();
        assert_eq!(log.profiles, vec![DeviceProfile::desktop()]);
        assert_eq!(log.navigations, vec!["https://example.com/"]);
    }

    #[tokio::test]
    async fn test_mobile_capture_applies_emulation() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = FakeSession::new();
        let log = session.log();
        let selection = devices::resolve(DeviceType::Mobile, Some("Pixel 5"));

        let outcome = capture(
            &mut session,
            "http://sub.site.io/path/",
            &selection,
            dir.path(),
            &quick_readiness(),
        )
        .await;

        assert!(outcome.is_success());
        assert!(
            dir.path()
                .join("pixel 5-screenshot")
                .join("sub_site_io_path_pixel 5.png")
                .exists()
        );
        assert!(matches!(
            log.lock().unwrap().profiles.as_slice(),
            [DeviceProfile::Mobile(device)] if device.name == "Pixel 5"
        ));
    }

    #[tokio::test]
    async fn test_navigation_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = FakeSession::new().failing("https://slow.test/");
        let log = session.log();

        let outcome = capture(
            &mut session,
            "https://slow.test/",
            &DeviceSelection::desktop(),
            dir.path(),
            &quick_readiness(),
        )
        .await;

        assert!(matches!(
            outcome.result,
            Err(CaptureError::Session(SessionError::ReadinessTimeout { .. }))
        ));
        assert!(log.lock().unwrap().captures.is_empty());
        // The directory exists but no file was written
        let written = std::fs::read_dir(dir.path().join("pc-screenshot")).unwrap().count();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_unwritable_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the output root directory should be
        let blocker = dir.path().join("screenshots");
        std::fs::write(&blocker, b"").unwrap();

        let mut session = FakeSession::new();
        let outcome = capture(
            &mut session,
            "https://a.test/",
            &DeviceSelection::desktop(),
            &blocker,
            &quick_readiness(),
        )
        .await;

        assert!(matches!(outcome.result, Err(CaptureError::Io { .. })));
    }
}

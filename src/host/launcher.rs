//! Install launcher that hands files to the desktop's default opener

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::update::error::LaunchError;
use crate::update::fetcher::{InstallLauncher, LaunchRequest};

/// Opens downloaded artifacts with the platform opener
/// (`open` on macOS, `start` on Windows, `xdg-open` elsewhere)
pub struct SystemLauncher {
    program: String,
    args: Vec<String>,
}

impl SystemLauncher {
    /// Uses `program` with leading `args` instead of the platform opener
    pub fn with_opener(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_opener("open", &[])
        } else if cfg!(target_os = "windows") {
            Self::with_opener("cmd", &["/C", "start", ""])
        } else {
            Self::with_opener("xdg-open", &[])
        }
    }
}

impl InstallLauncher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError> {
        if request.uri.scheme() != "file" {
            return Err(LaunchError::UnsupportedUri(request.uri.to_string()));
        }
        let path = request
            .uri
            .to_file_path()
            .map_err(|_| LaunchError::UnsupportedUri(request.uri.to_string()))?;

        // Files in the user's data directory are already readable by the
        // opener, so the read grant needs no extra work here.
        debug!(
            "Opening {:?} as {} (read grant: {})",
            path, request.mime_type, request.grant_read_permission
        );

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        info!("Started {} (pid {}) for {:?}", self.program, child.id(), path);
        Ok(())
    }
}

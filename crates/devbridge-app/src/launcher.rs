//! Launching other applications

use std::sync::{Arc, LazyLock};

use regex::Regex;

use devbridge_core::prelude::*;
use devbridge_host::packages::{GMAIL_PACKAGE, WEATHER_PACKAGES};
use devbridge_host::PackageLauncher;

/// Dotted Java-style identifier with at least two segments
static PACKAGE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$")
        .expect("package name regex is valid")
});

/// Check that `name` looks like an application package name
pub fn validate_package_name(name: &str) -> Result<()> {
    if PACKAGE_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "{:?} is not a valid package name",
            name
        )))
    }
}

#[derive(Clone)]
pub struct AppLauncher {
    packages: Arc<dyn PackageLauncher>,
}

impl AppLauncher {
    pub fn new(packages: Arc<dyn PackageLauncher>) -> Self {
        Self { packages }
    }

    /// Launch `package`; [`Error::NotFound`] if it is not installed
    pub fn launch_app(&self, package: &str) -> Result<()> {
        validate_package_name(package)?;
        if !self.packages.is_installed(package) {
            return Err(Error::not_found(package));
        }
        self.packages.launch(package)?;
        info!("Launched {}", package);
        Ok(())
    }

    pub fn launch_gmail(&self) -> Result<()> {
        self.launch_app(GMAIL_PACKAGE)
    }

    /// Launch the first installed weather app, returning its package
    pub fn launch_weather(&self) -> Result<&'static str> {
        let package = WEATHER_PACKAGES
            .iter()
            .copied()
            .find(|package| self.packages.is_installed(package))
            .ok_or_else(|| Error::not_found("weather app"))?;
        self.launch_app(package)?;
        Ok(package)
    }
}

impl std::fmt::Debug for AppLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLauncher").finish_non_exhaustive()
    }
}

//! Installed-application launch seam

use devbridge_core::prelude::*;

/// Mail client launched by `launchGmailApp`
pub const GMAIL_PACKAGE: &str = "com.google.android.gm";

/// Weather apps tried in order by `launchWeatherApp`
pub const WEATHER_PACKAGES: &[&str] = &[
    "com.google.android.apps.weather",
    "com.nothing.weather",
    "com.sec.android.daemonapp",
    "com.miui.weather2",
    "net.oneplus.weather",
    "com.accuweather.android",
];

/// Launches other applications by package name
pub trait PackageLauncher: Send + Sync {
    fn is_installed(&self, package: &str) -> bool;

    /// Start the package's launcher activity; [`Error::NotFound`] if absent
    fn launch(&self, package: &str) -> Result<()>;
}

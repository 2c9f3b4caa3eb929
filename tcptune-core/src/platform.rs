//! Host OS detection and Windows build gating.
//!
//! The option numbering differs between Windows, Linux and macOS, and on
//! Windows some keep-alive options only exist from a given Windows 10 build
//! onwards. `OsProfile` captures both facts so the option table can be built
//! once for the host.

use std::fmt;

use crate::error::{Result, TcpTuneError};
use crate::option::LogicalOption;

/// First Windows 10 build that understands TCP_KEEPCNT (1703).
pub const WINDOWS_KEEPALIVE_RETRY_COUNT_MIN_BUILD: u32 = 15_063;

/// First Windows 10 build that understands TCP_KEEPIDLE / TCP_KEEPINTVL (1709).
pub const WINDOWS_KEEPALIVE_TIMING_MIN_BUILD: u32 = 16_299;

/// Operating system families with a known option numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
}

impl OsFamily {
    /// Map a `std::env::consts::OS` style name to a family.
    pub fn from_os_name(name: &str) -> Option<Self> {
        match name {
            "windows" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::MacOs),
            _ => None,
        }
    }

    /// The `std::env::consts::OS` name of this family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected OS family plus, on Windows, the kernel build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsProfile {
    pub family: OsFamily,
    /// `None` off Windows, or when the build could not be read.
    pub windows_build: Option<u32>,
}

impl OsProfile {
    /// Profile for a Linux host.
    pub const fn linux() -> Self {
        Self {
            family: OsFamily::Linux,
            windows_build: None,
        }
    }

    /// Profile for a macOS host.
    pub const fn macos() -> Self {
        Self {
            family: OsFamily::MacOs,
            windows_build: None,
        }
    }

    /// Profile for a Windows host with the given build number.
    pub const fn windows(build: u32) -> Self {
        Self {
            family: OsFamily::Windows,
            windows_build: Some(build),
        }
    }

    /// Build a profile from an OS name, without querying a Windows build.
    pub fn from_os_name(name: &str) -> Result<Self> {
        let family = OsFamily::from_os_name(name)
            .ok_or_else(|| TcpTuneError::UnsupportedPlatform(name.to_string()))?;
        Ok(Self {
            family,
            windows_build: None,
        })
    }

    /// Detect the running operating system.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` when the host is not Windows, Linux or macOS.
    pub fn detect() -> Result<Self> {
        let mut profile = Self::from_os_name(std::env::consts::OS)?;
        if profile.family == OsFamily::Windows {
            profile.windows_build = windows_build_number();
        }
        Ok(profile)
    }

    /// Whether `option` exists on this OS and, on Windows, this build.
    ///
    /// An unreadable Windows build is treated as older than every gate.
    #[must_use]
    pub fn supports(&self, option: LogicalOption) -> bool {
        match (self.family, option) {
            (OsFamily::Windows, LogicalOption::ReusePort) => false,
            (OsFamily::Windows, LogicalOption::KeepAliveRetryCount) => {
                self.build_at_least(WINDOWS_KEEPALIVE_RETRY_COUNT_MIN_BUILD)
            }
            (
                OsFamily::Windows,
                LogicalOption::KeepAliveTime | LogicalOption::KeepAliveInterval,
            ) => self.build_at_least(WINDOWS_KEEPALIVE_TIMING_MIN_BUILD),
            (OsFamily::Linux | OsFamily::MacOs, LogicalOption::ExclusiveAddressUse) => false,
            _ => true,
        }
    }

    fn build_at_least(&self, min: u32) -> bool {
        self.windows_build.is_some_and(|build| build >= min)
    }
}

impl fmt::Display for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.windows_build {
            Some(build) => write!(f, "{} (build {build})", self.family),
            None => write!(f, "{}", self.family),
        }
    }
}

/// Read the Windows kernel build number.
///
/// `RtlGetVersion` is used instead of `GetVersionExW` because the latter
/// reports the manifest-compatible version, not the real one.
#[cfg(windows)]
#[allow(unsafe_code)]
fn windows_build_number() -> Option<u32> {
    use windows_sys::Wdk::System::SystemServices::RtlGetVersion;
    use windows_sys::Win32::System::SystemInformation::OSVERSIONINFOW;

    // SAFETY: OSVERSIONINFOW is plain data; all-zero is a valid value.
    let mut info: OSVERSIONINFOW = unsafe { std::mem::zeroed() };
    info.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOW>() as u32;

    // SAFETY: `info` is a properly sized, writable OSVERSIONINFOW.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status != 0 {
        tracing::warn!("RtlGetVersion failed with status {status:#x}");
        return None;
    }
    Some(info.dwBuildNumber)
}

#[cfg(not(windows))]
const fn windows_build_number() -> Option<u32> {
    None
}

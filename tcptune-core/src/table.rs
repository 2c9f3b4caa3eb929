//! Platform option table.
//!
//! Maps every [`LogicalOption`] to the number the host's socket option
//! interface expects, together with the numeric option levels and the access
//! mechanism used on that OS. The table for the running process is built
//! once and never changes afterwards.

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{Result, TcpTuneError};
use crate::option::{LogicalOption, OptionLevel};
use crate::platform::{OsFamily, OsProfile};

/// How option values reach the kernel on a given OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechanismKind {
    /// The OS socket API (Winsock)
    Native,
    /// Direct `getsockopt`/`setsockopt` through the C runtime
    RawSyscall,
}

/// Option identifiers for one OS, in [`LogicalOption::ALL`] order.
type IdRow = [Option<i32>; LogicalOption::COUNT];

// Columns follow `LogicalOption::ALL`: ReusePort, KeepAliveRetryCount,
// KeepAliveTime, KeepAliveInterval, ReuseAddress, ExclusiveAddressUse, KeepAlive.
const WINDOWS_IDS: IdRow = [None, Some(16), Some(3), Some(17), Some(4), Some(!4), Some(8)];
const LINUX_IDS: IdRow = [Some(15), Some(0x6), Some(0x4), Some(0x5), Some(2), None, Some(9)];
const MACOS_IDS: IdRow = [
    Some(0x0200),
    Some(0x102),
    Some(0x10),
    Some(0x101),
    Some(4),
    None,
    Some(8),
];

const IPPROTO_TCP: i32 = 6;
const SOL_SOCKET_LINUX: i32 = 1;
const SOL_SOCKET_BSD: i32 = 0xffff;

static CURRENT: OnceCell<PlatformOptionTable> = OnceCell::new();

/// Option numbering and access mechanism for one OS profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformOptionTable {
    profile: OsProfile,
    ids: IdRow,
    socket_level: i32,
    tcp_level: i32,
    mechanism: MechanismKind,
}

impl PlatformOptionTable {
    /// Build the table for an arbitrary profile.
    ///
    /// Options the profile does not support (see [`OsProfile::supports`])
    /// are left unmapped.
    pub fn for_profile(profile: &OsProfile) -> Self {
        let (row, socket_level, mechanism) = match profile.family {
            OsFamily::Windows => (WINDOWS_IDS, SOL_SOCKET_BSD, MechanismKind::Native),
            OsFamily::Linux => (LINUX_IDS, SOL_SOCKET_LINUX, MechanismKind::RawSyscall),
            OsFamily::MacOs => (MACOS_IDS, SOL_SOCKET_BSD, MechanismKind::RawSyscall),
        };

        let mut ids = [None; LogicalOption::COUNT];
        for option in LogicalOption::ALL {
            if profile.supports(option) {
                ids[option.index()] = row[option.index()];
            }
        }

        Self {
            profile: *profile,
            ids,
            socket_level,
            tcp_level: IPPROTO_TCP,
            mechanism,
        }
    }

    /// The table for the running process, built on first use.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` if the host OS has no known numbering.
    pub fn current() -> Result<&'static Self> {
        CURRENT.get_or_try_init(|| {
            let profile = OsProfile::detect()?;
            let table = Self::for_profile(&profile);
            debug!(
                "[TABLE] Built socket option table for {} ({} options, {:?})",
                profile,
                table.ids.iter().flatten().count(),
                table.mechanism
            );
            Ok(table)
        })
    }

    /// The OS-specific identifier for `option`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` if the option is unmapped on this OS/version.
    pub fn option_id(&self, option: LogicalOption) -> Result<i32> {
        self.ids[option.index()]
            .ok_or_else(|| TcpTuneError::unknown_option(option, self.profile.to_string()))
    }

    /// The OS-specific numeric value of `level`.
    #[inline]
    pub const fn level_id(&self, level: OptionLevel) -> i32 {
        match level {
            OptionLevel::Socket => self.socket_level,
            OptionLevel::Tcp => self.tcp_level,
        }
    }

    /// Whether `option` is mapped in this table.
    #[inline]
    pub const fn supports(&self, option: LogicalOption) -> bool {
        self.ids[option.index()].is_some()
    }

    /// The access mechanism used on this OS.
    #[inline]
    pub const fn mechanism(&self) -> MechanismKind {
        self.mechanism
    }

    /// The profile this table was built for.
    #[inline]
    pub const fn profile(&self) -> &OsProfile {
        &self.profile
    }
}

//! Get and set logical socket options on a caller-owned socket.
//!
//! The accessor resolves a [`LogicalOption`] through a
//! [`PlatformOptionTable`] and forwards the call to the bound
//! [`OptionAccess`] mechanism. One attempt per call; failures are passed
//! through as [`TcpTuneError`] without retrying.

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::error::Result;
use crate::handle::AsSocketHandle;
use crate::mechanism::{mechanism_for, OptionAccess};
use crate::option::{LogicalOption, OptionLevel};
use crate::table::PlatformOptionTable;

static CURRENT: OnceCell<OptionAccessor<'static>> = OnceCell::new();

/// A table paired with the mechanism that understands its numbers.
///
/// # Example
///
/// ```rust,no_run
/// use tcptune_core::accessor::OptionAccessor;
/// use tcptune_core::option::{LogicalOption, OptionLevel};
///
/// # fn example() -> tcptune_core::error::Result<()> {
/// let stream = std::net::TcpStream::connect("127.0.0.1:5555").unwrap();
/// let accessor = OptionAccessor::current()?;
///
/// accessor.set_option(&stream, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount, 5)?;
/// let count = accessor.get_option(&stream, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount)?;
/// assert_eq!(count, 5);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy)]
pub struct OptionAccessor<'a> {
    table: &'a PlatformOptionTable,
    mechanism: &'a dyn OptionAccess,
}

impl<'a> OptionAccessor<'a> {
    /// Pair an explicit table with an explicit mechanism.
    pub const fn new(table: &'a PlatformOptionTable, mechanism: &'a dyn OptionAccess) -> Self {
        Self { table, mechanism }
    }

    /// The table this accessor resolves options through.
    #[inline]
    pub const fn table(&self) -> &'a PlatformOptionTable {
        self.table
    }

    /// Set `option` at `level` on `socket` to `value`.
    ///
    /// # Errors
    ///
    /// - `UnknownOption` if the option is unmapped on this OS/version
    /// - `OsSocketError` / `SystemCallError` if the OS rejects the call
    pub fn set_option<S: AsSocketHandle + ?Sized>(
        &self,
        socket: &S,
        level: OptionLevel,
        option: LogicalOption,
        value: i32,
    ) -> Result<()> {
        let name = self.table.option_id(option)?;
        let level_id = self.table.level_id(level);
        trace!(
            "[SOCKOPT] set {} ({}/{}) = {} via {:?}",
            option,
            level_id,
            name,
            value,
            self.mechanism.kind()
        );
        self.mechanism
            .set(socket.socket_handle(), level_id, name, value)
    }

    /// Read `option` at `level` from `socket`.
    ///
    /// The raw OS value is returned unchanged. Some OSes normalise on read:
    /// after disabling SO_REUSEADDR the value may read back as 0 whatever
    /// was requested, and BSD-derived kernels report enabled flags as the
    /// option bit rather than 1.
    ///
    /// # Errors
    ///
    /// Same as [`set_option`](Self::set_option).
    pub fn get_option<S: AsSocketHandle + ?Sized>(
        &self,
        socket: &S,
        level: OptionLevel,
        option: LogicalOption,
    ) -> Result<i32> {
        let name = self.table.option_id(option)?;
        let level_id = self.table.level_id(level);
        let value = self.mechanism.get(socket.socket_handle(), level_id, name)?;
        trace!(
            "[SOCKOPT] get {} ({}/{}) -> {} via {:?}",
            option,
            level_id,
            name,
            value,
            self.mechanism.kind()
        );
        Ok(value)
    }

    /// Set a boolean option (`true` is written as 1).
    pub fn set_flag<S: AsSocketHandle + ?Sized>(
        &self,
        socket: &S,
        level: OptionLevel,
        option: LogicalOption,
        enabled: bool,
    ) -> Result<()> {
        self.set_option(socket, level, option, i32::from(enabled))
    }

    /// Read a boolean option; any nonzero value is `true`.
    ///
    /// Some BSD-derived kernels report the option's bit value (e.g. 8 for
    /// SO_KEEPALIVE on macOS) instead of 1.
    pub fn get_flag<S: AsSocketHandle + ?Sized>(
        &self,
        socket: &S,
        level: OptionLevel,
        option: LogicalOption,
    ) -> Result<bool> {
        Ok(self.get_option(socket, level, option)? != 0)
    }
}

impl OptionAccessor<'static> {
    /// The accessor for the running process: host table, host mechanism.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` on an OS without a known numbering.
    pub fn current() -> Result<Self> {
        CURRENT
            .get_or_try_init(|| {
                let table = PlatformOptionTable::current()?;
                let mechanism = mechanism_for(table.profile().family)?;
                Ok(Self::new(table, mechanism))
            })
            .copied()
    }
}

impl std::fmt::Debug for OptionAccessor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionAccessor")
            .field("profile", self.table.profile())
            .field("mechanism", &self.mechanism.kind())
            .finish()
    }
}

/// Set an option through the process-wide accessor.
///
/// See [`OptionAccessor::set_option`].
pub fn set_option<S: AsSocketHandle + ?Sized>(
    socket: &S,
    level: OptionLevel,
    option: LogicalOption,
    value: i32,
) -> Result<()> {
    OptionAccessor::current()?.set_option(socket, level, option, value)
}

/// Read an option through the process-wide accessor.
///
/// See [`OptionAccessor::get_option`].
pub fn get_option<S: AsSocketHandle + ?Sized>(
    socket: &S,
    level: OptionLevel,
    option: LogicalOption,
) -> Result<i32> {
    OptionAccessor::current()?.get_option(socket, level, option)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TcpTuneError;
    use crate::handle::RawSocketHandle;
    use crate::platform::OsProfile;
    use crate::table::MechanismKind;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory mechanism keyed by (handle, level, name).
    #[derive(Default)]
    struct RecordingAccess {
        values: Mutex<HashMap<(RawSocketHandle, i32, i32), i32>>,
        fail_with: Option<i32>,
    }

    impl OptionAccess for RecordingAccess {
        fn kind(&self) -> MechanismKind {
            MechanismKind::RawSyscall
        }

        fn get(&self, handle: RawSocketHandle, level: i32, name: i32) -> Result<i32> {
            if let Some(code) = self.fail_with {
                return Err(TcpTuneError::SystemCallError { code, errno: None });
            }
            Ok(*self.values.lock().get(&(handle, level, name)).unwrap_or(&0))
        }

        fn set(&self, handle: RawSocketHandle, level: i32, name: i32, value: i32) -> Result<()> {
            if let Some(code) = self.fail_with {
                return Err(TcpTuneError::SystemCallError { code, errno: None });
            }
            self.values.lock().insert((handle, level, name), value);
            Ok(())
        }
    }

    struct FakeSocket(RawSocketHandle);

    #[cfg(unix)]
    impl std::os::unix::io::AsRawFd for FakeSocket {
        fn as_raw_fd(&self) -> RawSocketHandle {
            self.0
        }
    }

    #[cfg(windows)]
    impl std::os::windows::io::AsRawSocket for FakeSocket {
        fn as_raw_socket(&self) -> RawSocketHandle {
            self.0
        }
    }

    #[test]
    fn test_round_trip_through_table() {
        let table = PlatformOptionTable::for_profile(&OsProfile::macos());
        let mechanism = RecordingAccess::default();
        let accessor = OptionAccessor::new(&table, &mechanism);
        let socket = FakeSocket(7);

        accessor
            .set_option(&socket, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount, 25)
            .unwrap();
        assert_eq!(
            accessor
                .get_option(&socket, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount)
                .unwrap(),
            25
        );

        // The mechanism saw the macOS numbers, not the logical option
        assert_eq!(mechanism.values.lock().get(&(7, 6, 0x102)), Some(&25));
    }

    #[test]
    fn test_gated_windows_option_is_unknown() {
        let table = PlatformOptionTable::for_profile(&OsProfile::windows(15_063));
        let mechanism = RecordingAccess::default();
        let accessor = OptionAccessor::new(&table, &mechanism);
        let socket = FakeSocket(3);

        let err = accessor
            .set_option(&socket, OptionLevel::Tcp, LogicalOption::KeepAliveTime, 36)
            .unwrap_err();
        assert!(matches!(err, TcpTuneError::UnknownOption { .. }));
        assert!(mechanism.values.lock().is_empty());

        // Retry count is already available on this build
        accessor
            .set_option(&socket, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount, 25)
            .unwrap();
    }

    #[test]
    fn test_mechanism_failure_is_passed_through() {
        let table = PlatformOptionTable::for_profile(&OsProfile::linux());
        let mechanism = RecordingAccess {
            fail_with: Some(-1),
            ..Default::default()
        };
        let accessor = OptionAccessor::new(&table, &mechanism);

        let err = accessor
            .get_option(&FakeSocket(4), OptionLevel::Socket, LogicalOption::KeepAlive)
            .unwrap_err();
        assert_eq!(
            err,
            TcpTuneError::SystemCallError {
                code: -1,
                errno: None
            }
        );
    }

    #[test]
    fn test_flags() {
        let table = PlatformOptionTable::for_profile(&OsProfile::linux());
        let mechanism = RecordingAccess::default();
        let accessor = OptionAccessor::new(&table, &mechanism);
        let socket = FakeSocket(5);

        assert!(!accessor
            .get_flag(&socket, OptionLevel::Socket, LogicalOption::KeepAlive)
            .unwrap());
        accessor
            .set_flag(&socket, OptionLevel::Socket, LogicalOption::KeepAlive, true)
            .unwrap();
        assert!(accessor
            .get_flag(&socket, OptionLevel::Socket, LogicalOption::KeepAlive)
            .unwrap());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_bad_descriptor_surfaces_syscall_error() {
        let err = get_option(&FakeSocket(-1), OptionLevel::Socket, LogicalOption::KeepAlive)
            .unwrap_err();
        assert_eq!(err.raw_code(), Some(-1));
        assert!(matches!(
            err,
            TcpTuneError::SystemCallError {
                errno: Some(libc::EBADF),
                ..
            }
        ));
    }
}

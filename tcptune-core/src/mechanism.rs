//! Socket option access mechanisms.
//!
//! Two ways of reaching the kernel, behind one interface:
//!
//! - [`NativeOptionAccess`] goes through the OS socket API (Winsock).
//! - [`RawSyscallOptionAccess`] calls `getsockopt`/`setsockopt` from the C
//!   runtime directly (glibc/musl on Linux, `libSystem` on macOS), which
//!   reaches options higher-level wrappers do not surface.
//!
//! Values cross the FFI boundary as a stack-local 4-byte buffer in native
//! byte order; nothing is retained past the call.
//!
//! # Safety
//!
//! This module calls foreign functions with raw handles and buffer
//! pointers. The pointers always refer to locals of the calling frame and
//! the lengths always match the buffer.

#![allow(unsafe_code)]

use crate::error::{Result, TcpTuneError};
use crate::handle::RawSocketHandle;
use crate::platform::OsFamily;
use crate::table::MechanismKind;

/// Size of every option value exchanged with the OS.
pub const OPTION_VALUE_LEN: usize = std::mem::size_of::<i32>();

/// Uniform get/set interface over a socket option mechanism.
///
/// `level` and `name` are OS-specific numbers taken from a
/// [`PlatformOptionTable`](crate::table::PlatformOptionTable).
pub trait OptionAccess: Send + Sync {
    /// Which mechanism this is.
    fn kind(&self) -> MechanismKind;

    /// Read an integer option value.
    fn get(&self, handle: RawSocketHandle, level: i32, name: i32) -> Result<i32>;

    /// Write an integer option value.
    fn set(&self, handle: RawSocketHandle, level: i32, name: i32, value: i32) -> Result<()>;
}

/// Pack a value for the option call.
#[inline]
pub const fn encode_value(value: i32) -> [u8; OPTION_VALUE_LEN] {
    value.to_ne_bytes()
}

/// Unpack a value returned by the option call.
#[inline]
pub const fn decode_value(buf: [u8; OPTION_VALUE_LEN]) -> i32 {
    i32::from_ne_bytes(buf)
}

/// Turn a raw `getsockopt`/`setsockopt` return value into a result.
///
/// Zero is success; any other value is a failure carrying that value.
/// `errno` is whatever the OS reported for the failed call.
#[inline]
pub fn check_return(ret: i32, errno: impl FnOnce() -> Option<i32>) -> Result<()> {
    if ret == 0 {
        Ok(())
    } else {
        Err(TcpTuneError::SystemCallError {
            code: ret,
            errno: errno(),
        })
    }
}

/// Direct `getsockopt`/`setsockopt` through the C runtime.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSyscallOptionAccess;

#[cfg(unix)]
impl OptionAccess for RawSyscallOptionAccess {
    fn kind(&self) -> MechanismKind {
        MechanismKind::RawSyscall
    }

    fn get(&self, handle: RawSocketHandle, level: i32, name: i32) -> Result<i32> {
        let mut buf = [0u8; OPTION_VALUE_LEN];
        let mut len = OPTION_VALUE_LEN as libc::socklen_t;

        // SAFETY: `buf` and `len` are locals that outlive the call and `len`
        // holds the size of `buf`.
        let ret = unsafe {
            libc::getsockopt(
                handle,
                level,
                name,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                &mut len,
            )
        };
        check_return(ret, last_errno)?;
        Ok(decode_value(buf))
    }

    fn set(&self, handle: RawSocketHandle, level: i32, name: i32, value: i32) -> Result<()> {
        let buf = encode_value(value);

        // SAFETY: `buf` is a local that outlives the call and the length
        // passed is its size.
        let ret = unsafe {
            libc::setsockopt(
                handle,
                level,
                name,
                buf.as_ptr().cast::<libc::c_void>(),
                OPTION_VALUE_LEN as libc::socklen_t,
            )
        };
        check_return(ret, last_errno)
    }
}

#[cfg(unix)]
fn last_errno() -> Option<i32> {
    std::io::Error::last_os_error().raw_os_error()
}

/// Socket option calls through the OS socket API.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeOptionAccess;

#[cfg(windows)]
impl OptionAccess for NativeOptionAccess {
    fn kind(&self) -> MechanismKind {
        MechanismKind::Native
    }

    fn get(&self, handle: RawSocketHandle, level: i32, name: i32) -> Result<i32> {
        use windows_sys::Win32::Networking::WinSock::{getsockopt, SOCKET, SOCKET_ERROR};

        let mut buf = [0u8; OPTION_VALUE_LEN];
        let mut len = OPTION_VALUE_LEN as i32;

        // SAFETY: `buf` and `len` are locals that outlive the call and `len`
        // holds the size of `buf`.
        let ret = unsafe { getsockopt(handle as SOCKET, level, name, buf.as_mut_ptr(), &mut len) };
        if ret == SOCKET_ERROR {
            return Err(last_wsa_error());
        }
        Ok(decode_value(buf))
    }

    fn set(&self, handle: RawSocketHandle, level: i32, name: i32, value: i32) -> Result<()> {
        use windows_sys::Win32::Networking::WinSock::{setsockopt, SOCKET, SOCKET_ERROR};

        let buf = encode_value(value);

        // SAFETY: `buf` is a local that outlives the call and the length
        // passed is its size.
        let ret = unsafe {
            setsockopt(
                handle as SOCKET,
                level,
                name,
                buf.as_ptr(),
                OPTION_VALUE_LEN as i32,
            )
        };
        if ret == SOCKET_ERROR {
            return Err(last_wsa_error());
        }
        Ok(())
    }
}

#[cfg(windows)]
fn last_wsa_error() -> TcpTuneError {
    // SAFETY: WSAGetLastError only reads thread-local state.
    let code = unsafe { windows_sys::Win32::Networking::WinSock::WSAGetLastError() };
    TcpTuneError::OsSocketError { code }
}

#[cfg(windows)]
static NATIVE: NativeOptionAccess = NativeOptionAccess;

#[cfg(unix)]
static RAW_SYSCALL: RawSyscallOptionAccess = RawSyscallOptionAccess;

/// The mechanism bound to an OS family in this build.
///
/// # Errors
///
/// Returns `UnsupportedPlatform` when the family's mechanism is not
/// compiled into this binary (e.g. asking for Winsock on Linux).
pub fn mechanism_for(family: OsFamily) -> Result<&'static dyn OptionAccess> {
    match family {
        #[cfg(windows)]
        OsFamily::Windows => Ok(&NATIVE),
        #[cfg(target_os = "linux")]
        OsFamily::Linux => Ok(&RAW_SYSCALL),
        #[cfg(target_os = "macos")]
        OsFamily::MacOs => Ok(&RAW_SYSCALL),
        #[allow(unreachable_patterns)]
        other => Err(TcpTuneError::UnsupportedPlatform(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_codec() {
        assert_eq!(decode_value(encode_value(25)), 25);
        assert_eq!(decode_value(encode_value(-5)), -5);
        assert_eq!(encode_value(1), 1i32.to_ne_bytes());
    }

    #[test]
    fn test_check_return_zero_is_success() {
        assert_eq!(check_return(0, || panic!("errno read on success")), Ok(()));
    }

    #[test]
    fn test_check_return_nonzero_is_failure() {
        assert_eq!(
            check_return(-1, || Some(9)),
            Err(TcpTuneError::SystemCallError {
                code: -1,
                errno: Some(9)
            })
        );

        // Any nonzero value counts, not only -1
        let err = check_return(3, || None).unwrap_err();
        assert_eq!(err.raw_code(), Some(3));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_mechanism_binding() {
        assert_eq!(
            mechanism_for(OsFamily::Linux).unwrap().kind(),
            MechanismKind::RawSyscall
        );
        assert!(matches!(
            mechanism_for(OsFamily::Windows),
            Err(TcpTuneError::UnsupportedPlatform(_))
        ));
        assert!(mechanism_for(OsFamily::MacOs).is_err());
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_mechanism_binding() {
        assert_eq!(
            mechanism_for(OsFamily::Windows).unwrap().kind(),
            MechanismKind::Native
        );
        assert!(mechanism_for(OsFamily::Linux).is_err());
    }

    #[cfg(windows)]
    #[test]
    fn test_native_bad_handle() {
        use windows_sys::Win32::Networking::WinSock::{INVALID_SOCKET, WSAENOTSOCK};

        // Winsock must be initialised before any call can report WSAENOTSOCK
        let _guard = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();

        let err = NativeOptionAccess
            .get(INVALID_SOCKET as RawSocketHandle, 0xffff, 8)
            .unwrap_err();
        assert_eq!(err, TcpTuneError::OsSocketError { code: WSAENOTSOCK });
        assert_eq!(err.raw_code(), Some(10038));

        let err = NativeOptionAccess
            .set(INVALID_SOCKET as RawSocketHandle, 0xffff, 8, 1)
            .unwrap_err();
        assert_eq!(err, TcpTuneError::OsSocketError { code: WSAENOTSOCK });
    }

    #[cfg(unix)]
    #[test]
    fn test_raw_syscall_bad_handle() {
        let err = RawSyscallOptionAccess.get(-1, 0xffff, 4).unwrap_err();
        match err {
            TcpTuneError::SystemCallError { code, errno } => {
                assert_eq!(code, -1);
                assert_eq!(errno, Some(libc::EBADF));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! tcptune Core
//!
//! This crate contains the platform layer behind `tcptune`:
//! - OS-independent option names (`option`)
//! - Host OS detection and Windows build gates (`platform`)
//! - Per-OS option numbering, built once per process (`table`)
//! - Native and raw-syscall access mechanisms (`mechanism`)
//! - Socket handle abstraction (`handle`)
//! - Logical get/set on a socket (`accessor`)
//! - Keep-alive / address reuse configuration (`options`, `tcp`)
//! - Error types (`error`)

// Only the FFI modules (mechanism, platform) may use unsafe code
#![cfg_attr(not(test), deny(unsafe_code))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
pub mod accessor;
pub mod error;
pub mod handle;
pub mod mechanism;
pub mod option;
pub mod options;
pub mod platform;
pub mod table;
pub mod tcp;

pub use accessor::{get_option, set_option};

// Optional: a small prelude to make downstream crates ergonomic.
pub mod prelude {
    pub use crate::accessor::{get_option, set_option, OptionAccessor};
    pub use crate::error::{Result, TcpTuneError};
    pub use crate::handle::{AsSocketHandle, RawSocketHandle};
    pub use crate::mechanism::OptionAccess;
    #[cfg(windows)]
    pub use crate::mechanism::NativeOptionAccess;
    #[cfg(unix)]
    pub use crate::mechanism::RawSyscallOptionAccess;
    pub use crate::option::{LogicalOption, OptionLevel};
    pub use crate::options::TcpOptions;
    pub use crate::platform::{OsFamily, OsProfile};
    pub use crate::table::{MechanismKind, PlatformOptionTable};
    pub use crate::tcp::{apply_tcp_options, configure_address_reuse, configure_tcp_keepalive};
}

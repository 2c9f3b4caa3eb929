//! # tcptune
//!
//! Cross-platform access to low-level TCP socket options: keep-alive
//! parameters, address/port reuse and exclusive address use on Windows,
//! Linux and macOS.
//!
//! ## Architecture
//!
//! - **`tcptune-core`**: option table, access mechanisms, accessor
//! - **`tcptune`**: Public API surface (this crate)
//!
//! Each OS numbers the same logical option differently, and not every
//! option is reachable the same way:
//!
//! | OS      | Mechanism                                  |
//! |---------|--------------------------------------------|
//! | Windows | Winsock `getsockopt`/`setsockopt`          |
//! | Linux   | raw `getsockopt`/`setsockopt` (C runtime)  |
//! | macOS   | raw `getsockopt`/`setsockopt` (libSystem)  |
//!
//! The table and mechanism for the host are chosen once per process.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tcptune::prelude::*;
//!
//! # fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let stream = std::net::TcpStream::connect("127.0.0.1:5555")?;
//!
//! // Logical get/set
//! set_option(&stream, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount, 25)?;
//! assert_eq!(get_option(&stream, OptionLevel::Tcp, LogicalOption::KeepAliveRetryCount)?, 25);
//!
//! // Or a whole keep-alive profile at once
//! let opts = TcpOptions::new()
//!     .with_tcp_keepalive(1)
//!     .with_tcp_keepalive_idle(36)
//!     .with_tcp_keepalive_intvl(47);
//! configure_tcp_keepalive(&stream, &opts)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Windows builds
//!
//! TCP_KEEPCNT needs Windows 10 build 15063 and TCP_KEEPIDLE/TCP_KEEPINTVL
//! need build 16299. On older builds those options are unmapped and
//! requesting them yields [`TcpTuneError::UnknownOption`].
//!
//! ## Safety
//!
//! - `unsafe` code is isolated to `tcptune-core/src/mechanism.rs` and the
//!   Windows version query in `tcptune-core/src/platform.rs`
//! - Socket handles are borrowed for one call and never closed

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dev_tracing;

pub use tcptune_core::{accessor, error, handle, mechanism, option, options, platform, table, tcp};

pub use tcptune_core::error::{Result, TcpTuneError};
pub use tcptune_core::{get_option, set_option};

/// Everything needed for day-to-day option access.
pub mod prelude {
    pub use tcptune_core::prelude::*;
}

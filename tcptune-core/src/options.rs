//! TCP socket configuration options
//!
//! Keep-alive and address reuse settings in the style of libzmq's
//! ZMQ_TCP_KEEPALIVE* options: `-1` leaves the OS default untouched.

use crate::error::{Result, TcpTuneError};
use crate::option::LogicalOption;

/// Sentinel meaning "leave the OS default".
pub const OS_DEFAULT: i32 = -1;

/// TCP keep-alive and address reuse configuration.
///
/// # Examples
///
/// ```
/// use tcptune_core::options::TcpOptions;
///
/// let opts = TcpOptions::new()
///     .with_tcp_keepalive(1)
///     .with_tcp_keepalive_cnt(5)
///     .with_tcp_keepalive_idle(60)
///     .with_tcp_keepalive_intvl(10);
///
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpOptions {
    /// Keep-alive switch (SO_KEEPALIVE)
    ///
    /// - `-1`: OS default (default)
    /// - `0`: Disable
    /// - `1`: Enable
    pub tcp_keepalive: i32,

    /// Probes before dropping the connection (TCP_KEEPCNT)
    ///
    /// - `-1`: OS default (default)
    pub tcp_keepalive_cnt: i32,

    /// Idle seconds before the first keep-alive packet (TCP_KEEPIDLE)
    ///
    /// - `-1`: OS default (default)
    pub tcp_keepalive_idle: i32,

    /// Seconds between keep-alive packets (TCP_KEEPINTVL)
    ///
    /// - `-1`: OS default (default)
    pub tcp_keepalive_intvl: i32,

    /// SO_REUSEADDR, `None` leaves it untouched
    pub reuse_address: Option<bool>,

    /// SO_REUSEPORT, `None` leaves it untouched (not available on Windows)
    pub reuse_port: Option<bool>,

    /// SO_EXCLUSIVEADDRUSE, `None` leaves it untouched (Windows only)
    pub exclusive_address_use: Option<bool>,
}

impl Default for TcpOptions {
    fn default() -> Self {
        Self {
            tcp_keepalive: OS_DEFAULT,
            tcp_keepalive_cnt: OS_DEFAULT,
            tcp_keepalive_idle: OS_DEFAULT,
            tcp_keepalive_intvl: OS_DEFAULT,
            reuse_address: None,
            reuse_port: None,
            exclusive_address_use: None,
        }
    }
}

impl TcpOptions {
    /// Create new options that leave every OS default alone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keep-alive switch (-1, 0 or 1).
    pub fn with_tcp_keepalive(mut self, keepalive: i32) -> Self {
        self.tcp_keepalive = keepalive;
        self
    }

    /// Set the keep-alive packet count.
    pub fn with_tcp_keepalive_cnt(mut self, count: i32) -> Self {
        self.tcp_keepalive_cnt = count;
        self
    }

    /// Set the idle time before the first keep-alive packet, in seconds.
    pub fn with_tcp_keepalive_idle(mut self, idle: i32) -> Self {
        self.tcp_keepalive_idle = idle;
        self
    }

    /// Set the interval between keep-alive packets, in seconds.
    pub fn with_tcp_keepalive_intvl(mut self, interval: i32) -> Self {
        self.tcp_keepalive_intvl = interval;
        self
    }

    /// Set SO_REUSEADDR.
    pub fn with_reuse_address(mut self, enabled: bool) -> Self {
        self.reuse_address = Some(enabled);
        self
    }

    /// Set SO_REUSEPORT.
    pub fn with_reuse_port(mut self, enabled: bool) -> Self {
        self.reuse_port = Some(enabled);
        self
    }

    /// Set SO_EXCLUSIVEADDRUSE.
    pub fn with_exclusive_address_use(mut self, enabled: bool) -> Self {
        self.exclusive_address_use = Some(enabled);
        self
    }

    /// Keep-alive values that differ from the OS default, in apply order.
    pub fn keepalive_settings(&self) -> impl Iterator<Item = (LogicalOption, i32)> {
        [
            (LogicalOption::KeepAlive, self.tcp_keepalive),
            (LogicalOption::KeepAliveRetryCount, self.tcp_keepalive_cnt),
            (LogicalOption::KeepAliveTime, self.tcp_keepalive_idle),
            (LogicalOption::KeepAliveInterval, self.tcp_keepalive_intvl),
        ]
        .into_iter()
        .filter(|&(_, value)| value != OS_DEFAULT)
    }

    /// Address flags that are set, in apply order.
    pub fn address_settings(&self) -> impl Iterator<Item = (LogicalOption, bool)> {
        [
            (LogicalOption::ReuseAddress, self.reuse_address),
            (LogicalOption::ReusePort, self.reuse_port),
            (LogicalOption::ExclusiveAddressUse, self.exclusive_address_use),
        ]
        .into_iter()
        .filter_map(|(option, value)| value.map(|enabled| (option, enabled)))
    }

    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for a keep-alive switch other than -1/0/1, or a
    /// negative timing value other than -1.
    pub fn validate(&self) -> Result<()> {
        if !(-1..=1).contains(&self.tcp_keepalive) {
            return Err(TcpTuneError::InvalidValue {
                option: LogicalOption::KeepAlive,
                value: self.tcp_keepalive,
            });
        }
        for (option, value) in [
            (LogicalOption::KeepAliveRetryCount, self.tcp_keepalive_cnt),
            (LogicalOption::KeepAliveTime, self.tcp_keepalive_idle),
            (LogicalOption::KeepAliveInterval, self.tcp_keepalive_intvl),
        ] {
            if value < OS_DEFAULT {
                return Err(TcpTuneError::InvalidValue { option, value });
            }
        }
        Ok(())
    }
}

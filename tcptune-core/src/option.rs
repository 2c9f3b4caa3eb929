//! OS-independent names for the socket options this crate can reach.

use std::fmt;

/// A semantic socket option, decoupled from any OS numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOption {
    /// Allow several sockets to bind the same address/port (SO_REUSEPORT)
    ReusePort,
    /// Unacknowledged keep-alive packets before the connection is dropped (TCP_KEEPCNT)
    KeepAliveRetryCount,
    /// Idle seconds before the first keep-alive packet (TCP_KEEPIDLE / TCP_KEEPALIVE)
    KeepAliveTime,
    /// Seconds between keep-alive packets (TCP_KEEPINTVL)
    KeepAliveInterval,
    /// Allow rebinding an address in TIME_WAIT (SO_REUSEADDR)
    ReuseAddress,
    /// Forbid other sockets from binding the same address (Windows only)
    ExclusiveAddressUse,
    /// Enable keep-alive probing (SO_KEEPALIVE)
    KeepAlive,
}

impl LogicalOption {
    /// Number of logical options.
    pub const COUNT: usize = 7;

    /// Every logical option, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::ReusePort,
        Self::KeepAliveRetryCount,
        Self::KeepAliveTime,
        Self::KeepAliveInterval,
        Self::ReuseAddress,
        Self::ExclusiveAddressUse,
        Self::KeepAlive,
    ];

    /// Position of this option in a platform table.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::ReusePort => 0,
            Self::KeepAliveRetryCount => 1,
            Self::KeepAliveTime => 2,
            Self::KeepAliveInterval => 3,
            Self::ReuseAddress => 4,
            Self::ExclusiveAddressUse => 5,
            Self::KeepAlive => 6,
        }
    }

    /// The level this option is normally interpreted at.
    #[must_use]
    pub const fn level(self) -> OptionLevel {
        match self {
            Self::KeepAliveRetryCount | Self::KeepAliveTime | Self::KeepAliveInterval => {
                OptionLevel::Tcp
            }
            Self::ReusePort | Self::ReuseAddress | Self::ExclusiveAddressUse | Self::KeepAlive => {
                OptionLevel::Socket
            }
        }
    }

    /// Conventional C constant name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReusePort => "SO_REUSEPORT",
            Self::KeepAliveRetryCount => "TCP_KEEPCNT",
            Self::KeepAliveTime => "TCP_KEEPIDLE",
            Self::KeepAliveInterval => "TCP_KEEPINTVL",
            Self::ReuseAddress => "SO_REUSEADDR",
            Self::ExclusiveAddressUse => "SO_EXCLUSIVEADDRUSE",
            Self::KeepAlive => "SO_KEEPALIVE",
        }
    }
}

impl fmt::Display for LogicalOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol layer an option is interpreted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionLevel {
    /// Generic socket layer (SOL_SOCKET)
    Socket,
    /// TCP protocol layer (IPPROTO_TCP)
    Tcp,
}

impl fmt::Display for OptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socket => f.write_str("SOL_SOCKET"),
            Self::Tcp => f.write_str("IPPROTO_TCP"),
        }
    }
}

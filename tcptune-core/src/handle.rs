//! OS-native socket handles.
//!
//! The accessor borrows a handle for the duration of one call; it never
//! creates, closes or takes ownership of the socket behind it.

/// Raw socket handle as the OS option calls expect it.
#[cfg(unix)]
pub type RawSocketHandle = std::os::unix::io::RawFd;

/// Raw socket handle as the OS option calls expect it.
#[cfg(windows)]
pub type RawSocketHandle = std::os::windows::io::RawSocket;

/// Raw socket handle as the OS option calls expect it.
#[cfg(not(any(unix, windows)))]
pub type RawSocketHandle = i32;

/// Anything that can lend out an OS-native socket handle.
///
/// Implemented for every `AsRawFd` (Unix) or `AsRawSocket` (Windows) type,
/// which covers `std::net`, `socket2` and `tokio` sockets.
pub trait AsSocketHandle {
    fn socket_handle(&self) -> RawSocketHandle;
}

#[cfg(unix)]
impl<T: std::os::unix::io::AsRawFd + ?Sized> AsSocketHandle for T {
    #[inline]
    fn socket_handle(&self) -> RawSocketHandle {
        self.as_raw_fd()
    }
}

#[cfg(windows)]
impl<T: std::os::windows::io::AsRawSocket + ?Sized> AsSocketHandle for T {
    #[inline]
    fn socket_handle(&self) -> RawSocketHandle {
        self.as_raw_socket()
    }
}

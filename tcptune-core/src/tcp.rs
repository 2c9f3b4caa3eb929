//! Apply [`TcpOptions`] to a socket.
//!
//! This is where the availability policy lives: options the host table does
//! not map (older Windows builds, SO_REUSEPORT on Windows,
//! SO_EXCLUSIVEADDRUSE off Windows) are skipped with a warning instead of
//! being attempted.

use tracing::{debug, warn};

use crate::accessor::OptionAccessor;
use crate::error::Result;
use crate::handle::AsSocketHandle;
use crate::option::LogicalOption;
use crate::options::TcpOptions;

/// Apply the keep-alive part of `opts` to `socket`.
///
/// SO_KEEPALIVE is applied before the timing options.
///
/// # Errors
///
/// Returns `InvalidValue` if `opts` fails validation, or the first OS
/// error reported while setting an option.
pub fn configure_tcp_keepalive<S: AsSocketHandle + ?Sized>(
    socket: &S,
    opts: &TcpOptions,
) -> Result<()> {
    configure_tcp_keepalive_with(&OptionAccessor::current()?, socket, opts)
}

/// Apply the address reuse part of `opts` to `socket`.
///
/// Must run before `bind` to have any effect.
///
/// # Errors
///
/// Returns the first OS error reported while setting an option.
pub fn configure_address_reuse<S: AsSocketHandle + ?Sized>(
    socket: &S,
    opts: &TcpOptions,
) -> Result<()> {
    configure_address_reuse_with(&OptionAccessor::current()?, socket, opts)
}

/// Apply every option in `opts` to `socket`.
///
/// # Errors
///
/// Returns `InvalidValue` if `opts` fails validation, in which case nothing
/// is written to the socket, or the first OS error reported while setting
/// an option.
pub fn apply_tcp_options<S: AsSocketHandle + ?Sized>(socket: &S, opts: &TcpOptions) -> Result<()> {
    apply_tcp_options_with(&OptionAccessor::current()?, socket, opts)
}

/// [`apply_tcp_options`] with an explicit accessor.
pub fn apply_tcp_options_with<S: AsSocketHandle + ?Sized>(
    accessor: &OptionAccessor<'_>,
    socket: &S,
    opts: &TcpOptions,
) -> Result<()> {
    opts.validate()?;
    configure_address_reuse_with(accessor, socket, opts)?;
    configure_tcp_keepalive_with(accessor, socket, opts)
}

/// [`configure_tcp_keepalive`] with an explicit accessor.
pub fn configure_tcp_keepalive_with<S: AsSocketHandle + ?Sized>(
    accessor: &OptionAccessor<'_>,
    socket: &S,
    opts: &TcpOptions,
) -> Result<()> {
    opts.validate()?;
    for (option, value) in opts.keepalive_settings() {
        if skip_unsupported(accessor, option) {
            continue;
        }
        accessor.set_option(socket, option.level(), option, value)?;
    }
    debug!("[TCP] Keep-alive configured");
    Ok(())
}

/// [`configure_address_reuse`] with an explicit accessor.
pub fn configure_address_reuse_with<S: AsSocketHandle + ?Sized>(
    accessor: &OptionAccessor<'_>,
    socket: &S,
    opts: &TcpOptions,
) -> Result<()> {
    for (option, enabled) in opts.address_settings() {
        if skip_unsupported(accessor, option) {
            continue;
        }
        accessor.set_flag(socket, option.level(), option, enabled)?;
    }
    Ok(())
}

fn skip_unsupported(accessor: &OptionAccessor<'_>, option: LogicalOption) -> bool {
    let table = accessor.table();
    if table.supports(option) {
        return false;
    }
    warn!(
        "[TCP] {} is not available on {}, leaving OS default",
        option,
        table.profile()
    );
    true
}

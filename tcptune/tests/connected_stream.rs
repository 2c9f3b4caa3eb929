//! Keep-alive configuration on live, connected streams.

use tcptune::prelude::*;
use tokio::net::{TcpListener, TcpStream};

#[tokio::test]
async fn keepalive_profile_on_connected_tokio_stream() {
    tcptune::dev_tracing::init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let client = client.unwrap();
    let (server, _) = accepted.unwrap();

    let opts = TcpOptions::new()
        .with_tcp_keepalive(1)
        .with_tcp_keepalive_cnt(25)
        .with_tcp_keepalive_idle(36)
        .with_tcp_keepalive_intvl(47);

    for stream in [&client, &server] {
        configure_tcp_keepalive(stream, &opts).unwrap();

        let accessor = OptionAccessor::current().unwrap();
        assert!(accessor
            .get_flag(stream, OptionLevel::Socket, LogicalOption::KeepAlive)
            .unwrap());

        // Gated options are skipped on older Windows builds
        for (option, expected) in [
            (LogicalOption::KeepAliveRetryCount, 25),
            (LogicalOption::KeepAliveTime, 36),
            (LogicalOption::KeepAliveInterval, 47),
        ] {
            if accessor.table().supports(option) {
                assert_eq!(
                    accessor.get_option(stream, option.level(), option).unwrap(),
                    expected
                );
            }
        }
    }
}

#[test]
fn address_reuse_before_bind_on_std_listener_socket() {
    use socket2::{Domain, Protocol, Socket, Type};

    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).unwrap();
    let opts = TcpOptions::new()
        .with_reuse_address(true)
        .with_reuse_port(true)
        .with_exclusive_address_use(false);

    // Options the host does not have are skipped, not failed
    apply_tcp_options(&socket, &opts).unwrap();
    assert!(socket.reuse_address().unwrap());

    socket.bind(&"127.0.0.1:0".parse::<std::net::SocketAddr>().unwrap().into()).unwrap();
    socket.listen(1).unwrap();
    let listener: std::net::TcpListener = socket.into();
    assert!(get_option(&listener, OptionLevel::Socket, LogicalOption::ReuseAddress).unwrap() != 0);
}

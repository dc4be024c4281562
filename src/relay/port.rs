use std::net::{Ipv4Addr, SocketAddrV4, TcpListener};

#[derive(Debug, thiserror::Error)]
#[error("no loopback port available: {0}")]
pub struct AllocationError(#[from] pub std::io::Error);

/// Ask the OS for a free port on 127.0.0.1.
///
/// Binds a throwaway listener to port 0, reads back the assigned port, and
/// releases the listener before returning so the relay can bind it for real.
pub fn allocate() -> Result<u16, AllocationError> {
    let probe = TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0))?;
    let port = probe.local_addr()?.port();
    drop(probe);
    tracing::debug!("Allocated loopback port {}", port);
    Ok(port)
}

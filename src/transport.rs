//! Non-blocking UDP transport for snapshot datagrams.
//!
//! The socket is configured once at setup: non-blocking mode, an enlarged
//! send buffer to absorb bursts, broadcast capability, and a best-effort
//! low-delay TOS hint. Each snapshot gets exactly one send attempt; a full
//! send buffer means the datagram is dropped on the floor, matching the
//! no-acknowledgment, loss-tolerant wire contract.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info, trace};

use crate::config::SenderConfig;
use crate::error::{BridgeError, Result};
use crate::types::Snapshot;

/// Send buffer size requested at setup, sized to absorb bursts.
const SEND_BUFFER_BYTES: usize = 64 * 1024;

/// IPv4 TOS low-delay hint; setting it is best-effort.
const TOS_LOWDELAY: u32 = 0x10;

/// Outcome of one non-blocking send attempt.
///
/// A fatal transport fault is not an outcome — it propagates as
/// [`BridgeError::Transport`] and counts as a cycle failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The datagram was handed to the network stack.
    Sent,
    /// The send buffer was full; the datagram was discarded.
    Dropped,
}

/// Owns the outbound datagram socket and its resolved destination.
pub struct UdpTransport {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpTransport {
    /// Build and configure the outbound socket.
    ///
    /// Any error here is a setup failure except the TOS hint, which is
    /// platform-dependent and silently downgraded to a debug log.
    pub fn bind(config: &SenderConfig) -> Result<Self> {
        let destination = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|err| {
                BridgeError::setup_failure_with_source(
                    "transport",
                    format!("cannot resolve destination {}:{}", config.host, config.port),
                    Box::new(err),
                )
            })?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| {
                BridgeError::setup_failure(
                    "transport",
                    format!(
                        "destination {}:{} resolved to no IPv4 address",
                        config.host, config.port
                    ),
                )
            })?;

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .and_then(|socket| {
                socket.set_nonblocking(true)?;
                socket.set_send_buffer_size(SEND_BUFFER_BYTES)?;
                socket.set_broadcast(true)?;
                if let Err(err) = socket.set_tos(TOS_LOWDELAY) {
                    debug!(error = %err, "TOS hint not supported, continuing without it");
                }
                let any: SocketAddr = ([0, 0, 0, 0], 0).into();
                socket.bind(&any.into())?;
                Ok(socket)
            })
            .map_err(|err| {
                BridgeError::setup_failure_with_source(
                    "transport",
                    "socket configuration failed",
                    Box::new(err),
                )
            })?;

        info!(%destination, "UDP transport ready");
        Ok(Self { socket: socket.into(), destination })
    }

    /// Serialize `snapshot` and attempt one non-blocking send.
    pub fn send(&self, snapshot: &Snapshot) -> Result<SendOutcome> {
        let payload = snapshot.to_datagram()?;
        let outcome = classify_send(self.socket.send_to(&payload, self.destination))?;
        match outcome {
            SendOutcome::Sent => trace!(bytes = payload.len(), "datagram sent"),
            SendOutcome::Dropped => trace!(bytes = payload.len(), "send buffer full"),
        }
        Ok(outcome)
    }

    /// The resolved destination address.
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

/// Classify the result of a non-blocking `send_to`.
///
/// WouldBlock is congestion, not an error; everything else is a transport
/// fault the scheduler counts as a cycle failure.
fn classify_send(result: io::Result<usize>) -> Result<SendOutcome> {
    match result {
        Ok(_) => Ok(SendOutcome::Sent),
        Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(SendOutcome::Dropped),
        Err(err) => Err(BridgeError::transport_fault("send_to", err)),
    }
}

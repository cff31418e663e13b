//! libp2p multiaddr rendering for bootnode arguments.

use std::fmt;

/// Borrowed view of the three parts of a node's peer address.
///
/// Renders as `/ip4/<address>/tcp/<port>/p2p/<peer_id>`. The address is not
/// checked to be an IPv4 literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiaddr<'a> {
    pub address: &'a str,
    pub port: u16,
    pub peer_id: &'a str,
}

impl<'a> Multiaddr<'a> {
    pub fn new(address: &'a str, port: u16, peer_id: &'a str) -> Self {
        Self {
            address,
            port,
            peer_id,
        }
    }
}

impl fmt::Display for Multiaddr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/ip4/{}/tcp/{}/p2p/{}",
            self.address, self.port, self.peer_id
        )
    }
}

//! # Node List
//!
//! Known network participants, read from a CSV table:
//!
//! ```text
//! address,peerId,validatorKey,port,isBootnode
//! 10.0.0.1,16Uiu2HAm...,0x8d3e...,1478,True
//! 10.0.0.2,16Uiu2HAk...,0x1f0a...,1478,False
//! ```
//!
//! ## Bootnode flag
//!
//! Only the exact token `True` marks a bootnode. `true`, `yes`, `1` and
//! anything else are read as `false`. Operators have been bitten by this, so
//! those spellings are logged at debug level, but the semantics stay
//! case-sensitive.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::config::DEFAULT_P2P_PORT;
use crate::error::{SourceError, SourceKind};
use crate::multiaddr::Multiaddr;
use crate::table::{self, Row};

const COLUMNS: usize = 5;

/// One known network participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// IPv4 literal or hostname.
    pub address: String,
    /// libp2p identity.
    pub peer_id: String,
    /// Consensus key, passed through untouched.
    pub validator_key: String,
    /// libp2p TCP port.
    pub port: u16,
    /// Advertised as a network entry point.
    pub is_bootnode: bool,
}

impl NodeRecord {
    /// Peer address in the form the SDK expects for `--bootnode`.
    pub fn multiaddr(&self) -> Multiaddr<'_> {
        Multiaddr::new(&self.address, self.port, &self.peer_id)
    }
}

/// Load the node list at `path`.
pub fn load_node_list(path: impl AsRef<Path>) -> Result<Vec<NodeRecord>, SourceError> {
    let path = path.as_ref();
    let file = table::open(SourceKind::NodeList, path)?;
    let nodes = parse_node_list(file)?;
    debug!(path = %path.display(), nodes = nodes.len(), "Node list loaded");
    Ok(nodes)
}

/// Parse a node list from any reader. The first line is the header.
pub fn parse_node_list<R: io::Read>(reader: R) -> Result<Vec<NodeRecord>, SourceError> {
    table::read_rows(SourceKind::NodeList, reader, COLUMNS)?
        .iter()
        .map(parse_row)
        .collect()
}

fn parse_row(row: &Row) -> Result<NodeRecord, SourceError> {
    let kind = SourceKind::NodeList;

    let required = |index: usize, name: &str| -> Result<String, SourceError> {
        let value = row.field(index);
        if value.is_empty() {
            return Err(row.malformed(kind, format!("`{}` is empty", name)));
        }
        Ok(value.to_string())
    };

    let address = required(0, "address")?;
    let peer_id = required(1, "peerId")?;
    let validator_key = required(2, "validatorKey")?;

    let port = match row.field(3) {
        "" => DEFAULT_P2P_PORT,
        raw => raw
            .parse::<u16>()
            .map_err(|_| row.malformed(kind, format!("port `{}` is not a valid TCP port", raw)))?,
    };

    let flag = row.field(4);
    let is_bootnode = flag == "True";
    if !is_bootnode && flag.eq_ignore_ascii_case("true") {
        debug!(
            line = row.line,
            value = flag,
            "Bootnode flag is case-sensitive; only `True` is accepted, treating as false"
        );
    }

    Ok(NodeRecord {
        address,
        peer_id,
        validator_key,
        port,
        is_bootnode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "address,peerId,validatorKey,port,isBootnode\n";

    fn parse(body: &str) -> Result<Vec<NodeRecord>, SourceError> {
        parse_node_list(format!("{}{}", HEADER, body).as_bytes())
    }

    #[test]
    fn test_parses_rows_in_order() {
        let nodes = parse("10.0.0.1,QmA,keyA,1478,True\n10.0.0.2,QmB,keyB,1479,False\n").unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].address, "10.0.0.1");
        assert_eq!(nodes[0].peer_id, "QmA");
        assert_eq!(nodes[0].validator_key, "keyA");
        assert!(nodes[0].is_bootnode);
        assert_eq!(nodes[1].port, 1479);
        assert!(!nodes[1].is_bootnode);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_bootnode_flag_is_case_sensitive() {
        let nodes = parse("10.0.0.1,QmA,keyA,1478,true\n10.0.0.2,QmB,keyB,1478,TRUE\n").unwrap();
        assert!(nodes.iter().all(|n| !n.is_bootnode));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let nodes = parse("10.0.0.1, QmA ,keyA, 1478 , True\n").unwrap();
        assert_eq!(nodes[0].peer_id, "QmA");
        assert_eq!(nodes[0].port, 1478);
        assert!(nodes[0].is_bootnode);
    }

    #[test]
    fn test_empty_port_uses_default() {
        let nodes = parse("10.0.0.1,QmA,keyA,,False\n").unwrap();
        assert_eq!(nodes[0].port, DEFAULT_P2P_PORT);
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = parse("10.0.0.1,QmA,keyA,1478,True\n10.0.0.2,QmB,keyB,1478\n").unwrap_err();
        match err {
            SourceError::MalformedRow { kind, line, reason } => {
                assert_eq!(kind, SourceKind::NodeList);
                assert_eq!(line, 3);
                assert!(reason.contains("found 4"), "{}", reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_long_row_is_malformed() {
        let err = parse("10.0.0.1,QmA,keyA,1478,True,extra\n").unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { .. }));
    }

    #[test]
    fn test_short_header_and_rows_are_malformed() {
        let err = parse_node_list("address,peerId,validatorKey,port\n10.0.0.1,QmA,keyA,1478\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_header_width_is_not_checked() {
        let row = "10.0.0.1,QmA,keyA,1478,True\n";
        for header in [
            "address,peerId,validatorKey,port\n",
            "address,peerId,validatorKey,port,isBootnode,comment\n",
        ] {
            let nodes = parse_node_list(format!("{}{}", header, row).as_bytes()).unwrap();
            assert_eq!(nodes.len(), 1, "{}", header);
            assert!(nodes[0].is_bootnode);
        }
    }

    #[test]
    fn test_malformed_reason_reports_row_width() {
        let err = parse("10.0.0.1,QmA,keyA,1478,True,extra\n").unwrap_err();
        match err {
            SourceError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "expected 5 fields, found 6");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_port_is_malformed() {
        let err = parse("10.0.0.1,QmA,keyA,70000,True\n").unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_empty_validator_key_is_malformed() {
        let err = parse("10.0.0.1,QmA,,1478,True\n").unwrap_err();
        match err {
            SourceError::MalformedRow { reason, .. } => assert!(reason.contains("validatorKey")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_node_list("/nonexistent/nodelist.csv").unwrap_err();
        assert!(matches!(
            err,
            SourceError::SourceNotFound {
                kind: SourceKind::NodeList,
                ..
            }
        ));
    }

    #[test]
    fn test_record_multiaddr() {
        let nodes = parse("10.0.0.1,QmA,keyA,1478,True\n").unwrap();
        assert_eq!(nodes[0].multiaddr().to_string(), "/ip4/10.0.0.1/tcp/1478/p2p/QmA");
    }
}

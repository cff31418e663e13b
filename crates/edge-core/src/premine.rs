//! Pre-mined balances, read from a two-column CSV table with a header row:
//! account address, balance. Both values are copied verbatim into the
//! genesis command.

use std::fmt;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{SourceError, SourceKind};
use crate::table;

const COLUMNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremineEntry {
    pub account: String,
    pub balance: String,
}

impl fmt::Display for PremineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.account, self.balance)
    }
}

/// Load the premine list at `path`.
pub fn load_premine_list(path: impl AsRef<Path>) -> Result<Vec<PremineEntry>, SourceError> {
    let path = path.as_ref();
    let file = table::open(SourceKind::PremineList, path)?;
    let entries = parse_premine_list(file)?;
    debug!(path = %path.display(), entries = entries.len(), "Premine list loaded");
    Ok(entries)
}

pub fn parse_premine_list<R: io::Read>(reader: R) -> Result<Vec<PremineEntry>, SourceError> {
    table::read_rows(SourceKind::PremineList, reader, COLUMNS)?
        .into_iter()
        .map(|row| {
            let account = row.field(0);
            if account.is_empty() {
                return Err(row.malformed(SourceKind::PremineList, "account address is empty"));
            }
            Ok(PremineEntry {
                account: account.to_string(),
                balance: row.field(1).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_entries_in_order() {
        let entries =
            parse_premine_list("account,balance\n0xabc,1000\n0xdef,500\n".as_bytes()).unwrap();
        assert_eq!(
            entries,
            vec![
                PremineEntry {
                    account: "0xabc".into(),
                    balance: "1000".into()
                },
                PremineEntry {
                    account: "0xdef".into(),
                    balance: "500".into()
                },
            ]
        );
        assert_eq!(entries[0].to_string(), "0xabc:1000");
    }

    #[test]
    fn test_empty_sources() {
        assert!(parse_premine_list("account,balance\n".as_bytes()).unwrap().is_empty());
        assert!(parse_premine_list("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_three_fields_is_malformed() {
        let err = parse_premine_list("account,balance\n0xabc,1000,7\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SourceError::MalformedRow {
                kind: SourceKind::PremineList,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_header_width_is_not_checked() {
        for header in ["account\n", "account,balance,note\n"] {
            let entries = parse_premine_list(format!("{}0xabc,1000\n", header).as_bytes()).unwrap();
            assert_eq!(entries.len(), 1, "{}", header);
            assert_eq!(entries[0].to_string(), "0xabc:1000");
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_premine_list("/nonexistent/preminelist.csv").unwrap_err();
        assert!(matches!(
            err,
            SourceError::SourceNotFound {
                kind: SourceKind::PremineList,
                ..
            }
        ));
    }
}

//! # Edge Core
//!
//! Operator logic for running a polygon-sdk validator.
//!
//! ## Modules
//!
//! - `node_list` / `premine` - CSV input tables
//! - `multiaddr` - bootnode peer address rendering
//! - `genesis` - derivation of the `genesis` argument list
//! - `invocation` - SDK calls as structured argument lists
//! - `node_process` - start / halt / status of the server
//! - `chain_data` - backup, restore and reset of on-disk state
//! - `sdk` - release download and node secrets
//! - `loadbot` - load testing
//!
//! ## Genesis flow
//!
//! ```text
//! nodelist.csv ──load_node_list──┐
//!                                ├──GenesisBuilder──→ GenesisCommand ──→ SdkInvocation::run
//! preminelist.csv ──(optional)───┘        │
//!                                  multiaddr per bootnode
//! ```

pub mod chain_data;
pub mod config;
pub mod error;
pub mod genesis;
pub mod invocation;
pub mod loadbot;
pub mod multiaddr;
pub mod node_list;
pub mod node_process;
pub mod premine;
pub mod sdk;

mod table;

pub use chain_data::ResetOptions;
pub use config::EdgeConfig;
pub use error::{EdgeError, SourceError, SourceKind};
pub use genesis::{GenesisBuilder, GenesisCommand};
pub use invocation::SdkInvocation;
pub use loadbot::LoadbotOptions;
pub use multiaddr::Multiaddr;
pub use node_list::NodeRecord;
pub use node_process::{NodeStatus, ServerOptions};
pub use premine::PremineEntry;

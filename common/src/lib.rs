//! BondSwap Common Types
//!
//! This crate contains the ledger types shared by the group authorizer and
//! the simulator, including account and asset identifiers, transaction
//! records, and transaction groups.

pub mod identifiers;
pub mod transaction;
pub mod group;
pub mod error;

pub use identifiers::*;
pub use transaction::*;
pub use group::*;
pub use error::*;

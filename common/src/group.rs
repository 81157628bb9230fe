//! Atomic transaction groups.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::{BondSwapError, Result, TransactionRecord};

/// Maximum number of members the ledger accepts in one group.
pub const MAX_GROUP_SIZE: usize = 16;

/// An ordered, atomically committed bundle of transactions.
///
/// Member order is significant and never changed after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TransactionRecord>", into = "Vec<TransactionRecord>")]
pub struct TransactionGroup(Vec<TransactionRecord>);

impl TransactionGroup {
    /// Create a group, enforcing the ledger's member cap.
    ///
    /// Any length up to the cap is accepted, including zero; whether a
    /// length is authorizable is the predicate's decision.
    pub fn new(members: Vec<TransactionRecord>) -> Result<Self> {
        if members.len() > MAX_GROUP_SIZE {
            return Err(BondSwapError::GroupTooLarge {
                size: members.len(),
                max: MAX_GROUP_SIZE,
            });
        }
        Ok(Self(members))
    }

    /// Get the members in group order.
    pub fn members(&self) -> &[TransactionRecord] {
        &self.0
    }
}

impl Deref for TransactionGroup {
    type Target = [TransactionRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<TransactionRecord>> for TransactionGroup {
    type Error = BondSwapError;

    fn try_from(members: Vec<TransactionRecord>) -> Result<Self> {
        Self::new(members)
    }
}

impl From<TransactionGroup> for Vec<TransactionRecord> {
    fn from(group: TransactionGroup) -> Self {
        group.0
    }
}

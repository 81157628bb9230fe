//! Positional group shapes recognized by the authorizer.

use bondswap_common::TransactionRecord;

/// Group size of the opt-in bootstrap.
pub const OPT_IN_GROUP_SIZE: usize = 2;

/// Group size of the bond exchange.
pub const EXCHANGE_GROUP_SIZE: usize = 4;

/// A fixed-size view over a candidate group, selected by its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape<'a> {
    /// Manager payment followed by an asset acceptance.
    OptIn(&'a [TransactionRecord; OPT_IN_GROUP_SIZE]),
    /// Old-bond deposit, new-bond payout, coupon payment, application call.
    Exchange(&'a [TransactionRecord; EXCHANGE_GROUP_SIZE]),
}

impl<'a> GroupShape<'a> {
    /// Select the shape for a group, or `None` when no shape has this length.
    pub fn of(group: &'a [TransactionRecord]) -> Option<Self> {
        if let Ok(quad) = <&[TransactionRecord; EXCHANGE_GROUP_SIZE]>::try_from(group) {
            return Some(GroupShape::Exchange(quad));
        }
        if let Ok(pair) = <&[TransactionRecord; OPT_IN_GROUP_SIZE]>::try_from(group) {
            return Some(GroupShape::OptIn(pair));
        }
        None
    }
}

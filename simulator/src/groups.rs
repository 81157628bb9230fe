//! Baseline transaction groups for a bound predicate instance.

use bondswap_common::{Address, TransactionRecord};
use bondswap_predicate::{BoundParameters, REDEEM_COUPON_SELECTOR};

/// Default quantity of bond units redeemed in generated exchanges.
pub const DEFAULT_REDEEM_UNITS: u64 = 100;

/// Default coupon paid in generated exchanges, in base units.
pub const DEFAULT_COUPON: u64 = 1_250;

/// Builds groups that satisfy a predicate instance.
pub struct GroupFactory<'a> {
    params: &'a BoundParameters,
    holder: Address,
    exchange: Address,
}

impl<'a> GroupFactory<'a> {
    /// Create a factory for the given instance.
    pub fn new(params: &'a BoundParameters) -> Self {
        Self {
            params,
            holder: Address::new([0x11; 32]),
            exchange: Address::new([0xee; 32]),
        }
    }

    /// Bond holder account.
    pub fn holder(&self) -> Address {
        self.holder
    }

    /// A valid four-member redemption.
    pub fn exchange(&self, units: u64, coupon: u64) -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::asset_transfer(self.params.old_asset_id(), units)
                .with_sender(self.holder),
            TransactionRecord::asset_transfer(self.params.new_asset_id(), units)
                .with_sender(self.exchange),
            TransactionRecord::payment(coupon).with_sender(self.exchange),
            TransactionRecord::application_call(
                self.params.application_id(),
                [REDEEM_COUPON_SELECTOR],
            )
            .with_sender(self.holder),
        ]
    }

    /// A valid two-member opt-in to the new bond.
    pub fn opt_in(&self) -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::payment(0).with_sender(self.params.manager_address()),
            TransactionRecord::asset_transfer(self.params.new_asset_id(), 0)
                .with_sender(self.exchange),
        ]
    }
}

//! Simulation scenarios.

use bondswap_common::{Address, ApplicationId, TransactionRecord};
use bondswap_predicate::{BoundParameters, Mode, Verdict};

use crate::groups::{GroupFactory, DEFAULT_COUPON, DEFAULT_REDEEM_UNITS};

/// Names of the built-in scenarios.
pub const SCENARIO_NAMES: [&str; 12] = [
    "exchange-accept",
    "opt-in-accept",
    "amount-mismatch",
    "deposit-rekey",
    "payout-asset-close",
    "coupon-close-remainder",
    "coupon-asset-close",
    "wrong-selector",
    "wrong-application",
    "opt-in-foreign-sender",
    "opt-in-asset-amount",
    "three-member-group",
];

/// Expected verdict of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Approved under the given mode.
    Approve(Mode),
    /// Rejected with the given code.
    Reject(&'static str),
}

impl Expectation {
    /// Check a verdict against this expectation.
    pub fn matches(&self, verdict: &Verdict) -> bool {
        match (self, verdict) {
            (Expectation::Approve(mode), Verdict::Approved(actual)) => mode == actual,
            (Expectation::Reject(code), Verdict::Rejected(rejection)) => *code == rejection.code(),
            _ => false,
        }
    }
}

/// A simulation scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name.
    pub name: &'static str,
    /// Description.
    pub description: &'static str,
    /// Candidate group.
    pub group: Vec<TransactionRecord>,
    /// Expected verdict.
    pub expected: Expectation,
}

impl Scenario {
    /// Load a scenario by name for the given instance.
    pub fn load(name: &str, params: &BoundParameters) -> anyhow::Result<Self> {
        let factory = GroupFactory::new(params);
        let intruder = Address::new([0x66; 32]);
        let exchange = || factory.exchange(DEFAULT_REDEEM_UNITS, DEFAULT_COUPON);

        let scenario = match name {
            "exchange-accept" => Self {
                name: "exchange-accept",
                description: "Old bond redeemed for new bond plus coupon",
                group: exchange(),
                expected: Expectation::Approve(Mode::Exchange),
            },
            "opt-in-accept" => Self {
                name: "opt-in-accept",
                description: "Manager-sponsored opt-in to the new bond",
                group: factory.opt_in(),
                expected: Expectation::Approve(Mode::OptIn),
            },
            "amount-mismatch" => {
                let mut group = exchange();
                group[1].asset_amount = DEFAULT_REDEEM_UNITS - 1;
                Self {
                    name: "amount-mismatch",
                    description: "Payout returns one unit fewer than deposited",
                    group,
                    expected: Expectation::Reject("ASSET_AMOUNT_MISMATCH"),
                }
            }
            "deposit-rekey" => {
                let mut group = exchange();
                group[0].rekey_to = intruder;
                Self {
                    name: "deposit-rekey",
                    description: "Deposit hands signing authority to a third party",
                    group,
                    expected: Expectation::Reject("REKEY_NOT_ZERO"),
                }
            }
            "payout-asset-close" => {
                let mut group = exchange();
                group[1].asset_close_to = intruder;
                Self {
                    name: "payout-asset-close",
                    description: "Payout closes the exchange's new bond holding",
                    group,
                    expected: Expectation::Reject("ASSET_CLOSE_NOT_ZERO"),
                }
            }
            "coupon-close-remainder" => {
                let mut group = exchange();
                group[2].close_remainder_to = intruder;
                Self {
                    name: "coupon-close-remainder",
                    description: "Coupon payment drains the exchange account",
                    group,
                    expected: Expectation::Reject("CLOSE_REMAINDER_NOT_ZERO"),
                }
            }
            "coupon-asset-close" => {
                let mut group = exchange();
                group[2].asset_close_to = intruder;
                Self {
                    name: "coupon-asset-close",
                    description: "Asset close target on the coupon payment is not inspected",
                    group,
                    expected: Expectation::Approve(Mode::Exchange),
                }
            }
            "wrong-selector" => {
                let mut group = exchange();
                group[3] = TransactionRecord::application_call(params.application_id(), ["buy"])
                    .with_sender(factory.holder());
                Self {
                    name: "wrong-selector",
                    description: "Application call targets another entry point",
                    group,
                    expected: Expectation::Reject("WRONG_SELECTOR"),
                }
            }
            "wrong-application" => {
                let mut group = exchange();
                group[3].application_id = ApplicationId(params.application_id().0.wrapping_add(1));
                Self {
                    name: "wrong-application",
                    description: "Redemption recorded against another application",
                    group,
                    expected: Expectation::Reject("WRONG_APPLICATION"),
                }
            }
            "opt-in-foreign-sender" => {
                let mut group = factory.opt_in();
                group[0].sender = intruder;
                Self {
                    name: "opt-in-foreign-sender",
                    description: "Opt-in sponsored by someone other than the manager",
                    group,
                    expected: Expectation::Reject("UNAUTHORIZED_SENDER"),
                }
            }
            "opt-in-asset-amount" => {
                let mut group = factory.opt_in();
                group[1].asset_amount = 1;
                Self {
                    name: "opt-in-asset-amount",
                    description: "Opt-in moves bond units",
                    group,
                    expected: Expectation::Reject("NON_ZERO_ASSET_AMOUNT"),
                }
            }
            "three-member-group" => {
                let mut group = exchange();
                group.pop();
                Self {
                    name: "three-member-group",
                    description: "Exchange without the application call",
                    group,
                    expected: Expectation::Reject("UNSUPPORTED_GROUP_SIZE"),
                }
            }
            _ => return Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        };

        Ok(scenario)
    }

    /// Load every built-in scenario.
    pub fn all(params: &BoundParameters) -> anyhow::Result<Vec<Self>> {
        SCENARIO_NAMES
            .iter()
            .map(|name| Self::load(name, params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondswap_common::AssetId;
    use bondswap_predicate::evaluate;

    fn params() -> BoundParameters {
        BoundParameters::new(
            AssetId(1001),
            AssetId(1002),
            ApplicationId(77),
            Address::new([0x4d; 32]),
        )
        .unwrap()
    }

    #[test]
    fn test_every_scenario_meets_expectation() {
        let params = params();
        for scenario in Scenario::all(&params).unwrap() {
            let verdict = evaluate(&scenario.group, &params);
            assert!(
                scenario.expected.matches(&verdict),
                "{}: expected {:?}, got {:?}",
                scenario.name,
                scenario.expected,
                verdict
            );
        }
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(Scenario::load("no-such-scenario", &params()).is_err());
    }
}

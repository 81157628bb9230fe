//! Simulation controller.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use bondswap_common::{Address, ApplicationArg, ApplicationId, AssetId, TransactionRecord, TxnKind};
use bondswap_predicate::{GroupAuthorizer, Verdict};

use crate::groups::GroupFactory;
use crate::metrics::SimulationMetrics;
use crate::scenario::Scenario;

const KINDS: [TxnKind; 6] = [
    TxnKind::Payment,
    TxnKind::KeyRegistration,
    TxnKind::AssetConfig,
    TxnKind::AssetTransfer,
    TxnKind::AssetFreeze,
    TxnKind::ApplicationCall,
];

/// Single-field change applied to a valid group.
#[derive(Debug, Clone)]
pub enum Mutation {
    RekeyTo { index: usize, target: Address },
    CloseRemainderTo { index: usize, target: Address },
    AssetCloseTo { index: usize, target: Address },
    Kind { index: usize, kind: TxnKind },
    Sender { index: usize, sender: Address },
    Amount { index: usize, amount: u64 },
    AssetAmount { index: usize, asset_amount: u64 },
    AssetId { index: usize, asset_id: AssetId },
    ApplicationId { index: usize, application_id: ApplicationId },
    Selector { index: usize, selector: ApplicationArg },
    Truncate,
    Extend,
}

impl Mutation {
    /// Apply to `group`, returning `false` when the change is a no-op.
    pub fn apply(&self, group: &mut Vec<TransactionRecord>) -> bool {
        match self {
            Mutation::RekeyTo { index, target } => replace(&mut group[*index].rekey_to, *target),
            Mutation::CloseRemainderTo { index, target } => {
                replace(&mut group[*index].close_remainder_to, *target)
            }
            Mutation::AssetCloseTo { index, target } => {
                replace(&mut group[*index].asset_close_to, *target)
            }
            Mutation::Kind { index, kind } => replace(&mut group[*index].kind, *kind),
            Mutation::Sender { index, sender } => replace(&mut group[*index].sender, *sender),
            Mutation::Amount { index, amount } => replace(&mut group[*index].amount, *amount),
            Mutation::AssetAmount {
                index,
                asset_amount,
            } => replace(&mut group[*index].asset_amount, *asset_amount),
            Mutation::AssetId { index, asset_id } => {
                replace(&mut group[*index].asset_id, *asset_id)
            }
            Mutation::ApplicationId {
                index,
                application_id,
            } => replace(&mut group[*index].application_id, *application_id),
            Mutation::Selector { index, selector } => {
                let args = &mut group[*index].application_args;
                if args.first() == Some(selector) {
                    return false;
                }
                match args.first_mut() {
                    Some(first) => *first = selector.clone(),
                    None => args.push(selector.clone()),
                }
                true
            }
            Mutation::Truncate => group.pop().is_some(),
            Mutation::Extend => {
                group.push(TransactionRecord::payment(0));
                true
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Outcome of one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub name: &'static str,
    /// Verdict produced.
    pub verdict: Verdict,
    /// Whether the verdict met the expectation.
    pub passed: bool,
}

/// Controls the simulation.
pub struct SimulationController {
    /// Authorizer under test.
    authorizer: GroupAuthorizer,
    /// Random number generator.
    rng: StdRng,
    /// Simulation metrics.
    metrics: SimulationMetrics,
}

impl SimulationController {
    /// Create a new simulation controller.
    pub fn new(authorizer: GroupAuthorizer, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            authorizer,
            rng,
            metrics: SimulationMetrics::new(),
        }
    }

    /// Evaluate a group, recording metrics.
    pub fn evaluate(&mut self, group: &[TransactionRecord]) -> Verdict {
        let start = Instant::now();
        let verdict = self.authorizer.evaluate(group);
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

        match &verdict {
            Verdict::Approved(_) => self.metrics.record_approval(elapsed),
            Verdict::Rejected(rejection) => self.metrics.record_rejection(rejection.code(), elapsed),
        }

        verdict
    }

    /// Run a scenario.
    pub fn run_scenario(&mut self, scenario: &Scenario) -> ScenarioOutcome {
        info!(
            scenario = scenario.name,
            description = scenario.description,
            "Running scenario"
        );

        let verdict = self.evaluate(&scenario.group);
        let passed = scenario.expected.matches(&verdict);
        if passed {
            info!(scenario = scenario.name, verdict = ?verdict, "Scenario passed");
        } else {
            self.metrics.record_mismatch();
            warn!(
                scenario = scenario.name,
                expected = ?scenario.expected,
                verdict = ?verdict,
                "Scenario failed"
            );
        }

        ScenarioOutcome {
            name: scenario.name,
            verdict,
            passed,
        }
    }

    /// Apply random single-field mutations to valid groups.
    ///
    /// Every mutation of a constrained field must be rejected and every
    /// mutation of an unconstrained one approved. Returns the number of
    /// mutations whose verdict disagreed.
    pub fn run_mutations(&mut self, iterations: u64) -> u64 {
        info!(iterations, "Running mutation campaign");

        let params = self.authorizer.params().clone();
        let factory = GroupFactory::new(&params);
        let mut disagreements = 0;

        for iteration in 0..iterations {
            let exchange = self.rng.gen_bool(0.5);
            let mut group = if exchange {
                let units = self.rng.gen_range(1..1_000_000);
                let coupon = self.rng.gen_range(0..10_000_000);
                factory.exchange(units, coupon)
            } else {
                factory.opt_in()
            };

            let mutation = self.random_mutation(group.len());
            if !mutation.apply(&mut group) {
                continue;
            }

            let must_reject = is_constrained(&mutation, exchange);
            let verdict = self.evaluate(&group);
            if verdict.is_approved() == must_reject {
                disagreements += 1;
                self.metrics.record_mismatch();
                warn!(
                    iteration,
                    mutation = ?mutation,
                    verdict = ?verdict,
                    "Verdict disagrees with mutation"
                );
            } else {
                debug!(iteration, mutation = ?mutation, verdict = ?verdict, "Mutation evaluated");
            }
        }

        disagreements
    }

    fn random_mutation(&mut self, len: usize) -> Mutation {
        let index = self.rng.gen_range(0..len);
        match self.rng.gen_range(0..12) {
            0 => Mutation::RekeyTo {
                index,
                target: self.random_address(),
            },
            1 => Mutation::CloseRemainderTo {
                index,
                target: self.random_address(),
            },
            2 => Mutation::AssetCloseTo {
                index,
                target: self.random_address(),
            },
            3 => Mutation::Kind {
                index,
                kind: KINDS[self.rng.gen_range(0..KINDS.len())],
            },
            4 => Mutation::Sender {
                index,
                sender: self.random_address(),
            },
            5 => Mutation::Amount {
                index,
                amount: self.rng.gen_range(0..1_000),
            },
            6 => Mutation::AssetAmount {
                index,
                asset_amount: self.rng.gen_range(0..1_000),
            },
            7 => Mutation::AssetId {
                index,
                asset_id: AssetId(self.rng.gen_range(0..2_000)),
            },
            8 => Mutation::ApplicationId {
                index,
                application_id: ApplicationId(self.rng.gen_range(0..200)),
            },
            9 => {
                let len = self.rng.gen_range(0..16);
                let selector: Vec<u8> = (0..len).map(|_| self.rng.gen()).collect();
                Mutation::Selector {
                    index,
                    selector: ApplicationArg::new(selector),
                }
            }
            10 => Mutation::Truncate,
            _ => Mutation::Extend,
        }
    }

    fn random_address(&mut self) -> Address {
        let mut bytes: [u8; 32] = self.rng.gen();
        bytes[0] |= 1;
        Address::new(bytes)
    }

    /// Get simulation metrics.
    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }
}

/// Whether a mutation of a valid group touches a constrained field.
fn is_constrained(mutation: &Mutation, exchange: bool) -> bool {
    match (mutation, exchange) {
        (Mutation::Truncate | Mutation::Extend, _) => true,
        (Mutation::Kind { .. }, _) => true,

        (Mutation::RekeyTo { index, .. } | Mutation::CloseRemainderTo { index, .. }, true) => {
            *index < 3
        }
        (Mutation::AssetCloseTo { index, .. }, _) => *index < 2,
        (Mutation::RekeyTo { .. } | Mutation::CloseRemainderTo { .. }, false) => true,

        // Exchange: only amounts of the asset legs, their assets, and the call.
        (Mutation::AssetAmount { index, .. }, true) => *index < 2,
        (Mutation::AssetId { index, .. }, true) => *index < 2,
        (Mutation::ApplicationId { index, .. } | Mutation::Selector { index, .. }, true) => {
            *index == 3
        }
        (Mutation::Sender { .. } | Mutation::Amount { .. }, true) => false,

        // Opt-in: zero amounts and the manager's signature.
        (Mutation::Sender { index, .. } | Mutation::Amount { index, .. }, false) => *index == 0,
        (Mutation::AssetAmount { index, .. }, false) => *index == 1,
        (
            Mutation::AssetId { .. } | Mutation::ApplicationId { .. } | Mutation::Selector { .. },
            false,
        ) => false,
    }
}

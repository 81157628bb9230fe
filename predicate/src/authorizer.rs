//! Group authorization logic.

use tracing::{debug, instrument};

use bondswap_common::{TransactionRecord, TxnKind};

use crate::params::BoundParameters;
use crate::rejection::{Mode, Rejection, Verdict};
use crate::shape::GroupShape;

/// Application entry point the exchange must invoke.
pub const REDEEM_COUPON_SELECTOR: &[u8] = b"redeem_coupon";

/// Members whose asset close-out target is constrained.
const ASSET_CLOSE_CHECKED: usize = 2;

/// Predicate instance with its bound parameters.
#[derive(Debug, Clone)]
pub struct GroupAuthorizer {
    params: BoundParameters,
}

impl GroupAuthorizer {
    /// Create an authorizer for a deployed instance.
    pub fn new(params: BoundParameters) -> Self {
        Self { params }
    }

    /// Parameters this instance was bound with.
    pub fn params(&self) -> &BoundParameters {
        &self.params
    }

    /// Decide whether `group` may proceed.
    pub fn authorize(&self, group: &[TransactionRecord]) -> bool {
        authorize(group, &self.params)
    }

    /// Decide whether `group` may proceed, reporting the first failed check.
    pub fn evaluate(&self, group: &[TransactionRecord]) -> Verdict {
        evaluate(group, &self.params)
    }
}

/// Decide whether `group` may proceed under `params`.
pub fn authorize(group: &[TransactionRecord], params: &BoundParameters) -> bool {
    evaluate(group, params).is_approved()
}

/// Evaluate `group` under `params`.
///
/// The group size selects the mode; each mode is a conjunction checked in a
/// fixed order, and the first failing conjunct is reported.
#[instrument(level = "debug", skip_all, fields(group_size = group.len()))]
pub fn evaluate(group: &[TransactionRecord], params: &BoundParameters) -> Verdict {
    let result = match GroupShape::of(group) {
        Some(GroupShape::Exchange(members)) => check_exchange(members, params),
        Some(GroupShape::OptIn(members)) => check_opt_in(members, params),
        None => Err(Rejection::UnsupportedGroupSize { size: group.len() }),
    };

    match &result {
        Ok(mode) => debug!(mode = %mode, "Group approved"),
        Err(rejection) => debug!(
            code = rejection.code(),
            member = ?rejection.member_index(),
            reason = %rejection,
            "Group rejected"
        ),
    }

    Verdict::from(result)
}

fn check_exchange(
    group: &[TransactionRecord; 4],
    params: &BoundParameters,
) -> Result<Mode, Rejection> {
    check_safety(&group[..3])?;

    let [deposit, payout, coupon, call] = group;

    // Holder deposits the old bond.
    require_kind(0, deposit, TxnKind::AssetTransfer)?;
    if deposit.asset_id != params.old_asset_id() {
        return Err(Rejection::WrongAsset {
            index: 0,
            expected: params.old_asset_id(),
            actual: deposit.asset_id,
        });
    }
    if deposit.asset_amount != payout.asset_amount {
        return Err(Rejection::AssetAmountMismatch {
            deposited: deposit.asset_amount,
            returned: payout.asset_amount,
        });
    }

    // Exchange returns the new bond.
    require_kind(1, payout, TxnKind::AssetTransfer)?;
    if payout.asset_id != params.new_asset_id() {
        return Err(Rejection::WrongAsset {
            index: 1,
            expected: params.new_asset_id(),
            actual: payout.asset_id,
        });
    }

    // Coupon amount is verified by the application.
    require_kind(2, coupon, TxnKind::Payment)?;

    require_kind(3, call, TxnKind::ApplicationCall)?;
    if call.application_id != params.application_id() {
        return Err(Rejection::WrongApplication {
            index: 3,
            expected: params.application_id(),
            actual: call.application_id,
        });
    }
    match call.first_arg() {
        None => return Err(Rejection::MissingApplicationArg { index: 3 }),
        Some(arg) if arg.as_bytes() != REDEEM_COUPON_SELECTOR => {
            return Err(Rejection::WrongSelector {
                index: 3,
                actual: arg.clone(),
            })
        }
        Some(_) => {}
    }

    Ok(Mode::Exchange)
}

fn check_opt_in(
    group: &[TransactionRecord; 2],
    params: &BoundParameters,
) -> Result<Mode, Rejection> {
    check_safety(group)?;

    let [sponsor, acceptance] = group;

    require_kind(0, sponsor, TxnKind::Payment)?;
    if sponsor.amount != 0 {
        return Err(Rejection::NonZeroAmount {
            index: 0,
            amount: sponsor.amount,
        });
    }
    if sponsor.sender != params.manager_address() {
        return Err(Rejection::UnauthorizedSender {
            index: 0,
            sender: sponsor.sender,
        });
    }

    require_kind(1, acceptance, TxnKind::AssetTransfer)?;
    if acceptance.asset_amount != 0 {
        return Err(Rejection::NonZeroAssetAmount {
            index: 1,
            asset_amount: acceptance.asset_amount,
        });
    }

    Ok(Mode::OptIn)
}

/// No inspected member may rekey or close out its account, and the first
/// two members may not close out an asset holding.
fn check_safety(members: &[TransactionRecord]) -> Result<(), Rejection> {
    for (index, txn) in members.iter().enumerate() {
        if !txn.rekey_to.is_zero() {
            return Err(Rejection::RekeyNotZero {
                index,
                target: txn.rekey_to,
            });
        }
    }

    for (index, txn) in members.iter().enumerate() {
        if !txn.close_remainder_to.is_zero() {
            return Err(Rejection::CloseRemainderNotZero {
                index,
                target: txn.close_remainder_to,
            });
        }
    }

    // Member 2's asset close target is deliberately left unchecked.
    for (index, txn) in members.iter().take(ASSET_CLOSE_CHECKED).enumerate() {
        if !txn.asset_close_to.is_zero() {
            return Err(Rejection::AssetCloseNotZero {
                index,
                target: txn.asset_close_to,
            });
        }
    }

    Ok(())
}

fn require_kind(index: usize, txn: &TransactionRecord, expected: TxnKind) -> Result<(), Rejection> {
    if txn.kind != expected {
        return Err(Rejection::UnexpectedKind {
            index,
            expected,
            actual: txn.kind,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondswap_common::{Address, ApplicationId, AssetId};

    const OLD: AssetId = AssetId(1001);
    const NEW: AssetId = AssetId(1002);
    const APP: ApplicationId = ApplicationId(77);
    const MANAGER: Address = Address::new([0x4d; 32]);
    const OTHER: Address = Address::new([0x99; 32]);

    fn params() -> BoundParameters {
        BoundParameters::new(OLD, NEW, APP, MANAGER).unwrap()
    }

    fn exchange_group() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::asset_transfer(OLD, 100),
            TransactionRecord::asset_transfer(NEW, 100),
            TransactionRecord::payment(2_500),
            TransactionRecord::application_call(APP, ["redeem_coupon"]),
        ]
    }

    fn opt_in_group() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::payment(0).with_sender(MANAGER),
            TransactionRecord::asset_transfer(NEW, 0),
        ]
    }

    fn rejection(group: &[TransactionRecord]) -> Rejection {
        match evaluate(group, &params()) {
            Verdict::Rejected(rejection) => rejection,
            Verdict::Approved(mode) => panic!("expected rejection, approved as {mode}"),
        }
    }

    #[test]
    fn test_exchange_approved() {
        let verdict = evaluate(&exchange_group(), &params());
        assert_eq!(verdict, Verdict::Approved(Mode::Exchange));
        assert!(authorize(&exchange_group(), &params()));
    }

    #[test]
    fn test_opt_in_approved() {
        let authorizer = GroupAuthorizer::new(params());
        assert_eq!(authorizer.evaluate(&opt_in_group()), Verdict::Approved(Mode::OptIn));
        assert!(authorizer.authorize(&opt_in_group()));
    }

    #[test]
    fn test_unsupported_sizes() {
        let mut group = exchange_group();
        group.push(TransactionRecord::payment(0));
        assert_eq!(rejection(&group), Rejection::UnsupportedGroupSize { size: 5 });
        assert_eq!(rejection(&group[..3]), Rejection::UnsupportedGroupSize { size: 3 });
        assert_eq!(rejection(&group[..1]), Rejection::UnsupportedGroupSize { size: 1 });
        assert_eq!(rejection(&[]), Rejection::UnsupportedGroupSize { size: 0 });
    }

    #[test]
    fn test_safety_checked_before_kinds() {
        let mut group = exchange_group();
        group[0].kind = TxnKind::Payment;
        group[2].rekey_to = OTHER;

        assert_eq!(
            rejection(&group),
            Rejection::RekeyNotZero {
                index: 2,
                target: OTHER
            }
        );
    }

    #[test]
    fn test_member_two_asset_close_unchecked() {
        let mut group = exchange_group();
        group[2].asset_close_to = OTHER;
        assert!(authorize(&group, &params()));
    }

    #[test]
    fn test_member_three_close_fields_unchecked() {
        let mut group = exchange_group();
        group[3].rekey_to = OTHER;
        group[3].close_remainder_to = OTHER;
        group[3].asset_close_to = OTHER;
        assert!(authorize(&group, &params()));
    }

    #[test]
    fn test_exchange_wrong_assets() {
        let mut group = exchange_group();
        group[0].asset_id = NEW;
        assert_eq!(
            rejection(&group),
            Rejection::WrongAsset {
                index: 0,
                expected: OLD,
                actual: NEW
            }
        );

        let mut group = exchange_group();
        group[1].asset_id = OLD;
        assert_eq!(rejection(&group).member_index(), Some(1));
        assert_eq!(rejection(&group).code(), "WRONG_ASSET");
    }

    #[test]
    fn test_exchange_amount_mismatch() {
        let mut group = exchange_group();
        group[1].asset_amount = 99;
        assert_eq!(
            rejection(&group),
            Rejection::AssetAmountMismatch {
                deposited: 100,
                returned: 99
            }
        );
    }

    #[test]
    fn test_exchange_zero_quantity_is_equal() {
        let mut group = exchange_group();
        group[0].asset_amount = 0;
        group[1].asset_amount = 0;
        assert!(authorize(&group, &params()));
    }

    #[test]
    fn test_exchange_coupon_must_be_payment() {
        let mut group = exchange_group();
        group[2] = TransactionRecord::asset_transfer(NEW, 5);
        assert_eq!(
            rejection(&group),
            Rejection::UnexpectedKind {
                index: 2,
                expected: TxnKind::Payment,
                actual: TxnKind::AssetTransfer
            }
        );
    }

    #[test]
    fn test_exchange_application_binding() {
        let mut group = exchange_group();
        group[3].application_id = ApplicationId(78);
        assert_eq!(rejection(&group).code(), "WRONG_APPLICATION");

        let mut group = exchange_group();
        group[3].application_args.clear();
        assert_eq!(rejection(&group), Rejection::MissingApplicationArg { index: 3 });

        let mut group = exchange_group();
        group[3] = TransactionRecord::application_call(APP, ["redeem_coupon_v2"]);
        assert_eq!(rejection(&group).code(), "WRONG_SELECTOR");

        let mut group = exchange_group();
        group[3].kind = TxnKind::Payment;
        assert_eq!(rejection(&group).code(), "UNEXPECTED_KIND");
    }

    #[test]
    fn test_exchange_selector_only_checks_first_arg() {
        let mut group = exchange_group();
        group[3] = TransactionRecord::application_call(APP, ["redeem_coupon", "extra"]);
        assert!(authorize(&group, &params()));
    }

    #[test]
    fn test_opt_in_manager_gate() {
        let mut group = opt_in_group();
        group[0].sender = OTHER;
        assert_eq!(
            rejection(&group),
            Rejection::UnauthorizedSender {
                index: 0,
                sender: OTHER
            }
        );
    }

    #[test]
    fn test_opt_in_amounts_must_be_zero() {
        let mut group = opt_in_group();
        group[0].amount = 1;
        assert_eq!(rejection(&group).code(), "NON_ZERO_AMOUNT");

        let mut group = opt_in_group();
        group[1].asset_amount = 1;
        assert_eq!(rejection(&group).code(), "NON_ZERO_ASSET_AMOUNT");
    }

    #[test]
    fn test_opt_in_any_asset() {
        let mut group = opt_in_group();
        group[1].asset_id = OLD;
        assert!(authorize(&group, &params()));

        group[1].asset_id = AssetId(5);
        assert!(authorize(&group, &params()));
    }

    #[test]
    fn test_opt_in_safety_clause() {
        let mut group = opt_in_group();
        group[1].asset_close_to = OTHER;
        assert_eq!(rejection(&group).code(), "ASSET_CLOSE_NOT_ZERO");

        let mut group = opt_in_group();
        group[0].close_remainder_to = OTHER;
        assert_eq!(rejection(&group).code(), "CLOSE_REMAINDER_NOT_ZERO");
    }
}

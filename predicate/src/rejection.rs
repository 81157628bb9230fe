//! Verdicts and rejection diagnostics.
//!
//! A [`Rejection`] names the first conjunct that failed. It exists for
//! offline simulation and testing; the boolean outcome never depends on it.

use std::fmt;
use thiserror::Error;

use bondswap_common::{Address, ApplicationArg, ApplicationId, AssetId, TxnKind};

/// Authorization mode selected by group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Two-member opt-in bootstrap.
    OptIn,
    /// Four-member bond exchange.
    Exchange,
}

impl Mode {
    /// Stable name for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::OptIn => "opt_in",
            Mode::Exchange => "exchange",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction field a rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Kind,
    Sender,
    RekeyTo,
    CloseRemainderTo,
    AssetCloseTo,
    Amount,
    AssetAmount,
    AssetId,
    ApplicationId,
    ApplicationArgs,
}

impl Field {
    /// Field name as it appears in transaction records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Kind => "kind",
            Field::Sender => "sender",
            Field::RekeyTo => "rekey_to",
            Field::CloseRemainderTo => "close_remainder_to",
            Field::AssetCloseTo => "asset_close_to",
            Field::Amount => "amount",
            Field::AssetAmount => "asset_amount",
            Field::AssetId => "asset_id",
            Field::ApplicationId => "application_id",
            Field::ApplicationArgs => "application_args",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first failed conjunct of an evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Group length has no authorization mode.
    #[error("Unsupported group size {size}")]
    UnsupportedGroupSize { size: usize },

    /// Member would hand signing authority to another account.
    #[error("Member {index} rekeys to {target}")]
    RekeyNotZero { index: usize, target: Address },

    /// Member would close its account out.
    #[error("Member {index} closes remainder to {target}")]
    CloseRemainderNotZero { index: usize, target: Address },

    /// Member would close its asset holding out.
    #[error("Member {index} closes asset holding to {target}")]
    AssetCloseNotZero { index: usize, target: Address },

    /// Member has the wrong transaction type.
    #[error("Member {index} has type {actual}, expected {expected}")]
    UnexpectedKind {
        index: usize,
        expected: TxnKind,
        actual: TxnKind,
    },

    /// Member transfers the wrong asset.
    #[error("Member {index} transfers asset {actual}, expected {expected}")]
    WrongAsset {
        index: usize,
        expected: AssetId,
        actual: AssetId,
    },

    /// Deposit and payout quantities differ.
    #[error("Deposited {deposited} old bond units but {returned} new bond units returned")]
    AssetAmountMismatch { deposited: u64, returned: u64 },

    /// Member calls the wrong application.
    #[error("Member {index} calls application {actual}, expected {expected}")]
    WrongApplication {
        index: usize,
        expected: ApplicationId,
        actual: ApplicationId,
    },

    /// Application call carries no selector argument.
    #[error("Member {index} has no application arguments")]
    MissingApplicationArg { index: usize },

    /// Application call selects the wrong entry point.
    #[error("Member {index} selects {actual}, expected redeem_coupon")]
    WrongSelector { index: usize, actual: ApplicationArg },

    /// Opt-in payment carries value.
    #[error("Member {index} pays {amount}, expected 0")]
    NonZeroAmount { index: usize, amount: u64 },

    /// Opt-in asset acceptance carries value.
    #[error("Member {index} transfers {asset_amount} asset units, expected 0")]
    NonZeroAssetAmount { index: usize, asset_amount: u64 },

    /// Opt-in payment is not from the manager.
    #[error("Member {index} is sent by {sender}, not the manager")]
    UnauthorizedSender { index: usize, sender: Address },
}

impl Rejection {
    /// Get rejection code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UnsupportedGroupSize { .. } => "UNSUPPORTED_GROUP_SIZE",
            Rejection::RekeyNotZero { .. } => "REKEY_NOT_ZERO",
            Rejection::CloseRemainderNotZero { .. } => "CLOSE_REMAINDER_NOT_ZERO",
            Rejection::AssetCloseNotZero { .. } => "ASSET_CLOSE_NOT_ZERO",
            Rejection::UnexpectedKind { .. } => "UNEXPECTED_KIND",
            Rejection::WrongAsset { .. } => "WRONG_ASSET",
            Rejection::AssetAmountMismatch { .. } => "ASSET_AMOUNT_MISMATCH",
            Rejection::WrongApplication { .. } => "WRONG_APPLICATION",
            Rejection::MissingApplicationArg { .. } => "MISSING_APPLICATION_ARG",
            Rejection::WrongSelector { .. } => "WRONG_SELECTOR",
            Rejection::NonZeroAmount { .. } => "NON_ZERO_AMOUNT",
            Rejection::NonZeroAssetAmount { .. } => "NON_ZERO_ASSET_AMOUNT",
            Rejection::UnauthorizedSender { .. } => "UNAUTHORIZED_SENDER",
        }
    }

    /// Group member the rejection refers to, if a single one.
    pub fn member_index(&self) -> Option<usize> {
        match self {
            Rejection::UnsupportedGroupSize { .. } => None,
            // Reported against the payout leg, which must match the deposit.
            Rejection::AssetAmountMismatch { .. } => Some(1),
            Rejection::RekeyNotZero { index, .. }
            | Rejection::CloseRemainderNotZero { index, .. }
            | Rejection::AssetCloseNotZero { index, .. }
            | Rejection::UnexpectedKind { index, .. }
            | Rejection::WrongAsset { index, .. }
            | Rejection::WrongApplication { index, .. }
            | Rejection::MissingApplicationArg { index }
            | Rejection::WrongSelector { index, .. }
            | Rejection::NonZeroAmount { index, .. }
            | Rejection::NonZeroAssetAmount { index, .. }
            | Rejection::UnauthorizedSender { index, .. } => Some(*index),
        }
    }

    /// Field the rejection refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Rejection::UnsupportedGroupSize { .. } => None,
            Rejection::RekeyNotZero { .. } => Some(Field::RekeyTo),
            Rejection::CloseRemainderNotZero { .. } => Some(Field::CloseRemainderTo),
            Rejection::AssetCloseNotZero { .. } => Some(Field::AssetCloseTo),
            Rejection::UnexpectedKind { .. } => Some(Field::Kind),
            Rejection::WrongAsset { .. } => Some(Field::AssetId),
            Rejection::AssetAmountMismatch { .. } => Some(Field::AssetAmount),
            Rejection::WrongApplication { .. } => Some(Field::ApplicationId),
            Rejection::MissingApplicationArg { .. } | Rejection::WrongSelector { .. } => {
                Some(Field::ApplicationArgs)
            }
            Rejection::NonZeroAmount { .. } => Some(Field::Amount),
            Rejection::NonZeroAssetAmount { .. } => Some(Field::AssetAmount),
            Rejection::UnauthorizedSender { .. } => Some(Field::Sender),
        }
    }
}

/// Outcome of evaluating a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Group approved under the given mode.
    Approved(Mode),
    /// Group rejected.
    Rejected(Rejection),
}

impl Verdict {
    /// Check if the group was approved.
    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved(_))
    }

    /// Mode the group was approved under.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Verdict::Approved(mode) => Some(*mode),
            Verdict::Rejected(_) => None,
        }
    }

    /// Rejection reason, if rejected.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Approved(_) => None,
            Verdict::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<Result<Mode, Rejection>> for Verdict {
    fn from(result: Result<Mode, Rejection>) -> Self {
        match result {
            Ok(mode) => Verdict::Approved(mode),
            Err(rejection) => Verdict::Rejected(rejection),
        }
    }
}

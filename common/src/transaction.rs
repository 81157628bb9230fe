//! Transaction records as exposed by the ledger runtime to a group predicate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Address, ApplicationId, AssetId, BondSwapError};

/// Transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxnKind {
    /// Native currency payment.
    #[serde(rename = "pay")]
    Payment,
    /// Participation key registration.
    #[serde(rename = "keyreg")]
    KeyRegistration,
    /// Asset creation or reconfiguration.
    #[serde(rename = "acfg")]
    AssetConfig,
    /// Asset transfer, including opt-in and close-out.
    #[serde(rename = "axfer")]
    AssetTransfer,
    /// Asset freeze or unfreeze.
    #[serde(rename = "afrz")]
    AssetFreeze,
    /// Application call.
    #[serde(rename = "appl")]
    ApplicationCall,
}

impl TxnKind {
    /// Ledger type tag.
    pub fn tag(&self) -> &'static str {
        match self {
            TxnKind::Payment => "pay",
            TxnKind::KeyRegistration => "keyreg",
            TxnKind::AssetConfig => "acfg",
            TxnKind::AssetTransfer => "axfer",
            TxnKind::AssetFreeze => "afrz",
            TxnKind::ApplicationCall => "appl",
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One application call argument.
///
/// Text form is the literal UTF-8 string, or `0x`-prefixed hex for
/// arbitrary bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationArg(Vec<u8>);

impl ApplicationArg {
    /// Create from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse the text form.
    pub fn parse(s: &str) -> Result<Self, BondSwapError> {
        match s.strip_prefix("0x") {
            Some(digits) => hex::decode(digits)
                .map(Self)
                .map_err(|e| BondSwapError::InvalidApplicationArg(format!("{s:?}: {e}"))),
            None => Ok(Self(s.as_bytes().to_vec())),
        }
    }

    fn as_printable(&self) -> Option<&str> {
        let text = std::str::from_utf8(&self.0).ok()?;
        if text.starts_with("0x") || text.chars().any(char::is_control) {
            return None;
        }
        Some(text)
    }
}

impl fmt::Display for ApplicationArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_printable() {
            Some(text) => f.write_str(text),
            None => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

impl fmt::Debug for ApplicationArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApplicationArg({:?})", self.to_string())
    }
}

impl TryFrom<String> for ApplicationArg {
    type Error = BondSwapError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ApplicationArg> for String {
    fn from(arg: ApplicationArg) -> Self {
        arg.to_string()
    }
}

impl From<&str> for ApplicationArg {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for ApplicationArg {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// A single member of a transaction group.
///
/// Only the fields a group predicate reads are modelled. Fields that do not
/// apply to a transaction type hold the ledger zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionRecord {
    /// Transaction type.
    pub kind: TxnKind,
    /// Sending account.
    #[serde(default)]
    pub sender: Address,
    /// New authorized signer for the sender (zero when unset).
    #[serde(default)]
    pub rekey_to: Address,
    /// Account receiving the sender's remaining balance on close (zero when unset).
    #[serde(default)]
    pub close_remainder_to: Address,
    /// Account receiving the sender's remaining asset holding on close (zero when unset).
    #[serde(default)]
    pub asset_close_to: Address,
    /// Payment amount in base units.
    #[serde(default)]
    pub amount: u64,
    /// Asset transfer amount in base units.
    #[serde(default)]
    pub asset_amount: u64,
    /// Transferred asset.
    #[serde(default)]
    pub asset_id: AssetId,
    /// Called application.
    #[serde(default)]
    pub application_id: ApplicationId,
    /// Application call arguments.
    #[serde(default)]
    pub application_args: Vec<ApplicationArg>,
}

impl TransactionRecord {
    /// Create a record of the given type with every other field zeroed.
    pub fn new(kind: TxnKind) -> Self {
        Self {
            kind,
            sender: Address::ZERO,
            rekey_to: Address::ZERO,
            close_remainder_to: Address::ZERO,
            asset_close_to: Address::ZERO,
            amount: 0,
            asset_amount: 0,
            asset_id: AssetId::default(),
            application_id: ApplicationId::default(),
            application_args: Vec::new(),
        }
    }

    /// Create a payment.
    pub fn payment(amount: u64) -> Self {
        Self {
            amount,
            ..Self::new(TxnKind::Payment)
        }
    }

    /// Create an asset transfer.
    pub fn asset_transfer(asset_id: AssetId, asset_amount: u64) -> Self {
        Self {
            asset_id,
            asset_amount,
            ..Self::new(TxnKind::AssetTransfer)
        }
    }

    /// Create an application call.
    pub fn application_call<I, A>(application_id: ApplicationId, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ApplicationArg>,
    {
        Self {
            application_id,
            application_args: args.into_iter().map(Into::into).collect(),
            ..Self::new(TxnKind::ApplicationCall)
        }
    }

    /// Set the sender.
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// First application argument, if any.
    pub fn first_arg(&self) -> Option<&ApplicationArg> {
        self.application_args.first()
    }
}

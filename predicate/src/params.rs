//! Parameters bound into a deployed predicate instance.

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use bondswap_common::{Address, ApplicationId, AssetId};

/// Template variable holding the old bond asset id.
pub const TMPL_OLD_BOND: &str = "TMPL_OLD_BOND";
/// Template variable holding the new bond asset id.
pub const TMPL_NEW_BOND: &str = "TMPL_NEW_BOND";
/// Template variable holding the redemption application id.
pub const TMPL_APPLICATION_ID: &str = "TMPL_APPLICATION_ID";
/// Template variable holding the manager address.
pub const TMPL_APP_MANAGER: &str = "TMPL_APP_MANAGER";

/// All template variables a predicate instance binds.
pub const TEMPLATE_VARIABLES: [&str; 4] = [
    TMPL_OLD_BOND,
    TMPL_NEW_BOND,
    TMPL_APPLICATION_ID,
    TMPL_APP_MANAGER,
];

/// Errors from binding template parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A required template variable has no value.
    #[error("Missing template variable {0}")]
    Missing(&'static str),

    /// A template variable value could not be parsed.
    #[error("Malformed template variable {name}={value:?}: {reason}")]
    Malformed {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Old and new bond are the same asset.
    #[error("Old and new bond must differ, both are asset {0}")]
    IdenticalBonds(AssetId),
}

impl TemplateError {
    /// Get error code for reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            TemplateError::Missing(_) => "TEMPLATE_MISSING",
            TemplateError::Malformed { .. } => "TEMPLATE_MALFORMED",
            TemplateError::IdenticalBonds(_) => "TEMPLATE_IDENTICAL_BONDS",
        }
    }

    /// Name of the offending template variable.
    pub fn variable(&self) -> &'static str {
        match self {
            TemplateError::Missing(name) | TemplateError::Malformed { name, .. } => *name,
            TemplateError::IdenticalBonds(_) => TMPL_NEW_BOND,
        }
    }
}

/// Constants fixed when a predicate instance is deployed.
///
/// Fields are private so a bound instance cannot be altered; rebinding
/// means constructing a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundParameters {
    old_asset_id: AssetId,
    new_asset_id: AssetId,
    application_id: ApplicationId,
    manager_address: Address,
}

impl BoundParameters {
    /// Bind parameters.
    pub fn new(
        old_asset_id: AssetId,
        new_asset_id: AssetId,
        application_id: ApplicationId,
        manager_address: Address,
    ) -> Result<Self, TemplateError> {
        if old_asset_id == new_asset_id {
            return Err(TemplateError::IdenticalBonds(old_asset_id));
        }

        Ok(Self {
            old_asset_id,
            new_asset_id,
            application_id,
            manager_address,
        })
    }

    /// Bind from template variables resolved through `lookup`.
    ///
    /// Variables other than [`TEMPLATE_VARIABLES`] are never requested.
    pub fn from_template<F>(lookup: F) -> Result<Self, TemplateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let old_asset_id = AssetId(parse_int(&lookup, TMPL_OLD_BOND)?);
        let new_asset_id = AssetId(parse_int(&lookup, TMPL_NEW_BOND)?);
        let application_id = ApplicationId(parse_int(&lookup, TMPL_APPLICATION_ID)?);

        let manager = require(&lookup, TMPL_APP_MANAGER)?;
        let manager_address =
            manager
                .trim()
                .parse::<Address>()
                .map_err(|e| TemplateError::Malformed {
                    name: TMPL_APP_MANAGER,
                    value: manager.clone(),
                    reason: format!("{e}"),
                })?;

        Self::new(old_asset_id, new_asset_id, application_id, manager_address)
    }

    /// Bind from a map of template variable values.
    pub fn from_template_map(values: &HashMap<String, String>) -> Result<Self, TemplateError> {
        Self::from_template(|name| values.get(name).cloned())
    }

    /// Render as template variable values.
    pub fn to_template(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            (TMPL_OLD_BOND, self.old_asset_id.to_string()),
            (TMPL_NEW_BOND, self.new_asset_id.to_string()),
            (TMPL_APPLICATION_ID, self.application_id.to_string()),
            (TMPL_APP_MANAGER, self.manager_address.to_string()),
        ])
    }

    /// Asset the holder deposits.
    pub fn old_asset_id(&self) -> AssetId {
        self.old_asset_id
    }

    /// Asset the exchange pays out.
    pub fn new_asset_id(&self) -> AssetId {
        self.new_asset_id
    }

    /// Application recording redemptions.
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Account allowed to sponsor opt-ins.
    pub fn manager_address(&self) -> Address {
        self.manager_address
    }
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or(TemplateError::Missing(name))
}

fn parse_int<F>(lookup: &F, name: &'static str) -> Result<u64, TemplateError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = require(lookup, name)?;
    value.trim().parse::<u64>().map_err(|e| TemplateError::Malformed {
        name,
        value: value.clone(),
        reason: format!("{e}"),
    })
}

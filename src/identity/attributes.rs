//! Canonical identity attributes extracted from one assertion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest and highest valid level of assurance.
pub const LOA_MIN: u8 = 1;
pub const LOA_MAX: u8 = 3;

/// Level of assurance pair.
///
/// Constructed through [`Loa::new`], which keeps both values in
/// `LOA_MIN..=LOA_MAX` and `highest >= current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loa {
    pub current: u8,
    pub highest: u8,
}

impl Loa {
    pub fn new(current: u8, highest: u8) -> Self {
        let current = current.clamp(LOA_MIN, LOA_MAX);
        let highest = highest.clamp(LOA_MIN, LOA_MAX).max(current);
        Self { current, highest }
    }

    pub fn one() -> Self {
        Self::new(1, 1)
    }

    pub fn three() -> Self {
        Self::new(3, 3)
    }

    pub fn is_well_formed(&self) -> bool {
        (LOA_MIN..=LOA_MAX).contains(&self.current)
            && (LOA_MIN..=LOA_MAX).contains(&self.highest)
            && self.highest >= self.current
    }
}

impl Default for Loa {
    fn default() -> Self {
        Self::one()
    }
}

/// My HealtheVet account type carried in the `mhv_profile` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountType {
    Basic,
    Advanced,
    Premium,
    #[default]
    None,
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(AccountType::Basic),
            "advanced" => Ok(AccountType::Advanced),
            "premium" => Ok(AccountType::Premium),
            "none" | "" => Ok(AccountType::None),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountType::Basic => "Basic",
            AccountType::Advanced => "Advanced",
            AccountType::Premium => "Premium",
            AccountType::None => "None",
        };
        f.write_str(s)
    }
}

/// Source-system identifiers that survive an assurance upgrade.
///
/// Each is expensive to re-derive, so reconciliation carries them over
/// from the retired identity when the new assertion does not supply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableAttribute {
    MhvCorrelationId,
    MhvIcn,
    DslogonEdipi,
}

impl MergeableAttribute {
    pub const ALL: [MergeableAttribute; 3] = [
        MergeableAttribute::MhvCorrelationId,
        MergeableAttribute::MhvIcn,
        MergeableAttribute::DslogonEdipi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeableAttribute::MhvCorrelationId => "mhv_correlation_id",
            MergeableAttribute::MhvIcn => "mhv_icn",
            MergeableAttribute::DslogonEdipi => "dslogon_edipi",
        }
    }
}

/// Correlation ids keyed by source system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationIds {
    /// My HealtheVet account id
    pub mhv_correlation_id: Option<String>,
    /// Integration control number as known to My HealtheVet
    pub mhv_icn: Option<String>,
    /// DoD EDIPI from DS Logon
    pub dslogon_edipi: Option<String>,
}

impl CorrelationIds {
    pub fn get(&self, attribute: MergeableAttribute) -> Option<&str> {
        match attribute {
            MergeableAttribute::MhvCorrelationId => self.mhv_correlation_id.as_deref(),
            MergeableAttribute::MhvIcn => self.mhv_icn.as_deref(),
            MergeableAttribute::DslogonEdipi => self.dslogon_edipi.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, attribute: MergeableAttribute) -> &mut Option<String> {
        match attribute {
            MergeableAttribute::MhvCorrelationId => &mut self.mhv_correlation_id,
            MergeableAttribute::MhvIcn => &mut self.mhv_icn,
            MergeableAttribute::DslogonEdipi => &mut self.dslogon_edipi,
        }
    }
}

/// Identity snapshot from one authentication attempt.
///
/// Also the shape persisted as the user identity once reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAttributes {
    /// Stable external identifier of the principal
    pub principal_id: String,
    pub email: Option<String>,
    #[serde(flatten)]
    pub correlation_ids: CorrelationIds,
    pub multifactor_asserted: bool,
    pub loa: Loa,
    pub account_type: AccountType,
    pub authn_context: String,
}

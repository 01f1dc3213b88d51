//! Training package catalog.
//!
//! Packages are immutable reference data. A payment captures a snapshot of
//! the package it was created for so later catalog edits never rewrite
//! history.

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::foundation::PackageId;

/// Wire value marking an unlimited package.
pub const UNLIMITED_SESSIONS_WIRE: i32 = -1;

/// Sessions credited to a subscription for an unlimited package.
pub const UNLIMITED_SESSION_CREDIT: u32 = 1000;

/// Default settlement currency.
pub const DEFAULT_CURRENCY: &str = "KZT";

/// Number of sessions a package grants.
///
/// Serialized as an integer where `-1` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAllowance {
    Limited(u32),
    Unlimited,
}

impl SessionAllowance {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, SessionAllowance::Unlimited)
    }

    /// Sessions added to a subscription balance on purchase.
    pub fn credit(&self) -> u32 {
        match self {
            SessionAllowance::Limited(n) => *n,
            SessionAllowance::Unlimited => UNLIMITED_SESSION_CREDIT,
        }
    }

    pub fn as_wire(&self) -> i32 {
        match self {
            SessionAllowance::Limited(n) => *n as i32,
            SessionAllowance::Unlimited => UNLIMITED_SESSIONS_WIRE,
        }
    }

    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            UNLIMITED_SESSIONS_WIRE => Some(SessionAllowance::Unlimited),
            n if n >= 0 => Some(SessionAllowance::Limited(n as u32)),
            _ => None,
        }
    }
}

impl Serialize for SessionAllowance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for SessionAllowance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i32::deserialize(deserializer)?;
        SessionAllowance::from_wire(value).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid session count: {}", value))
        })
    }
}

/// A purchasable training package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPackage {
    pub id: PackageId,
    pub name: String,
    pub description: String,
    /// Price in whole currency units.
    pub price: i64,
    pub currency: String,
    pub sessions: SessionAllowance,
    pub duration_days: u32,
}

impl TrainingPackage {
    /// Human readable line sent to the gateway with the payment.
    pub fn payment_description(&self) -> String {
        format!("Payment: {} - {}", self.name, self.description)
    }
}

static STANDARD_CATALOG: Lazy<PackageCatalog> = Lazy::new(|| {
    PackageCatalog::new(vec![
        catalog_entry(
            "basic",
            "Basic package",
            "4 sessions per month",
            15_000,
            SessionAllowance::Limited(4),
        ),
        catalog_entry(
            "standard",
            "Standard package",
            "8 sessions per month",
            25_000,
            SessionAllowance::Limited(8),
        ),
        catalog_entry(
            "premium",
            "Premium package",
            "12 sessions per month + personal nutrition plan",
            35_000,
            SessionAllowance::Limited(12),
        ),
        catalog_entry(
            "unlimited",
            "Unlimited package",
            "Unlimited sessions for a month",
            45_000,
            SessionAllowance::Unlimited,
        ),
    ])
});

fn catalog_entry(
    id: &'static str,
    name: &str,
    description: &str,
    price: i64,
    sessions: SessionAllowance,
) -> TrainingPackage {
    TrainingPackage {
        id: PackageId::from_static(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        currency: DEFAULT_CURRENCY.to_string(),
        sessions,
        duration_days: 30,
    }
}

/// Ordered, read-only set of packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCatalog {
    packages: Vec<TrainingPackage>,
}

impl PackageCatalog {
    pub fn new(packages: Vec<TrainingPackage>) -> Self {
        Self { packages }
    }

    /// The catalog the service sells by default.
    pub fn standard() -> &'static PackageCatalog {
        &STANDARD_CATALOG
    }

    pub fn all(&self) -> &[TrainingPackage] {
        &self.packages
    }

    pub fn find(&self, id: &str) -> Option<&TrainingPackage> {
        self.packages.iter().find(|p| p.id.as_str() == id)
    }
}

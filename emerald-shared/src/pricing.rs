//! Project price and duration estimator
//!
//! Every project starts from a base package (price and duration). Customers
//! add feature modules from a fixed catalog; each module adds its own price
//! and duration to the totals.
//!
//! The estimate is a pure function of the *set* of selected keys:
//! selection order and duplicates do not change the result, and unknown keys
//! contribute nothing.
//!
//! Durations are tracked in half-week units so sums stay exact
//! (the SMS gateway module takes half a week).
//!
//! # Example
//!
//! ```
//! use emerald_shared::pricing::{estimate, BASE_PRICE};
//!
//! let result = estimate(["kasir", "sms"]);
//! assert_eq!(result.total_price, BASE_PRICE + 2_000_000 + 500_000);
//! assert_eq!(result.total_duration_weeks, 6.5);
//! ```

use serde::Serialize;

/// Base package price in rupiah
pub const BASE_PRICE: i64 = 5_000_000;

/// Base package duration in half-weeks (4 weeks)
pub const BASE_DURATION_HALF_WEEKS: u32 = 8;

/// A feature module that can be added to an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModule {
    /// Lookup key sent by clients
    pub key: &'static str,

    /// Display name
    pub name: &'static str,

    /// Price in rupiah
    pub price: i64,

    /// Duration in half-weeks
    #[serde(skip)]
    pub duration_half_weeks: u32,
}

impl CatalogModule {
    /// Duration in weeks
    pub fn duration_weeks(&self) -> f64 {
        half_weeks_to_weeks(self.duration_half_weeks)
    }
}

/// The fixed module catalog, in display order
pub const CATALOG: [CatalogModule; 6] = [
    CatalogModule {
        key: "kasir",
        name: "Kasir Digital",
        price: 2_000_000,
        duration_half_weeks: 4,
    },
    CatalogModule {
        key: "inventory",
        name: "Inventory Management",
        price: 3_000_000,
        duration_half_weeks: 6,
    },
    CatalogModule {
        key: "laporan",
        name: "Laporan & Analytics",
        price: 1_500_000,
        duration_half_weeks: 2,
    },
    CatalogModule {
        key: "auth",
        name: "User Authentication",
        price: 1_000_000,
        duration_half_weeks: 2,
    },
    CatalogModule {
        key: "sms",
        name: "SMS Gateway",
        price: 500_000,
        duration_half_weeks: 1,
    },
    CatalogModule {
        key: "api",
        name: "API Integration",
        price: 1_500_000,
        duration_half_weeks: 4,
    },
];

/// Looks up a catalog module by key
pub fn find_module(key: &str) -> Option<&'static CatalogModule> {
    CATALOG.iter().find(|module| module.key == key)
}

/// Per-module line of an estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetail {
    pub key: &'static str,
    pub name: &'static str,
    pub price: i64,
    pub duration: f64,
}

impl From<&CatalogModule> for ModuleDetail {
    fn from(module: &CatalogModule) -> Self {
        Self {
            key: module.key,
            name: module.name,
            price: module.price,
            duration: module.duration_weeks(),
        }
    }
}

/// Result of an estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Base price plus every selected module price
    pub total_price: i64,

    /// Base duration plus every selected module duration, in weeks
    #[serde(rename = "totalDuration")]
    pub total_duration_weeks: f64,

    /// Recognised module keys, in catalog order
    pub selected_modules: Vec<&'static str>,

    /// Line items for the recognised modules, in catalog order
    pub module_details: Vec<ModuleDetail>,
}

/// Computes the price and duration for a selection of module keys
pub fn estimate<I, S>(selected: I) -> Estimate
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keys: Vec<S> = selected.into_iter().collect();

    // Walk the catalog rather than the input so order and duplicates are irrelevant
    let chosen: Vec<&CatalogModule> = CATALOG
        .iter()
        .filter(|module| keys.iter().any(|key| key.as_ref() == module.key))
        .collect();

    let total_price = BASE_PRICE + chosen.iter().map(|m| m.price).sum::<i64>();
    let total_half_weeks =
        BASE_DURATION_HALF_WEEKS + chosen.iter().map(|m| m.duration_half_weeks).sum::<u32>();

    Estimate {
        total_price,
        total_duration_weeks: half_weeks_to_weeks(total_half_weeks),
        selected_modules: chosen.iter().map(|m| m.key).collect(),
        module_details: chosen.into_iter().map(ModuleDetail::from).collect(),
    }
}

fn half_weeks_to_weeks(half_weeks: u32) -> f64 {
    f64::from(half_weeks) / 2.0
}

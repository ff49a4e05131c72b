//! Price plans
//!
//! A product is sold on one of three cadences: a one-time purchase, a
//! monthly plan, or a yearly plan. Which cadences a product offers, and at
//! what price, is its [`PlanPrices`] menu; a concrete choice of cadence with
//! its price is a [`PricePlan`].

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Billing cadence offered for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanKind {
    /// Pay once, keep forever.
    OneTime,

    /// Renews every month.
    Monthly,

    /// Renews every year.
    Yearly,
}

impl PlanKind {
    /// All cadences, in display order.
    pub const ALL: [Self; 3] = [Self::OneTime, Self::Monthly, Self::Yearly];

    /// Human-readable cadence label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a cadence name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown plan cadence; expected one-time, monthly or yearly")]
pub struct ParsePlanKindError;

impl FromStr for PlanKind {
    type Err = ParsePlanKindError;

    /// Parse a cadence from its label or wire name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "one-time" | "oneTime" => Ok(Self::OneTime),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ParsePlanKindError),
        }
    }
}

/// One cadence with its unit price.
///
/// The carried [`Money`] is the price the line pays for that cadence, so a
/// plan is never separated from what it costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricePlan<'a> {
    /// Pay once, keep forever.
    OneTime(Money<'a, Currency>),

    /// Renews every month.
    Monthly(Money<'a, Currency>),

    /// Renews every year.
    Yearly(Money<'a, Currency>),
}

impl<'a> PricePlan<'a> {
    /// Build a plan for the given cadence and price.
    #[must_use]
    pub const fn new(kind: PlanKind, price: Money<'a, Currency>) -> Self {
        match kind {
            PlanKind::OneTime => Self::OneTime(price),
            PlanKind::Monthly => Self::Monthly(price),
            PlanKind::Yearly => Self::Yearly(price),
        }
    }

    /// The cadence of this plan.
    #[must_use]
    pub const fn kind(&self) -> PlanKind {
        match self {
            Self::OneTime(_) => PlanKind::OneTime,
            Self::Monthly(_) => PlanKind::Monthly,
            Self::Yearly(_) => PlanKind::Yearly,
        }
    }

    /// The unit price of this plan.
    #[must_use]
    pub const fn price(&self) -> Money<'a, Currency> {
        match self {
            Self::OneTime(price) | Self::Monthly(price) | Self::Yearly(price) => *price,
        }
    }
}

/// The per-cadence price menu a product offers.
///
/// A product may offer any subset of cadences. Cart lines are priced from
/// this menu at evaluation time, never from a stored copy of a price.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanPrices<'a> {
    one_time: Option<Money<'a, Currency>>,
    monthly: Option<Money<'a, Currency>>,
    yearly: Option<Money<'a, Currency>>,
}

impl<'a> PlanPrices<'a> {
    /// An empty menu offering no plans.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            one_time: None,
            monthly: None,
            yearly: None,
        }
    }

    /// Set the price for a cadence, returning the updated menu.
    #[must_use]
    pub fn with(mut self, kind: PlanKind, price: Money<'a, Currency>) -> Self {
        self.set(kind, price);
        self
    }

    /// Set the price for a cadence.
    pub fn set(&mut self, kind: PlanKind, price: Money<'a, Currency>) {
        match kind {
            PlanKind::OneTime => self.one_time = Some(price),
            PlanKind::Monthly => self.monthly = Some(price),
            PlanKind::Yearly => self.yearly = Some(price),
        }
    }

    /// The price for a cadence, if offered.
    #[must_use]
    pub const fn price_for(&self, kind: PlanKind) -> Option<Money<'a, Currency>> {
        match kind {
            PlanKind::OneTime => self.one_time,
            PlanKind::Monthly => self.monthly,
            PlanKind::Yearly => self.yearly,
        }
    }

    /// The priced plan for a cadence, if offered.
    #[must_use]
    pub fn plan_for(&self, kind: PlanKind) -> Option<PricePlan<'a>> {
        self.price_for(kind).map(|price| PricePlan::new(kind, price))
    }

    /// The first offered plan in one-time, monthly, yearly order.
    ///
    /// This is the cadence preselected when a product is added to the cart
    /// without an explicit choice.
    #[must_use]
    pub fn default_plan(&self) -> Option<PricePlan<'a>> {
        PlanKind::ALL.iter().find_map(|kind| self.plan_for(*kind))
    }

    /// Cadences offered by this menu, in display order.
    #[must_use]
    pub fn kinds(&self) -> SmallVec<[PlanKind; 3]> {
        PlanKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.price_for(*kind).is_some())
            .collect()
    }

    /// Whether the menu offers no plans at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.one_time.is_none() && self.monthly.is_none() && self.yearly.is_none()
    }
}

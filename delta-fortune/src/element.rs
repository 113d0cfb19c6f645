//! Five-element cycle and the compatibility model every scorer builds on.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    COMPAT_DESTROYS, COMPAT_GENERATES, COMPAT_NEUTRAL, COMPAT_SAME, TIER_AVERAGE, TIER_DECENT,
    TIER_EXCELLENT, TIER_GOOD,
};
use crate::numbers::cycle_index;

/// One of the five symbolic elements, serialized as its Chinese character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "木")]
    Wood,
    #[serde(rename = "火")]
    Fire,
    #[serde(rename = "土")]
    Earth,
    #[serde(rename = "金")]
    Metal,
    #[serde(rename = "水")]
    Water,
}

impl Element {
    /// Generation order; day and birthday lookups index into this.
    pub const CYCLE: [Self; 5] = [Self::Wood, Self::Fire, Self::Earth, Self::Metal, Self::Water];

    /// The element this one nourishes.
    #[must_use]
    pub const fn generates(self) -> Self {
        match self {
            Self::Wood => Self::Fire,
            Self::Fire => Self::Earth,
            Self::Earth => Self::Metal,
            Self::Metal => Self::Water,
            Self::Water => Self::Wood,
        }
    }

    /// The element this one weakens.
    #[must_use]
    pub const fn destroys(self) -> Self {
        match self {
            Self::Wood => Self::Earth,
            Self::Fire => Self::Metal,
            Self::Earth => Self::Water,
            Self::Metal => Self::Wood,
            Self::Water => Self::Fire,
        }
    }

    #[must_use]
    pub fn from_index(index: i64) -> Self {
        Self::CYCLE[cycle_index(index, Self::CYCLE.len())]
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Fire => "fire",
            Self::Earth => "earth",
            Self::Metal => "metal",
            Self::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element `{0}`")]
pub struct UnknownElement(pub String);

impl FromStr for Element {
    type Err = UnknownElement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::CYCLE
            .into_iter()
            .find(|e| e.symbol() == trimmed || e.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownElement(trimmed.to_string()))
    }
}

/// Score how `target` fares under `source`.
///
/// Directional: `compatibility(a, b)` and `compatibility(b, a)` differ whenever
/// one element generates or destroys the other.
#[must_use]
pub fn compatibility(source: Element, target: Element) -> f64 {
    if source.generates() == target {
        COMPAT_GENERATES
    } else if source.destroys() == target {
        COMPAT_DESTROYS
    } else if source == target {
        COMPAT_SAME
    } else {
        COMPAT_NEUTRAL
    }
}

/// Arithmetic mean of three compatibilities against a single target.
#[must_use]
pub fn mean_compatibility(sources: [Element; 3], target: Element) -> f64 {
    sources
        .iter()
        .map(|source| compatibility(*source, target))
        .sum::<f64>()
        / 3.0
}

/// Five-step grading of an averaged compatibility bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusTier {
    Excellent,
    Good,
    Decent,
    Average,
    Poor,
}

impl BonusTier {
    #[must_use]
    pub fn from_bonus(bonus: f64) -> Self {
        if bonus >= TIER_EXCELLENT {
            Self::Excellent
        } else if bonus >= TIER_GOOD {
            Self::Good
        } else if bonus >= TIER_DECENT {
            Self::Decent
        } else if bonus >= TIER_AVERAGE {
            Self::Average
        } else {
            Self::Poor
        }
    }

    /// Fortune wording used for draw qualities.
    #[must_use]
    pub const fn fortune_label(self) -> &'static str {
        match self {
            Self::Excellent => "大吉",
            Self::Good => "吉",
            Self::Decent => "小吉",
            Self::Average => "平",
            Self::Poor => "不宜",
        }
    }

    /// Rating wording used for containers.
    #[must_use]
    pub const fn rating_label(self) -> &'static str {
        match self {
            Self::Excellent => "极佳",
            Self::Good => "很好",
            Self::Decent => "不错",
            Self::Average => "一般",
            Self::Poor => "不佳",
        }
    }
}

/// How a pair of interacting elements relate, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementInteraction {
    FirstGeneratesSecond,
    SecondGeneratesFirst,
    FirstDestroysSecond,
    SecondDestroysFirst,
    Neutral,
}

impl ElementInteraction {
    #[must_use]
    pub fn between(first: Element, second: Element) -> Self {
        if first.generates() == second {
            Self::FirstGeneratesSecond
        } else if second.generates() == first {
            Self::SecondGeneratesFirst
        } else if first.destroys() == second {
            Self::FirstDestroysSecond
        } else if second.destroys() == first {
            Self::SecondDestroysFirst
        } else {
            Self::Neutral
        }
    }
}

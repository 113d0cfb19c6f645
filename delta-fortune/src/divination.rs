//! Plum-blossom trigrams and the nine-palace time table.
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::constants::{
    CHANGE_LINE_COUNT, PALACE_COUNT, PALACE_LUCKY_BONUS, PALACE_PLAIN_BONUS,
};
use crate::element::{Element, ElementInteraction, compatibility};
use crate::numbers::cycle_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trigram {
    pub name: &'static str,
    pub element: Element,
}

pub const TRIGRAMS: [Trigram; 8] = [
    Trigram { name: "坤", element: Element::Earth },
    Trigram { name: "震", element: Element::Wood },
    Trigram { name: "坎", element: Element::Water },
    Trigram { name: "兑", element: Element::Metal },
    Trigram { name: "艮", element: Element::Earth },
    Trigram { name: "离", element: Element::Fire },
    Trigram { name: "巽", element: Element::Wood },
    Trigram { name: "乾", element: Element::Metal },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlumBlossomReading {
    pub upper: Trigram,
    pub lower: Trigram,
    /// 1-based changing line.
    pub change_line: u8,
    pub compatibility: f64,
    pub prediction: &'static str,
}

/// Reading of `upper` over `lower` from the lower trigram's point of view.
#[must_use]
pub fn plum_blossom_prediction(upper: Element, lower: Element) -> &'static str {
    match ElementInteraction::between(lower, upper) {
        ElementInteraction::FirstGeneratesSecond => "吉，下卦生上卦，事业有成",
        ElementInteraction::SecondGeneratesFirst => "平，上卦生下卦，需要付出",
        ElementInteraction::SecondDestroysFirst => "凶，上克下，阻力重重",
        ElementInteraction::FirstDestroysSecond => "险，下克上，需防小人",
        ElementInteraction::Neutral => "平，五行平和，按部就班",
    }
}

#[must_use]
pub fn plum_blossom(entity: Element, at: NaiveDateTime) -> PlumBlossomReading {
    let date_sum = i64::from(at.year()) + i64::from(at.month()) + i64::from(at.day());
    let with_hour = date_sum + i64::from(at.hour());
    let upper = TRIGRAMS[cycle_index(date_sum, TRIGRAMS.len())];
    let lower = TRIGRAMS[cycle_index(with_hour, TRIGRAMS.len())];
    let change_line = with_hour.rem_euclid(CHANGE_LINE_COUNT) + 1;
    PlumBlossomReading {
        upper,
        lower,
        change_line: u8::try_from(change_line).unwrap_or(1),
        compatibility: compatibility(entity, upper.element),
        prediction: plum_blossom_prediction(upper.element, lower.element),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palace {
    pub name: &'static str,
    pub position: u32,
    pub element: Element,
    pub meaning: &'static str,
}

pub const PALACES: [Palace; 9] = [
    Palace { name: "乾宫", position: 6, element: Element::Metal, meaning: "天门" },
    Palace { name: "坎宫", position: 1, element: Element::Water, meaning: "生门" },
    Palace { name: "艮宫", position: 8, element: Element::Earth, meaning: "伤门" },
    Palace { name: "震宫", position: 3, element: Element::Wood, meaning: "杜门" },
    Palace { name: "中宫", position: 5, element: Element::Earth, meaning: "中央" },
    Palace { name: "巽宫", position: 4, element: Element::Wood, meaning: "景门" },
    Palace { name: "离宫", position: 9, element: Element::Fire, meaning: "死门" },
    Palace { name: "坤宫", position: 2, element: Element::Earth, meaning: "惊门" },
    Palace { name: "兑宫", position: 7, element: Element::Metal, meaning: "开门" },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalaceReading {
    #[serde(flatten)]
    pub palace: Palace,
    pub time_bonus: f64,
    pub recommendation: &'static str,
}

/// Palace bonus for an hour; exactly one position in nine lights up.
#[must_use]
pub const fn palace_time_bonus(hour: u32, position: u32) -> f64 {
    if (hour / 2 + position) % PALACE_COUNT == 0 {
        PALACE_LUCKY_BONUS
    } else {
        PALACE_PLAIN_BONUS
    }
}

#[must_use]
pub fn palace_recommendation(time_bonus: f64) -> &'static str {
    if time_bonus > 1.2 {
        "大吉"
    } else if time_bonus > 1.0 {
        "吉"
    } else {
        "平"
    }
}

/// All nine palaces in their fixed order.
#[must_use]
pub fn qimen(at: NaiveDateTime) -> Vec<PalaceReading> {
    PALACES
        .iter()
        .map(|palace| {
            let time_bonus = palace_time_bonus(at.hour(), palace.position);
            PalaceReading {
                palace: *palace,
                time_bonus,
                recommendation: palace_recommendation(time_bonus),
            }
        })
        .collect()
}

//! Skin draw odds for the character and weapon reward ladders.
//!
//! Only probabilities are computed here; nothing is ever rolled.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{CalendarFacets, TIME_SLOTS, TimeSlot};
use crate::constants::{
    ADVICE_BEFORE_GUARANTEED, ADVICE_ONE_DRAW_LUCK, ADVICE_PREMIUM_S, BEST_SLOT_MIN_COMPAT,
    CHARACTER_BASE_RED_RATE, CHARACTER_DRAW_COSTS, CHARACTER_EXCELLENT_LUCK,
    CHARACTER_GOOD_BONUS, CHARACTER_VERY_GOOD_LUCK, COMPAT_NEUTRAL, DRAW_RATE_CAP_FACTOR,
    PREMIUM_S_EXCELLENT, PREMIUM_S_GOOD, PREMIUM_S_VERY_GOOD, WEAPON_EXCELLENT_CATEGORY_RATE,
    WEAPON_PREMIUM_CATEGORY_RATE,
};
use crate::element::{BonusTier, Element, compatibility, mean_compatibility};
use crate::numbers::as_percent;

const FALLBACK_SLOT_NAME: &str = "当前时辰";
const FALLBACK_SLOT_RANGE: &str = "随时可抽";

/// Configuration for the character-skin ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDrawCfg {
    pub name: String,
    /// Cost of each draw; the last draw is the guaranteed one.
    pub draw_costs: Vec<u32>,
    pub base_red_probability: f64,
    pub element: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    S,
    A,
    B,
    C,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCfg {
    pub grade: QualityGrade,
    pub name: String,
    pub probability: f64,
    pub element: Element,
}

/// Configuration for the weapon-skin ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDrawCfg {
    pub name: String,
    pub premium_category_rate: f64,
    pub excellent_category_rate: f64,
    pub qualities: Vec<QualityCfg>,
}

/// Complete draw system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinDrawConfig {
    pub character: CharacterDrawCfg,
    pub weapon: WeaponDrawCfg,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("draw config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("character ladder needs at least one draw cost")]
    EmptyDrawCosts,
    #[error("{field} must be within (0, 1] (got {value:.4})")]
    ProbabilityOutOfRange { field: String, value: f64 },
    #[error("{field} can be raised to {adjusted:.4}, above certainty")]
    RateExceedsCap { field: String, adjusted: f64 },
    #[error("weapon ladder is missing quality {0:?}")]
    MissingQuality(QualityGrade),
}

impl Default for SkinDrawConfig {
    fn default() -> Self {
        let quality = |grade, name: &str, probability, element| QualityCfg {
            grade,
            name: name.to_string(),
            probability,
            element,
        };
        Self {
            character: CharacterDrawCfg {
                name: "人物红皮".to_string(),
                draw_costs: CHARACTER_DRAW_COSTS.to_vec(),
                base_red_probability: CHARACTER_BASE_RED_RATE,
                element: Element::Fire,
            },
            weapon: WeaponDrawCfg {
                name: "曼德尔砖枪皮".to_string(),
                premium_category_rate: WEAPON_PREMIUM_CATEGORY_RATE,
                excellent_category_rate: WEAPON_EXCELLENT_CATEGORY_RATE,
                qualities: vec![
                    quality(QualityGrade::S, "S级", 0.05, Element::Metal),
                    quality(QualityGrade::A, "A级", 0.15, Element::Wood),
                    quality(QualityGrade::B, "B级", 0.30, Element::Water),
                    quality(QualityGrade::C, "C级", 0.50, Element::Earth),
                ],
            },
        }
    }
}

impl SkinDrawConfig {
    /// Load draw configuration from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or if validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate ladder completeness and probability ranges
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.character.draw_costs.is_empty() {
            return Err(ConfigError::EmptyDrawCosts);
        }
        check_boostable("character.base_red_probability", self.character.base_red_probability)?;
        check_probability(
            "weapon.premium_category_rate",
            self.weapon.premium_category_rate,
        )?;
        check_probability(
            "weapon.excellent_category_rate",
            self.weapon.excellent_category_rate,
        )?;
        for quality in &self.weapon.qualities {
            check_boostable(&format!("weapon.qualities.{:?}", quality.grade), quality.probability)?;
        }
        if self.weapon.quality(QualityGrade::S).is_none() {
            return Err(ConfigError::MissingQuality(QualityGrade::S));
        }
        Ok(())
    }
}

impl WeaponDrawCfg {
    #[must_use]
    pub fn quality(&self, grade: QualityGrade) -> Option<&QualityCfg> {
        self.qualities.iter().find(|q| q.grade == grade)
    }
}

fn check_probability(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

/// A base rate that stays a probability at the bonus cap.
fn check_boostable(field: &str, value: f64) -> Result<(), ConfigError> {
    check_probability(field, value)?;
    let adjusted = value * DRAW_RATE_CAP_FACTOR;
    if adjusted > 1.0 {
        return Err(ConfigError::RateExceedsCap {
            field: field.to_string(),
            adjusted,
        });
    }
    Ok(())
}

/// Bonus-adjusted rate, never above twice the base rate nor above 1.
#[must_use]
pub fn adjusted_rate(base: f64, bonus: f64) -> f64 {
    (base * bonus).min(base * DRAW_RATE_CAP_FACTOR).min(1.0)
}

/// One rung of the character ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawStep {
    pub draw: usize,
    pub cost: u32,
    pub cumulative_cost: u32,
    pub probability: f64,
    pub guaranteed: bool,
}

/// Probability of first success at each draw, with the last draw guaranteed.
#[must_use]
pub fn character_ladder(rate: f64, costs: &[u32]) -> Vec<DrawStep> {
    let mut steps = Vec::with_capacity(costs.len());
    let mut cumulative_fail = 1.0;
    let mut cumulative_cost = 0_u32;
    let last = costs.len().saturating_sub(1);
    for (index, &cost) in costs.iter().enumerate() {
        cumulative_cost = cumulative_cost.saturating_add(cost);
        let guaranteed = index == last;
        let probability = if guaranteed {
            cumulative_fail
        } else {
            rate * cumulative_fail
        };
        steps.push(DrawStep {
            draw: index + 1,
            cost,
            cumulative_cost,
            probability,
            guaranteed,
        });
        if !guaranteed {
            cumulative_fail *= 1.0 - rate;
        }
    }
    steps
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawTier {
    #[serde(rename = "极佳")]
    Excellent,
    #[serde(rename = "很好")]
    VeryGood,
    #[serde(rename = "不错")]
    Good,
    #[serde(rename = "一般")]
    Ordinary,
}

impl DrawTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "极佳",
            Self::VeryGood => "很好",
            Self::Good => "不错",
            Self::Ordinary => "一般",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawRecommendation {
    pub tier: DrawTier,
    pub advice: &'static str,
}

#[must_use]
pub fn character_recommendation(bonus: f64, one_draw_luck: f64) -> DrawRecommendation {
    let (tier, advice) = if one_draw_luck >= CHARACTER_EXCELLENT_LUCK {
        (DrawTier::Excellent, "一发入魂概率极高！")
    } else if one_draw_luck >= CHARACTER_VERY_GOOD_LUCK {
        (DrawTier::VeryGood, "红皮概率大幅提升！")
    } else if bonus >= CHARACTER_GOOD_BONUS {
        (DrawTier::Good, "运势不错，可以尝试！")
    } else {
        (DrawTier::Ordinary, "建议等待更好时机！")
    };
    DrawRecommendation { tier, advice }
}

#[must_use]
pub fn weapon_recommendation(premium_s_rate: f64) -> DrawRecommendation {
    let (tier, advice) = if premium_s_rate >= PREMIUM_S_EXCELLENT {
        (DrawTier::Excellent, "极品S概率爆表！")
    } else if premium_s_rate >= PREMIUM_S_VERY_GOOD {
        (DrawTier::VeryGood, "极品S概率提升！")
    } else if premium_s_rate >= PREMIUM_S_GOOD {
        (DrawTier::Good, "有机会出极品！")
    } else {
        (DrawTier::Ordinary, "平常心对待！")
    };
    DrawRecommendation { tier, advice }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSkinFortune {
    pub name: String,
    pub base_rate: f64,
    pub adjusted_rate: f64,
    pub bonus: f64,
    pub one_draw_luck: f64,
    pub before_guaranteed: f64,
    pub ladder: Vec<DrawStep>,
    pub recommendation: DrawRecommendation,
}

#[must_use]
pub fn character_skin_fortune(
    cfg: &CharacterDrawCfg,
    entity: Element,
    day: Element,
    slot: Element,
) -> CharacterSkinFortune {
    let bonus = mean_compatibility([entity, day, slot], cfg.element);
    let rate = adjusted_rate(cfg.base_red_probability, bonus);
    let ladder = character_ladder(rate, &cfg.draw_costs);
    let residual = ladder
        .last()
        .filter(|step| step.guaranteed)
        .map_or(1.0, |step| step.probability);
    CharacterSkinFortune {
        name: cfg.name.clone(),
        base_rate: cfg.base_red_probability,
        adjusted_rate: rate,
        bonus,
        one_draw_luck: rate,
        before_guaranteed: 1.0 - residual,
        ladder,
        recommendation: character_recommendation(bonus, rate),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityFortune {
    pub grade: QualityGrade,
    pub name: String,
    pub element: Element,
    pub base_rate: f64,
    pub bonus: f64,
    pub adjusted_rate: f64,
    pub tier: BonusTier,
    pub fortune: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSkinFortune {
    pub name: String,
    pub qualities: Vec<QualityFortune>,
    /// S quality and premium category as independent events.
    pub premium_s_rate: f64,
    pub excellent_s_rate: f64,
    pub recommendation: DrawRecommendation,
}

impl WeaponSkinFortune {
    #[must_use]
    pub fn quality(&self, grade: QualityGrade) -> Option<&QualityFortune> {
        self.qualities.iter().find(|q| q.grade == grade)
    }
}

#[must_use]
pub fn weapon_skin_fortune(
    cfg: &WeaponDrawCfg,
    entity: Element,
    day: Element,
    slot: Element,
) -> WeaponSkinFortune {
    let qualities: Vec<QualityFortune> = cfg
        .qualities
        .iter()
        .map(|quality| {
            let bonus = mean_compatibility([entity, day, slot], quality.element);
            let tier = BonusTier::from_bonus(bonus);
            QualityFortune {
                grade: quality.grade,
                name: quality.name.clone(),
                element: quality.element,
                base_rate: quality.probability,
                bonus,
                adjusted_rate: adjusted_rate(quality.probability, bonus),
                tier,
                fortune: tier.fortune_label(),
            }
        })
        .collect();
    let s_rate = qualities
        .iter()
        .find(|q| q.grade == QualityGrade::S)
        .map_or(0.0, |s| s.adjusted_rate);
    let premium_s_rate = s_rate * cfg.premium_category_rate;
    WeaponSkinFortune {
        name: cfg.name.clone(),
        qualities,
        premium_s_rate,
        excellent_s_rate: s_rate * cfg.excellent_category_rate,
        recommendation: weapon_recommendation(premium_s_rate),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawSlot {
    pub name: &'static str,
    pub range: &'static str,
    pub bonus: f64,
}

impl From<(&'static TimeSlot, f64)> for DrawSlot {
    fn from((slot, bonus): (&'static TimeSlot, f64)) -> Self {
        Self {
            name: slot.label,
            range: slot.range,
            bonus,
        }
    }
}

/// Time slots that favor `entity`, or a single "any time" entry.
#[must_use]
pub fn best_draw_slots(entity: Element) -> Vec<DrawSlot> {
    let slots: Vec<DrawSlot> = TIME_SLOTS
        .iter()
        .map(|slot| (slot, compatibility(entity, slot.element)))
        .filter(|(_, bonus)| *bonus >= BEST_SLOT_MIN_COMPAT)
        .map(DrawSlot::from)
        .collect();
    if slots.is_empty() {
        vec![DrawSlot {
            name: FALLBACK_SLOT_NAME,
            range: FALLBACK_SLOT_RANGE,
            bonus: COMPAT_NEUTRAL,
        }]
    } else {
        slots
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinFortune {
    pub character: CharacterSkinFortune,
    pub weapon: WeaponSkinFortune,
    pub best_slots: Vec<DrawSlot>,
    pub day_element: Element,
    pub time_slot: &'static str,
    pub advice: Vec<String>,
}

#[must_use]
pub fn skin_fortune(cfg: &SkinDrawConfig, entity: Element, facets: &CalendarFacets) -> SkinFortune {
    let day = facets.day_element();
    let slot = facets.slot_element();
    let character = character_skin_fortune(&cfg.character, entity, day, slot);
    let weapon = weapon_skin_fortune(&cfg.weapon, entity, day, slot);
    let advice = skin_advice(&character, &weapon);
    SkinFortune {
        character,
        weapon,
        best_slots: best_draw_slots(entity),
        day_element: day,
        time_slot: facets.time_slot.label,
        advice,
    }
}

/// Additive draw advice; exactly one generic line when nothing stands out.
#[must_use]
pub fn skin_advice(character: &CharacterSkinFortune, weapon: &WeaponSkinFortune) -> Vec<String> {
    let mut advice = Vec::new();
    if character.one_draw_luck >= ADVICE_ONE_DRAW_LUCK {
        advice.push("🔥 人物红皮一发入魂概率很高，强烈推荐！".to_string());
    }
    if weapon.premium_s_rate >= ADVICE_PREMIUM_S {
        advice.push("⚡ 枪皮极品S概率提升，值得一试！".to_string());
    }
    if character.before_guaranteed >= ADVICE_BEFORE_GUARANTEED {
        advice.push("💎 保底前出红皮概率很高！".to_string());
    }
    if advice.is_empty() {
        advice.push("🌟 今日运势平稳，建议积累研究券等待更好时机！".to_string());
    }
    advice
}

/// Percentage string used in advice lines, one decimal place.
#[must_use]
pub fn percent_label(probability: f64) -> String {
    format!("{:.1}%", as_percent(probability))
}

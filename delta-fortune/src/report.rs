//! Daily fortune aggregation.
//!
//! A report derives the calendar facets once, runs every scorer against them
//! and then narrows the result to the requested analysis category. Daily
//! advice is always built from the full set of scorers.
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarFacets;
use crate::constants::{
    ADVICE_CLASH_LUCK, ADVICE_HARMONY_LUCK, ADVICE_ONE_DRAW_LUCK, ADVICE_PREMIUM_S,
};
use crate::containers::{ContainerFortune, container_fortune};
use crate::data::Operator;
use crate::divination::{PalaceReading, PlumBlossomReading, plum_blossom, qimen};
use crate::draw::{SkinFortune, percent_label, skin_fortune};
use crate::element::{Element, compatibility};
use crate::wealth::{WealthAnalysis, wealth_analysis};
use crate::zones::{MapAnalysis, RankedZones, analyze_maps, rank_zones};
use crate::{FortuneContext, FortuneError};

/// Which slice of the report a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
    #[default]
    Comprehensive,
    Qimen,
    PlumBlossom,
    SkinFortune,
    WealthAnalysis,
}

impl AnalysisCategory {
    pub const ALL: [Self; 5] = [
        Self::Comprehensive,
        Self::Qimen,
        Self::PlumBlossom,
        Self::SkinFortune,
        Self::WealthAnalysis,
    ];

    /// Parse a category key; anything unrecognized is comprehensive.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == key.trim())
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Qimen => "qimen",
            Self::PlumBlossom => "plum_blossom",
            Self::SkinFortune => "skin_fortune",
            Self::WealthAnalysis => "wealth_analysis",
        }
    }
}

/// Every scorer's output for one operator and moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveAnalysis {
    pub maps: Vec<MapAnalysis>,
    pub best_zones: RankedZones,
    pub worst_zones: RankedZones,
    pub containers: ContainerFortune,
    pub skin: SkinFortune,
    pub wealth: WealthAnalysis,
    pub qimen: Vec<PalaceReading>,
    pub plum_blossom: PlumBlossomReading,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryAnalysis {
    Comprehensive(Box<ComprehensiveAnalysis>),
    Qimen(Vec<PalaceReading>),
    PlumBlossom(PlumBlossomReading),
    SkinFortune(Box<SkinFortune>),
    WealthAnalysis(WealthAnalysis),
}

impl CategoryAnalysis {
    fn narrow(full: ComprehensiveAnalysis, category: AnalysisCategory) -> Self {
        match category {
            AnalysisCategory::Comprehensive => Self::Comprehensive(Box::new(full)),
            AnalysisCategory::Qimen => Self::Qimen(full.qimen),
            AnalysisCategory::PlumBlossom => Self::PlumBlossom(full.plum_blossom),
            AnalysisCategory::SkinFortune => Self::SkinFortune(Box::new(full.skin)),
            AnalysisCategory::WealthAnalysis => Self::WealthAnalysis(full.wealth),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FortuneReport {
    pub operator: Operator,
    pub category: AnalysisCategory,
    pub facets: CalendarFacets,
    /// Stem-branch day element against the operator's element.
    pub overall_luck: f64,
    pub daily_advice: Vec<String>,
    pub analysis: CategoryAnalysis,
}

impl FortuneReport {
    #[must_use]
    pub fn comprehensive(&self) -> Option<&ComprehensiveAnalysis> {
        match &self.analysis {
            CategoryAnalysis::Comprehensive(full) => Some(full.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn skin(&self) -> Option<&SkinFortune> {
        match &self.analysis {
            CategoryAnalysis::Comprehensive(full) => Some(&full.skin),
            CategoryAnalysis::SkinFortune(skin) => Some(skin.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn wealth(&self) -> Option<&WealthAnalysis> {
        match &self.analysis {
            CategoryAnalysis::Comprehensive(full) => Some(&full.wealth),
            CategoryAnalysis::WealthAnalysis(wealth) => Some(wealth),
            _ => None,
        }
    }

    #[must_use]
    pub fn qimen(&self) -> Option<&[PalaceReading]> {
        match &self.analysis {
            CategoryAnalysis::Comprehensive(full) => Some(full.qimen.as_slice()),
            CategoryAnalysis::Qimen(palaces) => Some(palaces.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn plum_blossom(&self) -> Option<&PlumBlossomReading> {
        match &self.analysis {
            CategoryAnalysis::Comprehensive(full) => Some(&full.plum_blossom),
            CategoryAnalysis::PlumBlossom(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Build the full daily report for `codename` at `at`.
///
/// # Errors
///
/// Returns [`FortuneError::EntityNotFound`] when no operator has `codename`.
pub fn build_report(
    ctx: &FortuneContext<'_>,
    codename: &str,
    category: AnalysisCategory,
    at: NaiveDateTime,
) -> Result<FortuneReport, FortuneError> {
    let operator = ctx
        .data
        .operator(codename)
        .ok_or_else(|| FortuneError::EntityNotFound {
            codename: codename.to_string(),
        })?;
    let entity = operator.element;
    let facets = CalendarFacets::derive(at);
    debug!(
        "building {} report for {codename} ({entity}) on {} {}",
        category.key(),
        facets.stem_branch.day,
        facets.time_slot.label
    );

    let maps = analyze_maps(entity, &facets, &ctx.data.maps);
    let ranking = rank_zones(&maps);
    let full = ComprehensiveAnalysis {
        containers: container_fortune(entity, &facets, &ctx.data.containers.containers),
        skin: skin_fortune(ctx.draw, entity, &facets),
        wealth: wealth_analysis(entity, &facets),
        qimen: qimen(at),
        plum_blossom: plum_blossom(entity, at),
        best_zones: ranking.best,
        worst_zones: ranking.worst,
        maps,
    };

    let overall_luck = compatibility(facets.day_element(), entity);
    let daily_advice = daily_advice(
        operator,
        facets.day_element(),
        overall_luck,
        &full.skin,
        &full.wealth,
    );

    Ok(FortuneReport {
        operator: operator.clone(),
        category,
        facets,
        overall_luck,
        daily_advice,
        analysis: CategoryAnalysis::narrow(full, category),
    })
}

/// Additive advice lines in a fixed order.
#[must_use]
pub fn daily_advice(
    operator: &Operator,
    day: Element,
    overall_luck: f64,
    skin: &SkinFortune,
    wealth: &WealthAnalysis,
) -> Vec<String> {
    let codename = &operator.codename;
    let element = operator.element;
    let mut advice = Vec::new();

    if overall_luck >= ADVICE_HARMONY_LUCK {
        advice.push(format!("🌟 今日{day}气旺盛，与{codename}({element})相合，运势极佳！"));
    } else if overall_luck <= ADVICE_CLASH_LUCK {
        advice.push(format!("⚠️ 今日{day}气与{codename}({element})相冲，需谨慎行动。"));
    } else {
        advice.push("📊 今日运势平稳，适合正常作战。".to_string());
    }

    if skin.character.one_draw_luck >= ADVICE_ONE_DRAW_LUCK {
        advice.push(format!(
            "🎨 人物红皮运势极佳，一发入魂概率{}！",
            percent_label(skin.character.one_draw_luck)
        ));
    }
    if skin.weapon.premium_s_rate >= ADVICE_PREMIUM_S {
        advice.push(format!(
            "⚔️ 枪皮极品S运势提升，概率{}！",
            percent_label(skin.weapon.premium_s_rate)
        ));
    }

    advice.push(format!(
        "💰 今日财位在{}方，宜寻找{}属性装备。",
        wealth.wealth.primary, wealth.wealth.element
    ));
    advice.push(format!(
        "🎭 喜神方位在{}方，此方向行动多有贵人相助。",
        wealth.joy.position
    ));
    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_keys_fall_back_to_comprehensive() {
        assert_eq!(AnalysisCategory::from_key("qimen"), AnalysisCategory::Qimen);
        assert_eq!(
            AnalysisCategory::from_key(" wealth_analysis "),
            AnalysisCategory::WealthAnalysis
        );
        assert_eq!(
            AnalysisCategory::from_key("tarot"),
            AnalysisCategory::Comprehensive
        );
        assert_eq!(AnalysisCategory::from_key(""), AnalysisCategory::Comprehensive);
    }

    #[test]
    fn category_keys_roundtrip_through_serde() {
        for category in AnalysisCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }
}

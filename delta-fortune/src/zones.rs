//! Map-zone loot scoring and the global zone ranking.
use serde::Serialize;
use smallvec::SmallVec;

use crate::calendar::CalendarFacets;
use crate::constants::{
    ZONE_GREAT_BONUS, ZONE_LADDER, ZONE_MINOR_BONUS, ZONE_NEUTRAL_BONUS, ZONE_RANK_LEN,
    ZONE_SAFE_DANGER,
};
use crate::data::{MapCatalog, MapZone};
use crate::element::{Element, compatibility};

pub type RankedZones = SmallVec<[ZoneScore; ZONE_RANK_LEN]>;

/// Eight-step fortune ladder for a zone's final bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneTier {
    Supreme,
    Great,
    Good,
    Neutral,
    Risky,
    Bad,
    VeryBad,
    ExtremeRisk,
}

impl ZoneTier {
    const LADDER: [Self; 7] = [
        Self::Supreme,
        Self::Great,
        Self::Good,
        Self::Neutral,
        Self::Risky,
        Self::Bad,
        Self::VeryBad,
    ];

    #[must_use]
    pub fn from_bonus(bonus: f64) -> Self {
        Self::LADDER
            .into_iter()
            .zip(ZONE_LADDER)
            .find(|(_, min)| bonus >= *min)
            .map_or(Self::ExtremeRisk, |(tier, _)| tier)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Supreme => "极吉",
            Self::Great => "大吉",
            Self::Good => "吉",
            Self::Neutral => "平",
            Self::Risky => "带险",
            Self::Bad => "凶",
            Self::VeryBad => "大凶",
            Self::ExtremeRisk => "极险",
        }
    }
}

/// Coarse go / no-go call that also weighs zone danger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRecommendation {
    Great,
    GreatButRisky,
    MinorLuck,
    Neutral,
    Unlucky,
}

impl ZoneRecommendation {
    #[must_use]
    pub fn assess(final_bonus: f64, danger: u8) -> Self {
        let safe = danger <= ZONE_SAFE_DANGER;
        if final_bonus >= ZONE_GREAT_BONUS {
            if safe { Self::Great } else { Self::GreatButRisky }
        } else if final_bonus >= ZONE_MINOR_BONUS {
            if safe { Self::MinorLuck } else { Self::Neutral }
        } else if final_bonus >= ZONE_NEUTRAL_BONUS {
            Self::Neutral
        } else {
            Self::Unlucky
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Great => "大吉",
            Self::GreatButRisky => "吉中带险",
            Self::MinorLuck => "小吉",
            Self::Neutral => "平",
            Self::Unlucky => "凶",
        }
    }
}

/// Four-factor product. Unlike containers, factors multiply.
#[must_use]
pub fn zone_bonus(
    loot_bonus: f64,
    entity: Element,
    zone: Element,
    day: Element,
    slot: Element,
) -> f64 {
    loot_bonus * compatibility(entity, zone) * compatibility(day, entity) * compatibility(slot, zone)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneScore {
    pub map: String,
    pub zone: String,
    pub element: Element,
    pub direction: String,
    pub danger: u8,
    pub meaning: String,
    pub source_fortune: String,
    pub loot_bonus: f64,
    pub final_bonus: f64,
    pub tier: ZoneTier,
    pub fortune: &'static str,
    pub recommendation: ZoneRecommendation,
    pub advice: &'static str,
}

#[must_use]
pub fn score_zone(
    map: &str,
    zone: &MapZone,
    entity: Element,
    day: Element,
    slot: Element,
) -> ZoneScore {
    let final_bonus = zone_bonus(zone.loot_bonus, entity, zone.element, day, slot);
    let tier = ZoneTier::from_bonus(final_bonus);
    let recommendation = ZoneRecommendation::assess(final_bonus, zone.danger);
    ZoneScore {
        map: map.to_string(),
        zone: zone.name.clone(),
        element: zone.element,
        direction: zone.direction.clone(),
        danger: zone.danger,
        meaning: zone.meaning.clone(),
        source_fortune: zone.fortune.clone(),
        loot_bonus: zone.loot_bonus,
        final_bonus,
        tier,
        fortune: tier.label(),
        recommendation,
        advice: recommendation.label(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapAnalysis {
    pub name: String,
    pub zones: Vec<ZoneScore>,
}

/// Score every zone of every map against the stem-branch day element.
#[must_use]
pub fn analyze_maps(entity: Element, facets: &CalendarFacets, maps: &MapCatalog) -> Vec<MapAnalysis> {
    let day = facets.day_element();
    let slot = facets.slot_element();
    maps.maps
        .iter()
        .map(|map| MapAnalysis {
            name: map.name.clone(),
            zones: map
                .zones
                .iter()
                .map(|zone| score_zone(&map.name, zone, entity, day, slot))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ZoneRanking {
    pub best: RankedZones,
    pub worst: RankedZones,
}

/// Global best and worst zones across all maps. Both orders are stable, so
/// ties keep map then zone order.
#[must_use]
pub fn rank_zones(analyses: &[MapAnalysis]) -> ZoneRanking {
    let mut all: Vec<&ZoneScore> = analyses.iter().flat_map(|map| map.zones.iter()).collect();
    all.sort_by(|a, b| b.final_bonus.total_cmp(&a.final_bonus));
    let best = all.iter().take(ZONE_RANK_LEN).map(|z| (*z).clone()).collect();
    all.sort_by(|a, b| a.final_bonus.total_cmp(&b.final_bonus));
    let worst = all.iter().take(ZONE_RANK_LEN).map(|z| (*z).clone()).collect();
    ZoneRanking { best, worst }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;
    use crate::containers::score_container;
    use crate::data::{Container, GameMap};

    fn zone(name: &str, element: Element, loot_bonus: f64, danger: u8) -> MapZone {
        MapZone {
            name: name.to_string(),
            element,
            direction: String::new(),
            loot_bonus,
            danger,
            meaning: String::new(),
            fortune: String::new(),
        }
    }

    #[test]
    fn destroying_day_yields_documented_product() {
        let bonus = zone_bonus(2.0, Element::Wood, Element::Fire, Element::Metal, Element::Wood);
        assert!((bonus - 2.366).abs() < FLOAT_EPSILON);
        assert_eq!(ZoneTier::from_bonus(bonus), ZoneTier::Supreme);
    }

    #[test]
    fn fire_day_over_wood_is_neutral_factor() {
        let bonus = zone_bonus(2.0, Element::Wood, Element::Fire, Element::Fire, Element::Wood);
        assert!((bonus - 2.0 * 1.3 * 1.0 * 1.3).abs() < FLOAT_EPSILON);
        assert_eq!(ZoneTier::from_bonus(bonus), ZoneTier::Supreme);
    }

    #[test]
    fn zones_multiply_where_containers_average() {
        let (entity, day, slot) = (Element::Wood, Element::Water, Element::Wood);
        let zone_score = score_zone("m", &zone("离", Element::Fire, 1.0, 1), entity, day, slot);
        let container = Container {
            name: "c".to_string(),
            element: Element::Fire,
            base_drop_rate: 1.0,
        };
        let container_score = score_container(&container, entity, day, slot);
        // (1.3, 0.7, 1.3) against a Fire target.
        assert!((container_score.total_bonus - 3.3 / 3.0).abs() < FLOAT_EPSILON);
        assert!((zone_score.final_bonus - 1.3 * 1.3 * 1.3).abs() < FLOAT_EPSILON);
        assert!((zone_score.final_bonus - container_score.total_bonus).abs() > 0.1);
    }

    #[test]
    fn ladder_boundaries_are_inclusive() {
        assert_eq!(ZoneTier::from_bonus(2.0), ZoneTier::Supreme);
        assert_eq!(ZoneTier::from_bonus(1.5), ZoneTier::Great);
        assert_eq!(ZoneTier::from_bonus(1.2), ZoneTier::Good);
        assert_eq!(ZoneTier::from_bonus(0.8), ZoneTier::Neutral);
        assert_eq!(ZoneTier::from_bonus(0.6), ZoneTier::Risky);
        assert_eq!(ZoneTier::from_bonus(0.4), ZoneTier::Bad);
        assert_eq!(ZoneTier::from_bonus(0.2), ZoneTier::VeryBad);
        assert_eq!(ZoneTier::from_bonus(0.1), ZoneTier::ExtremeRisk);
        assert_eq!(ZoneTier::ExtremeRisk.label(), "极险");
    }

    #[test]
    fn recommendation_weighs_danger() {
        assert_eq!(ZoneRecommendation::assess(1.4, 3), ZoneRecommendation::Great);
        assert_eq!(ZoneRecommendation::assess(1.4, 4), ZoneRecommendation::GreatButRisky);
        assert_eq!(ZoneRecommendation::assess(1.15, 2), ZoneRecommendation::MinorLuck);
        assert_eq!(ZoneRecommendation::assess(1.15, 5), ZoneRecommendation::Neutral);
        assert_eq!(ZoneRecommendation::assess(0.95, 1), ZoneRecommendation::Neutral);
        assert_eq!(ZoneRecommendation::assess(0.5, 1), ZoneRecommendation::Unlucky);
        assert_eq!(ZoneRecommendation::GreatButRisky.label(), "吉中带险");
    }

    #[test]
    fn ranking_is_global_and_stable_on_ties() {
        let maps = MapCatalog {
            maps: vec![
                GameMap {
                    name: "A".to_string(),
                    zones: vec![
                        zone("a1", Element::Earth, 1.0, 1),
                        zone("a2", Element::Earth, 1.0, 1),
                    ],
                },
                GameMap {
                    name: "B".to_string(),
                    zones: vec![
                        zone("b1", Element::Earth, 3.0, 1),
                        zone("b2", Element::Earth, 1.0, 1),
                        zone("b3", Element::Earth, 0.1, 1),
                    ],
                },
            ],
        };
        let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        let facets = CalendarFacets::derive(at);
        let analyses = analyze_maps(Element::Earth, &facets, &maps);
        let ranking = rank_zones(&analyses);
        let best: Vec<_> = ranking.best.iter().map(|z| z.zone.as_str()).collect();
        let worst: Vec<_> = ranking.worst.iter().map(|z| z.zone.as_str()).collect();
        assert_eq!(best, vec!["b1", "a1", "a2"]);
        assert_eq!(worst, vec!["b3", "a1", "a2"]);
    }
}

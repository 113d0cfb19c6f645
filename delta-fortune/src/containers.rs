//! Container drop-rate scoring.
use serde::Serialize;
use smallvec::SmallVec;

use crate::calendar::CalendarFacets;
use crate::constants::{CONTAINER_ADVICE_MIN_BONUS, CONTAINER_RANK_LEN};
use crate::data::Container;
use crate::element::{BonusTier, Element, compatibility, mean_compatibility};
use crate::numbers::as_percent;

pub type RankedContainers = SmallVec<[ContainerScore; CONTAINER_RANK_LEN]>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerScore {
    pub name: String,
    pub element: Element,
    pub base_drop_rate: f64,
    pub entity_bonus: f64,
    pub day_bonus: f64,
    pub slot_bonus: f64,
    /// Mean of the three factors above.
    pub total_bonus: f64,
    pub final_drop_rate: f64,
    pub tier: BonusTier,
    pub rating: &'static str,
    pub advice: &'static str,
}

const fn tier_advice(tier: BonusTier) -> &'static str {
    match tier {
        BonusTier::Excellent => "强烈推荐！",
        BonusTier::Good => "推荐使用！",
        BonusTier::Decent => "可以尝试！",
        BonusTier::Average => "普通运势！",
        BonusTier::Poor => "不建议使用！",
    }
}

#[must_use]
pub fn score_container(
    container: &Container,
    entity: Element,
    day: Element,
    slot: Element,
) -> ContainerScore {
    let total_bonus = mean_compatibility([entity, day, slot], container.element);
    let tier = BonusTier::from_bonus(total_bonus);
    ContainerScore {
        name: container.name.clone(),
        element: container.element,
        base_drop_rate: container.base_drop_rate,
        entity_bonus: compatibility(entity, container.element),
        day_bonus: compatibility(day, container.element),
        slot_bonus: compatibility(slot, container.element),
        total_bonus,
        final_drop_rate: container.base_drop_rate * total_bonus,
        tier,
        rating: tier.rating_label(),
        advice: tier_advice(tier),
    }
}

/// Per-container scores in input order, against the ordinal day element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerAnalysis {
    pub day_element: Element,
    pub slot_element: Element,
    pub scores: Vec<ContainerScore>,
}

#[must_use]
pub fn analyze_containers(
    entity: Element,
    facets: &CalendarFacets,
    containers: &[Container],
) -> ContainerAnalysis {
    let day = facets.cycle_day_element;
    let slot = facets.slot_element();
    ContainerAnalysis {
        day_element: day,
        slot_element: slot,
        scores: containers
            .iter()
            .map(|container| score_container(container, entity, day, slot))
            .collect(),
    }
}

/// Best containers by final drop rate; ties keep input order.
#[must_use]
pub fn rank_containers(scores: &[ContainerScore]) -> RankedContainers {
    let mut ranked: Vec<&ContainerScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.final_drop_rate.total_cmp(&a.final_drop_rate));
    ranked
        .into_iter()
        .take(CONTAINER_RANK_LEN)
        .cloned()
        .collect()
}

/// Top containers for `entity`, reusing `precomputed` when the caller
/// already ran the analysis for the same moment.
#[must_use]
pub fn recommend_containers(
    entity: Element,
    facets: &CalendarFacets,
    containers: &[Container],
    precomputed: Option<&ContainerAnalysis>,
) -> RankedContainers {
    match precomputed {
        Some(analysis) => rank_containers(&analysis.scores),
        None => rank_containers(&analyze_containers(entity, facets, containers).scores),
    }
}

/// One line for the leading container when its bonus clears the gate.
#[must_use]
pub fn container_advice(ranked: &[ContainerScore]) -> Vec<String> {
    ranked
        .first()
        .filter(|top| top.total_bonus > CONTAINER_ADVICE_MIN_BONUS)
        .map(|top| {
            format!(
                "今日最佳容器：{}，出货率提升{:.1}%。",
                top.name,
                as_percent(top.final_drop_rate - 1.0)
            )
        })
        .into_iter()
        .collect()
}

/// Analysis, ranking and advice bundled for a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerFortune {
    pub analysis: ContainerAnalysis,
    pub recommended: RankedContainers,
    pub advice: Vec<String>,
}

#[must_use]
pub fn container_fortune(
    entity: Element,
    facets: &CalendarFacets,
    containers: &[Container],
) -> ContainerFortune {
    let analysis = analyze_containers(entity, facets, containers);
    let recommended = recommend_containers(entity, facets, containers, Some(&analysis));
    let advice = container_advice(&recommended);
    ContainerFortune {
        analysis,
        recommended,
        advice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;
    use chrono::NaiveDate;

    fn container(name: &str, element: Element, base_drop_rate: f64) -> Container {
        Container {
            name: name.to_string(),
            element,
            base_drop_rate,
        }
    }

    fn facets() -> CalendarFacets {
        // Ordinal 1 -> Fire day, 12:30 -> 午时 (Fire).
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        CalendarFacets::derive(at)
    }

    #[test]
    fn score_averages_three_factors() {
        let score = score_container(
            &container("保险箱", Element::Fire, 1.0),
            Element::Wood,
            Element::Fire,
            Element::Wood,
        );
        let expected = (1.3 + 1.1 + 1.3) / 3.0;
        assert!((score.total_bonus - expected).abs() < FLOAT_EPSILON);
        assert!((score.final_drop_rate - expected).abs() < FLOAT_EPSILON);
        assert_eq!(score.tier, BonusTier::Good);
        assert_eq!(score.rating, "很好");
    }

    #[test]
    fn analysis_uses_ordinal_day_element() {
        let analysis = analyze_containers(
            Element::Wood,
            &facets(),
            &[container("医疗包", Element::Earth, 1.0)],
        );
        assert_eq!(analysis.day_element, Element::Fire);
        assert_eq!(analysis.slot_element, Element::Fire);
        let score = &analysis.scores[0];
        assert!((score.entity_bonus - 0.7).abs() < FLOAT_EPSILON);
        assert!((score.day_bonus - 1.3).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let containers = vec![
            container("甲", Element::Metal, 1.0),
            container("乙", Element::Metal, 1.0),
            container("丙", Element::Earth, 2.0),
            container("丁", Element::Metal, 1.0),
        ];
        let analysis = analyze_containers(Element::Metal, &facets(), &containers);
        let ranked = rank_containers(&analysis.scores);
        let names: Vec<_> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["丙", "甲", "乙"]);
    }

    #[test]
    fn precomputed_and_fresh_paths_agree() {
        let containers = vec![
            container("保险箱", Element::Metal, 1.2),
            container("武器箱", Element::Wood, 1.0),
            container("医疗包", Element::Earth, 0.9),
            container("工具箱", Element::Fire, 1.1),
        ];
        let facets = facets();
        let analysis = analyze_containers(Element::Water, &facets, &containers);
        assert_eq!(
            recommend_containers(Element::Water, &facets, &containers, Some(&analysis)),
            recommend_containers(Element::Water, &facets, &containers, None)
        );
    }

    #[test]
    fn advice_only_for_strong_leader() {
        let strong = score_container(
            &container("工具箱", Element::Earth, 1.0),
            Element::Fire,
            Element::Fire,
            Element::Fire,
        );
        let advice = container_advice(std::slice::from_ref(&strong));
        assert_eq!(advice, vec!["今日最佳容器：工具箱，出货率提升30.0%。".to_string()]);

        let weak = score_container(
            &container("鸟窝", Element::Earth, 1.0),
            Element::Earth,
            Element::Earth,
            Element::Earth,
        );
        assert!(container_advice(&[weak]).is_empty());
        assert!(container_advice(&[]).is_empty());
    }
}

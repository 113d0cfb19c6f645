//! Wealth and joy direction lookups.
use serde::Serialize;

use crate::calendar::CalendarFacets;
use crate::constants::JOY_TIME_BONUS;
use crate::element::{Element, ElementInteraction};

const DEFAULT_JOY_POSITION: &str = "中宫";

// Indexed by stem: 甲乙丙丁戊己庚辛壬癸.
const JOY_POSITIONS: [&str; 10] = ["艮", "乾", "坤", "兑", "坤", "离", "艮", "乾", "离", "坎"];

/// Primary and secondary wealth directions for an entity element.
#[must_use]
pub const fn wealth_directions(entity: Element) -> (&'static str, &'static str) {
    match entity {
        Element::Wood => ("西南", "西北"),
        Element::Fire => ("西北", "西"),
        Element::Earth => ("北", "东北"),
        Element::Metal => ("东", "东南"),
        Element::Water => ("南", "西南"),
    }
}

/// Joy position for the day stem at `stem_index`.
#[must_use]
pub fn joy_position(stem_index: usize) -> &'static str {
    JOY_POSITIONS
        .get(stem_index)
        .copied()
        .unwrap_or(DEFAULT_JOY_POSITION)
}

/// Joy bonus does not vary with the slot or direction.
#[must_use]
pub const fn joy_time_bonus(_slot: Element, _position: &str) -> f64 {
    JOY_TIME_BONUS
}

#[must_use]
pub const fn slot_wealth_advice(interaction: ElementInteraction) -> &'static str {
    match interaction {
        ElementInteraction::FirstGeneratesSecond => "时辰生财位，财运亨通，宜积极行动。",
        ElementInteraction::SecondGeneratesFirst => "财位生时辰，需要付出努力，但收获可期。",
        ElementInteraction::FirstDestroysSecond => "时辰克财位，需谨慎理财，避免损失。",
        ElementInteraction::SecondDestroysFirst => "财位克时辰，财运较弱，宜保守行事。",
        ElementInteraction::Neutral => "时辰与财位五行平和，按部就班即可。",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthPosition {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub element: Element,
    pub description: String,
    pub time_advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoyPosition {
    pub position: &'static str,
    pub description: String,
    pub time_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthAnalysis {
    pub wealth: WealthPosition,
    pub joy: JoyPosition,
}

#[must_use]
pub fn wealth_analysis(entity: Element, facets: &CalendarFacets) -> WealthAnalysis {
    let (primary, secondary) = wealth_directions(entity);
    let wealth_element = entity.destroys();
    let slot = facets.time_slot;
    let day = facets.stem_branch.day;
    let position = joy_position(day.stem_index);

    let description = format!(
        "今日{day}，{entity}命干员财位在{primary}方。此方位五行属{wealth_element}，\
         宜寻找{wealth_element}属性装备和容器。财位宜静不宜动，宜放置贵重物品，忌污秽杂乱。"
    );
    let time_advice = format!(
        "当前{}({})，时辰五行属{}，{}",
        slot.label,
        slot.range,
        slot.element,
        slot_wealth_advice(ElementInteraction::between(slot.element, wealth_element))
    );

    WealthAnalysis {
        wealth: WealthPosition {
            primary,
            secondary,
            element: wealth_element,
            description,
            time_advice,
        },
        joy: JoyPosition {
            position,
            description: format!(
                "喜神方位在{position}方，此方位行动多有贵人相助，宜在此方向进行重要决策和行动。\
                 喜神临门，万事如意，是今日最吉利的方位。"
            ),
            time_bonus: joy_time_bonus(slot.element, position),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn wealth_element_is_what_the_entity_destroys() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let facets = CalendarFacets::derive(at);
        let analysis = wealth_analysis(Element::Wood, &facets);
        assert_eq!(analysis.wealth.primary, "西南");
        assert_eq!(analysis.wealth.secondary, "西北");
        assert_eq!(analysis.wealth.element, Element::Earth);
        assert!(analysis.wealth.description.starts_with("今日甲午，木命干员财位在西南方。"));
        // 午时 is Fire, which generates Earth.
        assert_eq!(
            analysis.wealth.time_advice,
            "当前午时(11:00-13:00)，时辰五行属火，时辰生财位，财运亨通，宜积极行动。"
        );
        assert_eq!(analysis.joy.position, "艮");
        assert!((analysis.joy.time_bonus - 1.1).abs() < f64::EPSILON);
    }

    #[test]
    fn joy_positions_cover_every_stem_with_default() {
        assert_eq!(joy_position(0), "艮");
        assert_eq!(joy_position(5), "离");
        assert_eq!(joy_position(9), "坎");
        assert_eq!(joy_position(10), "中宫");
    }

    #[test]
    fn slot_advice_follows_interaction_order() {
        assert_eq!(
            slot_wealth_advice(ElementInteraction::between(Element::Water, Element::Fire)),
            "时辰克财位，需谨慎理财，避免损失。"
        );
        assert_eq!(
            slot_wealth_advice(ElementInteraction::between(Element::Earth, Element::Earth)),
            "时辰与财位五行平和，按部就班即可。"
        );
    }
}

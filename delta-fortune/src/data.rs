//! Reference data: operators, map zones and containers.
//!
//! Keyed JSON objects are read through `serde_json::Map`, which preserves file
//! order, so rankings that break ties by input order stay deterministic.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DataLoader;
use crate::element::Element;

const BUNDLED_OPERATORS: &str = include_str!("../../static/assets/data/operators_data.json");
const BUNDLED_MAPS: &str = include_str!("../../static/assets/data/enhanced_map_zones.json");
const BUNDLED_CONTAINERS: &str = include_str!("../../static/assets/data/containers_data.json");

/// A playable operator and the element that drives every score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub codename: String,
    pub element: Element,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OperatorRoster {
    pub operators: Vec<Operator>,
}

impl OperatorRoster {
    /// Load the roster from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into operators.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, codename: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.codename == codename)
    }
}

/// A trigram zone within a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapZone {
    #[serde(default)]
    pub name: String,
    pub element: Element,
    #[serde(default)]
    pub direction: String,
    #[serde(default = "default_loot_bonus")]
    pub loot_bonus: f64,
    #[serde(default)]
    pub danger: u8,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub fortune: String,
}

const fn default_loot_bonus() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameMap {
    pub name: String,
    pub zones: Vec<MapZone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct MapCatalog {
    pub maps: Vec<GameMap>,
}

#[derive(Deserialize)]
struct RawMap {
    #[serde(default)]
    bagua: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawMapCatalog {
    maps: Map<String, Value>,
}

impl MapCatalog {
    /// Load maps from the `{"maps": {name: {"bagua": {zone: ...}}}}` layout
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into maps and zones.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawMapCatalog = serde_json::from_str(json)?;
        let mut maps = Vec::with_capacity(raw.maps.len());
        for (map_name, map_value) in ordered_entries::<RawMap>(raw.maps)? {
            let mut zones = Vec::with_capacity(map_value.bagua.len());
            for (zone_name, mut zone) in ordered_entries::<MapZone>(map_value.bagua)? {
                zone.name = zone_name;
                zones.push(zone);
            }
            maps.push(GameMap {
                name: map_name,
                zones,
            });
        }
        Ok(Self { maps })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GameMap> {
        self.maps.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.maps.iter().map(|m| m.zones.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub element: Element,
    pub base_drop_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ContainerCatalog {
    pub containers: Vec<Container>,
}

#[derive(Deserialize)]
struct RawContainerCatalog {
    containers: Map<String, Value>,
}

impl ContainerCatalog {
    /// Load containers from the `{"containers": {key: ...}}` layout
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into containers.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawContainerCatalog = serde_json::from_str(json)?;
        let containers = ordered_entries::<Container>(raw.containers)?
            .into_iter()
            .map(|(_, container)| container)
            .collect();
        Ok(Self { containers })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.name == name)
    }
}

fn ordered_entries<T: DeserializeOwned>(
    map: Map<String, Value>,
) -> Result<Vec<(String, T)>, serde_json::Error> {
    map.into_iter()
        .map(|(key, value)| serde_json::from_value(value).map(|parsed| (key, parsed)))
        .collect()
}

/// Everything the scorers read. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ReferenceData {
    pub operators: OperatorRoster,
    pub maps: MapCatalog,
    pub containers: ContainerCatalog,
}

impl ReferenceData {
    #[must_use]
    pub const fn new(
        operators: OperatorRoster,
        maps: MapCatalog,
        containers: ContainerCatalog,
    ) -> Self {
        Self {
            operators,
            maps,
            containers,
        }
    }

    /// Parse all three reference documents
    ///
    /// # Errors
    ///
    /// Returns the first parse error encountered.
    pub fn from_json_parts(
        operators: &str,
        maps: &str,
        containers: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            OperatorRoster::from_json(operators)?,
            MapCatalog::from_json(maps)?,
            ContainerCatalog::from_json(containers)?,
        ))
    }

    /// Reference data shipped with the crate
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled document fails to parse.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json_parts(BUNDLED_OPERATORS, BUNDLED_MAPS, BUNDLED_CONTAINERS)
    }

    #[must_use]
    pub fn operator(&self, codename: &str) -> Option<&Operator> {
        self.operators.get(codename)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.operators.is_empty()
            && self.maps.maps.is_empty()
            && self.containers.containers.is_empty()
    }
}

/// Loader over the reference files compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLoader;

impl DataLoader for BundledLoader {
    type Error = serde_json::Error;

    fn load_operators(&self) -> Result<OperatorRoster, Self::Error> {
        OperatorRoster::from_json(BUNDLED_OPERATORS)
    }

    fn load_maps(&self) -> Result<MapCatalog, Self::Error> {
        MapCatalog::from_json(BUNDLED_MAPS)
    }

    fn load_containers(&self) -> Result<ContainerCatalog, Self::Error> {
        ContainerCatalog::from_json(BUNDLED_CONTAINERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_zones_keep_file_order_and_names() {
        let json = r#"{
            "maps": {
                "零号大坝": {
                    "bagua": {
                        "离": {"element": "火", "direction": "南", "lootBonus": 1.4, "danger": 4, "meaning": "m", "fortune": "吉"},
                        "坎": {"element": "水", "direction": "北", "lootBonus": 0.9, "danger": 2, "meaning": "m", "fortune": "平"},
                        "乾": {"element": "金", "direction": "西北", "lootBonus": 1.1, "danger": 3, "meaning": "m", "fortune": "吉"}
                    }
                },
                "长弓溪谷": { "bagua": {} }
            }
        }"#;

        let catalog = MapCatalog::from_json(json).unwrap();
        assert_eq!(catalog.maps.len(), 2);
        assert_eq!(catalog.maps[0].name, "零号大坝");
        let names: Vec<_> = catalog.maps[0].zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["离", "坎", "乾"]);
        assert_eq!(catalog.maps[0].zones[0].element, Element::Fire);
        assert!((catalog.maps[0].zones[0].loot_bonus - 1.4).abs() < f64::EPSILON);
        assert_eq!(catalog.zone_count(), 3);
    }

    #[test]
    fn containers_and_operators_parse() {
        let containers = ContainerCatalog::from_json(
            r#"{"containers": {
                "safe": {"name": "保险箱", "element": "金", "baseDropRate": 0.8},
                "crate": {"name": "武器箱", "element": "木", "baseDropRate": 1.0}
            }}"#,
        )
        .unwrap();
        assert_eq!(containers.containers[0].name, "保险箱");
        assert!(containers.get("武器箱").is_some());

        let roster =
            OperatorRoster::from_json(r#"{"operators": [{"codename": "威龙", "element": "火"}]}"#)
                .unwrap();
        assert_eq!(roster.get("威龙").map(|op| op.element), Some(Element::Fire));
        assert!(roster.get("nobody").is_none());
    }

    #[test]
    fn bundled_data_is_populated() {
        let data = ReferenceData::bundled().unwrap();
        assert!(!data.is_empty());
        assert!(!data.operators.operators.is_empty());
        assert_eq!(data.maps.maps.len(), 4);
        assert_eq!(data.maps.zone_count(), 32);
        assert_eq!(data.maps.maps[0].zones[0].name, "乾");
        assert!(!data.containers.containers.is_empty());
    }
}

//! Area — the geography a query is scoped to.
//!
//! The dashboard API publishes different death metrics depending on area
//! granularity: local authorities only carry the by-publish-date pair,
//! nations the 28-days-of-positive-test pair. The mapping is a fixed
//! table keyed on granularity, not a guess.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four UK nations, named as the upstream API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nation {
    England,
    Scotland,
    Wales,
    NorthernIreland,
}

impl Nation {
    /// Canonical upstream name, used as the `areaName` filter value.
    pub fn name(&self) -> &'static str {
        match self {
            Nation::England => "england",
            Nation::Scotland => "scotland",
            Nation::Wales => "wales",
            Nation::NorthernIreland => "northernIreland",
        }
    }

    /// All four nations, in display order.
    pub fn all() -> [Nation; 4] {
        [
            Nation::England,
            Nation::Scotland,
            Nation::Wales,
            Nation::NorthernIreland,
        ]
    }
}

impl FromStr for Nation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "england" => Ok(Nation::England),
            "scotland" => Ok(Nation::Scotland),
            "wales" => Ok(Nation::Wales),
            "northernireland" | "northern-ireland" => Ok(Nation::NorthernIreland),
            other => Err(format!("unknown nation '{other}'")),
        }
    }
}

impl fmt::Display for Nation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The geography a query is scoped to: a whole nation or a single
/// local authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Area {
    Nation(Nation),
    Region(String),
}

/// Upstream field names for the new/cumulative death metrics at one
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathsFieldKeys {
    pub new_deaths: &'static str,
    pub total_deaths: &'static str,
}

impl Area {
    /// The `areaName` filter value.
    pub fn area_name(&self) -> &str {
        match self {
            Area::Nation(nation) => nation.name(),
            Area::Region(name) => name,
        }
    }

    /// True only for local-authority areas.
    pub fn is_regional(&self) -> bool {
        matches!(self, Area::Region(_))
    }

    /// The `areaType` filter value: `ltla` for regions, `nation` otherwise.
    pub fn area_type(&self) -> &'static str {
        if self.is_regional() {
            "ltla"
        } else {
            "nation"
        }
    }

    /// Death-metric field names valid for this granularity.
    pub fn deaths_field_keys(&self) -> DeathsFieldKeys {
        if self.is_regional() {
            DeathsFieldKeys {
                new_deaths: "newDeathsByPublishDate",
                total_deaths: "cumDeathsByPublishDate",
            }
        } else {
            DeathsFieldKeys {
                new_deaths: "newDeaths28DaysByPublishDate",
                total_deaths: "cumDeaths28DaysByPublishDate",
            }
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.area_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_regional_with_its_own_name() {
        let area = Area::Region("Camden".to_string());
        assert_eq!(area.area_name(), "Camden");
        assert!(area.is_regional());
        assert_eq!(area.area_type(), "ltla");
    }

    #[test]
    fn nation_is_not_regional() {
        let area = Area::Nation(Nation::England);
        assert_eq!(area.area_name(), "england");
        assert!(!area.is_regional());
        assert_eq!(area.area_type(), "nation");
    }

    #[test]
    fn regional_deaths_keys_are_publish_date_pair() {
        let keys = Area::Region("Camden".to_string()).deaths_field_keys();
        assert_eq!(keys.new_deaths, "newDeathsByPublishDate");
        assert_eq!(keys.total_deaths, "cumDeathsByPublishDate");
    }

    #[test]
    fn national_deaths_keys_are_28_day_pair() {
        let keys = Area::Nation(Nation::England).deaths_field_keys();
        assert_eq!(keys.new_deaths, "newDeaths28DaysByPublishDate");
        assert_eq!(keys.total_deaths, "cumDeaths28DaysByPublishDate");
    }

    #[test]
    fn nation_names_match_upstream() {
        assert_eq!(Nation::NorthernIreland.name(), "northernIreland");
        assert_eq!(Nation::Wales.name(), "wales");
    }

    #[test]
    fn nation_parses_case_insensitively() {
        assert_eq!("England".parse::<Nation>().unwrap(), Nation::England);
        assert_eq!(
            "northernIreland".parse::<Nation>().unwrap(),
            Nation::NorthernIreland
        );
        assert!("mars".parse::<Nation>().is_err());
    }
}

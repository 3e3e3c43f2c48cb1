//! Name/ID lookups over the static reference tables.
//!
//! Exact-match only; a missing key is a typed error, never an empty result.

use thiserror::Error;

use crate::sde::StaticData;

/// A lookup key that does not exist in the loaded tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown type id {0}")]
    UnknownTypeId(i32),

    #[error("unknown type name '{0}'")]
    UnknownTypeName(String),

    #[error("unknown group id {0}")]
    UnknownGroupId(i32),

    #[error("unknown region id {0}")]
    UnknownRegionId(i32),

    #[error("unknown region name '{0}'")]
    UnknownRegionName(String),

    #[error("unknown solar system id {0}")]
    UnknownSystemId(i32),

    #[error("unknown solar system name '{0}'")]
    UnknownSystemName(String),
}

impl StaticData {
    pub fn type_name(&self, type_id: i32) -> Result<&str, LookupError> {
        self.type_by_id
            .get(&type_id)
            .map(|&idx| self.types[idx].type_name.as_str())
            .ok_or(LookupError::UnknownTypeId(type_id))
    }

    pub fn type_id(&self, type_name: &str) -> Result<i32, LookupError> {
        self.type_by_name
            .get(type_name)
            .map(|&idx| self.types[idx].type_id)
            .ok_or_else(|| LookupError::UnknownTypeName(type_name.to_string()))
    }

    pub fn group_id(&self, type_id: i32) -> Result<i32, LookupError> {
        self.type_by_id
            .get(&type_id)
            .map(|&idx| self.types[idx].group_id)
            .ok_or(LookupError::UnknownTypeId(type_id))
    }

    /// Every type id belonging to a group, in dump order.
    pub fn types_in_group(&self, group_id: i32) -> Result<Vec<i32>, LookupError> {
        self.types_by_group
            .get(&group_id)
            .map(|indices| indices.iter().map(|&idx| self.types[idx].type_id).collect())
            .ok_or(LookupError::UnknownGroupId(group_id))
    }

    pub fn region_name(&self, region_id: i32) -> Result<&str, LookupError> {
        self.region_by_id
            .get(&region_id)
            .map(|&idx| self.regions[idx].region_name.as_str())
            .ok_or(LookupError::UnknownRegionId(region_id))
    }

    pub fn region_id(&self, region_name: &str) -> Result<i32, LookupError> {
        self.region_by_name
            .get(region_name)
            .map(|&idx| self.regions[idx].region_id)
            .ok_or_else(|| LookupError::UnknownRegionName(region_name.to_string()))
    }

    pub fn system_name(&self, system_id: i32) -> Result<&str, LookupError> {
        self.system_by_id
            .get(&system_id)
            .map(|&idx| self.systems[idx].solar_system_name.as_str())
            .ok_or(LookupError::UnknownSystemId(system_id))
    }

    pub fn system_id(&self, system_name: &str) -> Result<i32, LookupError> {
        self.system_by_name
            .get(system_name)
            .map(|&idx| self.systems[idx].solar_system_id)
            .ok_or_else(|| LookupError::UnknownSystemName(system_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::sde::{InvType, Region, SolarSystem, StaticData};

    use super::*;

    fn sample() -> StaticData {
        StaticData::from_rows(
            vec![
                InvType {
                    type_id: 34,
                    group_id: 18,
                    type_name: "Tritanium".to_string(),
                },
                InvType {
                    type_id: 36,
                    group_id: 18,
                    type_name: "Mexallon".to_string(),
                },
                InvType {
                    type_id: 587,
                    group_id: 25,
                    type_name: "Rifter".to_string(),
                },
            ],
            vec![
                Region {
                    region_id: 10000002,
                    region_name: "The Forge".to_string(),
                },
                Region {
                    region_id: 10000043,
                    region_name: "Domain".to_string(),
                },
            ],
            vec![SolarSystem {
                region_id: 10000002,
                solar_system_id: 30000142,
                solar_system_name: "Jita".to_string(),
                security: 0.9459,
            }],
        )
    }

    #[test]
    fn test_type_lookups_round_trip() {
        let sde = sample();
        assert_eq!(sde.type_name(34).unwrap(), "Tritanium");
        assert_eq!(sde.type_id("Tritanium").unwrap(), 34);
        assert_eq!(sde.group_id(587).unwrap(), 25);
        assert_eq!(sde.types_in_group(18).unwrap(), vec![34, 36]);
    }

    #[test]
    fn test_region_and_system_lookups() {
        let sde = sample();
        assert_eq!(sde.region_name(10000043).unwrap(), "Domain");
        assert_eq!(sde.region_id("The Forge").unwrap(), 10000002);
        assert_eq!(sde.system_name(30000142).unwrap(), "Jita");
        assert_eq!(sde.system_id("Jita").unwrap(), 30000142);
    }

    #[test]
    fn test_unknown_keys_are_typed_errors() {
        let sde = sample();
        assert_eq!(sde.type_name(999), Err(LookupError::UnknownTypeId(999)));
        assert_eq!(
            sde.type_id("Veldspar"),
            Err(LookupError::UnknownTypeName("Veldspar".to_string()))
        );
        assert_eq!(sde.types_in_group(1), Err(LookupError::UnknownGroupId(1)));
        assert_eq!(
            sde.region_id("Delve"),
            Err(LookupError::UnknownRegionName("Delve".to_string()))
        );
        assert_eq!(sde.system_name(1), Err(LookupError::UnknownSystemId(1)));
    }
}

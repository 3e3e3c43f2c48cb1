//! Integration tests for the static data cache: write dump-shaped CSV files
//! to a cache directory, load them, and run lookups against the result.

use std::fs;

use esi_market::{LookupError, StaticData};
use tempfile::TempDir;

/// Dump-shaped fixtures carrying the extra columns the loader ignores.
fn write_fixture_dumps(dir: &TempDir) {
    fs::write(
        dir.path().join("invTypes.csv"),
        "typeID,groupID,typeName,description,mass,volume\n\
         34,18,Tritanium,\"The most common ore type, refines to this\",0.0,0.01\n\
         35,18,Pyerite,,0.0,0.01\n\
         587,25,Rifter,\"Fast, cheap frigate\",1067000.0,27289.0\n",
    )
    .unwrap();

    fs::write(
        dir.path().join("mapRegions.csv"),
        "regionID,regionName,x,y,z,factionID\n\
         10000002,The Forge,-9.6e16,6.4e16,-1.1e17,500001\n\
         10000030,Heimatar,-6.9e16,3.5e16,3.9e16,500002\n",
    )
    .unwrap();

    fs::write(
        dir.path().join("mapSolarSystems.csv"),
        "regionID,constellationID,solarSystemID,solarSystemName,x,y,z,security\n\
         10000002,20000020,30000142,Jita,-1.2e17,6.1e16,1.2e17,0.945913116664839\n\
         10000030,20000302,30002510,Rens,-8.9e16,4.0e16,2.5e16,0.9002\n",
    )
    .unwrap();
}

#[test]
fn loads_cached_dumps_and_resolves_lookups() {
    let dir = TempDir::new().unwrap();
    write_fixture_dumps(&dir);

    let sde = StaticData::load_from_dir(dir.path()).unwrap();

    assert_eq!(sde.types().len(), 3);
    assert_eq!(sde.regions().len(), 2);
    assert_eq!(sde.systems().len(), 2);

    assert_eq!(sde.type_name(34).unwrap(), "Tritanium");
    assert_eq!(sde.type_id("Rifter").unwrap(), 587);
    assert_eq!(sde.group_id(35).unwrap(), 18);
    assert_eq!(sde.types_in_group(18).unwrap(), vec![34, 35]);
    assert_eq!(sde.region_name(10000030).unwrap(), "Heimatar");
    assert_eq!(sde.region_id("The Forge").unwrap(), 10000002);
    assert_eq!(sde.system_name(30002510).unwrap(), "Rens");
    assert_eq!(sde.system_id("Jita").unwrap(), 30000142);
}

#[test]
fn quoted_names_with_commas_survive_the_round_trip() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("invTypes.csv"),
        "typeID,groupID,typeName\n\
         2048,60,\"Damage Control II, Prototype\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("mapRegions.csv"), "regionID,regionName\n").unwrap();
    fs::write(
        dir.path().join("mapSolarSystems.csv"),
        "regionID,solarSystemID,solarSystemName,security\n",
    )
    .unwrap();

    let sde = StaticData::load_from_dir(dir.path()).unwrap();
    assert_eq!(sde.type_name(2048).unwrap(), "Damage Control II, Prototype");
}

#[test]
fn missing_dump_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(StaticData::load_from_dir(dir.path()).is_err());
}

#[test]
fn unknown_keys_fail_with_not_found() {
    let dir = TempDir::new().unwrap();
    write_fixture_dumps(&dir);
    let sde = StaticData::load_from_dir(dir.path()).unwrap();

    assert_eq!(sde.type_name(999), Err(LookupError::UnknownTypeId(999)));
    assert_eq!(
        sde.system_id("Amarr"),
        Err(LookupError::UnknownSystemName("Amarr".to_string()))
    );
}

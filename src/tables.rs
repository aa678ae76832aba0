//! Lookup tables mapping stored ids to display data.
//!
//! Tables are loaded once from a JSON document and then shared read-only. Every
//! table is optional in the document; a missing table simply resolves nothing.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::growth::ExperienceTable;
use crate::pokemon::StatSet;
use crate::types::{GrowthRate, Ribbon, Type};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesEntry {
    pub name: String,
    pub base_stats: StatSet<u8>,
    pub types: Vec<Type>,
    pub growth_rate: GrowthRate,
}

/// A form with its own name, and possibly its own stats and typing.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEntry {
    pub name: String,
    #[serde(default)]
    pub base_stats: Option<StatSet<u8>>,
    #[serde(default)]
    pub types: Option<Vec<Type>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MoveEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: Type,
    /// `None` for status moves and moves with variable power.
    #[serde(default)]
    pub power: Option<u16>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationTables {
    #[serde(default)]
    pub gen5: BTreeMap<u16, String>,
    #[serde(default)]
    pub gen6: BTreeMap<u16, String>,
    /// Met location shown for records transferred up from generations 3 and 4.
    #[serde(default = "default_transfer")]
    pub transfer: String,
    /// Egg location shown for records transferred up from generations 3 and 4.
    #[serde(default = "default_day_care")]
    pub day_care: String,
}

fn default_transfer() -> String {
    "Poké Transfer".to_string()
}

fn default_day_care() -> String {
    "Day-Care Couple".to_string()
}

impl Default for LocationTables {
    fn default() -> Self {
        Self {
            gen5: BTreeMap::new(),
            gen6: BTreeMap::new(),
            transfer: default_transfer(),
            day_care: default_day_care(),
        }
    }
}

/// Which table a memory's text variable is looked up in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryVariable {
    #[default]
    None,
    Location,
    General,
    Species,
    Item,
    Move,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MemoryEntry {
    pub template: String,
    #[serde(default)]
    pub variable: MemoryVariable,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tables {
    pub species: BTreeMap<u16, SpeciesEntry>,
    /// Form overrides keyed by species id, then form id.
    pub forms: BTreeMap<u16, BTreeMap<u8, FormEntry>>,
    pub moves: BTreeMap<u16, MoveEntry>,
    pub abilities: BTreeMap<u8, String>,
    pub items: BTreeMap<u16, String>,
    pub natures: BTreeMap<u8, String>,
    pub balls: BTreeMap<u8, String>,
    pub locations: LocationTables,
    pub encounter_types: BTreeMap<u8, String>,
    pub countries: BTreeMap<u8, String>,
    /// Subregions keyed by country id, then region id.
    pub regions: BTreeMap<u8, BTreeMap<u8, String>>,
    pub console_regions: BTreeMap<u8, String>,
    pub ribbons: BTreeMap<Ribbon, String>,
    /// Super training medals keyed by bit position.
    pub medals: BTreeMap<u8, String>,
    pub training_bags: BTreeMap<u8, String>,
    pub memories: BTreeMap<u8, MemoryEntry>,
    pub feelings: BTreeMap<u8, String>,
    pub intensities: BTreeMap<u8, String>,
    pub general_locations: BTreeMap<u16, String>,
    pub experience: ExperienceTable,
}

impl Tables {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let tables: Tables = serde_json::from_reader(reader)?;
        log::debug!(
            "Loaded tables for {} species, {} moves, {} gen 6 locations",
            tables.species.len(),
            tables.moves.len(),
            tables.locations.gen6.len()
        );
        Ok(tables)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn species(&self, id: u16) -> Option<&SpeciesEntry> {
        self.species.get(&id)
    }

    pub fn form(&self, species_id: u16, form_id: u8) -> Option<&FormEntry> {
        self.forms.get(&species_id)?.get(&form_id)
    }

    pub fn region(&self, country_id: u8, region_id: u8) -> Option<&str> {
        self.regions
            .get(&country_id)?
            .get(&region_id)
            .map(String::as_str)
    }
}

// Tables are shared by reference between decoders.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tables>();
};

//! Display names for the ids stored in a record.

use std::collections::BTreeMap;

use num_traits::FromPrimitive;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::derived::DerivedRecord;
use crate::pokemon::{GeoLocation, Memory, RawRecord};
use crate::tables::{MemoryVariable, Tables};
use crate::types::{Generation, Language, OriginGame, Type};

/// Which location table a record's met and egg locations are valid in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationSource {
    /// Brought forward from generation 3 or 4; the stored ids only describe the transfer.
    Transferred,
    Gen5,
    Gen6,
}

impl LocationSource {
    pub fn for_game(game: OriginGame) -> Self {
        match game.generation() {
            Generation::Three | Generation::Four => LocationSource::Transferred,
            Generation::Five => LocationSource::Gen5,
            Generation::Six => LocationSource::Gen6,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeoLocationNames {
    pub region_name: Option<String>,
    pub country_name: Option<String>,
}

/// A derived record together with the display names of everything it refers to.
///
/// Each name is serialised next to the fields of the derived record under a
/// `<field>Name` key: `move2Name`, `eggMove1Name`, `geoLocation3CountryName`.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedRecord {
    pub derived: DerivedRecord,
    pub species_name: Option<String>,
    pub form_name: Option<String>,
    pub held_item_name: Option<String>,
    pub ability_name: Option<String>,
    pub nature_name: Option<String>,
    pub ball_name: Option<String>,
    pub move_names: [Option<String>; 4],
    pub move_types: [Option<Type>; 4],
    pub move_powers: [Option<u16>; 4],
    pub egg_move_names: [Option<String>; 4],
    pub training_bag_name: Option<String>,
    pub met_location_name: Option<String>,
    pub egg_location_name: Option<String>,
    pub encounter_type_name: Option<String>,
    pub ot_game_name: Option<String>,
    pub country_name: Option<String>,
    pub region_name: Option<String>,
    pub console_region_name: Option<String>,
    pub language_name: Option<String>,
    pub geo_location_names: [GeoLocationNames; 5],
    pub ribbon_names: Vec<String>,
    pub medal_names: Vec<String>,
    pub ot_memory_text: Option<String>,
    pub not_ot_memory_text: Option<String>,
}

impl Serialize for EnrichedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.derived.serialize_entries(&mut map)?;
        map.serialize_entry("speciesName", &self.species_name)?;
        map.serialize_entry("formName", &self.form_name)?;
        map.serialize_entry("heldItemName", &self.held_item_name)?;
        map.serialize_entry("abilityName", &self.ability_name)?;
        map.serialize_entry("natureName", &self.nature_name)?;
        map.serialize_entry("ballName", &self.ball_name)?;
        for (idx, name) in self.move_names.iter().enumerate() {
            let slot = idx + 1;
            map.serialize_entry(&format!("move{slot}Name"), name)?;
            map.serialize_entry(&format!("move{slot}Type"), &self.move_types[idx])?;
            map.serialize_entry(&format!("move{slot}Power"), &self.move_powers[idx])?;
        }
        for (idx, name) in self.egg_move_names.iter().enumerate() {
            map.serialize_entry(&format!("eggMove{}Name", idx + 1), name)?;
        }
        map.serialize_entry("trainingBagName", &self.training_bag_name)?;
        map.serialize_entry("metLocationName", &self.met_location_name)?;
        map.serialize_entry("eggLocationName", &self.egg_location_name)?;
        map.serialize_entry("encounterTypeName", &self.encounter_type_name)?;
        map.serialize_entry("otGameName", &self.ot_game_name)?;
        map.serialize_entry("countryName", &self.country_name)?;
        map.serialize_entry("regionName", &self.region_name)?;
        map.serialize_entry("consoleRegionName", &self.console_region_name)?;
        map.serialize_entry("languageName", &self.language_name)?;
        for (idx, geo) in self.geo_location_names.iter().enumerate() {
            let slot = idx + 1;
            map.serialize_entry(&format!("geoLocation{slot}RegionName"), &geo.region_name)?;
            map.serialize_entry(&format!("geoLocation{slot}CountryName"), &geo.country_name)?;
        }
        map.serialize_entry("ribbonNames", &self.ribbon_names)?;
        map.serialize_entry("medalNames", &self.medal_names)?;
        map.serialize_entry("otMemoryText", &self.ot_memory_text)?;
        map.serialize_entry("notOtMemoryText", &self.not_ot_memory_text)?;
        map.end()
    }
}

/// Resolves every name a derived record refers to.
pub fn resolve_names(derived: &DerivedRecord, tables: &Tables) -> EnrichedRecord {
    enrich(derived.clone(), tables)
}

pub(crate) fn enrich(derived: DerivedRecord, tables: &Tables) -> EnrichedRecord {
    let raw = &derived.raw;
    log::trace!("Resolving names for species {}", raw.species_id);

    let (met_location_name, egg_location_name) = location_names(raw, tables);

    let moves = raw.move_ids.map(|id| nonzero(id).and_then(|id| tables.moves.get(&id)));
    let move_names = moves.map(|entry| entry.map(|entry| entry.name.clone()));
    let move_types = moves.map(|entry| entry.map(|entry| entry.move_type));
    let move_powers = moves.map(|entry| entry.and_then(|entry| entry.power));
    let egg_move_names = raw.egg_move_ids.map(|id| {
        nonzero(id)
            .and_then(|id| tables.moves.get(&id))
            .map(|entry| entry.name.clone())
    });

    let ribbon_names = derived
        .ribbons()
        .filter_map(|ribbon| {
            let name = tables.ribbons.get(&ribbon).cloned();
            if name.is_none() {
                log::debug!("No name for ribbon {ribbon:?}");
            }
            name
        })
        .collect();
    let medal_names = raw
        .medals
        .iter()
        .filter_map(|bit| tables.medals.get(bit).cloned())
        .collect();

    let ot_memory_text = render_memory(&raw.ot_memory, &raw.ot_name, &raw.nickname, tables);
    let not_ot_memory_text = render_memory(&raw.not_ot_memory, &raw.not_ot_name, &raw.nickname, tables);

    EnrichedRecord {
        species_name: tables.species(raw.species_id).map(|entry| entry.name.clone()),
        form_name: tables
            .form(raw.species_id, raw.form_id)
            .map(|form| form.name.clone()),
        held_item_name: nonzero(raw.held_item_id).and_then(|id| name(&tables.items, id)),
        ability_name: name(&tables.abilities, raw.ability_id),
        nature_name: name(&tables.natures, raw.nature_id),
        ball_name: name(&tables.balls, raw.ball_id),
        move_names,
        move_types,
        move_powers,
        egg_move_names,
        training_bag_name: nonzero(raw.training_bag_id).and_then(|id| name(&tables.training_bags, id)),
        met_location_name,
        egg_location_name,
        encounter_type_name: nonzero(raw.encounter_type_id)
            .and_then(|id| name(&tables.encounter_types, id)),
        ot_game_name: OriginGame::from_u8(raw.ot_game_id).map(|game| game.to_string()),
        country_name: nonzero(raw.country_id).and_then(|id| name(&tables.countries, id)),
        region_name: tables
            .region(raw.country_id, raw.region_id)
            .map(str::to_string),
        console_region_name: name(&tables.console_regions, raw.console_region_id),
        language_name: Language::from_u8(raw.language_id).map(|language| language.to_string()),
        geo_location_names: raw.geo_locations.map(|geo| geo_location_names(&geo, tables)),
        ribbon_names,
        medal_names,
        ot_memory_text,
        not_ot_memory_text,
        derived,
    }
}

fn location_names(raw: &RawRecord, tables: &Tables) -> (Option<String>, Option<String>) {
    let game = match OriginGame::from_u8(raw.ot_game_id) {
        Some(game) => game,
        None => {
            log::debug!("Unknown origin game {}, leaving locations unnamed", raw.ot_game_id);
            return (None, None);
        }
    };

    let source = LocationSource::for_game(game);
    log::debug!("Resolving locations for {game} through {source:?}");
    let table = match source {
        LocationSource::Transferred => {
            return (
                Some(tables.locations.transfer.clone()),
                Some(tables.locations.day_care.clone()),
            )
        }
        LocationSource::Gen5 => &tables.locations.gen5,
        LocationSource::Gen6 => &tables.locations.gen6,
    };

    (
        nonzero(raw.met_location_id).and_then(|id| name(table, id)),
        nonzero(raw.egg_location_id).and_then(|id| name(table, id)),
    )
}

fn geo_location_names(geo: &GeoLocation, tables: &Tables) -> GeoLocationNames {
    GeoLocationNames {
        region_name: tables
            .region(geo.country_id, geo.region_id)
            .map(str::to_string),
        country_name: nonzero(geo.country_id).and_then(|id| name(&tables.countries, id)),
    }
}

fn render_memory(memory: &Memory, trainer: &str, pokemon: &str, tables: &Tables) -> Option<String> {
    let entry = tables.memories.get(&memory.memory_id)?;
    let text_var = memory.text_var;
    let variable = match entry.variable {
        MemoryVariable::None => None,
        MemoryVariable::Location => name(&tables.locations.gen6, text_var),
        MemoryVariable::General => name(&tables.general_locations, text_var),
        MemoryVariable::Species => tables.species(text_var).map(|entry| entry.name.clone()),
        MemoryVariable::Item => name(&tables.items, text_var),
        MemoryVariable::Move => tables.moves.get(&text_var).map(|entry| entry.name.clone()),
    };
    let feeling = name(&tables.feelings, memory.feeling);
    let intensity = name(&tables.intensities, memory.intensity);

    Some(fill_placeholders(&entry.template, |placeholder| match placeholder {
        "pokemon" => Some(pokemon),
        "trainer" => Some(trainer),
        "variable" => Some(variable.as_deref().unwrap_or_default()),
        "feeling" => Some(feeling.as_deref().unwrap_or_default()),
        "intensity" => Some(intensity.as_deref().unwrap_or_default()),
        _ => None,
    }))
}

/// Replaces each `{placeholder}` in one pass. Substituted text is never
/// scanned again, and unknown placeholders are left as written.
fn fill_placeholders<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        text.push_str(&rest[..start]);
        let open = &rest[start..];
        let filled = open
            .find('}')
            .and_then(|end| value(&open[1..end]).map(|value| (end, value)));
        match filled {
            Some((end, value)) => {
                text.push_str(value);
                rest = &open[end + 1..];
            }
            None => {
                text.push('{');
                rest = &open[1..];
            }
        }
    }
    text.push_str(rest);
    text
}

fn name<K: Ord>(table: &BTreeMap<K, String>, id: K) -> Option<String> {
    table.get(&id).cloned()
}

// Zero marks an empty slot for most ids.
fn nonzero<T: Default + PartialEq>(id: T) -> Option<T> {
    if id == T::default() {
        None
    } else {
        Some(id)
    }
}

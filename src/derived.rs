//! Fields computed from a record rather than stored in it.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::pokemon::{RawRecord, StatSet};
use crate::tables::Tables;
use crate::types::{Ribbon, Stat, Type};

const NATURE_COUNT: u8 = 25;
const CONTEST_MEMORY_GOLD: u8 = 40;
const BATTLE_MEMORY_GOLD: u8 = 8;

/// A raw record plus everything computed from it.
///
/// Serialises flat: the raw fields, then one key per derived value, with the
/// stat sextets spread out as `baseStatHp`, `statSpAtk` and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedRecord {
    pub raw: RawRecord,
    pub level: Option<u8>,
    pub exp_from_previous_level: Option<u32>,
    pub exp_to_next_level: Option<u32>,
    pub increased_stat: Option<Stat>,
    pub decreased_stat: Option<Stat>,
    pub base_stats: Option<StatSet<u8>>,
    pub types: Option<Vec<Type>>,
    pub stats: Option<StatSet<u16>>,
    pub hidden_power_type: Type,
    pub hidden_power_power: u8,
    pub tsv: u16,
    pub esv: u16,
    pub is_shiny: bool,
    pub memory_ribbons: Vec<Ribbon>,
}

impl DerivedRecord {
    pub fn new(raw: RawRecord, tables: &Tables) -> Self {
        let species = tables.species(raw.species_id);
        let form = tables.form(raw.species_id, raw.form_id);
        if species.is_none() {
            log::debug!("No species entry for id {}", raw.species_id);
        }

        let progress = species.and_then(|entry| tables.experience.progress(entry.growth_rate, raw.exp));
        let level = progress.map(|progress| progress.level);
        let (increased_stat, decreased_stat) = nature_modifiers(raw.nature_id);

        let base_stats = form
            .and_then(|form| form.base_stats)
            .or_else(|| species.map(|entry| entry.base_stats));
        let types = form
            .and_then(|form| form.types.clone())
            .or_else(|| species.map(|entry| entry.types.clone()));

        let stats = match (base_stats, level) {
            (Some(base), Some(level)) => Some(compute_stats(
                &base,
                &raw.ivs,
                &raw.evs,
                level,
                increased_stat,
                decreased_stat,
            )),
            _ => None,
        };

        let (hidden_power_type, hidden_power_power) = hidden_power(&raw.ivs);
        let tsv = trainer_shiny_value(raw.ot_id, raw.ot_secret_id);
        let esv = encounter_shiny_value(raw.pid);
        let memory_ribbons = memory_ribbons(
            raw.contest_memory_ribbon_count,
            raw.battle_memory_ribbon_count,
        );

        DerivedRecord {
            level,
            exp_from_previous_level: progress.map(|progress| progress.exp_from_previous_level),
            exp_to_next_level: progress.and_then(|progress| progress.exp_to_next_level),
            increased_stat,
            decreased_stat,
            base_stats,
            types,
            stats,
            hidden_power_type,
            hidden_power_power,
            tsv,
            esv,
            is_shiny: tsv == esv,
            memory_ribbons,
            raw,
        }
    }

    /// Flag ribbons followed by any memory ribbons.
    pub fn ribbons(&self) -> impl Iterator<Item = Ribbon> + '_ {
        self.raw
            .ribbons
            .iter()
            .chain(self.memory_ribbons.iter())
            .copied()
    }

    pub(crate) fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        self.raw.serialize_entries(map)?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry("expFromPreviousLevel", &self.exp_from_previous_level)?;
        map.serialize_entry("expToNextLevel", &self.exp_to_next_level)?;
        map.serialize_entry("increasedStat", &self.increased_stat)?;
        map.serialize_entry("decreasedStat", &self.decreased_stat)?;
        serialize_stats(map, "baseStat", self.base_stats.as_ref())?;
        map.serialize_entry("types", &self.types)?;
        serialize_stats(map, "stat", self.stats.as_ref())?;
        map.serialize_entry("hiddenPowerType", &self.hidden_power_type)?;
        map.serialize_entry("hiddenPowerPower", &self.hidden_power_power)?;
        map.serialize_entry("tsv", &self.tsv)?;
        map.serialize_entry("esv", &self.esv)?;
        map.serialize_entry("isShiny", &self.is_shiny)?;
        map.serialize_entry("memoryRibbons", &self.memory_ribbons)
    }
}

impl Serialize for DerivedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}

fn serialize_stats<M: SerializeMap, T: Copy + Serialize>(
    map: &mut M,
    prefix: &str,
    stats: Option<&StatSet<T>>,
) -> Result<(), M::Error> {
    for stat in Stat::STORAGE_ORDER {
        map.serialize_entry(&format!("{prefix}{stat:?}"), &stats.map(|stats| stats.get(stat)))?;
    }
    Ok(())
}

/// The stats raised and lowered by a nature, or neither for neutral natures.
pub fn nature_modifiers(nature_id: u8) -> (Option<Stat>, Option<Stat>) {
    if nature_id >= NATURE_COUNT {
        return (None, None);
    }

    let increased = (nature_id / 5) as usize;
    let decreased = (nature_id % 5) as usize;
    if increased == decreased {
        (None, None)
    } else {
        (
            Some(Stat::NATURE_ORDER[increased]),
            Some(Stat::NATURE_ORDER[decreased]),
        )
    }
}

pub fn compute_stats(
    base: &StatSet<u8>,
    ivs: &StatSet<u8>,
    evs: &StatSet<u8>,
    level: u8,
    increased: Option<Stat>,
    decreased: Option<Stat>,
) -> StatSet<u16> {
    let level = level as u32;
    let core = |stat: Stat| {
        (2 * base.get(stat) as u32 + ivs.get(stat) as u32 + evs.get(stat) as u32 / 4) * level / 100
    };
    let other = |stat: Stat| {
        let value = core(stat) + 5;
        let value = if increased == Some(stat) {
            value * 110 / 100
        } else if decreased == Some(stat) {
            value * 90 / 100
        } else {
            value
        };
        value as u16
    };

    StatSet {
        hp: (core(Stat::Hp) + level + 10) as u16,
        atk: other(Stat::Atk),
        def: other(Stat::Def),
        sp_atk: other(Stat::SpAtk),
        sp_def: other(Stat::SpDef),
        spe: other(Stat::Spe),
    }
}

/// Hidden power type and base power from the low two bits of each IV.
pub fn hidden_power(ivs: &StatSet<u8>) -> (Type, u8) {
    let (low, high) = ivs
        .storage_order()
        .into_iter()
        .enumerate()
        .fold((0u32, 0u32), |(low, high), (idx, iv)| {
            (
                low | (((iv as u32) & 1) << idx),
                high | ((((iv as u32) >> 1) & 1) << idx),
            )
        });

    let hp_type = Type::HIDDEN_POWER[(low * 15 / 63) as usize];
    let power = (high * 40 / 63 + 30) as u8;
    (hp_type, power)
}

pub fn trainer_shiny_value(ot_id: u16, ot_secret_id: u16) -> u16 {
    (ot_id ^ ot_secret_id) >> 4
}

pub fn encounter_shiny_value(pid: u32) -> u16 {
    (((pid >> 16) ^ (pid & 0xffff)) >> 4) as u16
}

pub fn memory_ribbons(contest_count: u8, battle_count: u8) -> Vec<Ribbon> {
    let contest = match contest_count {
        0 => None,
        count if count >= CONTEST_MEMORY_GOLD => Some(Ribbon::ContestMemoryGold),
        _ => Some(Ribbon::ContestMemory),
    };
    let battle = match battle_count {
        0 => None,
        count if count >= BATTLE_MEMORY_GOLD => Some(Ribbon::BattleMemoryGold),
        _ => Some(Ribbon::BattleMemory),
    };
    contest.into_iter().chain(battle).collect()
}

use num_traits::FromPrimitive;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::bits::{BitReader, Field};
use crate::cipher;
use crate::error::Result;
use crate::types::{Ribbon, Stat};

pub const PK6_SIZE_PARTY: usize = 260;
pub const PK6_SIZE_BOX: usize = 232;

/// Byte layout of the canonical (decrypted, unshuffled) record.
pub mod layout {
    use crate::bits::Field;

    pub const ENCRYPTION_CONSTANT: Field = Field::u32("encryptionConstant", 0x00);
    pub const SANITY_PLACEHOLDER: Field = Field::u16("sanityPlaceholder", 0x04);
    pub const CHECKSUM: Field = Field::u16("checksum", 0x06);

    // Block A
    pub const SPECIES: Field = Field::u16("speciesId", 0x08);
    pub const HELD_ITEM: Field = Field::u16("heldItemId", 0x0A);
    pub const OT_ID: Field = Field::u16("otId", 0x0C);
    pub const OT_SECRET_ID: Field = Field::u16("otSecretId", 0x0E);
    pub const EXP: Field = Field::u32("exp", 0x10);
    pub const ABILITY: Field = Field::u8("abilityId", 0x14);
    pub const ABILITY_NUM: Field = Field::u8("abilityNum", 0x15);
    pub const TRAINING_BAG_HITS: Field = Field::u8("trainingBagHits", 0x16);
    pub const TRAINING_BAG: Field = Field::u8("trainingBagId", 0x17);
    pub const PID: Field = Field::u32("pid", 0x18);
    pub const NATURE: Field = Field::u8("natureId", 0x1C);
    pub const FATEFUL_ENCOUNTER: Field = Field::flag("isFatefulEncounter", 0x1D, 0);
    pub const GENDER: Field = Field::bits("gender", 0x1D, 1, 2);
    pub const FORM: Field = Field::bits("formId", 0x1D, 3, 5);
    /// Stored in the order HP, Atk, Def, Spe, SpAtk, SpDef.
    pub const EVS: [Field; 6] = [
        Field::u8("evHp", 0x1E),
        Field::u8("evAtk", 0x1F),
        Field::u8("evDef", 0x20),
        Field::u8("evSpe", 0x21),
        Field::u8("evSpAtk", 0x22),
        Field::u8("evSpDef", 0x23),
    ];
    pub const CONTEST_STATS: [Field; 6] = [
        Field::u8("contestStatCool", 0x24),
        Field::u8("contestStatBeauty", 0x25),
        Field::u8("contestStatCute", 0x26),
        Field::u8("contestStatSmart", 0x27),
        Field::u8("contestStatTough", 0x28),
        Field::u8("contestStatSheen", 0x29),
    ];
    pub const MARKINGS: [Field; 6] = [
        Field::flag("markingCircle", 0x2A, 0),
        Field::flag("markingTriangle", 0x2A, 1),
        Field::flag("markingSquare", 0x2A, 2),
        Field::flag("markingHeart", 0x2A, 3),
        Field::flag("markingStar", 0x2A, 4),
        Field::flag("markingDiamond", 0x2A, 5),
    ];
    pub const POKERUS_DAYS: Field = Field::bits("pokerusDays", 0x2B, 0, 4);
    pub const POKERUS_STRAIN: Field = Field::bits("pokerusStrain", 0x2B, 4, 4);
    pub const MEDALS: Field = Field::set_bits("medals", 0x2C, 4);
    pub const RIBBONS: Field = Field::set_bits("ribbons", 0x30, 6);
    pub const CONTEST_MEMORY_RIBBONS: Field = Field::u8("contestMemoryRibbonCount", 0x38);
    pub const BATTLE_MEMORY_RIBBONS: Field = Field::u8("battleMemoryRibbonCount", 0x39);
    pub const DISTRIBUTION_SUPER_TRAINING: Field =
        Field::u8("distributionSuperTrainingFlags", 0x3A);

    // Block B
    pub const NICKNAME: Field = Field::text("nickname", 0x40, 0x1A);
    pub const MOVES: [Field; 4] = [
        Field::u16("move1Id", 0x5A),
        Field::u16("move2Id", 0x5C),
        Field::u16("move3Id", 0x5E),
        Field::u16("move4Id", 0x60),
    ];
    pub const MOVE_PP: [Field; 4] = [
        Field::u8("move1Pp", 0x62),
        Field::u8("move2Pp", 0x63),
        Field::u8("move3Pp", 0x64),
        Field::u8("move4Pp", 0x65),
    ];
    pub const MOVE_PP_UPS: [Field; 4] = [
        Field::u8("move1PpUps", 0x66),
        Field::u8("move2PpUps", 0x67),
        Field::u8("move3PpUps", 0x68),
        Field::u8("move4PpUps", 0x69),
    ];
    pub const EGG_MOVES: [Field; 4] = [
        Field::u16("eggMove1Id", 0x6A),
        Field::u16("eggMove2Id", 0x6C),
        Field::u16("eggMove3Id", 0x6E),
        Field::u16("eggMove4Id", 0x70),
    ];
    pub const SECRET_SUPER_TRAINING_UNLOCKED: Field =
        Field::flag("secretSuperTrainingUnlocked", 0x72, 0);
    pub const SECRET_SUPER_TRAINING_COMPLETE: Field =
        Field::flag("secretSuperTrainingComplete", 0x72, 1);
    /// Five bits each out of a single u32, in the order HP, Atk, Def, Spe, SpAtk, SpDef.
    pub const IVS: [Field; 6] = [
        Field::bits("ivHp", 0x74, 0, 5),
        Field::bits("ivAtk", 0x74, 5, 5),
        Field::bits("ivDef", 0x74, 10, 5),
        Field::bits("ivSpe", 0x74, 15, 5),
        Field::bits("ivSpAtk", 0x74, 20, 5),
        Field::bits("ivSpDef", 0x74, 25, 5),
    ];
    pub const IS_EGG: Field = Field::flag("isEgg", 0x74, 30);
    pub const IS_NICKNAMED: Field = Field::flag("isNicknamed", 0x74, 31);

    // Block C
    pub const NOT_OT_NAME: Field = Field::text("notOtName", 0x78, 0x1A);
    pub const NOT_OT_GENDER: Field = Field::u8("notOtGender", 0x92);
    pub const CURRENT_HANDLER: Field = Field::u8("currentHandler", 0x93);
    /// Region then country for each of the five most recent locations.
    pub const GEO_LOCATIONS: [(Field, Field); 5] = [
        (Field::u8("geoLocation1RegionId", 0x94), Field::u8("geoLocation1CountryId", 0x95)),
        (Field::u8("geoLocation2RegionId", 0x96), Field::u8("geoLocation2CountryId", 0x97)),
        (Field::u8("geoLocation3RegionId", 0x98), Field::u8("geoLocation3CountryId", 0x99)),
        (Field::u8("geoLocation4RegionId", 0x9A), Field::u8("geoLocation4CountryId", 0x9B)),
        (Field::u8("geoLocation5RegionId", 0x9C), Field::u8("geoLocation5CountryId", 0x9D)),
    ];
    pub const NOT_OT_FRIENDSHIP: Field = Field::u8("notOtFriendship", 0xA2);
    pub const NOT_OT_AFFECTION: Field = Field::u8("notOtAffection", 0xA3);
    pub const NOT_OT_MEMORY_INTENSITY: Field = Field::u8("notOtMemoryIntensity", 0xA4);
    pub const NOT_OT_MEMORY: Field = Field::u8("notOtMemoryId", 0xA5);
    pub const NOT_OT_MEMORY_FEELING: Field = Field::u8("notOtMemoryFeeling", 0xA6);
    pub const NOT_OT_MEMORY_TEXT_VAR: Field = Field::u16("notOtMemoryTextVar", 0xA8);
    pub const FULLNESS: Field = Field::u8("fullness", 0xAE);
    pub const ENJOYMENT: Field = Field::u8("enjoyment", 0xAF);

    // Block D
    pub const OT_NAME: Field = Field::text("otName", 0xB0, 0x1A);
    pub const OT_FRIENDSHIP: Field = Field::u8("otFriendship", 0xCA);
    pub const OT_AFFECTION: Field = Field::u8("otAffection", 0xCB);
    pub const OT_MEMORY_INTENSITY: Field = Field::u8("otMemoryIntensity", 0xCC);
    pub const OT_MEMORY: Field = Field::u8("otMemoryId", 0xCD);
    pub const OT_MEMORY_TEXT_VAR: Field = Field::u16("otMemoryTextVar", 0xCE);
    pub const OT_MEMORY_FEELING: Field = Field::u8("otMemoryFeeling", 0xD0);
    /// Year (since 2000), month and day.
    pub const EGG_DATE: [Field; 3] = [
        Field::u8("eggYear", 0xD1),
        Field::u8("eggMonth", 0xD2),
        Field::u8("eggDay", 0xD3),
    ];
    pub const MET_DATE: [Field; 3] = [
        Field::u8("metYear", 0xD4),
        Field::u8("metMonth", 0xD5),
        Field::u8("metDay", 0xD6),
    ];
    pub const EGG_LOCATION: Field = Field::u16("eggLocationId", 0xD8);
    pub const MET_LOCATION: Field = Field::u16("metLocationId", 0xDA);
    pub const BALL: Field = Field::u8("ballId", 0xDC);
    pub const LEVEL_MET: Field = Field::bits("levelMet", 0xDD, 0, 7);
    pub const OT_GENDER: Field = Field::flag("otGender", 0xDD, 7);
    pub const ENCOUNTER_TYPE: Field = Field::u8("encounterTypeId", 0xDE);
    pub const OT_GAME: Field = Field::u8("otGameId", 0xDF);
    pub const COUNTRY: Field = Field::u8("countryId", 0xE0);
    pub const REGION: Field = Field::u8("regionId", 0xE1);
    pub const CONSOLE_REGION: Field = Field::u8("consoleRegionId", 0xE2);
    pub const LANGUAGE: Field = Field::u8("languageId", 0xE3);

    // Battle state, party records only
    pub const STATUS_CONDITION: Field = Field::u32("statusCondition", 0xE8);
    pub const STAT_LEVEL: Field = Field::u8("partyLevel", 0xEC);
    pub const CURRENT_HP: Field = Field::u16("currentHp", 0xF0);
    /// Stored in the order HP, Atk, Def, Spe, SpAtk, SpDef.
    pub const STATS: [Field; 6] = [
        Field::u16("partyStatHp", 0xF2),
        Field::u16("partyStatAtk", 0xF4),
        Field::u16("partyStatDef", 0xF6),
        Field::u16("partyStatSpe", 0xF8),
        Field::u16("partyStatSpAtk", 0xFA),
        Field::u16("partyStatSpDef", 0xFC),
    ];

    pub const BOX_FIELDS: &[Field] = &[
        ENCRYPTION_CONSTANT,
        SANITY_PLACEHOLDER,
        CHECKSUM,
        SPECIES,
        HELD_ITEM,
        OT_ID,
        OT_SECRET_ID,
        EXP,
        ABILITY,
        ABILITY_NUM,
        TRAINING_BAG_HITS,
        TRAINING_BAG,
        PID,
        NATURE,
        FATEFUL_ENCOUNTER,
        GENDER,
        FORM,
        EVS[0],
        EVS[1],
        EVS[2],
        EVS[3],
        EVS[4],
        EVS[5],
        CONTEST_STATS[0],
        CONTEST_STATS[1],
        CONTEST_STATS[2],
        CONTEST_STATS[3],
        CONTEST_STATS[4],
        CONTEST_STATS[5],
        MARKINGS[0],
        MARKINGS[1],
        MARKINGS[2],
        MARKINGS[3],
        MARKINGS[4],
        MARKINGS[5],
        POKERUS_DAYS,
        POKERUS_STRAIN,
        MEDALS,
        RIBBONS,
        CONTEST_MEMORY_RIBBONS,
        BATTLE_MEMORY_RIBBONS,
        DISTRIBUTION_SUPER_TRAINING,
        NICKNAME,
        MOVES[0],
        MOVES[1],
        MOVES[2],
        MOVES[3],
        MOVE_PP[0],
        MOVE_PP[1],
        MOVE_PP[2],
        MOVE_PP[3],
        MOVE_PP_UPS[0],
        MOVE_PP_UPS[1],
        MOVE_PP_UPS[2],
        MOVE_PP_UPS[3],
        EGG_MOVES[0],
        EGG_MOVES[1],
        EGG_MOVES[2],
        EGG_MOVES[3],
        SECRET_SUPER_TRAINING_UNLOCKED,
        SECRET_SUPER_TRAINING_COMPLETE,
        IVS[0],
        IVS[1],
        IVS[2],
        IVS[3],
        IVS[4],
        IVS[5],
        IS_EGG,
        IS_NICKNAMED,
        NOT_OT_NAME,
        NOT_OT_GENDER,
        CURRENT_HANDLER,
        GEO_LOCATIONS[0].0,
        GEO_LOCATIONS[0].1,
        GEO_LOCATIONS[1].0,
        GEO_LOCATIONS[1].1,
        GEO_LOCATIONS[2].0,
        GEO_LOCATIONS[2].1,
        GEO_LOCATIONS[3].0,
        GEO_LOCATIONS[3].1,
        GEO_LOCATIONS[4].0,
        GEO_LOCATIONS[4].1,
        NOT_OT_FRIENDSHIP,
        NOT_OT_AFFECTION,
        NOT_OT_MEMORY_INTENSITY,
        NOT_OT_MEMORY,
        NOT_OT_MEMORY_FEELING,
        NOT_OT_MEMORY_TEXT_VAR,
        FULLNESS,
        ENJOYMENT,
        OT_NAME,
        OT_FRIENDSHIP,
        OT_AFFECTION,
        OT_MEMORY_INTENSITY,
        OT_MEMORY,
        OT_MEMORY_TEXT_VAR,
        OT_MEMORY_FEELING,
        EGG_DATE[0],
        EGG_DATE[1],
        EGG_DATE[2],
        MET_DATE[0],
        MET_DATE[1],
        MET_DATE[2],
        EGG_LOCATION,
        MET_LOCATION,
        BALL,
        LEVEL_MET,
        OT_GENDER,
        ENCOUNTER_TYPE,
        OT_GAME,
        COUNTRY,
        REGION,
        CONSOLE_REGION,
        LANGUAGE,
    ];

    pub const PARTY_FIELDS: &[Field] = &[
        STATUS_CONDITION,
        STAT_LEVEL,
        CURRENT_HP,
        STATS[0],
        STATS[1],
        STATS[2],
        STATS[3],
        STATS[4],
        STATS[5],
    ];
}

/// One value per stat, in the conventional display order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSet<T> {
    pub hp: T,
    pub atk: T,
    pub def: T,
    pub sp_atk: T,
    pub sp_def: T,
    pub spe: T,
}

impl<T: Copy> StatSet<T> {
    /// Builds a set from the HP, Atk, Def, Spe, SpAtk, SpDef order used in storage.
    pub fn from_storage_order(values: [T; 6]) -> Self {
        let [hp, atk, def, spe, sp_atk, sp_def] = values;
        StatSet {
            hp,
            atk,
            def,
            sp_atk,
            sp_def,
            spe,
        }
    }

    pub fn get(&self, stat: Stat) -> T {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::SpAtk => self.sp_atk,
            Stat::SpDef => self.sp_def,
            Stat::Spe => self.spe,
        }
    }

    pub fn storage_order(&self) -> [T; 6] {
        [self.hp, self.atk, self.def, self.spe, self.sp_atk, self.sp_def]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContestStats {
    pub cool: u8,
    pub beauty: u8,
    pub cute: u8,
    pub smart: u8,
    pub tough: u8,
    pub sheen: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Markings {
    pub circle: bool,
    pub triangle: bool,
    pub square: bool,
    pub heart: bool,
    pub star: bool,
    pub diamond: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub region_id: u8,
    pub country_id: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    pub intensity: u8,
    pub memory_id: u8,
    pub feeling: u8,
    pub text_var: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Dates are stored as years since 2000; an all-zero date means "never".
    fn from_stored(year: u8, month: u8, day: u8) -> Option<Self> {
        if year == 0 && month == 0 && day == 0 {
            None
        } else {
            Some(Date {
                year: 2000 + year as u16,
                month,
                day,
            })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartyStats {
    pub status_condition: u32,
    pub level: u8,
    pub current_hp: u16,
    pub stats: StatSet<u16>,
}

/// Every field stored in a PK6 record, undecorated.
///
/// Serialises as a flat map keyed by the names in [`layout`], plus
/// `checksumValid`. Party fields are only present for party records.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub encryption_constant: u32,
    pub sanity_placeholder: u16,
    pub checksum: u16,
    pub checksum_valid: bool,
    pub species_id: u16,
    pub held_item_id: u16,
    pub ot_id: u16,
    pub ot_secret_id: u16,
    pub exp: u32,
    pub ability_id: u8,
    pub ability_num: u8,
    pub training_bag_hits: u8,
    pub training_bag_id: u8,
    pub pid: u32,
    pub nature_id: u8,
    pub is_fateful_encounter: bool,
    pub gender: u8,
    pub form_id: u8,
    pub evs: StatSet<u8>,
    pub contest_stats: ContestStats,
    pub markings: Markings,
    pub pokerus_strain: u8,
    pub pokerus_days: u8,
    /// Bit positions of the super training medals earned.
    pub medals: Vec<u8>,
    pub ribbons: Vec<Ribbon>,
    pub contest_memory_ribbon_count: u8,
    pub battle_memory_ribbon_count: u8,
    pub distribution_super_training_flags: u8,
    pub nickname: String,
    pub move_ids: [u16; 4],
    pub move_pp: [u8; 4],
    pub move_pp_ups: [u8; 4],
    pub egg_move_ids: [u16; 4],
    pub secret_super_training_unlocked: bool,
    pub secret_super_training_complete: bool,
    pub ivs: StatSet<u8>,
    pub is_egg: bool,
    pub is_nicknamed: bool,
    pub not_ot_name: String,
    pub not_ot_gender: u8,
    pub current_handler: u8,
    pub geo_locations: [GeoLocation; 5],
    pub not_ot_friendship: u8,
    pub not_ot_affection: u8,
    pub not_ot_memory: Memory,
    pub fullness: u8,
    pub enjoyment: u8,
    pub ot_name: String,
    pub ot_friendship: u8,
    pub ot_affection: u8,
    pub ot_memory: Memory,
    pub egg_date: Option<Date>,
    pub met_date: Option<Date>,
    pub egg_location_id: u16,
    pub met_location_id: u16,
    pub ball_id: u8,
    pub level_met: u8,
    pub ot_gender: u8,
    pub encounter_type_id: u8,
    pub ot_game_id: u8,
    pub country_id: u8,
    pub region_id: u8,
    pub console_region_id: u8,
    pub language_id: u8,
    pub party: Option<PartyStats>,
}

impl RawRecord {
    /// Decrypts a stored record and reads every field out of it.
    pub fn from_pk6(pk6: &[u8]) -> Result<Self> {
        let decrypted = cipher::decrypt(pk6)?;
        Self::from_canonical(&decrypted.data, decrypted.checksum_valid)
    }

    /// Reads every field out of a record which is already in canonical layout.
    pub fn from_canonical(data: &[u8], checksum_valid: bool) -> Result<Self> {
        cipher::check_length(data)?;
        let reader = BitReader::new(data);
        let read_u8 = |field: &Field| reader.uint(field).map(|value| value as u8);
        let read_u16 = |field: &Field| reader.uint(field).map(|value| value as u16);

        let read_u8s = |fields: &[Field]| -> Result<Vec<u8>> {
            fields.iter().map(read_u8).collect()
        };
        let read_u8_array4 = |fields: &[Field; 4]| -> Result<[u8; 4]> {
            Ok([
                read_u8(&fields[0])?,
                read_u8(&fields[1])?,
                read_u8(&fields[2])?,
                read_u8(&fields[3])?,
            ])
        };
        let read_u16_array4 = |fields: &[Field; 4]| -> Result<[u16; 4]> {
            Ok([
                read_u16(&fields[0])?,
                read_u16(&fields[1])?,
                read_u16(&fields[2])?,
                read_u16(&fields[3])?,
            ])
        };
        let read_stats = |fields: &[Field; 6]| -> Result<StatSet<u8>> {
            let values = read_u8s(&fields[..])?;
            Ok(StatSet::from_storage_order([
                values[0], values[1], values[2], values[3], values[4], values[5],
            ]))
        };
        let read_memory = |intensity: &Field,
                           memory: &Field,
                           feeling: &Field,
                           text_var: &Field|
         -> Result<Memory> {
            Ok(Memory {
                intensity: read_u8(intensity)?,
                memory_id: read_u8(memory)?,
                feeling: read_u8(feeling)?,
                text_var: read_u16(text_var)?,
            })
        };
        let read_date = |fields: &[Field; 3]| -> Result<Option<Date>> {
            Ok(Date::from_stored(
                read_u8(&fields[0])?,
                read_u8(&fields[1])?,
                read_u8(&fields[2])?,
            ))
        };

        let contest = read_u8s(&layout::CONTEST_STATS[..])?;
        let contest_stats = ContestStats {
            cool: contest[0],
            beauty: contest[1],
            cute: contest[2],
            smart: contest[3],
            tough: contest[4],
            sheen: contest[5],
        };

        let marks = layout::MARKINGS
            .iter()
            .map(|field| reader.flag(field))
            .collect::<Result<Vec<_>>>()?;
        let markings = Markings {
            circle: marks[0],
            triangle: marks[1],
            square: marks[2],
            heart: marks[3],
            star: marks[4],
            diamond: marks[5],
        };

        let ribbons = reader
            .set_bits(&layout::RIBBONS)?
            .into_iter()
            .filter_map(|bit| {
                let ribbon = Ribbon::from_u8(bit);
                if ribbon.is_none() && !Ribbon::COUNTER_MIRROR_BITS.contains(&bit) {
                    log::debug!("Ignoring unknown ribbon bit {bit}");
                }
                ribbon
            })
            .collect();

        let mut geo_locations = [GeoLocation::default(); 5];
        for (geo, (region, country)) in geo_locations.iter_mut().zip(layout::GEO_LOCATIONS.iter()) {
            *geo = GeoLocation {
                region_id: read_u8(region)?,
                country_id: read_u8(country)?,
            };
        }

        let party = if data.len() == PK6_SIZE_PARTY {
            let stats = layout::STATS
                .iter()
                .map(read_u16)
                .collect::<Result<Vec<_>>>()?;
            Some(PartyStats {
                status_condition: reader.uint(&layout::STATUS_CONDITION)?,
                level: read_u8(&layout::STAT_LEVEL)?,
                current_hp: read_u16(&layout::CURRENT_HP)?,
                stats: StatSet::from_storage_order([
                    stats[0], stats[1], stats[2], stats[3], stats[4], stats[5],
                ]),
            })
        } else {
            None
        };

        Ok(RawRecord {
            encryption_constant: reader.uint(&layout::ENCRYPTION_CONSTANT)?,
            sanity_placeholder: read_u16(&layout::SANITY_PLACEHOLDER)?,
            checksum: read_u16(&layout::CHECKSUM)?,
            checksum_valid,
            species_id: read_u16(&layout::SPECIES)?,
            held_item_id: read_u16(&layout::HELD_ITEM)?,
            ot_id: read_u16(&layout::OT_ID)?,
            ot_secret_id: read_u16(&layout::OT_SECRET_ID)?,
            exp: reader.uint(&layout::EXP)?,
            ability_id: read_u8(&layout::ABILITY)?,
            ability_num: read_u8(&layout::ABILITY_NUM)?,
            training_bag_hits: read_u8(&layout::TRAINING_BAG_HITS)?,
            training_bag_id: read_u8(&layout::TRAINING_BAG)?,
            pid: reader.uint(&layout::PID)?,
            nature_id: read_u8(&layout::NATURE)?,
            is_fateful_encounter: reader.flag(&layout::FATEFUL_ENCOUNTER)?,
            gender: read_u8(&layout::GENDER)?,
            form_id: read_u8(&layout::FORM)?,
            evs: read_stats(&layout::EVS)?,
            contest_stats,
            markings,
            pokerus_strain: read_u8(&layout::POKERUS_STRAIN)?,
            pokerus_days: read_u8(&layout::POKERUS_DAYS)?,
            medals: reader.set_bits(&layout::MEDALS)?,
            ribbons,
            contest_memory_ribbon_count: read_u8(&layout::CONTEST_MEMORY_RIBBONS)?,
            battle_memory_ribbon_count: read_u8(&layout::BATTLE_MEMORY_RIBBONS)?,
            distribution_super_training_flags: read_u8(&layout::DISTRIBUTION_SUPER_TRAINING)?,
            nickname: reader.text(&layout::NICKNAME)?,
            move_ids: read_u16_array4(&layout::MOVES)?,
            move_pp: read_u8_array4(&layout::MOVE_PP)?,
            move_pp_ups: read_u8_array4(&layout::MOVE_PP_UPS)?,
            egg_move_ids: read_u16_array4(&layout::EGG_MOVES)?,
            secret_super_training_unlocked: reader.flag(&layout::SECRET_SUPER_TRAINING_UNLOCKED)?,
            secret_super_training_complete: reader.flag(&layout::SECRET_SUPER_TRAINING_COMPLETE)?,
            ivs: read_stats(&layout::IVS)?,
            is_egg: reader.flag(&layout::IS_EGG)?,
            is_nicknamed: reader.flag(&layout::IS_NICKNAMED)?,
            not_ot_name: reader.text(&layout::NOT_OT_NAME)?,
            not_ot_gender: read_u8(&layout::NOT_OT_GENDER)?,
            current_handler: read_u8(&layout::CURRENT_HANDLER)?,
            geo_locations,
            not_ot_friendship: read_u8(&layout::NOT_OT_FRIENDSHIP)?,
            not_ot_affection: read_u8(&layout::NOT_OT_AFFECTION)?,
            not_ot_memory: read_memory(
                &layout::NOT_OT_MEMORY_INTENSITY,
                &layout::NOT_OT_MEMORY,
                &layout::NOT_OT_MEMORY_FEELING,
                &layout::NOT_OT_MEMORY_TEXT_VAR,
            )?,
            fullness: read_u8(&layout::FULLNESS)?,
            enjoyment: read_u8(&layout::ENJOYMENT)?,
            ot_name: reader.text(&layout::OT_NAME)?,
            ot_friendship: read_u8(&layout::OT_FRIENDSHIP)?,
            ot_affection: read_u8(&layout::OT_AFFECTION)?,
            ot_memory: read_memory(
                &layout::OT_MEMORY_INTENSITY,
                &layout::OT_MEMORY,
                &layout::OT_MEMORY_FEELING,
                &layout::OT_MEMORY_TEXT_VAR,
            )?,
            egg_date: read_date(&layout::EGG_DATE)?,
            met_date: read_date(&layout::MET_DATE)?,
            egg_location_id: read_u16(&layout::EGG_LOCATION)?,
            met_location_id: read_u16(&layout::MET_LOCATION)?,
            ball_id: read_u8(&layout::BALL)?,
            level_met: read_u8(&layout::LEVEL_MET)?,
            ot_gender: read_u8(&layout::OT_GENDER)?,
            encounter_type_id: read_u8(&layout::ENCOUNTER_TYPE)?,
            ot_game_id: read_u8(&layout::OT_GAME)?,
            country_id: read_u8(&layout::COUNTRY)?,
            region_id: read_u8(&layout::REGION)?,
            console_region_id: read_u8(&layout::CONSOLE_REGION)?,
            language_id: read_u8(&layout::LANGUAGE)?,
            party,
        })
    }

    /// Writes every field into `map` under its layout name.
    pub(crate) fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> std::result::Result<(), M::Error> {
        map.serialize_entry(layout::ENCRYPTION_CONSTANT.name, &self.encryption_constant)?;
        map.serialize_entry(layout::SANITY_PLACEHOLDER.name, &self.sanity_placeholder)?;
        map.serialize_entry(layout::CHECKSUM.name, &self.checksum)?;
        map.serialize_entry("checksumValid", &self.checksum_valid)?;
        map.serialize_entry(layout::SPECIES.name, &self.species_id)?;
        map.serialize_entry(layout::HELD_ITEM.name, &self.held_item_id)?;
        map.serialize_entry(layout::OT_ID.name, &self.ot_id)?;
        map.serialize_entry(layout::OT_SECRET_ID.name, &self.ot_secret_id)?;
        map.serialize_entry(layout::EXP.name, &self.exp)?;
        map.serialize_entry(layout::ABILITY.name, &self.ability_id)?;
        map.serialize_entry(layout::ABILITY_NUM.name, &self.ability_num)?;
        map.serialize_entry(layout::TRAINING_BAG_HITS.name, &self.training_bag_hits)?;
        map.serialize_entry(layout::TRAINING_BAG.name, &self.training_bag_id)?;
        map.serialize_entry(layout::PID.name, &self.pid)?;
        map.serialize_entry(layout::NATURE.name, &self.nature_id)?;
        map.serialize_entry(layout::FATEFUL_ENCOUNTER.name, &self.is_fateful_encounter)?;
        map.serialize_entry(layout::GENDER.name, &self.gender)?;
        map.serialize_entry(layout::FORM.name, &self.form_id)?;
        serialize_each(map, &layout::EVS, &self.evs.storage_order())?;
        let contest = &self.contest_stats;
        serialize_each(
            map,
            &layout::CONTEST_STATS,
            &[contest.cool, contest.beauty, contest.cute, contest.smart, contest.tough, contest.sheen],
        )?;
        let markings = &self.markings;
        serialize_each(
            map,
            &layout::MARKINGS,
            &[
                markings.circle,
                markings.triangle,
                markings.square,
                markings.heart,
                markings.star,
                markings.diamond,
            ],
        )?;
        map.serialize_entry(layout::POKERUS_DAYS.name, &self.pokerus_days)?;
        map.serialize_entry(layout::POKERUS_STRAIN.name, &self.pokerus_strain)?;
        map.serialize_entry(layout::MEDALS.name, &self.medals)?;
        map.serialize_entry(layout::RIBBONS.name, &self.ribbons)?;
        map.serialize_entry(layout::CONTEST_MEMORY_RIBBONS.name, &self.contest_memory_ribbon_count)?;
        map.serialize_entry(layout::BATTLE_MEMORY_RIBBONS.name, &self.battle_memory_ribbon_count)?;
        map.serialize_entry(
            layout::DISTRIBUTION_SUPER_TRAINING.name,
            &self.distribution_super_training_flags,
        )?;

        map.serialize_entry(layout::NICKNAME.name, &self.nickname)?;
        serialize_each(map, &layout::MOVES, &self.move_ids)?;
        serialize_each(map, &layout::MOVE_PP, &self.move_pp)?;
        serialize_each(map, &layout::MOVE_PP_UPS, &self.move_pp_ups)?;
        serialize_each(map, &layout::EGG_MOVES, &self.egg_move_ids)?;
        map.serialize_entry(
            layout::SECRET_SUPER_TRAINING_UNLOCKED.name,
            &self.secret_super_training_unlocked,
        )?;
        map.serialize_entry(
            layout::SECRET_SUPER_TRAINING_COMPLETE.name,
            &self.secret_super_training_complete,
        )?;
        serialize_each(map, &layout::IVS, &self.ivs.storage_order())?;
        map.serialize_entry(layout::IS_EGG.name, &self.is_egg)?;
        map.serialize_entry(layout::IS_NICKNAMED.name, &self.is_nicknamed)?;

        map.serialize_entry(layout::NOT_OT_NAME.name, &self.not_ot_name)?;
        map.serialize_entry(layout::NOT_OT_GENDER.name, &self.not_ot_gender)?;
        map.serialize_entry(layout::CURRENT_HANDLER.name, &self.current_handler)?;
        for ((region, country), geo) in layout::GEO_LOCATIONS.iter().zip(&self.geo_locations) {
            map.serialize_entry(region.name, &geo.region_id)?;
            map.serialize_entry(country.name, &geo.country_id)?;
        }
        map.serialize_entry(layout::NOT_OT_FRIENDSHIP.name, &self.not_ot_friendship)?;
        map.serialize_entry(layout::NOT_OT_AFFECTION.name, &self.not_ot_affection)?;
        serialize_memory(
            map,
            [
                &layout::NOT_OT_MEMORY_INTENSITY,
                &layout::NOT_OT_MEMORY,
                &layout::NOT_OT_MEMORY_FEELING,
                &layout::NOT_OT_MEMORY_TEXT_VAR,
            ],
            &self.not_ot_memory,
        )?;
        map.serialize_entry(layout::FULLNESS.name, &self.fullness)?;
        map.serialize_entry(layout::ENJOYMENT.name, &self.enjoyment)?;

        map.serialize_entry(layout::OT_NAME.name, &self.ot_name)?;
        map.serialize_entry(layout::OT_FRIENDSHIP.name, &self.ot_friendship)?;
        map.serialize_entry(layout::OT_AFFECTION.name, &self.ot_affection)?;
        serialize_memory(
            map,
            [
                &layout::OT_MEMORY_INTENSITY,
                &layout::OT_MEMORY,
                &layout::OT_MEMORY_FEELING,
                &layout::OT_MEMORY_TEXT_VAR,
            ],
            &self.ot_memory,
        )?;
        serialize_date(map, &layout::EGG_DATE, self.egg_date)?;
        serialize_date(map, &layout::MET_DATE, self.met_date)?;
        map.serialize_entry(layout::EGG_LOCATION.name, &self.egg_location_id)?;
        map.serialize_entry(layout::MET_LOCATION.name, &self.met_location_id)?;
        map.serialize_entry(layout::BALL.name, &self.ball_id)?;
        map.serialize_entry(layout::LEVEL_MET.name, &self.level_met)?;
        map.serialize_entry(layout::OT_GENDER.name, &self.ot_gender)?;
        map.serialize_entry(layout::ENCOUNTER_TYPE.name, &self.encounter_type_id)?;
        map.serialize_entry(layout::OT_GAME.name, &self.ot_game_id)?;
        map.serialize_entry(layout::COUNTRY.name, &self.country_id)?;
        map.serialize_entry(layout::REGION.name, &self.region_id)?;
        map.serialize_entry(layout::CONSOLE_REGION.name, &self.console_region_id)?;
        map.serialize_entry(layout::LANGUAGE.name, &self.language_id)?;

        if let Some(party) = &self.party {
            map.serialize_entry(layout::STATUS_CONDITION.name, &party.status_condition)?;
            map.serialize_entry(layout::STAT_LEVEL.name, &party.level)?;
            map.serialize_entry(layout::CURRENT_HP.name, &party.current_hp)?;
            serialize_each(map, &layout::STATS, &party.stats.storage_order())?;
        }
        Ok(())
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}

fn serialize_each<M: SerializeMap, T: Serialize>(
    map: &mut M,
    fields: &[Field],
    values: &[T],
) -> std::result::Result<(), M::Error> {
    for (field, value) in fields.iter().zip(values) {
        map.serialize_entry(field.name, value)?;
    }
    Ok(())
}

// Fields in intensity, memory, feeling, text variable order.
fn serialize_memory<M: SerializeMap>(
    map: &mut M,
    fields: [&Field; 4],
    memory: &Memory,
) -> std::result::Result<(), M::Error> {
    let [intensity, memory_id, feeling, text_var] = fields;
    map.serialize_entry(intensity.name, &memory.intensity)?;
    map.serialize_entry(memory_id.name, &memory.memory_id)?;
    map.serialize_entry(feeling.name, &memory.feeling)?;
    map.serialize_entry(text_var.name, &memory.text_var)
}

// A missing date writes null for all three components.
fn serialize_date<M: SerializeMap>(
    map: &mut M,
    fields: &[Field; 3],
    date: Option<Date>,
) -> std::result::Result<(), M::Error> {
    let values = [
        date.map(|date| date.year),
        date.map(|date| date.month as u16),
        date.map(|date| date.day as u16),
    ];
    serialize_each(map, fields, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::FieldKind;
    use byteorder::{ByteOrder, LittleEndian};

    fn assert_disjoint(fields: &[Field], size: usize) {
        for (idx, field) in fields.iter().enumerate() {
            let range = field.bit_range();
            assert!(range.end <= size * 8, "{} runs past the record", field.name);
            for other in &fields[idx + 1..] {
                let other_range = other.bit_range();
                assert!(
                    range.end <= other_range.start || other_range.end <= range.start,
                    "{} overlaps {}",
                    field.name,
                    other.name
                );
            }
        }
    }

    #[test]
    fn test_box_layout_fits_and_does_not_overlap() {
        assert_disjoint(layout::BOX_FIELDS, PK6_SIZE_BOX);
    }

    #[test]
    fn test_party_layout_sits_after_box_layout() {
        let all: Vec<Field> = layout::BOX_FIELDS
            .iter()
            .chain(layout::PARTY_FIELDS)
            .copied()
            .collect();
        assert_disjoint(&all, PK6_SIZE_PARTY);
        for field in layout::PARTY_FIELDS {
            assert!(field.offset >= PK6_SIZE_BOX, "{}", field.name);
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<&str> = layout::BOX_FIELDS
            .iter()
            .chain(layout::PARTY_FIELDS)
            .map(|field| field.name)
            .collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_every_field_reads_from_a_zeroed_record() {
        let data = vec![0u8; PK6_SIZE_PARTY];
        let reader = BitReader::new(&data);
        for field in layout::BOX_FIELDS.iter().chain(layout::PARTY_FIELDS) {
            match field.kind {
                FieldKind::Text { .. } => assert_eq!(reader.text(field).unwrap(), ""),
                FieldKind::SetBits { .. } => assert!(reader.set_bits(field).unwrap().is_empty()),
                _ => assert_eq!(reader.uint(field).unwrap(), 0, "{}", field.name),
            }
        }
    }

    #[test]
    fn test_packed_fields() {
        let mut data = vec![0u8; PK6_SIZE_BOX];
        // Fateful encounter, genderless, form 3
        data[0x1D] = 0b0001_1101;
        let ivs: u32 = 31 | (30 << 5) | (29 << 10) | (1 << 15) | (2 << 20) | (3 << 25) | (1 << 31);
        LittleEndian::write_u32(&mut data[0x74..0x78], ivs);
        data[0xDD] = 0x80 | 42;
        data[0x2B] = 0x23;

        let record = RawRecord::from_canonical(&data, true).unwrap();
        assert!(record.is_fateful_encounter);
        assert_eq!(record.gender, 2);
        assert_eq!(record.form_id, 3);
        assert_eq!(
            record.ivs,
            StatSet {
                hp: 31,
                atk: 30,
                def: 29,
                spe: 1,
                sp_atk: 2,
                sp_def: 3,
            }
        );
        assert!(!record.is_egg);
        assert!(record.is_nicknamed);
        assert_eq!(record.level_met, 42);
        assert_eq!(record.ot_gender, 1);
        assert_eq!(record.pokerus_strain, 2);
        assert_eq!(record.pokerus_days, 3);
        assert!(record.party.is_none());
    }

    #[test]
    fn test_ribbon_flags_skip_counter_bits() {
        let mut data = vec![0u8; PK6_SIZE_BOX];
        data[0x30] = 0b0000_0001;
        data[0x34] = 0b1110_0000;
        data[0x35] = 0b0000_0001;
        let record = RawRecord::from_canonical(&data, true).unwrap();
        assert_eq!(
            record.ribbons,
            vec![Ribbon::KalosChampion, Ribbon::HoennChampionOras, Ribbon::ContestStar]
        );
    }

    #[test]
    fn test_dates() {
        let mut data = vec![0u8; PK6_SIZE_BOX];
        data[0xD4..0xD7].copy_from_slice(&[15, 3, 9]);
        let record = RawRecord::from_canonical(&data, true).unwrap();
        assert_eq!(record.egg_date, None);
        assert_eq!(
            record.met_date,
            Some(Date {
                year: 2015,
                month: 3,
                day: 9
            })
        );
    }

    #[test]
    fn test_party_stats() {
        let mut data = vec![0u8; PK6_SIZE_PARTY];
        data[0xEC] = 24;
        for (idx, value) in [70u16, 70, 32, 60, 40, 52, 46].into_iter().enumerate() {
            let offset = 0xF0 + idx * 2;
            LittleEndian::write_u16(&mut data[offset..offset + 2], value);
        }
        let party = RawRecord::from_canonical(&data, true).unwrap().party.unwrap();
        assert_eq!(party.level, 24);
        assert_eq!(party.current_hp, 70);
        assert_eq!(party.stats.hp, 70);
        assert_eq!(party.stats.spe, 40);
        assert_eq!(party.stats.sp_atk, 52);
        assert_eq!(party.stats.sp_def, 46);
    }
}

//! Strongly typed views of the small enumerations stored in a record.

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// The game a record was created in, as stored in the origin-game field.
#[derive(FromPrimitive, ToPrimitive, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OriginGame {
    Sapphire = 1,
    Ruby = 2,
    Emerald = 3,
    FireRed = 4,
    LeafGreen = 5,
    HeartGold = 7,
    SoulSilver = 8,
    Diamond = 10,
    Pearl = 11,
    Platinum = 12,
    ColosseumXd = 15,
    White = 20,
    Black = 21,
    White2 = 22,
    Black2 = 23,
    X = 24,
    Y = 25,
    AlphaSapphire = 26,
    OmegaRuby = 27,
}

impl OriginGame {
    pub fn generation(&self) -> Generation {
        match self {
            OriginGame::Sapphire
            | OriginGame::Ruby
            | OriginGame::Emerald
            | OriginGame::FireRed
            | OriginGame::LeafGreen
            | OriginGame::ColosseumXd => Generation::Three,
            OriginGame::HeartGold
            | OriginGame::SoulSilver
            | OriginGame::Diamond
            | OriginGame::Pearl
            | OriginGame::Platinum => Generation::Four,
            OriginGame::White | OriginGame::Black | OriginGame::White2 | OriginGame::Black2 => {
                Generation::Five
            }
            OriginGame::X | OriginGame::Y | OriginGame::AlphaSapphire | OriginGame::OmegaRuby => {
                Generation::Six
            }
        }
    }
}

impl std::fmt::Display for OriginGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match *self {
            OriginGame::Sapphire => "Sapphire",
            OriginGame::Ruby => "Ruby",
            OriginGame::Emerald => "Emerald",
            OriginGame::FireRed => "FireRed",
            OriginGame::LeafGreen => "LeafGreen",
            OriginGame::HeartGold => "HeartGold",
            OriginGame::SoulSilver => "SoulSilver",
            OriginGame::Diamond => "Diamond",
            OriginGame::Pearl => "Pearl",
            OriginGame::Platinum => "Platinum",
            OriginGame::ColosseumXd => "Colosseum/XD",
            OriginGame::White => "White",
            OriginGame::Black => "Black",
            OriginGame::White2 => "White 2",
            OriginGame::Black2 => "Black 2",
            OriginGame::X => "X",
            OriginGame::Y => "Y",
            OriginGame::AlphaSapphire => "Alpha Sapphire",
            OriginGame::OmegaRuby => "Omega Ruby",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Generation {
    Three,
    Four,
    Five,
    Six,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
}

impl Stat {
    /// The five stats a nature can raise or lower, in nature-table order.
    pub const NATURE_ORDER: [Stat; 5] = [Stat::Atk, Stat::Def, Stat::Spe, Stat::SpAtk, Stat::SpDef];

    /// The order stat sextets are stored in.
    pub const STORAGE_ORDER: [Stat; 6] = [
        Stat::Hp,
        Stat::Atk,
        Stat::Def,
        Stat::Spe,
        Stat::SpAtk,
        Stat::SpDef,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl Type {
    /// Every type hidden power can take, indexed by the hidden power formula.
    pub const HIDDEN_POWER: [Type; 16] = [
        Type::Fighting,
        Type::Flying,
        Type::Poison,
        Type::Ground,
        Type::Rock,
        Type::Bug,
        Type::Ghost,
        Type::Steel,
        Type::Fire,
        Type::Water,
        Type::Grass,
        Type::Electric,
        Type::Psychic,
        Type::Ice,
        Type::Dragon,
        Type::Dark,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthRate {
    MediumFast,
    Erratic,
    Fluctuating,
    MediumSlow,
    Fast,
    Slow,
}

impl GrowthRate {
    pub const ALL: [GrowthRate; 6] = [
        GrowthRate::MediumFast,
        GrowthRate::Erratic,
        GrowthRate::Fluctuating,
        GrowthRate::MediumSlow,
        GrowthRate::Fast,
        GrowthRate::Slow,
    ];
}

#[derive(FromPrimitive, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Japanese = 1,
    English = 2,
    French = 3,
    Italian = 4,
    German = 5,
    Spanish = 7,
    Korean = 8,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match *self {
            Language::Japanese => "Japanese",
            Language::English => "English",
            Language::French => "French",
            Language::Italian => "Italian",
            Language::German => "German",
            Language::Spanish => "Spanish",
            Language::Korean => "Korean",
        })
    }
}

/// Ribbons, numbered by their bit in the ribbon flag array.
///
/// The memory ribbons are not flags; they are derived from the memory ribbon
/// counters and numbered past the end of the array.
#[derive(
    FromPrimitive, ToPrimitive, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Ribbon {
    KalosChampion = 0,
    HoennChampion = 1,
    SinnohChampion = 2,
    BestFriends = 3,
    Training = 4,
    SkillfulBattler = 5,
    ExpertBattler = 6,
    Effort = 7,
    Alert = 8,
    Shock = 9,
    Downcast = 10,
    Careless = 11,
    Relax = 12,
    Snooze = 13,
    Smile = 14,
    Gorgeous = 15,
    Royal = 16,
    GorgeousRoyal = 17,
    Artist = 18,
    Footprint = 19,
    Record = 20,
    Legend = 21,
    Country = 22,
    National = 23,
    Earth = 24,
    World = 25,
    Classic = 26,
    Premier = 27,
    Event = 28,
    Birthday = 29,
    Special = 30,
    Souvenir = 31,
    Wishing = 32,
    BattleChampion = 33,
    RegionalChampion = 34,
    NationalChampion = 35,
    WorldChampion = 36,
    // 37 and 38 mirror the memory ribbon counters.
    HoennChampionOras = 39,
    ContestStar = 40,
    CoolnessMaster = 41,
    BeautyMaster = 42,
    CutenessMaster = 43,
    ClevernessMaster = 44,
    ToughnessMaster = 45,
    ContestMemory = 64,
    ContestMemoryGold = 65,
    BattleMemory = 66,
    BattleMemoryGold = 67,
}

impl Ribbon {
    /// Bits of the flag array which do not name a ribbon of their own.
    pub const COUNTER_MIRROR_BITS: [u8; 2] = [37, 38];
}

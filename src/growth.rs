//! Cumulative experience thresholds per growth rate.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::GrowthRate;

pub const MAX_LEVEL: u8 = 100;

/// Total experience needed to reach each level, indexed by `level - 1`.
///
/// A table document only lists the growth rates it overrides; the others
/// keep their generated curves.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "BTreeMap<GrowthRate, Vec<u32>>")]
pub struct ExperienceTable {
    thresholds: BTreeMap<GrowthRate, Vec<u32>>,
}

/// Where a record's experience total sits on its growth curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u8,
    pub exp_from_previous_level: u32,
    pub exp_to_next_level: Option<u32>,
}

impl Default for ExperienceTable {
    fn default() -> Self {
        let thresholds = GrowthRate::ALL
            .into_iter()
            .map(|rate| {
                let levels = (1..=MAX_LEVEL as u32)
                    .map(|level| threshold(rate, level))
                    .collect();
                (rate, levels)
            })
            .collect();
        Self { thresholds }
    }
}

impl TryFrom<BTreeMap<GrowthRate, Vec<u32>>> for ExperienceTable {
    type Error = String;

    fn try_from(overrides: BTreeMap<GrowthRate, Vec<u32>>) -> Result<Self, Self::Error> {
        let mut table = ExperienceTable::default();
        for (rate, thresholds) in overrides {
            if thresholds.len() != MAX_LEVEL as usize {
                return Err(format!(
                    "{rate:?} experience table has {} levels, expected {MAX_LEVEL}",
                    thresholds.len()
                ));
            }
            if thresholds[0] != 0 || thresholds.windows(2).any(|pair| pair[0] > pair[1]) {
                return Err(format!("{rate:?} experience table must rise from 0"));
            }
            table.thresholds.insert(rate, thresholds);
        }
        Ok(table)
    }
}

impl ExperienceTable {
    pub fn thresholds(&self, rate: GrowthRate) -> Option<&[u32]> {
        self.thresholds.get(&rate).map(Vec::as_slice)
    }

    /// The highest level whose threshold does not exceed `exp`.
    pub fn progress(&self, rate: GrowthRate, exp: u32) -> Option<LevelProgress> {
        let thresholds = self.thresholds(rate)?;
        let thresholds = &thresholds[..thresholds.len().min(MAX_LEVEL as usize)];
        let level = thresholds.partition_point(|needed| *needed <= exp);
        if level == 0 {
            return None;
        }

        let exp_from_previous_level = exp.checked_sub(thresholds[level - 1])?;
        let exp_to_next_level = match thresholds.get(level) {
            Some(next) => Some(next.checked_sub(exp)?),
            None => None,
        };
        Some(LevelProgress {
            level: level as u8,
            exp_from_previous_level,
            exp_to_next_level,
        })
    }
}

fn threshold(rate: GrowthRate, level: u32) -> u32 {
    if level <= 1 {
        return 0;
    }

    let n = level as i64;
    let cube = n * n * n;
    let exp = match rate {
        GrowthRate::MediumFast => cube,
        GrowthRate::Fast => 4 * cube / 5,
        GrowthRate::Slow => 5 * cube / 4,
        GrowthRate::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
        GrowthRate::Erratic => match n {
            2..=49 => cube * (100 - n) / 50,
            50..=67 => cube * (150 - n) / 100,
            68..=97 => cube * ((1911 - 10 * n) / 3) / 500,
            _ => cube * (160 - n) / 100,
        },
        GrowthRate::Fluctuating => match n {
            2..=14 => cube * ((n + 1) / 3 + 24) / 50,
            15..=35 => cube * (n + 14) / 50,
            _ => cube * (n / 2 + 32) / 50,
        },
    };
    exp.max(0) as u32
}

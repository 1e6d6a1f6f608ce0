//! Numeric tables and weight tables that tune a run.
use crate::config::GameConfig;
use crate::selection::WeightedOption;

/// Cumulative experience needed for each level-up.
///
/// `thresholds[i]` is the total experience required to reach level `i + 2`,
/// so the maximum level is `thresholds.len() + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LevelTable {
    thresholds: Vec<u32>,
}

impl LevelTable {
    pub fn new(thresholds: Vec<u32>) -> Self {
        Self { thresholds }
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32 + 1
    }

    /// Total experience needed to reach `level`, `None` past the maximum.
    pub fn threshold(&self, level: u32) -> Option<u32> {
        match level {
            0 | 1 => Some(0),
            _ => self.thresholds.get(level as usize - 2).copied(),
        }
    }

    /// Level reached with `exp` total experience.
    pub fn level_for(&self, exp: u32) -> u32 {
        self.thresholds.iter().take_while(|t| exp >= **t).count() as u32 + 1
    }

    /// Whether thresholds strictly increase.
    pub fn is_monotonic(&self) -> bool {
        self.thresholds.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// Flee success chances in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleeChances {
    /// While the enemy has not noticed the player yet.
    pub prepare: u32,
    /// Once the battle is under way.
    pub battle: u32,
}

impl Default for FleeChances {
    fn default() -> Self {
        Self {
            prepare: 75,
            battle: 40,
        }
    }
}

/// Weight tables for every selection category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightTables {
    pub events: Vec<WeightedOption>,
    pub monsters: Vec<WeightedOption>,
    pub items: Vec<WeightedOption>,
    pub traps: Vec<WeightedOption>,
    pub characters: Vec<WeightedOption>,
    pub familiars: Vec<WeightedOption>,
    /// Items a trader offers.
    pub trades: Vec<WeightedOption>,
}

/// Run-wide tuning values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tables {
    /// Reaching this floor wins the run.
    pub max_floor: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_capacity"))]
    pub inventory_capacity: usize,
    /// Turns the enemy stays unaware at the start of a battle.
    pub prepare_turns: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flee: FleeChances,
    /// Enemies are generated at `floor + 0..=spread` levels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemy_level_spread: u32,
    /// Level at which a familiar with no spell awakens its dormant one.
    pub dormant_spell_level: u32,
    pub starters: Vec<String>,
    pub levels: LevelTable,
    pub weights: WeightTables,
}

fn default_capacity() -> usize {
    GameConfig::DEFAULT_INVENTORY_CAPACITY
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            max_floor: 10,
            inventory_capacity: GameConfig::DEFAULT_INVENTORY_CAPACITY,
            prepare_turns: 3,
            flee: FleeChances::default(),
            enemy_level_spread: 1,
            dormant_spell_level: 5,
            starters: Vec::new(),
            levels: LevelTable::default(),
            weights: WeightTables::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_table_lookups() {
        let table = LevelTable::new(vec![10, 30, 60]);
        assert_eq!(table.max_level(), 4);
        assert_eq!(table.level_for(0), 1);
        assert_eq!(table.level_for(10), 2);
        assert_eq!(table.level_for(59), 3);
        assert_eq!(table.level_for(1_000), 4);
        assert_eq!(table.threshold(1), Some(0));
        assert_eq!(table.threshold(3), Some(30));
        assert_eq!(table.threshold(5), None);
        assert!(table.is_monotonic());
        assert!(!LevelTable::new(vec![10, 10]).is_monotonic());
    }
}

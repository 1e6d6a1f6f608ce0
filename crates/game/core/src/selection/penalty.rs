use std::collections::BTreeMap;

/// Weight adjustment applied while an option's penalty timer is armed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PenaltyHandler {
    #[default]
    None,
    Subtract {
        amount: u32,
        duration: u32,
    },
    ForceZero {
        duration: u32,
    },
}

impl PenaltyHandler {
    /// Selection ticks the penalty lasts after the option is chosen.
    pub const fn duration(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Subtract { duration, .. } | Self::ForceZero { duration } => *duration,
        }
    }

    pub const fn adjust(&self, weight: u32) -> u32 {
        match self {
            Self::None => weight,
            Self::Subtract { amount, .. } => weight.saturating_sub(*amount),
            Self::ForceZero { .. } => 0,
        }
    }
}

/// Remaining penalty ticks per option name within one category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PenaltyTimers {
    remaining: BTreeMap<String, u32>,
}

impl PenaltyTimers {
    pub fn is_armed(&self, name: &str) -> bool {
        self.remaining.get(name).is_some_and(|ticks| *ticks > 0)
    }

    pub fn remaining(&self, name: &str) -> u32 {
        self.remaining.get(name).copied().unwrap_or(0)
    }

    /// (Re)arm `name` for `ticks` selections. Zero disarms it.
    pub fn arm(&mut self, name: &str, ticks: u32) {
        if ticks == 0 {
            self.remaining.remove(name);
        } else {
            self.remaining.insert(name.to_owned(), ticks);
        }
    }

    /// One selection happened in this category.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.remaining.iter().map(|(name, ticks)| (name.as_str(), *ticks))
    }
}

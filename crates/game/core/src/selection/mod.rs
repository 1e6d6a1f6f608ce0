//! Weighted random selection with anti-repeat penalties.
//!
//! Every tower event, monster, item, trap, character and wild familiar is
//! drawn from a category of [`WeightedOption`]s. An option's effective weight
//! is its [`WeightFormula`] evaluated against the [`WeightContext`], adjusted
//! by its [`PenaltyHandler`] while the option's penalty timer is armed.
mod formula;
mod penalty;

use std::collections::BTreeMap;

pub use formula::{WeightContext, WeightFormula};
pub use penalty::{PenaltyHandler, PenaltyTimers};

use crate::env::RandomSource;
use crate::error::{ErrorSeverity, GameError};

/// Named option inside a selection category.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedOption {
    pub name: String,
    pub formula: WeightFormula,
    #[cfg_attr(feature = "serde", serde(default))]
    pub penalty: PenaltyHandler,
}

impl WeightedOption {
    pub fn new(name: impl Into<String>, formula: WeightFormula) -> Self {
        Self {
            name: name.into(),
            formula,
            penalty: PenaltyHandler::None,
        }
    }

    #[must_use]
    pub fn with_penalty(mut self, penalty: PenaltyHandler) -> Self {
        self.penalty = penalty;
        self
    }

    /// Effective weight: formula value adjusted by an armed penalty.
    pub fn effective_weight(&self, ctx: &WeightContext, timers: &PenaltyTimers) -> u32 {
        let weight = self.formula.weight(ctx);
        if timers.is_armed(&self.name) {
            self.penalty.adjust(weight)
        } else {
            weight
        }
    }
}

/// Categories that keep independent penalty timers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionCategory {
    Event,
    Monster,
    Item,
    Trap,
    Character,
    Familiar,
    Trade,
}

/// Penalty timers for every category of one player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PenaltyBook {
    categories: BTreeMap<SelectionCategory, PenaltyTimers>,
}

impl PenaltyBook {
    pub fn timers(&self, category: SelectionCategory) -> Option<&PenaltyTimers> {
        self.categories.get(&category)
    }

    pub fn timers_mut(&mut self, category: SelectionCategory) -> &mut PenaltyTimers {
        self.categories.entry(category).or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("selection category is empty")]
    Empty,

    #[error("every option in the selection category has weight zero")]
    AllWeightsZero,
}

impl GameError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "SELECTION_EMPTY",
            Self::AllWeightsZero => "SELECTION_ALL_WEIGHTS_ZERO",
        }
    }
}

/// Index drawn with probability proportional to its weight.
///
/// Returns `None` when every weight is zero (or the slice is empty).
pub fn weighted_index(weights: &[u32], rng: &mut dyn RandomSource) -> Option<usize> {
    let total = weights.iter().fold(0u32, |sum, w| sum.saturating_add(*w));
    if total == 0 {
        return None;
    }
    let mut roll = rng.below(total);
    for (index, weight) in weights.iter().enumerate() {
        if roll < *weight {
            return Some(index);
        }
        roll -= weight;
    }
    // Saturated totals can leave a remainder; the last weighted option absorbs it.
    weights.iter().rposition(|w| *w > 0)
}

/// Draw one option and advance the category's penalty timers.
///
/// Every armed timer decrements by one, then the chosen option's timer is
/// (re)armed with its handler's duration.
pub fn select<'a>(
    options: &'a [WeightedOption],
    ctx: &WeightContext,
    timers: &mut PenaltyTimers,
    rng: &mut dyn RandomSource,
) -> Result<&'a WeightedOption, SelectionError> {
    if options.is_empty() {
        return Err(SelectionError::Empty);
    }
    let weights: Vec<u32> = options
        .iter()
        .map(|option| option.effective_weight(ctx, timers))
        .collect();
    let index = weighted_index(&weights, rng).ok_or(SelectionError::AllWeightsZero)?;
    let chosen = &options[index];

    timers.tick();
    timers.arm(&chosen.name, chosen.penalty.duration());
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    fn ctx() -> WeightContext {
        WeightContext { floor: 1, level: 1 }
    }

    #[test]
    fn zero_weight_is_never_chosen() {
        let options = vec![
            WeightedOption::new("a", WeightFormula::Static { weight: 0 }),
            WeightedOption::new("b", WeightFormula::Static { weight: 10 }),
        ];
        let mut timers = PenaltyTimers::default();
        let mut rng = PcgRng::from_seed(3);
        for _ in 0..200 {
            let chosen = select(&options, &ctx(), &mut timers, &mut rng).unwrap();
            assert_eq!(chosen.name, "b");
        }
    }

    #[test]
    fn force_zero_blocks_for_exactly_its_duration() {
        let options = vec![
            WeightedOption::new("a", WeightFormula::Static { weight: 1 }),
            WeightedOption::new("b", WeightFormula::Static { weight: 1_000_000 })
                .with_penalty(PenaltyHandler::ForceZero { duration: 2 }),
        ];
        let mut timers = PenaltyTimers::default();
        let mut rng = PcgRng::from_seed(11);

        // Draw until b is picked (overwhelmingly likely on the first draw).
        while select(&options, &ctx(), &mut timers, &mut rng).unwrap().name != "b" {}

        let b = &options[1];
        assert_eq!(b.effective_weight(&ctx(), &timers), 0);
        assert_eq!(select(&options, &ctx(), &mut timers, &mut rng).unwrap().name, "a");
        assert_eq!(b.effective_weight(&ctx(), &timers), 0);
        assert_eq!(select(&options, &ctx(), &mut timers, &mut rng).unwrap().name, "a");
        assert_eq!(b.effective_weight(&ctx(), &timers), 1_000_000);
    }

    #[test]
    fn subtract_penalty_lowers_weight_while_armed() {
        let option = WeightedOption::new("a", WeightFormula::Static { weight: 10 })
            .with_penalty(PenaltyHandler::Subtract {
                amount: 4,
                duration: 1,
            });
        let mut timers = PenaltyTimers::default();
        timers.arm("a", 1);
        assert_eq!(option.effective_weight(&ctx(), &timers), 6);
        timers.tick();
        assert_eq!(option.effective_weight(&ctx(), &timers), 10);
    }

    #[test]
    fn all_zero_pool_is_an_error() {
        let options = vec![WeightedOption::new("a", WeightFormula::Static { weight: 0 })];
        let mut timers = PenaltyTimers::default();
        let mut rng = PcgRng::from_seed(0);
        assert_eq!(
            select(&options, &ctx(), &mut timers, &mut rng),
            Err(SelectionError::AllWeightsZero)
        );
        assert_eq!(
            select(&[], &ctx(), &mut timers, &mut rng),
            Err(SelectionError::Empty)
        );
    }

    #[test]
    fn weighted_index_respects_proportions() {
        let mut rng = PcgRng::from_seed(5);
        let mut counts = [0u32; 2];
        for _ in 0..4000 {
            counts[weighted_index(&[1, 3], &mut rng).unwrap()] += 1;
        }
        assert!(counts[1] > counts[0] * 2);
        assert_eq!(weighted_index(&[0, 0], &mut rng), None);
    }
}

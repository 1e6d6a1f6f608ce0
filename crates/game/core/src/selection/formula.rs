/// Engine values a weight formula may depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeightContext {
    pub floor: u32,
    /// Level of the player's familiar (1 before one is chosen).
    pub level: u32,
}

/// Weight of an option as a pure function of [`WeightContext`].
///
/// Prorated formulas interpolate linearly from `from` at `start` to `to` at
/// `end` and hold the end values outside that range.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum WeightFormula {
    Static {
        weight: u32,
    },
    FloorProrated {
        start: u32,
        end: u32,
        from: u32,
        to: u32,
    },
    LevelProrated {
        start: u32,
        end: u32,
        from: u32,
        to: u32,
    },
}

impl WeightFormula {
    pub fn weight(&self, ctx: &WeightContext) -> u32 {
        match *self {
            Self::Static { weight } => weight,
            Self::FloorProrated {
                start,
                end,
                from,
                to,
            } => prorate(ctx.floor, start, end, from, to),
            Self::LevelProrated {
                start,
                end,
                from,
                to,
            } => prorate(ctx.level, start, end, from, to),
        }
    }
}

fn prorate(x: u32, start: u32, end: u32, from: u32, to: u32) -> u32 {
    if end <= start {
        return if x >= end { to } else { from };
    }
    let x = x.clamp(start, end);
    let span = i64::from(end - start);
    let offset = i64::from(x - start);
    let delta = i64::from(to) - i64::from(from);
    let value = i64::from(from) + delta * offset / span;
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

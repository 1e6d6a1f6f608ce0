use super::StatusKind;

/// Elemental affiliation of a unit or spell.
///
/// The elemental cycle is Water > Fire > Wind > Water. `Empty` is neutral
/// against everything and has no elemental protection of its own.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Genus {
    Fire,
    Water,
    Wind,
    #[default]
    Empty,
}

impl Genus {
    /// Advantage bonus granted when striking strongly.
    pub const STRONG: i32 = 1;
    /// Advantage penalty applied when striking weakly.
    pub const WEAK: i32 = -2;

    /// The genus this one is strong against.
    pub const fn beats(self) -> Option<Genus> {
        match self {
            Self::Water => Some(Self::Fire),
            Self::Fire => Some(Self::Wind),
            Self::Wind => Some(Self::Water),
            Self::Empty => None,
        }
    }

    /// Elemental advantage term of `self` attacking `defender`.
    pub fn advantage_against(self, defender: Genus) -> i32 {
        if self.beats() == Some(defender) {
            Self::STRONG
        } else if defender.beats() == Some(self) {
            Self::WEAK
        } else {
            0
        }
    }

    /// Status that shields a defender from attacks of this genus.
    pub const fn protection(self) -> Option<StatusKind> {
        match self {
            Self::Fire => Some(StatusKind::FireProtection),
            Self::Water => Some(StatusKind::WaterProtection),
            Self::Wind => Some(StatusKind::WindProtection),
            Self::Empty => None,
        }
    }

    /// Status that reflects spells of this genus, besides the universal reflect.
    pub const fn reflection(self) -> Option<StatusKind> {
        match self {
            Self::Fire => Some(StatusKind::FireReflect),
            Self::Water => Some(StatusKind::WaterReflect),
            Self::Wind => Some(StatusKind::WindReflect),
            Self::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elemental_cycle() {
        assert_eq!(Genus::Water.advantage_against(Genus::Fire), 1);
        assert_eq!(Genus::Fire.advantage_against(Genus::Water), -2);
        assert_eq!(Genus::Fire.advantage_against(Genus::Wind), 1);
        assert_eq!(Genus::Wind.advantage_against(Genus::Water), 1);
        assert_eq!(Genus::Fire.advantage_against(Genus::Fire), 0);
        assert_eq!(Genus::Empty.advantage_against(Genus::Fire), 0);
        assert_eq!(Genus::Wind.advantage_against(Genus::Empty), 0);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("FIRE".parse::<Genus>().unwrap(), Genus::Fire);
        assert_eq!(Genus::Wind.to_string(), "wind");
    }
}

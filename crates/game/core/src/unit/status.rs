//! Status conditions: the flag set plus the timed-duration side map.
use std::collections::BTreeMap;

use bitflags::bitflags;

use super::Genus;
use crate::narration::Subject;

bitflags! {
    /// Conditions currently held by a unit.
    ///
    /// Membership is a bitwise AND, union a bitwise OR. Which bits are timed
    /// is tracked by [`StatusSet`]; a bit with no duration entry is permanent
    /// until cleared.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Status: u16 {
        const SLEEP = 1 << 0;
        const PARALYZE = 1 << 1;
        const CONFUSE = 1 << 2;
        const POISON = 1 << 3;
        const BLIND = 1 << 4;
        const INVISIBLE = 1 << 5;
        const CRACK = 1 << 6;
        const UPHEAVAL = 1 << 7;
        const FIRE_PROTECTION = 1 << 8;
        const WATER_PROTECTION = 1 << 9;
        const WIND_PROTECTION = 1 << 10;
        const FIRE_REFLECT = 1 << 11;
        const WATER_REFLECT = 1 << 12;
        const WIND_REFLECT = 1 << 13;
        const REFLECT = 1 << 14;

        /// Conditions a physical hit may knock the defender out of.
        const RECOVERABLE = Self::SLEEP.bits() | Self::PARALYZE.bits() | Self::CONFUSE.bits();
    }
}

/// One named status, used as the key of the duration map and in content.
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
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    Sleep,
    Paralyze,
    Confuse,
    Poison,
    Blind,
    Invisible,
    Crack,
    Upheaval,
    FireProtection,
    WaterProtection,
    WindProtection,
    FireReflect,
    WaterReflect,
    WindReflect,
    Reflect,
}

/// Phrasing family used when a status wears off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFamily {
    Condition,
    Protection,
    Reflect,
}

impl StatusKind {
    pub const fn flag(self) -> Status {
        match self {
            Self::Sleep => Status::SLEEP,
            Self::Paralyze => Status::PARALYZE,
            Self::Confuse => Status::CONFUSE,
            Self::Poison => Status::POISON,
            Self::Blind => Status::BLIND,
            Self::Invisible => Status::INVISIBLE,
            Self::Crack => Status::CRACK,
            Self::Upheaval => Status::UPHEAVAL,
            Self::FireProtection => Status::FIRE_PROTECTION,
            Self::WaterProtection => Status::WATER_PROTECTION,
            Self::WindProtection => Status::WIND_PROTECTION,
            Self::FireReflect => Status::FIRE_REFLECT,
            Self::WaterReflect => Status::WATER_REFLECT,
            Self::WindReflect => Status::WIND_REFLECT,
            Self::Reflect => Status::REFLECT,
        }
    }

    pub const fn family(self) -> StatusFamily {
        match self {
            Self::FireProtection | Self::WaterProtection | Self::WindProtection => {
                StatusFamily::Protection
            }
            Self::FireReflect | Self::WaterReflect | Self::WindReflect | Self::Reflect => {
                StatusFamily::Reflect
            }
            _ => StatusFamily::Condition,
        }
    }

    /// Element guarded by a protection or reflect status.
    pub const fn element(self) -> Option<Genus> {
        match self {
            Self::FireProtection | Self::FireReflect => Some(Genus::Fire),
            Self::WaterProtection | Self::WaterReflect => Some(Genus::Water),
            Self::WindProtection | Self::WindReflect => Some(Genus::Wind),
            _ => None,
        }
    }

    /// Whether this condition harms its holder and is removed by cures.
    pub const fn is_debuff(self) -> bool {
        matches!(
            self,
            Self::Sleep | Self::Paralyze | Self::Confuse | Self::Poison | Self::Blind | Self::Crack
        )
    }

    /// Adjective used in "is now ..." and "is no longer ..." lines.
    pub const fn adjective(self) -> &'static str {
        match self {
            Self::Sleep => "asleep",
            Self::Paralyze => "paralyzed",
            Self::Confuse => "confused",
            Self::Poison => "poisoned",
            Self::Blind => "blinded",
            Self::Invisible => "invisible",
            Self::Crack => "off balance",
            Self::Upheaval => "on high ground",
            Self::FireProtection => "shielded from fire",
            Self::WaterProtection => "shielded from water",
            Self::WindProtection => "shielded from wind",
            Self::FireReflect => "mirrored against fire",
            Self::WaterReflect => "mirrored against water",
            Self::WindReflect => "mirrored against wind",
            Self::Reflect => "surrounded by a mirror barrier",
        }
    }

    /// Narration for this status being applied to `subject`.
    pub fn applied_line(self, subject: &Subject) -> String {
        format!("{} now {}.", subject.is(), self.adjective())
    }

    /// Narration for this status wearing off `subject`.
    pub fn cleared_line(self, subject: &Subject) -> String {
        match (self.family(), self.element()) {
            (StatusFamily::Condition, _) => {
                format!("{} no longer {}.", subject.is(), self.adjective())
            }
            (StatusFamily::Protection, Some(element)) => format!(
                "{} protection against {element} wears off.",
                subject.possessive()
            ),
            (StatusFamily::Reflect, Some(element)) => {
                format!("{} {element} mirror shatters.", subject.possessive())
            }
            (_, None) => format!("{} mirror barrier fades.", subject.possessive()),
        }
    }

    /// Map a single flag back to its kind.
    pub fn from_flag(flag: Status) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|kind| kind.flag() == flag)
    }
}

/// Status flags of a unit together with the remaining turns of timed ones.
///
/// Invariant: a flag is set iff it is permanent (no duration entry) or its
/// duration entry exists and is greater than zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSet {
    flags: Status,
    durations: BTreeMap<StatusKind, u8>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from raw parts, rejecting durations that break the invariant.
    pub fn from_parts(flags: Status, durations: BTreeMap<StatusKind, u8>) -> Option<Self> {
        let consistent = durations
            .iter()
            .all(|(kind, turns)| *turns > 0 && flags.contains(kind.flag()));
        consistent.then_some(Self { flags, durations })
    }

    pub fn flags(&self) -> Status {
        self.flags
    }

    pub fn durations(&self) -> &BTreeMap<StatusKind, u8> {
        &self.durations
    }

    pub fn contains(&self, kind: StatusKind) -> bool {
        self.flags.contains(kind.flag())
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Remaining turns of a timed status, `None` when absent or permanent.
    pub fn remaining(&self, kind: StatusKind) -> Option<u8> {
        self.durations.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusKind> + '_ {
        use strum::IntoEnumIterator;
        StatusKind::iter().filter(|kind| self.contains(*kind))
    }

    /// Apply a status. `None` makes it permanent; `Some(turns)` times it.
    ///
    /// Re-applying a timed status keeps the longer of the two durations. A
    /// permanent status stays permanent. `Some(0)` is ignored.
    pub fn apply(&mut self, kind: StatusKind, turns: Option<u8>) {
        match turns {
            None => {
                self.flags.insert(kind.flag());
                self.durations.remove(&kind);
            }
            Some(0) => {}
            Some(turns) => {
                if self.contains(kind) && !self.durations.contains_key(&kind) {
                    return;
                }
                self.flags.insert(kind.flag());
                let entry = self.durations.entry(kind).or_insert(0);
                *entry = (*entry).max(turns);
            }
        }
    }

    /// Remove a status. Returns whether it was held.
    pub fn clear(&mut self, kind: StatusKind) -> bool {
        let held = self.contains(kind);
        self.flags.remove(kind.flag());
        self.durations.remove(&kind);
        held
    }

    /// Remove every status and return what was held.
    pub fn clear_all(&mut self) -> Vec<StatusKind> {
        let held: Vec<StatusKind> = self.iter().collect();
        self.flags = Status::empty();
        self.durations.clear();
        held
    }

    /// Remove every debuff and return what was cleared.
    pub fn clear_debuffs(&mut self) -> Vec<StatusKind> {
        let debuffs: Vec<StatusKind> = self.iter().filter(|kind| kind.is_debuff()).collect();
        for kind in &debuffs {
            self.clear(*kind);
        }
        debuffs
    }

    /// Count every timed status down by one turn; returns the ones that expired.
    pub fn tick(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for (kind, turns) in self.durations.iter_mut() {
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(*kind);
            }
        }
        for kind in &expired {
            self.clear(*kind);
        }
        expired
    }

    /// Whether attacks of `genus` are blunted by a matching protection.
    pub fn protects_against(&self, genus: Genus) -> bool {
        genus.protection().is_some_and(|kind| self.contains(kind))
    }

    /// Whether spells of `genus` bounce off this holder.
    pub fn reflects(&self, genus: Genus) -> bool {
        self.contains(StatusKind::Reflect)
            || genus.reflection().is_some_and(|kind| self.contains(kind))
    }

    /// Relative height contribution: +1 on high ground, -1 off balance.
    pub fn height(&self) -> i32 {
        let mut height = 0;
        if self.contains(StatusKind::Upheaval) {
            height += 1;
        }
        if self.contains(StatusKind::Crack) {
            height -= 1;
        }
        height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(set: &StatusSet) {
        for (kind, turns) in set.durations() {
            assert!(*turns > 0);
            assert!(set.contains(*kind));
        }
    }

    #[test]
    fn timed_status_expires_after_ticks() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Poison, Some(2));
        assert_eq!(set.tick(), Vec::<StatusKind>::new());
        assert!(set.contains(StatusKind::Poison));
        assert_eq!(set.tick(), vec![StatusKind::Poison]);
        assert!(!set.contains(StatusKind::Poison));
        assert_invariant(&set);
    }

    #[test]
    fn permanent_status_survives_ticks() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Blind, None);
        set.apply(StatusKind::Blind, Some(3));
        for _ in 0..5 {
            set.tick();
        }
        assert!(set.contains(StatusKind::Blind));
        assert_eq!(set.remaining(StatusKind::Blind), None);
    }

    #[test]
    fn reapply_keeps_longer_duration() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Sleep, Some(3));
        set.apply(StatusKind::Sleep, Some(1));
        assert_eq!(set.remaining(StatusKind::Sleep), Some(3));
        set.apply(StatusKind::Sleep, Some(0));
        assert_eq!(set.remaining(StatusKind::Sleep), Some(3));
    }

    #[test]
    fn clear_removes_flag_and_duration() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Confuse, Some(2));
        assert!(set.clear(StatusKind::Confuse));
        assert!(!set.clear(StatusKind::Confuse));
        assert!(set.durations().is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn from_parts_rejects_orphan_durations() {
        let mut durations = BTreeMap::new();
        durations.insert(StatusKind::Poison, 2);
        assert!(StatusSet::from_parts(Status::empty(), durations.clone()).is_none());
        assert!(StatusSet::from_parts(Status::POISON, durations).is_some());

        let mut zero = BTreeMap::new();
        zero.insert(StatusKind::Sleep, 0);
        assert!(StatusSet::from_parts(Status::SLEEP, zero).is_none());
    }

    #[test]
    fn protection_and_reflection_follow_genus() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::FireProtection, Some(3));
        assert!(set.protects_against(Genus::Fire));
        assert!(!set.protects_against(Genus::Water));
        assert!(!set.protects_against(Genus::Empty));

        set.apply(StatusKind::Reflect, None);
        assert!(set.reflects(Genus::Empty));
        assert!(set.reflects(Genus::Wind));
    }

    #[test]
    fn cleared_lines_use_family_phrasing() {
        let you = Subject::player("Ember");
        let goblin = Subject::other("Goblin");
        assert_eq!(
            StatusKind::Poison.cleared_line(&you),
            "You are no longer poisoned."
        );
        assert_eq!(
            StatusKind::WaterProtection.cleared_line(&goblin),
            "Goblin's protection against water wears off."
        );
        assert_eq!(
            StatusKind::Reflect.cleared_line(&you),
            "Your mirror barrier fades."
        );
        assert_eq!(
            StatusKind::FireReflect.cleared_line(&you),
            "Your fire mirror shatters."
        );
    }

    #[test]
    fn clear_debuffs_keeps_buffs() {
        let mut set = StatusSet::new();
        set.apply(StatusKind::Poison, None);
        set.apply(StatusKind::Invisible, Some(2));
        assert_eq!(set.clear_debuffs(), vec![StatusKind::Poison]);
        assert!(set.contains(StatusKind::Invisible));
    }
}

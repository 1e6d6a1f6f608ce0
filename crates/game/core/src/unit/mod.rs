//! Units: the player's familiar and the monsters it fights.
//!
//! A [`Unit`] pairs an immutable species ([`UnitTraits`]) with its mutable
//! progress: level, experience, current resources, statuses, a per-instance
//! copy of its talents, and optional spell and ability slots.
//!
//! Every mutator keeps `0 <= hp <= max_hp`, `0 <= mp <= max_mp` and
//! `1 <= level <= max_level`.
mod genus;
mod progress;
mod snapshot;
mod status;
mod talent;

use std::sync::Arc;

pub use genus::Genus;
pub use progress::{award_experience, experience_for};
pub use snapshot::UnitSnapshot;
pub use status::{Status, StatusFamily, StatusKind, StatusSet};
pub use talent::Talent;

use crate::battle::Side;
use crate::config::GameConfig;
use crate::env::{AbilityTraits, Env, LevelTable, OracleError, SpellTraits, StatBlock, UnitTraits};
use crate::narration::Subject;

/// A spell slot: the spell and how far it has been trained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearnedSpell {
    pub traits: Arc<SpellTraits>,
    pub level: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    traits: Arc<UnitTraits>,
    level: u32,
    exp: u32,
    hp: u32,
    mp: u32,
    talents: Talent,
    statuses: StatusSet,
    spell: Option<LearnedSpell>,
    ability: Option<Arc<AbilityTraits>>,
    stats_boost: u32,
}

impl Unit {
    /// Create a fresh unit of `traits` at `level`, at full HP and MP.
    ///
    /// The level is clamped to the level table. Experience starts at the
    /// threshold of that level.
    ///
    /// # Errors
    ///
    /// Returns an `OracleError` if the species' spell or ability is unknown.
    pub fn create(traits: Arc<UnitTraits>, level: u32, env: &Env<'_>) -> Result<Self, OracleError> {
        let tables = env.tables();
        let level = level.clamp(1, tables.levels.max_level());

        let mut spell = match traits.spell.as_deref() {
            Some(name) => Some(LearnedSpell {
                traits: env.spell(name)?,
                level: 1,
            }),
            None => None,
        };
        if spell.is_none() && level >= tables.dormant_spell_level {
            if let Some(name) = traits.dormant_spell.as_deref() {
                spell = Some(LearnedSpell {
                    traits: env.spell(name)?,
                    level: 1,
                });
            }
        }
        let ability = traits.ability.as_deref().map(|name| env.ability(name)).transpose()?;

        let mut unit = Self {
            talents: traits.talents,
            traits,
            level,
            exp: tables.levels.threshold(level).unwrap_or(0),
            hp: 0,
            mp: 0,
            statuses: StatusSet::new(),
            spell,
            ability,
            stats_boost: GameConfig::NEUTRAL_BOOST,
        };
        unit.restore_all();
        Ok(unit)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    pub fn traits(&self) -> &Arc<UnitTraits> {
        &self.traits
    }

    pub fn name(&self) -> &str {
        &self.traits.name
    }

    pub fn genus(&self) -> Genus {
        self.traits.genus
    }

    pub fn subject(&self, side: Side) -> Subject {
        Subject::new(self.name(), side)
    }

    // ========================================================================
    // Derived stats
    // ========================================================================

    fn stats(&self) -> StatBlock {
        self.traits.base.at_level(&self.traits.growth, self.level)
    }

    fn boosted(&self, value: u32, talent: Talent) -> u32 {
        value * self.talents.multiplier(talent) * self.stats_boost / GameConfig::NEUTRAL_BOOST
    }

    /// Max HP; doubled by the HP talent, unaffected by the stats boost.
    pub fn max_hp(&self) -> u32 {
        (self.stats().hp * self.talents.multiplier(Talent::HP_INCREASE)).max(1)
    }

    /// Max MP; doubled by the MP talent, unaffected by the stats boost.
    pub fn max_mp(&self) -> u32 {
        self.stats().mp * self.talents.multiplier(Talent::MP_INCREASE)
    }

    pub fn attack(&self) -> u32 {
        self.boosted(self.stats().attack, Talent::ATTACK_INCREASE).max(1)
    }

    pub fn defense(&self) -> u32 {
        self.boosted(self.stats().defense, Talent::DEFENSE_INCREASE).max(1)
    }

    pub fn luck(&self) -> u32 {
        self.boosted(self.stats().luck, Talent::LUCK_INCREASE)
    }

    /// Flat physical bonus from a weapon ability.
    pub fn weapon_bonus(&self) -> u32 {
        self.ability.as_ref().map_or(0, |ability| ability.weapon_bonus())
    }

    // ========================================================================
    // Progress and resources
    // ========================================================================

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn exp(&self) -> u32 {
        self.exp
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn talents(&self) -> Talent {
        self.talents
    }

    pub fn has_talent(&self, talent: Talent) -> bool {
        self.talents.contains(talent)
    }

    pub fn statuses(&self) -> &StatusSet {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusSet {
        &mut self.statuses
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.contains(kind)
    }

    pub fn spell(&self) -> Option<&LearnedSpell> {
        self.spell.as_ref()
    }

    pub fn ability(&self) -> Option<&Arc<AbilityTraits>> {
        self.ability.as_ref()
    }

    pub fn stats_boost(&self) -> u32 {
        self.stats_boost
    }

    /// Lose up to `amount` HP. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Regain up to `amount` HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_hp() - self.hp);
        self.hp += healed;
        healed
    }

    /// Regain up to `amount` MP. Returns the MP actually restored.
    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_mp() - self.mp);
        self.mp += restored;
        restored
    }

    /// Pay `cost` MP. Returns false, leaving MP untouched, when short.
    pub fn spend_mp(&mut self, cost: u32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    pub fn restore_all(&mut self) {
        self.hp = self.max_hp();
        self.mp = self.max_mp();
    }

    /// Set the temporary stats boost percentage (100 = none).
    pub fn set_stats_boost(&mut self, percent: u32) {
        self.stats_boost = percent.clamp(GameConfig::NEUTRAL_BOOST, GameConfig::MAX_BOOST);
    }

    /// Drop the stats boost. Returns whether one was active.
    pub fn clear_stats_boost(&mut self) -> bool {
        let boosted = self.stats_boost != GameConfig::NEUTRAL_BOOST;
        self.stats_boost = GameConfig::NEUTRAL_BOOST;
        boosted
    }

    /// Learn `spell`, or train it one level if already known.
    ///
    /// Returns the resulting spell level, or `None` when the spell is already
    /// at its maximum level.
    pub fn learn_spell(&mut self, spell: Arc<SpellTraits>) -> Option<u8> {
        match &mut self.spell {
            Some(known) if known.traits.name == spell.name => {
                if known.level >= GameConfig::MAX_SPELL_LEVEL {
                    return None;
                }
                known.level += 1;
                Some(known.level)
            }
            slot => {
                *slot = Some(LearnedSpell {
                    traits: spell,
                    level: 1,
                });
                Some(1)
            }
        }
    }

    /// Train the known spell one level. Returns the new level.
    pub fn train_spell(&mut self) -> Option<u8> {
        let known = self.spell.as_mut()?;
        if known.level >= GameConfig::MAX_SPELL_LEVEL {
            return None;
        }
        known.level += 1;
        Some(known.level)
    }

    /// Move to the level matching `exp` total experience.
    ///
    /// HP and MP grow by the increase of their maximums. Returns the number of
    /// levels gained.
    pub(crate) fn set_exp(&mut self, exp: u32, levels: &LevelTable) -> u32 {
        let before = self.level;
        let (old_hp, old_mp) = (self.max_hp(), self.max_mp());
        self.exp = exp;
        self.level = levels.level_for(exp).max(before);
        self.grow_resources(old_hp, old_mp);
        self.level - before
    }

    /// Jump to `level` directly, fully restored.
    pub fn set_level(&mut self, level: u32, levels: &LevelTable) {
        self.level = level.clamp(1, levels.max_level());
        self.exp = levels.threshold(self.level).unwrap_or(self.exp);
        self.restore_all();
    }

    /// Become `traits`, keeping level, experience, statuses and known spell.
    pub(crate) fn evolve(&mut self, traits: Arc<UnitTraits>, ability: Option<Arc<AbilityTraits>>) {
        let (old_hp, old_mp) = (self.max_hp(), self.max_mp());
        self.talents |= traits.talents;
        self.traits = traits;
        if ability.is_some() {
            self.ability = ability;
        }
        self.grow_resources(old_hp, old_mp);
    }

    fn grow_resources(&mut self, old_max_hp: u32, old_max_mp: u32) {
        let hp_gain = self.max_hp().saturating_sub(old_max_hp);
        let mp_gain = self.max_mp().saturating_sub(old_max_mp);
        self.hp = (self.hp + hp_gain).min(self.max_hp());
        self.mp = (self.mp + mp_gain).min(self.max_mp());
    }

    /// Lines describing the unit for the `stats` command.
    pub fn describe(&self, levels: &LevelTable) -> Vec<String> {
        let mut lines = vec![
            format!("{} ({}) Lv. {}", self.name(), self.genus(), self.level),
            format!(
                "HP {}/{}  MP {}/{}",
                self.hp,
                self.max_hp(),
                self.mp,
                self.max_mp()
            ),
            format!(
                "ATK {}  DEF {}  LUCK {}",
                self.attack(),
                self.defense(),
                self.luck()
            ),
        ];
        match levels.threshold(self.level + 1) {
            Some(next) => lines.push(format!("EXP {} (next level at {})", self.exp, next)),
            None => lines.push(format!("EXP {} (max level)", self.exp)),
        }
        if let Some(spell) = &self.spell {
            lines.push(format!(
                "Spell: {} Lv. {} ({} MP)",
                spell.traits.name, spell.level, spell.traits.mp_cost
            ));
        }
        if let Some(ability) = &self.ability {
            lines.push(format!("Ability: {}", ability.name));
        }
        if !self.talents.is_empty() {
            let names: Vec<String> = self
                .talents
                .iter_names()
                .map(|(name, _)| name.to_ascii_lowercase().replace('_', " "))
                .collect();
            lines.push(format!("Talents: {}", names.join(", ")));
        }
        let statuses: Vec<String> = self
            .statuses
            .iter()
            .map(|kind| match self.statuses.remaining(kind) {
                Some(turns) => format!("{} ({turns})", kind.adjective()),
                None => kind.adjective().to_owned(),
            })
            .collect();
        if !statuses.is_empty() {
            lines.push(format!("Status: {}", statuses.join(", ")));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_registry, unit};

    #[test]
    fn create_starts_full_and_clamps_level() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let ember = unit(&env, "Ember", 99);
        assert_eq!(ember.level(), env.tables().levels.max_level());
        assert_eq!(ember.hp(), ember.max_hp());
        assert_eq!(ember.mp(), ember.max_mp());

        let low = unit(&env, "Ember", 0);
        assert_eq!(low.level(), 1);
    }

    #[test]
    fn resources_stay_in_range() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 3);
        assert_eq!(ember.take_damage(10_000), ember.max_hp());
        assert_eq!(ember.hp(), 0);
        assert!(!ember.is_alive());
        ember.heal(10_000);
        assert_eq!(ember.hp(), ember.max_hp());

        let mp = ember.mp();
        assert!(!ember.spend_mp(mp + 1));
        assert_eq!(ember.mp(), mp);
        assert!(ember.spend_mp(mp));
        assert_eq!(ember.restore_mp(10_000), mp);
    }

    #[test]
    fn hp_talent_doubles_max_hp() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let golem = unit(&env, "Golem", 1);
        let traits = golem.traits();
        assert!(golem.has_talent(Talent::HP_INCREASE));
        assert_eq!(golem.max_hp(), traits.base.hp * 2);
    }

    #[test]
    fn stats_boost_scales_attack_but_not_hp() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        let (attack, max_hp) = (ember.attack(), ember.max_hp());
        ember.set_stats_boost(150);
        assert_eq!(ember.attack(), attack * 3 / 2);
        assert_eq!(ember.max_hp(), max_hp);
        assert!(ember.clear_stats_boost());
        assert_eq!(ember.attack(), attack);
        ember.set_stats_boost(10_000);
        assert_eq!(ember.stats_boost(), GameConfig::MAX_BOOST);
    }

    #[test]
    fn learning_same_spell_trains_it_up_to_max() {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let mut ember = unit(&env, "Ember", 1);
        let fireball = env.spell("Fireball").unwrap();
        assert_eq!(ember.learn_spell(fireball.clone()), Some(2));
        assert_eq!(ember.learn_spell(fireball.clone()), Some(3));
        assert_eq!(ember.learn_spell(fireball), None);
        assert_eq!(ember.spell().unwrap().level, GameConfig::MAX_SPELL_LEVEL);
    }
}

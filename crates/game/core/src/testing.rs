//! Shared fixtures for unit tests.
use std::collections::VecDeque;

use crate::action::{ActionContext, ActionView};
use crate::battle::{BattleContext, BattleOutcome, Side, finish_battle};
use crate::env::{
    AbilityBehavior, AbilityTraits, ActionWeights, CharacterKind, CharacterTraits,
    ContentRegistry, Env, Evolution, FleeChances, ItemBehavior, ItemTraits, LevelTable,
    OracleError, PcgRng, RandomSource, SpellEffect, SpellTraits, StatBlock, Tables, TrapEffect,
    TrapTraits, UnitTraits, WeightTables,
};
use crate::selection::{WeightFormula, WeightedOption};
use crate::state::Inventory;
use crate::unit::{Genus, StatusKind, Talent, Unit};

// ============================================================================
// Random source
// ============================================================================

/// Replays fixed draws, then falls back to a seeded stream.
pub struct ScriptedRng {
    draws: VecDeque<u32>,
    fallback: PcgRng,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: PcgRng::from_seed(0),
        }
    }
}

impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.draws
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_u32())
    }
}

// ============================================================================
// Content
// ============================================================================

fn stats(hp: u32, mp: u32, attack: u32, defense: u32, luck: u32) -> StatBlock {
    StatBlock {
        hp,
        mp,
        attack,
        defense,
        luck,
    }
}

fn species(name: &str, genus: Genus, base: StatBlock, exp_yield: u32) -> UnitTraits {
    UnitTraits {
        name: name.to_owned(),
        description: String::new(),
        genus,
        base,
        growth: stats(4, 2, 3, 2, 1),
        talents: Talent::empty(),
        spell: None,
        dormant_spell: None,
        ability: None,
        weights: ActionWeights::default(),
        evolution: None,
        exp_yield,
    }
}

fn spell(name: &str, genus: Genus, power: u32, mp_cost: u32, effect: SpellEffect) -> SpellTraits {
    SpellTraits {
        name: name.to_owned(),
        genus,
        power,
        mp_cost,
        effect,
    }
}

fn ability(name: &str, mp_cost: u32, behavior: AbilityBehavior) -> AbilityTraits {
    AbilityTraits {
        name: name.to_owned(),
        mp_cost,
        behavior,
    }
}

fn item(name: &str, behavior: ItemBehavior) -> ItemTraits {
    ItemTraits {
        name: name.to_owned(),
        description: String::new(),
        behavior,
    }
}

fn trap(name: &str, description: &str, effect: TrapEffect) -> TrapTraits {
    TrapTraits {
        name: name.to_owned(),
        description: description.to_owned(),
        effect,
    }
}

fn character(name: &str, kind: CharacterKind, greeting: &str) -> CharacterTraits {
    CharacterTraits {
        name: name.to_owned(),
        kind,
        greeting: greeting.to_owned(),
    }
}

/// Flat weight 1 for every name.
pub fn uniform(names: &[&str]) -> Vec<WeightedOption> {
    names
        .iter()
        .map(|name| WeightedOption::new(*name, WeightFormula::Static { weight: 1 }))
        .collect()
}

fn tables() -> Tables {
    Tables {
        max_floor: 10,
        inventory_capacity: 5,
        prepare_turns: 2,
        flee: FleeChances {
            prepare: 75,
            battle: 40,
        },
        enemy_level_spread: 1,
        dormant_spell_level: 5,
        starters: vec!["Ember".to_owned(), "Puddle".to_owned()],
        levels: LevelTable::new(vec![10, 30, 60, 100, 150, 210, 280, 360, 450]),
        weights: WeightTables {
            events: uniform(&["battle", "item", "trap", "character", "elevator", "familiar"]),
            monsters: uniform(&["Goblin", "Husk", "Siren"]),
            items: uniform(&["Potion", "Ether", "Bomb"]),
            traps: uniform(&["Spike Pit", "Sleeping Gas", "Alarm Bell", "Trapdoor"]),
            characters: uniform(&["Merchant", "Cleric", "Old Sage"]),
            familiars: uniform(&["Sprite", "Golem"]),
            trades: uniform(&["Potion"]),
        },
    }
}

/// Small but complete content set used across the crate's tests.
pub fn fixture_registry() -> ContentRegistry {
    let mut registry = ContentRegistry::new(tables());

    let mut ember = species("Ember", Genus::Fire, stats(30, 12, 20, 6, 40), 5);
    ember.spell = Some("Fireball".into());
    ember.ability = Some("Focus".into());
    ember.evolution = Some(Evolution {
        into: "Blazewing".into(),
        level: 4,
    });

    let mut blazewing = species("Blazewing", Genus::Fire, stats(44, 16, 28, 10, 44), 8);
    blazewing.talents = Talent::QUICK;
    blazewing.spell = Some("Fireball".into());
    blazewing.ability = Some("Claws".into());

    let mut puddle = species("Puddle", Genus::Water, stats(28, 10, 14, 8, 30), 5);
    puddle.dormant_spell = Some("Tidal Wave".into());
    puddle.ability = Some("Mend".into());

    let mut goblin = species("Goblin", Genus::Empty, stats(40, 0, 9, 5, 10), 4);
    goblin.weights = ActionWeights { attack: 1, spell: 0 };

    let mut golem = species("Golem", Genus::Empty, stats(35, 0, 12, 12, 5), 6);
    golem.talents = Talent::HP_INCREASE;

    let mut sprite = species("Sprite", Genus::Wind, stats(22, 10, 11, 4, 35), 4);
    sprite.talents = Talent::QUICK;
    sprite.spell = Some("Gust".into());

    let mut mirror_imp = species("Mirror Imp", Genus::Empty, stats(25, 10, 8, 5, 20), 5);
    mirror_imp.spell = Some("Mirror".into());

    let husk = species("Husk", Genus::Empty, stats(12, 0, 6, 2, 0), 2);

    let mut bramble = species("Bramble", Genus::Wind, stats(30, 0, 8, 6, 10), 4);
    bramble.talents = Talent::THORNS;

    let mut siren = species("Siren", Genus::Water, stats(26, 12, 8, 4, 20), 5);
    siren.spell = Some("Lullaby".into());
    siren.weights = ActionWeights { attack: 1, spell: 3 };

    let mut cleanser = species("Cleanser", Genus::Empty, stats(30, 6, 8, 5, 10), 4);
    cleanser.ability = Some("Purify".into());

    for unit in [
        ember, blazewing, puddle, goblin, golem, sprite, mirror_imp, husk, bramble, siren,
        cleanser,
    ] {
        registry.add_unit(unit);
    }

    for spell in [
        spell("Fireball", Genus::Fire, 8, 4, SpellEffect::Damage),
        spell("Tidal Wave", Genus::Water, 10, 5, SpellEffect::Damage),
        spell("Gust", Genus::Wind, 6, 3, SpellEffect::Damage),
        spell("Mirror", Genus::Empty, 0, 2, SpellEffect::Reflect { turns: 3 }),
        spell(
            "Lullaby",
            Genus::Empty,
            0,
            3,
            SpellEffect::Inflict {
                status: StatusKind::Sleep,
                turns: 2,
                chance: 60,
            },
        ),
        spell("Ward", Genus::Fire, 0, 2, SpellEffect::Protect { turns: 3 }),
        spell("Cure Light", Genus::Empty, 0, 3, SpellEffect::Heal { amount: 20 }),
    ] {
        registry.add_spell(spell);
    }

    for ability in [
        ability("Focus", 3, AbilityBehavior::Focus { boost: 150 }),
        ability("Claws", 0, AbilityBehavior::Weapon { bonus: 4 }),
        ability("Mend", 2, AbilityBehavior::Heal { percent: 30 }),
        ability("Purify", 2, AbilityBehavior::Purify),
    ] {
        registry.add_ability(ability);
    }

    for item in [
        item("Potion", ItemBehavior::RestoreHp { amount: 30 }),
        item("Hi-Potion", ItemBehavior::RestoreHp { amount: 80 }),
        item("Ether", ItemBehavior::RestoreMp { amount: 20 }),
        item("Antidote", ItemBehavior::Cure),
        item("Elixir", ItemBehavior::Elixir),
        item("Holy Scroll", ItemBehavior::HolyScroll { turns: 3 }),
        item("Bomb", ItemBehavior::Bomb { damage: 25 }),
        item("Smoke Bomb", ItemBehavior::SmokeBomb),
        item(
            "Tome of Tides",
            ItemBehavior::Tome {
                spell: "Tidal Wave".into(),
            },
        ),
    ] {
        registry.add_item(item);
    }

    for trap in [
        trap("Spike Pit", "Spikes jut from the floor.", TrapEffect::Damage { percent: 20 }),
        trap(
            "Sleeping Gas",
            "A sweet mist fills the corridor.",
            TrapEffect::Inflict {
                status: StatusKind::Poison,
                turns: 3,
            },
        ),
        trap("Alarm Bell", "A bell rings out.", TrapEffect::Alarm),
        trap("Trapdoor", "The floor gives way.", TrapEffect::Pitfall),
    ] {
        registry.add_trap(trap);
    }

    for character in [
        character("Merchant", CharacterKind::Trader, "Care for a swap?"),
        character("Cleric", CharacterKind::Healer, "Rest a moment."),
        character("Old Sage", CharacterKind::Sage, "Knowledge is power."),
    ] {
        registry.add_character(character);
    }

    registry
}

/// Creates `name` at `level`, panicking on unknown content.
pub fn unit(env: &Env<'_>, name: &str, level: u32) -> Unit {
    let traits = env.unit(name).unwrap();
    Unit::create(traits, level, env).unwrap()
}

// ============================================================================
// Battle scenario
// ============================================================================

/// A familiar already in battle, with an empty inventory.
pub struct Scenario {
    registry: ContentRegistry,
    pub familiar: Unit,
    pub battle: BattleContext,
    pub inventory: Inventory,
}

impl Scenario {
    pub fn battle(familiar: &str, level: u32, enemy: &str, enemy_level: u32) -> Self {
        let registry = fixture_registry();
        let env = Env::from_registry(&registry);
        let familiar = unit(&env, familiar, level);
        let battle = BattleContext::new(unit(&env, enemy, enemy_level), 0);
        let inventory = Inventory::new(env.tables().inventory_capacity);
        Self {
            registry,
            familiar,
            battle,
            inventory,
        }
    }

    pub fn enemy(&self) -> &Unit {
        &self.battle.enemy
    }

    pub fn enemy_mut(&mut self) -> &mut Unit {
        &mut self.battle.enemy
    }

    pub fn give(&mut self, name: &str) {
        let item = Env::from_registry(&self.registry).item(name).unwrap();
        self.inventory.push(item).unwrap();
    }

    pub fn player_ctx<'a>(&'a mut self, rng: &'a mut dyn RandomSource) -> ActionContext<'a> {
        self.context(Side::Player, true, rng)
    }

    pub fn enemy_ctx<'a>(&'a mut self, rng: &'a mut dyn RandomSource) -> ActionContext<'a> {
        self.context(Side::Enemy, true, rng)
    }

    /// Player context with no battle, as between events.
    pub fn outside_ctx<'a>(&'a mut self, rng: &'a mut dyn RandomSource) -> ActionContext<'a> {
        self.context(Side::Player, false, rng)
    }

    fn context<'a>(
        &'a mut self,
        performer: Side,
        in_battle: bool,
        rng: &'a mut dyn RandomSource,
    ) -> ActionContext<'a> {
        ActionContext::new(
            performer,
            &mut self.familiar,
            in_battle.then_some(&mut self.battle),
            &mut self.inventory,
            Env::from_registry(&self.registry),
            rng,
        )
    }

    pub fn view(&self, performer: Side) -> ActionView<'_> {
        ActionView::new(
            performer,
            &self.familiar,
            Some(&self.battle),
            &self.inventory,
        )
    }

    pub fn finish(&mut self) -> Result<BattleOutcome, OracleError> {
        let env = Env::from_registry(&self.registry);
        finish_battle(&mut self.familiar, &self.battle, &env)
    }
}

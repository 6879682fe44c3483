//! Static tile definitions shared by every map and entity.
//!
//! Tiles are immutable and live for the whole program. Grid cells and
//! entities hold [`TileRef`] values pointing into these tables and never own
//! a tile themselves.

/// Shared, non-owning reference to a static tile definition.
pub type TileRef = &'static Tile;

/// Immutable description of something that can appear on the map.
#[derive(Debug, PartialEq, Eq)]
pub struct Tile {
    name: &'static str,
    sprite_id: u16,
    blocked: bool,
    kind: TileKind,
}

impl Tile {
    /// Creates a new tile definition.
    #[must_use]
    pub const fn new(name: &'static str, sprite_id: u16, blocked: bool, kind: TileKind) -> Self {
        Self {
            name,
            sprite_id,
            blocked,
            kind,
        }
    }

    /// Stable name of the tile.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Sprite drawn for the tile.
    #[must_use]
    pub const fn sprite_id(&self) -> u16 {
        self.sprite_id
    }

    /// Reports whether a background tile of this kind blocks movement.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Behaviour attached to the tile.
    #[must_use]
    pub const fn kind(&self) -> &TileKind {
        &self.kind
    }
}

/// Behaviour attached to a tile.
#[derive(Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Walkable ground.
    Floor,
    /// Impassable wall.
    Wall,
    /// Inert decoration.
    Decoration,
    /// Marker left behind by a slain being.
    BloodSplat,
    /// Collectable item.
    Item(Item),
    /// Level exit.
    Exit,
    /// Locked door that needs a key.
    Door,
    /// The player character.
    Player,
    /// A monster species.
    Monster(MonsterStats),
    /// Attack spell firing missiles.
    AttackSpell(AttackSpell),
    /// Utility spell.
    SecondarySpell(SecondarySpell),
}

/// Collectable items found in the object layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    /// Opens one door.
    Key,
    /// Restores life.
    LifePotion {
        /// Life restored.
        life: i32,
    },
    /// Restores mana.
    ManaPotion {
        /// Mana restored.
        mana: i32,
    },
    /// Adds to the score.
    Treasure {
        /// Score awarded.
        score: u32,
    },
}

/// How a monster species picks its moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterMotion {
    /// Walks straight ahead and turns clockwise when blocked.
    Dumb,
    /// Scores each direction by desire and hunts the player.
    Pursuit,
}

/// Stats of a monster species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterStats {
    /// Life a freshly spawned monster starts with.
    pub start_health: i32,
    /// Damage dealt to an adjacent player.
    pub attack: i32,
    /// Movement behaviour.
    pub motion: MonsterMotion,
}

/// Parameters of an attack spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackSpell {
    /// Damage a missile deals on impact.
    pub damage: i32,
    /// Mana spent per cast.
    pub mana_cost: i32,
    /// Number of missiles of this spell allowed in flight at once.
    pub max_missiles: usize,
}

/// Parameters of a utility spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecondarySpell {
    /// Mana spent per cast.
    pub mana_cost: i32,
    /// What the spell does.
    pub effect: SpellEffect,
}

/// Effects of utility spells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpellEffect {
    /// Converts mana into life.
    Heal {
        /// Life restored per cast.
        life: i32,
    },
    /// Sends a map manifestation that reveals the map as it travels.
    MagicMap {
        /// Mana spent per step of the manifestation.
        mana_per_step: i32,
    },
    /// Sends an eyeball the camera follows.
    SpyEye {
        /// Mana spent per step of the eyeball.
        mana_per_step: i32,
    },
}

/// Walkable ground.
pub static FLOOR: Tile = Tile::new("floor", 0, false, TileKind::Floor);
/// Impassable wall.
pub static WALL: Tile = Tile::new("wall", 1, true, TileKind::Wall);
/// Decorative rubble that does not block.
pub static RUBBLE: Tile = Tile::new("rubble", 2, false, TileKind::Decoration);
/// Left behind where a being dies.
pub static BLOOD_SPLAT: Tile = Tile::new("blood_splat", 3, false, TileKind::BloodSplat);

/// Door key.
pub static KEY: Tile = Tile::new("key", 10, false, TileKind::Item(Item::Key));
/// Small life potion.
pub static LIFE_POTION: Tile = Tile::new(
    "life_potion",
    11,
    false,
    TileKind::Item(Item::LifePotion { life: 25 }),
);
/// Small mana potion.
pub static MANA_POTION: Tile = Tile::new(
    "mana_potion",
    12,
    false,
    TileKind::Item(Item::ManaPotion { mana: 25 }),
);
/// Treasure chest.
pub static TREASURE: Tile = Tile::new(
    "treasure",
    13,
    false,
    TileKind::Item(Item::Treasure { score: 50 }),
);
/// Level exit.
pub static EXIT: Tile = Tile::new("exit", 14, false, TileKind::Exit);
/// Locked door.
pub static DOOR: Tile = Tile::new("door", 15, false, TileKind::Door);

/// The player; the facing direction value is added to the sprite.
pub static PLAYER: Tile = Tile::new("player", 26, false, TileKind::Player);

/// Slow wanderer without awareness of the player.
pub static SKELETON: Tile = Tile::new(
    "skeleton",
    40,
    false,
    TileKind::Monster(MonsterStats {
        start_health: 2,
        attack: 2,
        motion: MonsterMotion::Dumb,
    }),
);
/// Hunter that follows the player.
pub static GOBLIN: Tile = Tile::new(
    "goblin",
    41,
    false,
    TileKind::Monster(MonsterStats {
        start_health: 3,
        attack: 3,
        motion: MonsterMotion::Pursuit,
    }),
);
/// Tough hunter that follows the player.
pub static TROLL: Tile = Tile::new(
    "troll",
    42,
    false,
    TileKind::Monster(MonsterStats {
        start_health: 8,
        attack: 6,
        motion: MonsterMotion::Pursuit,
    }),
);

/// Cheap single-damage bolt.
pub static LIGHTNING: Tile = Tile::new(
    "lightning",
    60,
    false,
    TileKind::AttackSpell(AttackSpell {
        damage: 1,
        mana_cost: 4,
        max_missiles: 3,
    }),
);
/// Heavier ball.
pub static BIG_BALL: Tile = Tile::new(
    "big_ball",
    61,
    false,
    TileKind::AttackSpell(AttackSpell {
        damage: 2,
        mana_cost: 9,
        max_missiles: 2,
    }),
);
/// Expensive cube that kills most monsters outright.
pub static COOL_CUBE: Tile = Tile::new(
    "cool_cube",
    62,
    false,
    TileKind::AttackSpell(AttackSpell {
        damage: 4,
        mana_cost: 20,
        max_missiles: 1,
    }),
);

/// Converts mana into life.
pub static HEAL: Tile = Tile::new(
    "heal",
    70,
    false,
    TileKind::SecondarySpell(SecondarySpell {
        mana_cost: 10,
        effect: SpellEffect::Heal { life: 20 },
    }),
);
/// Reveals the map around a travelling manifestation.
pub static MAGIC_MAP: Tile = Tile::new(
    "magic_map",
    71,
    false,
    TileKind::SecondarySpell(SecondarySpell {
        mana_cost: 5,
        effect: SpellEffect::MagicMap { mana_per_step: 1 },
    }),
);
/// Sends an eyeball to scout ahead.
pub static SPY_EYE: Tile = Tile::new(
    "spy_eye",
    72,
    false,
    TileKind::SecondarySpell(SecondarySpell {
        mana_cost: 5,
        effect: SpellEffect::SpyEye { mana_per_step: 1 },
    }),
);

/// Attack spells in spellbook order.
pub static PRIMARY_SPELLS: [TileRef; 3] = [&LIGHTNING, &BIG_BALL, &COOL_CUBE];

/// Utility spells in spellbook order.
pub static SECONDARY_SPELLS: [TileRef; 3] = [&HEAL, &MAGIC_MAP, &SPY_EYE];

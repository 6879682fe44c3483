use magic_maze_core::{
    tiles, Command, Direction, Event, Impulse, Inventory, Item, Layer, LevelState, Plane,
    PlayerStatus, Position, SoundCue, SpellSlot,
};
use magic_maze_world::{self as world, query, EntityKind, Map, World, WorldError};

fn room(start: Position) -> Map {
    let mut map = Map::new(12, 12, &tiles::FLOOR);
    assert!(map.set_player_start(start));
    map
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn step(world: &mut World, impulse: Impulse) -> Vec<Event> {
    let _ = run(world, Command::SetImpulse { impulse });
    run(world, Command::TickPlayer)
}

#[test]
fn world_requires_an_enterable_start() {
    let map = Map::new(3, 3, &tiles::FLOOR);
    assert_eq!(
        World::new(map, None, 0).err(),
        Some(WorldError::MissingPlayerStart)
    );

    let mut map = room(Position::new(1, 1));
    assert!(map.set_tile(Layer::Background, Position::new(1, 1), Some(&tiles::WALL)));
    assert_eq!(
        World::new(map, None, 0).err(),
        Some(WorldError::PlayerStartBlocked { x: 1, y: 1 })
    );
}

#[test]
fn blocked_move_leaves_everything_unchanged() {
    let mut map = room(Position::new(3, 3));
    assert!(map.set_tile(Layer::Background, Position::new(3, 2), Some(&tiles::WALL)));
    let mut world = World::new(map, None, 0).expect("world");

    let events = step(&mut world, Impulse::MoveForward);
    assert!(events.is_empty());
    assert_eq!(query::player_position(&world), Position::new(3, 3));
    assert_eq!(
        query::map(&world).occupant(Plane::Physical, Position::new(3, 3)),
        Some(query::player(&world))
    );
}

#[test]
fn turning_does_not_move() {
    let mut world = World::new(room(Position::new(3, 3)), None, 0).expect("world");
    let _ = step(&mut world, Impulse::TurnTo(Direction::West));
    assert_eq!(query::player_direction(&world), Direction::West);
    assert_eq!(query::player_position(&world), Position::new(3, 3));

    let _ = step(&mut world, Impulse::MoveForward);
    assert_eq!(query::player_position(&world), Position::new(2, 3));
}

#[test]
fn impulse_is_consumed_by_one_tick() {
    let mut world = World::new(room(Position::new(3, 5)), None, 0).expect("world");
    let _ = step(&mut world, Impulse::MoveForward);
    let _ = run(&mut world, Command::TickPlayer);
    assert_eq!(query::player_position(&world), Position::new(3, 4));
}

#[test]
fn key_opens_door_without_moving_the_player() {
    let mut map = room(Position::new(3, 3));
    let door = map.spawn_door(Position::new(3, 2)).expect("door");
    let status = PlayerStatus {
        inventory: Inventory { keys: 1 },
        ..PlayerStatus::default()
    };
    let mut world = World::new(map, Some(status), 0).expect("world");

    let events = step(&mut world, Impulse::MoveForward);
    assert_eq!(
        events,
        vec![
            Event::DoorOpened {
                at: Position::new(3, 2)
            },
            Event::Sound {
                cue: SoundCue::Door
            },
        ]
    );
    assert_eq!(query::player_position(&world), Position::new(3, 3));
    assert_eq!(query::player_status(&world).inventory.keys, 0);
    assert_eq!(
        query::map(&world).occupant(Plane::Physical, Position::new(3, 2)),
        None
    );
    assert_eq!(
        query::map(&world).entity(door).map(|entity| entity.kind()),
        Some(EntityKind::Door)
    );

    let _ = step(&mut world, Impulse::MoveForward);
    assert_eq!(query::player_position(&world), Position::new(3, 2));
}

#[test]
fn door_stays_shut_without_a_key() {
    let mut map = room(Position::new(3, 3));
    let door = map.spawn_door(Position::new(3, 2)).expect("door");
    let mut world = World::new(map, None, 0).expect("world");

    let events = step(&mut world, Impulse::MoveForward);
    assert!(events.is_empty());
    assert_eq!(
        query::map(&world).occupant(Plane::Physical, Position::new(3, 2)),
        Some(door)
    );
}

#[test]
fn items_are_collected_on_entry() {
    let mut map = room(Position::new(3, 8));
    let column = [
        (Position::new(3, 7), &tiles::KEY),
        (Position::new(3, 6), &tiles::MANA_POTION),
        (Position::new(3, 5), &tiles::TREASURE),
        (Position::new(3, 4), &tiles::LIFE_POTION),
    ];
    for (cell, tile) in column {
        assert!(map.set_tile(Layer::Object, cell, Some(tile)));
    }
    let status = PlayerStatus {
        life: 60,
        mana: 50,
        ..PlayerStatus::default()
    };
    let mut world = World::new(map, Some(status), 0).expect("world");

    let mut collected = Vec::new();
    for _ in 0..4 {
        for event in step(&mut world, Impulse::MoveForward) {
            if let Event::ItemCollected { item } = event {
                collected.push(item);
            }
        }
    }

    assert_eq!(
        collected,
        vec![
            Item::Key,
            Item::ManaPotion { mana: 25 },
            Item::Treasure { score: 50 },
            Item::LifePotion { life: 25 },
        ]
    );
    let status = query::player_status(&world);
    assert_eq!(status.inventory.keys, 1);
    assert_eq!(status.mana, 75);
    assert_eq!(status.score, 50);
    assert_eq!(status.life, 85);
    for (cell, _) in column {
        assert_eq!(query::map(&world).object(cell), None);
    }
}

#[test]
fn exit_requests_next_level() {
    let mut map = room(Position::new(3, 3));
    assert!(map.set_tile(Layer::Object, Position::new(3, 2), Some(&tiles::EXIT)));
    let mut world = World::new(map, None, 0).expect("world");

    let events = step(&mut world, Impulse::MoveForward);
    assert_eq!(
        events,
        vec![Event::StateChangeRequested {
            state: LevelState::NextLevel
        }]
    );
}

#[test]
fn adjacent_monster_hurts_every_fourth_tick() {
    let mut map = room(Position::new(3, 3));
    let _ = map.spawn_monster(Position::new(4, 3), &tiles::GOBLIN);
    let mut world = World::new(map, None, 0).expect("world");

    for _ in 0..3 {
        assert!(run(&mut world, Command::TickPlayer).is_empty());
    }
    let events = run(&mut world, Command::TickPlayer);
    assert_eq!(
        events,
        vec![
            Event::PlayerHurt { life: 97 },
            Event::Sound {
                cue: SoundCue::Ouch
            },
        ]
    );
}

#[test]
fn lethal_contact_requests_player_death() {
    let mut map = room(Position::new(3, 3));
    let _ = map.spawn_monster(Position::new(3, 4), &tiles::TROLL);
    let status = PlayerStatus {
        life: 5,
        ..PlayerStatus::default()
    };
    let mut world = World::new(map, Some(status), 0).expect("world");

    let mut last = Vec::new();
    for _ in 0..4 {
        last = run(&mut world, Command::TickPlayer);
    }
    assert_eq!(
        last,
        vec![Event::StateChangeRequested {
            state: LevelState::PlayerDied
        }]
    );
    assert_eq!(
        query::map(&world).object(Position::new(3, 3)),
        Some(&tiles::BLOOD_SPLAT)
    );
    assert_eq!(query::player_status(&world).life, 0);
}

#[test]
fn spy_eye_takes_the_camera_until_cancelled() {
    let mut world = World::new(room(Position::new(5, 5)), None, 0).expect("world");
    let _ = run(
        &mut world,
        Command::PageSpell {
            slot: SpellSlot::Secondary,
            step: 2,
        },
    );
    let events = run(
        &mut world,
        Command::CastSpell {
            slot: SpellSlot::Secondary,
        },
    );
    let projection = query::projection(&world).expect("eyeball is in control");
    assert!(events.contains(&Event::ProjectionStarted { projection }));
    assert_eq!(query::player_status(&world).mana, 95);

    let _ = run(
        &mut world,
        Command::SteerProjection {
            direction: Direction::East,
        },
    );
    assert_eq!(query::camera_center(&world), Position::new(6, 5));
    assert_eq!(query::player_position(&world), Position::new(5, 5));
    assert_eq!(query::player_status(&world).mana, 94);
    assert_eq!(
        query::map(&world).occupant(Plane::Spiritual, Position::new(6, 5)),
        Some(projection)
    );

    let events = run(&mut world, Command::CancelProjection);
    assert_eq!(events, vec![Event::ProjectionEnded { projection }]);
    assert_eq!(query::projection(&world), None);
    assert_eq!(query::camera_center(&world), Position::new(5, 5));
    assert_eq!(
        query::map(&world).occupant(Plane::Spiritual, Position::new(6, 5)),
        None
    );
}

#[test]
fn map_manifestation_reveals_only_when_it_moved() {
    let mut map = room(Position::new(1, 5));
    assert!(map.set_tile(Layer::Background, Position::new(1, 4), Some(&tiles::WALL)));
    let mut world = World::new(map, None, 0).expect("world");
    let _ = run(
        &mut world,
        Command::PageSpell {
            slot: SpellSlot::Secondary,
            step: 1,
        },
    );
    let events = run(
        &mut world,
        Command::CastSpell {
            slot: SpellSlot::Secondary,
        },
    );
    assert!(
        events
            .iter()
            .all(|event| !matches!(event, Event::MapRevealed { .. })),
        "nothing is revealed before the first step"
    );

    let events = run(
        &mut world,
        Command::SteerProjection {
            direction: Direction::North,
        },
    );
    assert!(events.is_empty(), "a wall ahead keeps it in place");

    let events = run(
        &mut world,
        Command::SteerProjection {
            direction: Direction::East,
        },
    );
    assert_eq!(
        events,
        vec![Event::MapRevealed {
            center: Position::new(6, 5)
        }]
    );
    assert_eq!(
        query::camera_center(&world),
        Position::new(1, 5),
        "only eyeballs move the camera"
    );
}

#[test]
fn projection_ends_when_caster_runs_dry() {
    let status = PlayerStatus {
        mana: 6,
        secondary_spell: 2,
        ..PlayerStatus::default()
    };
    let mut world = World::new(room(Position::new(5, 5)), Some(status), 0).expect("world");
    let _ = run(
        &mut world,
        Command::CastSpell {
            slot: SpellSlot::Secondary,
        },
    );
    let projection = query::projection(&world).expect("eyeball");

    let first = run(
        &mut world,
        Command::SteerProjection {
            direction: Direction::South,
        },
    );
    assert!(first.is_empty());
    assert_eq!(query::player_status(&world).mana, 0);

    let second = run(
        &mut world,
        Command::SteerProjection {
            direction: Direction::South,
        },
    );
    assert_eq!(second, vec![Event::ProjectionEnded { projection }]);
    assert_eq!(query::projection(&world), None);
}

#[test]
fn scene_view_stacks_layers_around_the_centre() {
    let mut map = room(Position::new(1, 1));
    assert!(map.set_tile(Layer::Object, Position::new(2, 1), Some(&tiles::KEY)));
    assert!(map.set_tile(Layer::Background, Position::new(0, 1), Some(&tiles::WALL)));
    let world = World::new(map, None, 0).expect("world");

    let view = query::scene_view(&world, Position::new(1, 1), 1, 1);
    assert_eq!(view.dimensions(), (3, 3));
    let centre = view.cell(1, 1).expect("centre");
    assert_eq!(
        centre.entity,
        Some(tiles::PLAYER.sprite_id() + u16::from(Direction::North.value()))
    );
    assert_eq!(view.cell(2, 1).and_then(|cell| cell.object), Some(tiles::KEY.sprite_id()));
    assert_eq!(
        view.cell(0, 1).and_then(|cell| cell.background),
        Some(tiles::WALL.sprite_id())
    );

    let corner = query::scene_view(&world, Position::new(0, 0), 1, 1);
    assert_eq!(corner.cell(0, 0).and_then(|cell| cell.background), None);
}

#[test]
fn hud_reports_the_selected_spells() {
    let mut world = World::new(room(Position::new(1, 1)), None, 0).expect("world");
    let _ = run(
        &mut world,
        Command::PageSpell {
            slot: SpellSlot::Primary,
            step: 1,
        },
    );
    let hud = query::hud(&world);
    assert_eq!(hud.life, 100);
    assert_eq!(hud.primary_sprite, tiles::BIG_BALL.sprite_id());
    assert_eq!(hud.secondary_sprite, tiles::HEAL.sprite_id());
}

use std::collections::HashSet;

use magic_maze_core::{Direction, MonsterMotion, Position};
use magic_maze_system_monster_ai::{
    choose_direction, Action, Body, Desires, MonsterBrain, BASE_DESIRE, DESIRE_SPREAD,
    SLEEP_AFTER_BLOCKED_STEP, SLEEP_AFTER_STEP, SLEEP_AFTER_TURN,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug)]
struct TestBody {
    position: Position,
    facing: Direction,
    walls: HashSet<Position>,
    columns: i32,
    rows: i32,
    jam_steps: bool,
}

impl TestBody {
    fn open(position: Position, facing: Direction) -> Self {
        Self {
            position,
            facing,
            walls: HashSet::new(),
            columns: 11,
            rows: 11,
            jam_steps: false,
        }
    }

    fn wall(mut self, cell: Position) -> Self {
        let _ = self.walls.insert(cell);
        self
    }
}

impl Body for TestBody {
    fn position(&self) -> Position {
        self.position
    }

    fn facing(&self) -> Direction {
        self.facing
    }

    fn face(&mut self, direction: Direction) {
        self.facing = direction;
    }

    fn can_enter(&self, target: Position) -> bool {
        (0..self.columns).contains(&target.x())
            && (0..self.rows).contains(&target.y())
            && !self.walls.contains(&target)
    }

    fn move_forward(&mut self) -> bool {
        let target = self.position.step(self.facing);
        if self.jam_steps || !self.can_enter(target) {
            return false;
        }
        self.position = target;
        true
    }
}

#[test]
fn base_desires_stay_in_documented_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..500 {
        let desires = Desires::draw(&mut rng);
        for direction in Direction::ALL {
            let score = desires.score(direction);
            assert!(
                (BASE_DESIRE..BASE_DESIRE + DESIRE_SPREAD).contains(&score),
                "score {score} outside 175..=209"
            );
        }
    }
}

#[test]
fn player_strictly_north_is_always_pursued() {
    let monster = Position::new(5, 5);
    let player = Position::new(5, 1);
    for seed in 0..200 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for facing in Direction::ALL {
            let choice = choose_direction(Desires::draw(&mut rng), monster, player, facing, |_| true);
            assert_eq!(choice, Some(Direction::North), "seed {seed} facing {facing:?}");
        }
    }
}

#[test]
fn blocked_direction_is_never_selected() {
    let monster = Position::new(5, 5);
    let player = Position::new(5, 0);
    let wall = monster.step(Direction::North);
    for seed in 0..200 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let choice = choose_direction(
            Desires::draw(&mut rng),
            monster,
            player,
            Direction::North,
            |target| target != wall,
        );
        assert_ne!(choice, Some(Direction::North));
        assert!(choice.is_some());
    }
}

#[test]
fn fully_enclosed_monster_does_not_move() {
    let monster = Position::new(2, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let choice = choose_direction(
        Desires::draw(&mut rng),
        monster,
        Position::new(9, 9),
        Direction::East,
        |_| false,
    );
    assert_eq!(choice, None);
}

#[test]
fn momentum_only_breaks_narrow_margins() {
    let here = Position::new(4, 4);

    let narrow = Desires::from_scores([200, 215, 190, 180]);
    assert_eq!(
        choose_direction(narrow, here, here, Direction::North, |_| true),
        Some(Direction::North),
        "a margin of 15 is absorbed by the momentum bonus"
    );

    let wide = Desires::from_scores([200, 216, 190, 180]);
    assert_eq!(
        choose_direction(wide, here, here, Direction::North, |_| true),
        Some(Direction::East),
        "a margin above 15 keeps the better direction"
    );
}

#[test]
fn pursuit_monster_steps_toward_player_once_awake() {
    let spawn = Position::new(5, 5);
    let player = Position::new(5, 1);
    let mut body = TestBody::open(spawn, Direction::East);
    let mut brain = MonsterBrain::new(MonsterMotion::Pursuit, spawn);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let initial = brain.sleep();
    for _ in 0..initial {
        assert_eq!(brain.tick(&mut body, Some(player), &mut rng), Action::Slept);
    }
    assert_eq!(body.position(), spawn);

    let action = brain.tick(&mut body, Some(player), &mut rng);
    assert_eq!(action, Action::Stepped(Direction::North));
    assert_eq!(body.position(), Position::new(5, 4));
    assert_eq!(body.facing(), Direction::North);
    assert_eq!(brain.sleep(), SLEEP_AFTER_STEP);
}

#[test]
fn vanished_cell_leads_to_short_retry() {
    let spawn = Position::new(3, 3);
    let mut body = TestBody::open(spawn, Direction::North);
    body.jam_steps = true;
    let mut brain = MonsterBrain::new(MonsterMotion::Pursuit, spawn);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut action = Action::Slept;
    while action == Action::Slept {
        action = brain.tick(&mut body, Some(Position::new(3, 0)), &mut rng);
    }

    assert_eq!(action, Action::Blocked(Direction::North));
    assert_eq!(brain.sleep(), SLEEP_AFTER_BLOCKED_STEP);
    assert_eq!(body.position(), spawn);
}

#[test]
fn wandering_monster_turns_clockwise_at_walls() {
    let spawn = Position::new(1, 1);
    let mut body = TestBody::open(spawn, Direction::North).wall(Position::new(1, 0));
    let mut brain = MonsterBrain::new(MonsterMotion::Dumb, spawn);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let mut action = Action::Slept;
    while action == Action::Slept {
        action = brain.tick(&mut body, None, &mut rng);
    }
    assert_eq!(action, Action::Turned(Direction::East));
    assert_eq!(brain.sleep(), SLEEP_AFTER_TURN);

    let mut action = Action::Slept;
    while action == Action::Slept {
        action = brain.tick(&mut body, None, &mut rng);
    }
    assert_eq!(action, Action::Stepped(Direction::East));
    assert_eq!(body.position(), Position::new(2, 1));
}

#[test]
fn missing_player_removes_positional_bias() {
    let spawn = Position::new(5, 5);
    let mut body = TestBody::open(spawn, Direction::West);
    let mut brain = MonsterBrain::new(MonsterMotion::Pursuit, spawn);
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let mut action = Action::Slept;
    while action == Action::Slept {
        action = brain.tick(&mut body, None, &mut rng);
    }
    assert!(matches!(action, Action::Stepped(_)));
    let moved = body.position();
    assert_eq!(moved.x().abs_diff(spawn.x()) + moved.y().abs_diff(spawn.y()), 1);
}

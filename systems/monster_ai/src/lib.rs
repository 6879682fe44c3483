#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster decision making: desire-scored pursuit and the wandering fallback.
//!
//! In pursuit every direction draws a base desire from `175..=209` and the
//! player's relative position biases it strongly toward the player. The
//! current facing earns a small momentum bonus and blocked directions score
//! zero. The highest score wins, with ties going to the first direction in
//! [`Direction::ALL`] order.

use magic_maze_core::{Direction, MonsterMotion, Position};
use rand::Rng;

/// Lowest base desire a direction can draw.
pub const BASE_DESIRE: i32 = 175;
/// Number of distinct base desire values, giving the range `175..=209`.
pub const DESIRE_SPREAD: i32 = 35;
/// Bonus for the direction that closes in on the player along an axis.
pub const PURSUIT_BONUS: i32 = 1000;
/// Penalty for the direction that moves away from the player along an axis.
pub const RETREAT_PENALTY: i32 = 200;
/// Bonus for keeping the current facing.
pub const MOMENTUM_BONUS: i32 = 15;

/// Sleep assigned after a successful step.
pub const SLEEP_AFTER_STEP: i32 = 8;
/// Sleep assigned when the chosen cell became blocked before the step.
pub const SLEEP_AFTER_BLOCKED_STEP: i32 = 2;
/// Sleep assigned after a wandering monster turns away from an obstacle.
pub const SLEEP_AFTER_TURN: i32 = 4;

/// Per-direction desire scores indexed by [`Direction::value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Desires([i32; 4]);

impl Desires {
    /// Draws uniformly distributed base scores for all four directions.
    pub fn draw<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut scores = [0; 4];
        for score in &mut scores {
            *score = BASE_DESIRE + rng.gen_range(0..DESIRE_SPREAD);
        }
        Self(scores)
    }

    /// Wraps explicit scores in `value` order.
    #[must_use]
    pub const fn from_scores(scores: [i32; 4]) -> Self {
        Self(scores)
    }

    /// Score currently assigned to `direction`.
    #[must_use]
    pub const fn score(&self, direction: Direction) -> i32 {
        self.0[direction.value() as usize]
    }

    fn adjust(&mut self, direction: Direction, delta: i32) {
        self.0[direction.value() as usize] += delta;
    }

    /// Applies the player-relative bias on both axes independently.
    #[must_use]
    pub fn bias_toward(mut self, monster: Position, player: Position) -> Self {
        if player.y() < monster.y() {
            self.adjust(Direction::North, PURSUIT_BONUS);
            self.adjust(Direction::South, -RETREAT_PENALTY);
        }
        if player.y() > monster.y() {
            self.adjust(Direction::South, PURSUIT_BONUS);
            self.adjust(Direction::North, -RETREAT_PENALTY);
        }
        if player.x() > monster.x() {
            self.adjust(Direction::East, PURSUIT_BONUS);
            self.adjust(Direction::West, -RETREAT_PENALTY);
        }
        if player.x() < monster.x() {
            self.adjust(Direction::West, PURSUIT_BONUS);
            self.adjust(Direction::East, -RETREAT_PENALTY);
        }
        self
    }

    /// Adds the momentum bonus to the current facing.
    #[must_use]
    pub fn favour(mut self, facing: Direction) -> Self {
        self.adjust(facing, MOMENTUM_BONUS);
        self
    }

    /// Zeroes every direction for which `passable` reports `false`.
    #[must_use]
    pub fn exclude_blocked<F>(mut self, passable: F) -> Self
    where
        F: Fn(Direction) -> bool,
    {
        for direction in Direction::ALL {
            if !passable(direction) {
                self.0[direction.value() as usize] = 0;
            }
        }
        self
    }

    /// Direction with the highest positive score; the first one wins ties.
    #[must_use]
    pub fn best(&self) -> Option<Direction> {
        let mut best: Option<(Direction, i32)> = None;
        for direction in Direction::ALL {
            let score = self.score(direction);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((direction, score));
            }
        }
        best.filter(|(_, score)| *score > 0)
            .map(|(direction, _)| direction)
    }
}

/// Runs the full scoring pipeline on pre-drawn base desires.
#[must_use]
pub fn choose_direction<F>(
    base: Desires,
    monster: Position,
    player: Position,
    facing: Direction,
    can_enter: F,
) -> Option<Direction>
where
    F: Fn(Position) -> bool,
{
    base.bias_toward(monster, player)
        .favour(facing)
        .exclude_blocked(|direction| can_enter(monster.step(direction)))
        .best()
}

/// Spreads the first action of co-spawned monsters over eight ticks.
#[must_use]
pub fn initial_sleep(spawn: Position) -> i32 {
    let mixed = (spawn.x() as u32).wrapping_mul(0x9e37_79b9)
        ^ (spawn.y() as u32).wrapping_mul(0x85eb_ca6b);
    ((mixed ^ (mixed >> 16)) & 7) as i32
}

/// Movement capabilities the brain needs from the monster it controls.
pub trait Body {
    /// Cell the monster occupies.
    fn position(&self) -> Position;
    /// Direction the monster faces.
    fn facing(&self) -> Direction;
    /// Turns the monster without moving it.
    fn face(&mut self, direction: Direction);
    /// Reports whether the monster may enter `target`.
    fn can_enter(&self, target: Position) -> bool;
    /// Attempts one step in the facing direction.
    fn move_forward(&mut self) -> bool;
}

/// What a monster did during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// The sleep counter has not elapsed yet.
    Slept,
    /// Every direction scored zero or less.
    Hesitated,
    /// The monster stepped one cell.
    Stepped(Direction),
    /// The chosen cell was blocked when the step was attempted.
    Blocked(Direction),
    /// A wandering monster hit an obstacle and turned clockwise.
    Turned(Direction),
}

/// Sleep-gated controller of a single monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterBrain {
    motion: MonsterMotion,
    sleep: i32,
}

impl MonsterBrain {
    /// Creates a brain for a monster spawned at `spawn`.
    #[must_use]
    pub fn new(motion: MonsterMotion, spawn: Position) -> Self {
        let sleep = match motion {
            MonsterMotion::Dumb => SLEEP_AFTER_STEP,
            MonsterMotion::Pursuit => initial_sleep(spawn),
        };
        Self { motion, sleep }
    }

    /// Remaining sleep; the monster acts once it drops below zero.
    #[must_use]
    pub const fn sleep(&self) -> i32 {
        self.sleep
    }

    /// Advances the sleep counter and acts once it runs out.
    ///
    /// Without a player location the pursuit scoring falls back to the
    /// monster's own position, which removes the positional bias.
    pub fn tick<B, R>(&mut self, body: &mut B, player: Option<Position>, rng: &mut R) -> Action
    where
        B: Body + ?Sized,
        R: Rng + ?Sized,
    {
        self.sleep = self.sleep.saturating_sub(1);
        if self.sleep >= 0 {
            return Action::Slept;
        }

        match self.motion {
            MonsterMotion::Dumb => self.wander(body),
            MonsterMotion::Pursuit => self.attempt_movement(body, player, rng),
        }
    }

    fn wander<B>(&mut self, body: &mut B) -> Action
    where
        B: Body + ?Sized,
    {
        let facing = body.facing();
        if body.move_forward() {
            self.sleep = SLEEP_AFTER_STEP;
            Action::Stepped(facing)
        } else {
            let turned = facing.rotate_clockwise();
            body.face(turned);
            self.sleep = SLEEP_AFTER_TURN;
            Action::Turned(turned)
        }
    }

    fn attempt_movement<B, R>(&mut self, body: &mut B, player: Option<Position>, rng: &mut R) -> Action
    where
        B: Body + ?Sized,
        R: Rng + ?Sized,
    {
        let monster = body.position();
        let player = player.unwrap_or(monster);
        let choice = choose_direction(
            Desires::draw(rng),
            monster,
            player,
            body.facing(),
            |target| body.can_enter(target),
        );

        let Some(direction) = choice else {
            return Action::Hesitated;
        };

        body.face(direction);
        if body.move_forward() {
            self.sleep = SLEEP_AFTER_STEP;
            Action::Stepped(direction)
        } else {
            self.sleep = SLEEP_AFTER_BLOCKED_STEP;
            Action::Blocked(direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn ties_resolve_to_first_direction() {
        let desires = Desires::from_scores([200, 200, 200, 200]);
        assert_eq!(desires.best(), Some(Direction::North));

        let desires = Desires::from_scores([10, 300, 300, 5]);
        assert_eq!(desires.best(), Some(Direction::East));
    }

    #[test]
    fn no_positive_desire_means_no_choice() {
        assert_eq!(Desires::from_scores([0, 0, 0, 0]).best(), None);
        assert_eq!(Desires::from_scores([-20, 0, -5, 0]).best(), None);
    }

    #[test]
    fn initial_sleep_stays_within_three_bits() {
        for x in -3..40 {
            for y in -3..40 {
                let sleep = initial_sleep(Position::new(x, y));
                assert!((0..=7).contains(&sleep), "sleep {sleep} out of range");
            }
        }
    }

    #[test]
    fn initial_sleep_is_deterministic() {
        let spawn = Position::new(12, 7);
        assert_eq!(initial_sleep(spawn), initial_sleep(spawn));
    }

    struct Walled {
        facing: Direction,
    }

    impl Body for Walled {
        fn position(&self) -> Position {
            Position::new(2, 2)
        }

        fn facing(&self) -> Direction {
            self.facing
        }

        fn face(&mut self, direction: Direction) {
            self.facing = direction;
        }

        fn can_enter(&self, _target: Position) -> bool {
            false
        }

        fn move_forward(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn hemmed_in_monster_sleep_saturates() {
        let mut brain = MonsterBrain {
            motion: MonsterMotion::Pursuit,
            sleep: i32::MIN + 1,
        };
        let mut body = Walled {
            facing: Direction::North,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..4 {
            let action = brain.tick(&mut body, Some(Position::new(5, 2)), &mut rng);
            assert_eq!(action, Action::Hesitated);
            assert_eq!(brain.sleep(), i32::MIN);
        }
    }
}

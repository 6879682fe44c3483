#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns a frame's directional key state into a single impulse.
//!
//! Opposing keys held together cancel each other instead of alternating the
//! facing every frame, and only the last processed direction survives as the
//! frame's impulse.

use magic_maze_core::{Direction, Impulse, MovementIntent};

const NORTH_SOUTH: u8 = 0b0101;
const EAST_WEST: u8 = 0b1010;

/// Clears both bits of every opposing pair that is fully held.
#[must_use]
pub fn cancel_opposites(intent: MovementIntent) -> MovementIntent {
    let mut bits = intent.bits();
    for pair in [EAST_WEST, NORTH_SOUTH] {
        if bits & pair == pair {
            bits ^= pair;
        }
    }
    MovementIntent::from_bits(bits)
}

/// Directions left after cancellation, in processing order.
pub fn effective_directions(intent: MovementIntent) -> impl Iterator<Item = Direction> {
    cancel_opposites(intent).directions()
}

/// Resolves the intent into the impulse queued for an entity facing `facing`.
///
/// Each remaining direction is processed in `value` order: the facing
/// direction requests a step forward, any other direction requests a turn.
/// Later directions overwrite earlier ones.
#[must_use]
pub fn resolve(intent: MovementIntent, facing: Direction) -> Option<Impulse> {
    let mut impulse = None;
    for direction in effective_directions(intent) {
        impulse = Some(if direction == facing {
            Impulse::MoveForward
        } else {
            Impulse::TurnTo(direction)
        });
    }
    impulse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_opposite_pair_cancels_to_nothing() {
        let intent = MovementIntent::from_directions(&[Direction::North, Direction::South]);
        assert!(cancel_opposites(intent).is_empty());
        assert_eq!(resolve(intent, Direction::North), None);
    }

    #[test]
    fn cancellation_keeps_the_other_axis() {
        let intent = MovementIntent::from_directions(&[
            Direction::East,
            Direction::West,
            Direction::South,
        ]);
        assert_eq!(
            cancel_opposites(intent),
            MovementIntent::from_directions(&[Direction::South])
        );
    }

    #[test]
    fn every_key_held_is_no_key_held() {
        assert!(cancel_opposites(MovementIntent::from_bits(0b1111)).is_empty());
    }
}

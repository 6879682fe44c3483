use magic_maze_core::{Direction, Impulse, MovementIntent};
use magic_maze_system_intent::{effective_directions, resolve};

#[test]
fn facing_direction_requests_a_step() {
    let intent = MovementIntent::from_directions(&[Direction::West]);
    assert_eq!(resolve(intent, Direction::West), Some(Impulse::MoveForward));
}

#[test]
fn other_direction_requests_a_turn() {
    let intent = MovementIntent::from_directions(&[Direction::South]);
    assert_eq!(
        resolve(intent, Direction::North),
        Some(Impulse::TurnTo(Direction::South))
    );
}

#[test]
fn last_processed_direction_wins() {
    let intent = MovementIntent::from_directions(&[Direction::North, Direction::East]);

    assert_eq!(
        resolve(intent, Direction::North),
        Some(Impulse::TurnTo(Direction::East)),
        "east is processed after north and overwrites the step"
    );
    assert_eq!(resolve(intent, Direction::East), Some(Impulse::MoveForward));
}

#[test]
fn diagonal_with_cancelled_axis_keeps_remaining_direction() {
    let intent = MovementIntent::from_directions(&[
        Direction::North,
        Direction::South,
        Direction::West,
    ]);

    assert_eq!(
        effective_directions(intent).collect::<Vec<_>>(),
        vec![Direction::West]
    );
    assert_eq!(
        resolve(intent, Direction::North),
        Some(Impulse::TurnTo(Direction::West))
    );
}

#[test]
fn empty_intent_queues_nothing() {
    for facing in Direction::ALL {
        assert_eq!(resolve(MovementIntent::empty(), facing), None);
    }
}

use magic_maze_core::GameCommand;

/// Controller currently receiving input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputTarget {
    /// The player character and the game itself.
    Player,
    /// An astral projection the player steers.
    Projection,
}

impl InputTarget {
    /// Reports whether the controller handles `command`.
    ///
    /// A projection only answers the commands that dismiss it; everything
    /// else is dropped while it is in control.
    #[must_use]
    pub const fn responds_to(self, command: GameCommand) -> bool {
        match self {
            Self::Player => true,
            Self::Projection => matches!(
                command,
                GameCommand::CastPrimarySpell
                    | GameCommand::CastAlternativeSpell
                    | GameCommand::Escape
                    | GameCommand::Quit
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_ignores_game_commands() {
        assert!(!InputTarget::Projection.responds_to(GameCommand::PauseGame));
        assert!(!InputTarget::Projection.responds_to(GameCommand::NextPrimarySpell));
        assert!(InputTarget::Projection.responds_to(GameCommand::Escape));
        assert!(InputTarget::Player.responds_to(GameCommand::PauseGame));
    }
}

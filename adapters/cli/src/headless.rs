//! Terminal-free collaborators: scripted input, log-backed graphics and sound.

use std::collections::VecDeque;

use log::{debug, info, trace};
use magic_maze_core::{tiles, Direction, GameCommand, Hud, MovementIntent, SceneView, SoundCue};
use magic_maze_system_game_loop::{CollaboratorError, FrameInput, Graphics, InputDevice, Sound};
use thiserror::Error;

use crate::levels::{Glyph, GLYPHS};

const MAX_VOLUME: i32 = 10;

/// Errors raised while parsing an input script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// A token is neither a direction, a command nor an answer.
    #[error("unknown token '{token}' on script line {line}")]
    UnknownToken {
        /// Offending token.
        token: String,
        /// One-based script line.
        line: usize,
    },
    /// A repeat marker is not a positive number.
    #[error("invalid repeat count '{count}' on script line {line}")]
    InvalidRepeat {
        /// Text after the `*`.
        count: String,
        /// One-based script line.
        line: usize,
    },
}

fn command(token: &str) -> Option<GameCommand> {
    let command = match token {
        "help" => GameCommand::Help,
        "save" => GameCommand::SaveGame,
        "restart" => GameCommand::RestartLevel,
        "fullscreen" => GameCommand::ToggleFullscreen,
        "escape" => GameCommand::Escape,
        "quit" => GameCommand::Quit,
        "next-primary" => GameCommand::NextPrimarySpell,
        "prev-primary" => GameCommand::PreviousPrimarySpell,
        "next-secondary" => GameCommand::NextSecondarySpell,
        "prev-secondary" => GameCommand::PreviousSecondarySpell,
        "pause" => GameCommand::PauseGame,
        "louder" => GameCommand::IncreaseVolume,
        "quieter" => GameCommand::DecreaseVolume,
        "faster" => GameCommand::IncreaseSpeed,
        "slower" => GameCommand::DecreaseSpeed,
        "cast" => GameCommand::CastPrimarySpell,
        "cast-alt" => GameCommand::CastAlternativeSpell,
        _ => return None,
    };
    Some(command)
}

fn direction(token: &str) -> Option<Direction> {
    match token {
        "n" => Some(Direction::North),
        "e" => Some(Direction::East),
        "s" => Some(Direction::South),
        "w" => Some(Direction::West),
        _ => None,
    }
}

/// Input device replaying a text script, one frame per line.
///
/// Lines hold direction keys (`n e s w`), command names, `yes`/`no`
/// answers for confirmations and an optional `*N` repeat marker. A line
/// with only `.` is an idle frame. Once the script runs out every poll
/// reports [`GameCommand::Quit`].
#[derive(Debug, Default)]
pub(crate) struct ScriptedInput {
    frames: VecDeque<FrameInput>,
    answers: VecDeque<bool>,
}

impl ScriptedInput {
    pub(crate) fn parse(script: &str) -> Result<Self, ScriptError> {
        let mut input = Self::default();
        for (index, text) in script.lines().enumerate() {
            let line = index + 1;
            let text = text.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let mut frame = FrameInput::default();
            let mut repeat = 1;
            for token in text.split_whitespace() {
                if let Some(count) = token.strip_prefix('*') {
                    repeat = count
                        .parse::<usize>()
                        .ok()
                        .filter(|count| *count > 0)
                        .ok_or_else(|| ScriptError::InvalidRepeat {
                            count: count.to_owned(),
                            line,
                        })?;
                } else if let Some(direction) = direction(token) {
                    frame.movement.insert(direction);
                } else if let Some(command) = command(token) {
                    frame.commands.push(command);
                } else {
                    match token {
                        "." => {}
                        "yes" => input.answers.push_back(true),
                        "no" => input.answers.push_back(false),
                        _ => {
                            return Err(ScriptError::UnknownToken {
                                token: token.to_owned(),
                                line,
                            })
                        }
                    }
                }
            }
            input
                .frames
                .extend(std::iter::repeat(frame).take(repeat));
        }
        debug!("script holds {} frames", input.frames.len());
        Ok(input)
    }
}

impl InputDevice for ScriptedInput {
    fn open(&mut self) -> Result<(), CollaboratorError> {
        debug!("scripted input opened");
        Ok(())
    }

    fn close(&mut self) {
        debug!("scripted input closed with {} frames left", self.frames.len());
    }

    fn poll(&mut self) -> FrameInput {
        self.frames.pop_front().unwrap_or_else(|| FrameInput {
            commands: vec![GameCommand::Quit],
            movement: MovementIntent::empty(),
        })
    }

    fn wait_for_key(&mut self) {
        trace!("key press assumed");
    }

    fn yes_no(&mut self) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}

/// Graphics collaborator that renders scenes as text into the log.
#[derive(Debug, Default)]
pub(crate) struct LogGraphics {
    fullscreen: bool,
    flips: u64,
    revealed: usize,
}

impl LogGraphics {
    pub(crate) const fn flips(&self) -> u64 {
        self.flips
    }
}

impl Graphics for LogGraphics {
    fn draw_scene(&mut self, scene: &SceneView) -> Result<(), CollaboratorError> {
        trace!("scene around {:?}\n{}", scene.center(), render(scene));
        Ok(())
    }

    fn update_hud(&mut self, hud: &Hud) -> Result<(), CollaboratorError> {
        trace!(
            "score {} life {} mana {} keys {}",
            hud.score,
            hud.life,
            hud.mana,
            hud.keys
        );
        Ok(())
    }

    fn flip(&mut self) -> Result<(), CollaboratorError> {
        self.flips = self.flips.saturating_add(1);
        Ok(())
    }

    fn show_message(&mut self, message: &str) -> Result<(), CollaboratorError> {
        info!("{}", message.replace('\n', " / "));
        Ok(())
    }

    fn show_help(&mut self) -> Result<(), CollaboratorError> {
        info!("arrows move, space casts, tab casts the utility spell, p pauses, esc quits");
        Ok(())
    }

    fn reveal_map(&mut self, region: &SceneView) -> Result<(), CollaboratorError> {
        self.revealed = self.revealed.saturating_add(1);
        debug!(
            "revealed map around {:?} ({} reveals)",
            region.center(),
            self.revealed
        );
        Ok(())
    }

    fn toggle_fullscreen(&mut self) -> Result<(), CollaboratorError> {
        self.fullscreen = !self.fullscreen;
        debug!("fullscreen {}", self.fullscreen);
        Ok(())
    }
}

/// Renders the scene with the level glyphs; unknown sprites show as `?`.
pub(crate) fn render(scene: &SceneView) -> String {
    let mut text = String::new();
    for row in scene.rows() {
        for cell in row {
            let sprite = cell
                .spiritual
                .or(cell.entity)
                .or(cell.object)
                .or(cell.background);
            text.push(sprite.map_or(' ', glyph_for));
        }
        text.push('\n');
    }
    text
}

fn glyph_for(sprite: u16) -> char {
    let player = tiles::PLAYER.sprite_id();
    if (player..player + 4).contains(&sprite) {
        return '@';
    }
    GLYPHS
        .iter()
        .find_map(|(glyph, kind)| {
            let tile = match kind {
                Glyph::Background(tile) | Glyph::Object(tile) | Glyph::Monster(tile) => *tile,
                Glyph::Door => &tiles::DOOR,
                Glyph::Start => return None,
            };
            (tile.sprite_id() == sprite).then_some(*glyph)
        })
        .unwrap_or('?')
}

/// Sound collaborator that logs cues.
#[derive(Debug)]
pub(crate) struct LogSound {
    volume: i32,
}

impl Default for LogSound {
    fn default() -> Self {
        Self { volume: MAX_VOLUME }
    }
}

impl Sound for LogSound {
    fn play(&mut self, cue: SoundCue) {
        if self.volume > 0 {
            debug!("sound {}", cue.name());
        }
    }

    fn change_volume(&mut self, delta: i32) {
        self.volume = (self.volume + delta).clamp(0, MAX_VOLUME);
        info!("volume {}", self.volume);
    }
}

use std::time::Duration;

use log::{debug, info, trace, warn};
use magic_maze_core::{
    Command, Event, GameCommand, LevelState, MovementIntent, SoundCue, SpellSlot,
};
use magic_maze_system_intent::{effective_directions, resolve};
use magic_maze_world::{self as world, query, World};

use crate::{
    collaborators::Collaborators, control::InputTarget, settings::FrameDelay, SessionError,
};

/// Cells drawn on each side of the camera.
pub const VIEW_HALF_EXTENT: u32 = 3;
/// Cells revealed on each side of a map manifestation.
pub const REVEAL_HALF_EXTENT: u32 = 14;

const PAUSE_MESSAGE: &str = "Paused!\n\nPress any key\nto resume game.";

/// Runs the frames of a single level until its state leaves
/// [`LevelState::GameLoop`].
#[derive(Debug)]
pub struct GameLoop {
    world: World,
    level: u32,
    checkpoint: Vec<u8>,
    state: LevelState,
    delay: FrameDelay,
    frames: u64,
    events: Vec<Event>,
}

impl GameLoop {
    /// Prepares a level whose entry checkpoint is `checkpoint`.
    #[must_use]
    pub fn new(world: World, level: u32, checkpoint: Vec<u8>, delay: FrameDelay) -> Self {
        Self {
            world,
            level,
            checkpoint,
            state: LevelState::GameLoop,
            delay,
            frames: 0,
            events: Vec::new(),
        }
    }

    /// Current state of the level.
    #[must_use]
    pub const fn state(&self) -> LevelState {
        self.state
    }

    /// World simulated by the loop.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Frame delay, as adjusted by the speed commands.
    #[must_use]
    pub const fn delay(&self) -> FrameDelay {
        self.delay
    }

    /// Number of frames run so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs frames until the level ends or `frame_limit` frames have run.
    pub fn run(
        &mut self,
        io: &mut Collaborators<'_>,
        frame_limit: Option<u64>,
    ) -> Result<LevelState, SessionError> {
        while self.state.is_running() {
            if frame_limit.map_or(false, |limit| self.frames >= limit) {
                info!("frame limit reached on level {}", self.level);
                self.state = LevelState::StoppedGame;
                break;
            }
            let _ = self.frame(io)?;
        }
        self.draw(io)?;
        info!("level {} ended with {:?}", self.level, self.state);
        Ok(self.state)
    }

    /// Runs one frame: draw, input, intent, ticks, then pacing.
    pub fn frame(&mut self, io: &mut Collaborators<'_>) -> Result<LevelState, SessionError> {
        let started = io.clock.now();
        self.frames = self.frames.saturating_add(1);

        self.draw(io)?;
        let input = io.input.poll();
        for command in input.commands {
            self.dispatch(command, io)?;
            if !self.state.is_running() {
                return Ok(self.state);
            }
        }

        if query::projection(&self.world).is_some() {
            self.steer_projection(input.movement, io)?;
        } else {
            self.simulate(input.movement, io)?;
        }

        self.pace(started, io);
        Ok(self.state)
    }

    fn simulate(
        &mut self,
        movement: MovementIntent,
        io: &mut Collaborators<'_>,
    ) -> Result<(), SessionError> {
        let facing = query::player_direction(&self.world);
        if let Some(impulse) = resolve(movement, facing) {
            self.apply(Command::SetImpulse { impulse });
        }

        self.apply(Command::TickPlayer);
        self.handle_events(io)?;
        if !self.state.is_running() {
            return Ok(());
        }

        self.apply(Command::TickEntities);
        self.handle_events(io)
    }

    /// The world stays paused while a projection is in control.
    fn steer_projection(
        &mut self,
        movement: MovementIntent,
        io: &mut Collaborators<'_>,
    ) -> Result<(), SessionError> {
        if let Some(direction) = effective_directions(movement).last() {
            self.apply(Command::SteerProjection { direction });
            self.handle_events(io)?;
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        command: GameCommand,
        io: &mut Collaborators<'_>,
    ) -> Result<(), SessionError> {
        let target = if query::projection(&self.world).is_some() {
            InputTarget::Projection
        } else {
            InputTarget::Player
        };
        if !target.responds_to(command) {
            trace!("{target:?} ignores {command:?}");
            return Ok(());
        }
        if command == GameCommand::Quit {
            self.state = LevelState::StoppedGame;
            return Ok(());
        }
        if target == InputTarget::Projection {
            self.apply(Command::CancelProjection);
            return self.handle_events(io);
        }

        match command {
            GameCommand::Help => {
                io.graphics.show_help().map_err(SessionError::Graphics)?;
                io.graphics.flip().map_err(SessionError::Graphics)?;
                io.input.wait_for_key();
            }
            GameCommand::PauseGame => {
                self.show(io, PAUSE_MESSAGE)?;
                io.input.wait_for_key();
            }
            GameCommand::Escape => {
                if self.confirm(io, "Quit game?")? {
                    self.state = LevelState::StoppedGame;
                }
            }
            GameCommand::RestartLevel => {
                if self.confirm(io, "Restart level?")? {
                    self.state = LevelState::RestartLevel;
                }
            }
            GameCommand::SaveGame => {
                io.checkpoints
                    .save(self.level, &self.checkpoint)
                    .map_err(SessionError::Checkpoint)?;
                info!("saved checkpoint for level {}", self.level);
            }
            GameCommand::ToggleFullscreen => {
                io.graphics
                    .toggle_fullscreen()
                    .map_err(SessionError::Graphics)?;
            }
            GameCommand::IncreaseVolume => {
                io.sound.change_volume(1);
                io.sound.play(SoundCue::Bonus);
            }
            GameCommand::DecreaseVolume => {
                io.sound.change_volume(-1);
                io.sound.play(SoundCue::Bonus);
            }
            GameCommand::IncreaseSpeed => {
                self.delay = self.delay.shorter();
                debug!("frame delay {:?}", self.delay.get());
            }
            GameCommand::DecreaseSpeed => {
                self.delay = self.delay.longer();
                debug!("frame delay {:?}", self.delay.get());
            }
            GameCommand::NextPrimarySpell => self.page(SpellSlot::Primary, 1),
            GameCommand::PreviousPrimarySpell => self.page(SpellSlot::Primary, -1),
            GameCommand::NextSecondarySpell => self.page(SpellSlot::Secondary, 1),
            GameCommand::PreviousSecondarySpell => self.page(SpellSlot::Secondary, -1),
            GameCommand::CastPrimarySpell => {
                self.apply(Command::CastSpell {
                    slot: SpellSlot::Primary,
                });
                self.handle_events(io)?;
            }
            GameCommand::CastAlternativeSpell => {
                self.apply(Command::CastSpell {
                    slot: SpellSlot::Secondary,
                });
                self.handle_events(io)?;
            }
            GameCommand::Quit => self.state = LevelState::StoppedGame,
        }
        Ok(())
    }

    fn page(&mut self, slot: SpellSlot, step: i32) {
        self.apply(Command::PageSpell { slot, step });
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn handle_events(&mut self, io: &mut Collaborators<'_>) -> Result<(), SessionError> {
        let events = std::mem::take(&mut self.events);
        for event in &events {
            match event {
                Event::Sound { cue } => io.sound.play(*cue),
                Event::MapRevealed { center } => {
                    let region = query::scene_view(
                        &self.world,
                        *center,
                        REVEAL_HALF_EXTENT,
                        REVEAL_HALF_EXTENT,
                    );
                    io.graphics
                        .reveal_map(&region)
                        .map_err(SessionError::Graphics)?;
                }
                Event::StateChangeRequested { state } => {
                    if self.state.is_running() {
                        self.state = *state;
                    }
                }
                Event::MonsterSlain { monster, .. } => {
                    info!("monster {monster:?} slain on level {}", self.level);
                }
                other => trace!("{other:?}"),
            }
        }
        self.events = events;
        self.events.clear();
        Ok(())
    }

    fn draw(&self, io: &mut Collaborators<'_>) -> Result<(), SessionError> {
        let center = query::camera_center(&self.world);
        let scene = query::scene_view(&self.world, center, VIEW_HALF_EXTENT, VIEW_HALF_EXTENT);
        io.graphics
            .draw_scene(&scene)
            .map_err(SessionError::Graphics)?;
        io.graphics
            .update_hud(&query::hud(&self.world))
            .map_err(SessionError::Graphics)?;
        io.graphics.flip().map_err(SessionError::Graphics)
    }

    fn show(&self, io: &mut Collaborators<'_>, message: &str) -> Result<(), SessionError> {
        io.graphics
            .show_message(message)
            .map_err(SessionError::Graphics)?;
        io.graphics.flip().map_err(SessionError::Graphics)
    }

    fn confirm(&self, io: &mut Collaborators<'_>, question: &str) -> Result<bool, SessionError> {
        self.show(io, &format!("{question}\n[Y/N]"))?;
        Ok(io.input.yes_no())
    }

    /// Sleeps for the rest of the frame budget; overruns are not caught up.
    fn pace(&self, started: Duration, io: &mut Collaborators<'_>) {
        let elapsed = io.clock.now().saturating_sub(started);
        match self.delay.get().checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => io.clock.sleep(remaining),
            Some(_) => {}
            None => warn!("frame {} overran by {:?}", self.frames, elapsed - self.delay.get()),
        }
    }
}

//! ASCII level files and the built-in demo levels.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use magic_maze_core::{tiles, Layer, Position, TileRef};
use magic_maze_system_game_loop::{CollaboratorError, LoadedLevel, MapLoader};
use magic_maze_world::Map;
use thiserror::Error;

/// What a glyph in a level file places on its cell.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Glyph {
    /// Background tile, floor everywhere else.
    Background(TileRef),
    /// Floor with a tile on the object layer.
    Object(TileRef),
    /// Floor with a monster spawned on it.
    Monster(TileRef),
    /// Floor with a closed door.
    Door,
    /// Floor marked as the player start.
    Start,
}

/// Glyph table shared by the loader and the text renderer.
pub(crate) static GLYPHS: [(char, Glyph); 14] = [
    ('.', Glyph::Background(&tiles::FLOOR)),
    ('#', Glyph::Background(&tiles::WALL)),
    ('%', Glyph::Object(&tiles::RUBBLE)),
    ('k', Glyph::Object(&tiles::KEY)),
    ('+', Glyph::Object(&tiles::LIFE_POTION)),
    ('*', Glyph::Object(&tiles::MANA_POTION)),
    ('$', Glyph::Object(&tiles::TREASURE)),
    ('E', Glyph::Object(&tiles::EXIT)),
    ('x', Glyph::Object(&tiles::BLOOD_SPLAT)),
    ('s', Glyph::Monster(&tiles::SKELETON)),
    ('g', Glyph::Monster(&tiles::GOBLIN)),
    ('T', Glyph::Monster(&tiles::TROLL)),
    ('D', Glyph::Door),
    ('@', Glyph::Start),
];

const DEMO_LEVELS: [&str; 2] = [
    "The Cellar
###########
#@..k#...E#
#.##.D.##.#
#.#g.#..s.#
#...%#*.$.#
###########",
    "Troll Bridge
#############
#@.....#....#
#.###.###.#.#
#..+#..T..#E#
###.#.###.###
#$..D...g...#
#############",
];

/// Errors raised while parsing an ASCII level.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LevelParseError {
    /// The text has no title line.
    #[error("level text is empty")]
    Empty,
    /// The title is not followed by any map rows.
    #[error("level has no map rows")]
    NoRows,
    /// A cell uses a glyph outside the table.
    #[error("unknown glyph '{glyph}' at line {line}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// One-based line within the file.
        line: usize,
        /// One-based column within the line.
        column: usize,
    },
    /// No `@` marks the player start.
    #[error("level has no player start")]
    MissingStart,
    /// More than one `@` appears.
    #[error("second player start at line {line}, column {column}")]
    DuplicateStart {
        /// One-based line within the file.
        line: usize,
        /// One-based column within the line.
        column: usize,
    },
}

/// Errors raised while loading a level for the session.
#[derive(Debug, Error)]
pub(crate) enum LevelLoadError {
    /// No level with this number exists.
    #[error("level {0} does not exist")]
    Missing(u32),
    /// The level file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The level text is malformed.
    #[error("level {level} is malformed")]
    Parse {
        /// Level that failed.
        level: u32,
        /// Underlying parse error.
        #[source]
        source: LevelParseError,
    },
}

/// Parses a level: a title line followed by one text row per map row.
///
/// Short rows are padded with wall.
pub(crate) fn parse_level(text: &str) -> Result<LoadedLevel, LevelParseError> {
    let mut lines = text.lines();
    let title = lines.next().ok_or(LevelParseError::Empty)?.trim().to_owned();
    let rows: Vec<&str> = lines.map(str::trim_end).filter(|row| !row.is_empty()).collect();
    if rows.is_empty() {
        return Err(LevelParseError::NoRows);
    }

    let columns = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    let mut map = Map::new(
        u32::try_from(columns).unwrap_or(u32::MAX),
        u32::try_from(rows.len()).unwrap_or(u32::MAX),
        &tiles::WALL,
    );

    let mut start = None;
    for (y, row) in rows.iter().enumerate() {
        for (x, glyph) in row.chars().enumerate() {
            let line = y + 2;
            let column = x + 1;
            let position = Position::new(
                i32::try_from(x).unwrap_or(i32::MAX),
                i32::try_from(y).unwrap_or(i32::MAX),
            );
            let kind = lookup(glyph).ok_or(LevelParseError::UnknownGlyph {
                glyph,
                line,
                column,
            })?;
            if let Glyph::Background(tile) = kind {
                let _ = map.set_tile(Layer::Background, position, Some(tile));
                continue;
            }

            let _ = map.set_tile(Layer::Background, position, Some(&tiles::FLOOR));
            match kind {
                Glyph::Background(_) => {}
                Glyph::Object(tile) => {
                    let _ = map.set_tile(Layer::Object, position, Some(tile));
                }
                Glyph::Monster(tile) => {
                    let _ = map.spawn_monster(position, tile);
                }
                Glyph::Door => {
                    let _ = map.spawn_door(position);
                }
                Glyph::Start => {
                    if start.is_some() {
                        return Err(LevelParseError::DuplicateStart { line, column });
                    }
                    start = Some(position);
                }
            }
        }
    }

    let start = start.ok_or(LevelParseError::MissingStart)?;
    let _ = map.set_player_start(start);
    debug!("parsed '{title}': {columns}x{} cells", rows.len());
    Ok(LoadedLevel { map, title })
}

pub(crate) fn lookup(glyph: char) -> Option<Glyph> {
    GLYPHS
        .iter()
        .find(|(candidate, _)| *candidate == glyph)
        .map(|(_, kind)| *kind)
}

/// Level source backed by a directory of `levelN.txt` files or by the demos.
#[derive(Debug)]
pub(crate) struct LevelLibrary {
    directory: Option<PathBuf>,
}

impl LevelLibrary {
    pub(crate) fn new(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }

    fn file(directory: &Path, level: u32) -> PathBuf {
        directory.join(format!("level{level}.txt"))
    }

    fn text(&self, level: u32) -> Result<String, LevelLoadError> {
        match &self.directory {
            Some(directory) => {
                let path = Self::file(directory, level);
                if !path.is_file() {
                    return Err(LevelLoadError::Missing(level));
                }
                fs::read_to_string(&path).map_err(|source| LevelLoadError::Io { path, source })
            }
            None => usize::try_from(level)
                .ok()
                .and_then(|level| level.checked_sub(1))
                .and_then(|index| DEMO_LEVELS.get(index))
                .map(|text| (*text).to_owned())
                .ok_or(LevelLoadError::Missing(level)),
        }
    }
}

impl MapLoader for LevelLibrary {
    fn load(&mut self, level: u32) -> Result<LoadedLevel, CollaboratorError> {
        let text = self.text(level)?;
        let loaded =
            parse_level(&text).map_err(|source| LevelLoadError::Parse { level, source })?;
        info!("loaded level {level}: {}", loaded.title);
        Ok(loaded)
    }

    fn has_level(&self, level: u32) -> bool {
        match &self.directory {
            Some(directory) => Self::file(directory, level).is_file(),
            None => (1..=DEMO_LEVELS.len()).contains(&usize::try_from(level).unwrap_or(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use magic_maze_core::Plane;

    use super::*;

    #[test]
    fn parses_every_layer() {
        let level = parse_level("Test\n#####\n#@kg#\n#D.E#\n#####").expect("level");
        let map = &level.map;
        assert_eq!(level.title, "Test");
        assert_eq!((map.columns(), map.rows()), (5, 4));
        assert_eq!(map.player_start(), Some(Position::new(1, 1)));
        assert_eq!(map.background(Position::new(0, 0)), Some(&tiles::WALL));
        assert_eq!(map.object(Position::new(2, 1)), Some(&tiles::KEY));
        assert_eq!(map.object(Position::new(3, 2)), Some(&tiles::EXIT));
        assert!(map.occupant(Plane::Physical, Position::new(3, 1)).is_some());
        assert!(map.occupant(Plane::Physical, Position::new(1, 2)).is_some());
        assert_eq!(map.active_entities().len(), 1);
    }

    #[test]
    fn short_rows_are_walled_in() {
        let level = parse_level("Ragged\n#@..\n#").expect("level");
        assert_eq!(level.map.background(Position::new(3, 1)), Some(&tiles::WALL));
    }

    #[test]
    fn rejects_malformed_levels() {
        assert_eq!(parse_level("").err(), Some(LevelParseError::Empty));
        assert_eq!(parse_level("Title\n\n").err(), Some(LevelParseError::NoRows));
        assert_eq!(
            parse_level("Title\n#@?#").err(),
            Some(LevelParseError::UnknownGlyph {
                glyph: '?',
                line: 2,
                column: 3
            })
        );
        assert_eq!(
            parse_level("Title\n#..#").err(),
            Some(LevelParseError::MissingStart)
        );
        assert_eq!(
            parse_level("Title\n#@@#").err(),
            Some(LevelParseError::DuplicateStart { line: 2, column: 3 })
        );
    }

    #[test]
    fn demo_levels_are_playable() {
        let mut library = LevelLibrary::new(None);
        assert!(library.has_level(1));
        assert!(library.has_level(2));
        assert!(!library.has_level(3));
        assert!(!library.has_level(0));
        for level in 1..=2 {
            let loaded = library.load(level).expect("demo level");
            assert!(loaded.map.player_start().is_some());
        }
        assert!(library.load(3).is_err());
    }
}

use std::{
    fs::{self, OpenOptions},
    io::{self, Write as _},
    path::PathBuf,
};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use log::{debug, info};
use magic_maze_system_game_loop::{Checkpoint, CheckpointStore, CollaboratorError};
use thiserror::Error;

const CHECKPOINT_DOMAIN: &str = "magicmaze";
const CHECKPOINT_VERSION: &str = "v1";

/// Identifier prefix emitted before the level number and payload.
pub(crate) const CHECKPOINT_HEADER: &str = "magicmaze:v1";
const FIELD_DELIMITER: char = ':';

/// Encodes a checkpoint as a single text line.
pub(crate) fn encode(checkpoint: &Checkpoint) -> String {
    let payload = STANDARD_NO_PAD.encode(&checkpoint.status);
    format!("{CHECKPOINT_HEADER}:{}:{payload}", checkpoint.level)
}

/// Decodes a line produced by [`encode`].
pub(crate) fn decode(line: &str) -> Result<Checkpoint, CheckpointLineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CheckpointLineError::Empty);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(CheckpointLineError::MissingPrefix)?;
    let version = parts.next().ok_or(CheckpointLineError::MissingVersion)?;
    let level = parts.next().ok_or(CheckpointLineError::MissingLevel)?;
    let payload = parts.next().ok_or(CheckpointLineError::MissingPayload)?;

    if domain != CHECKPOINT_DOMAIN {
        return Err(CheckpointLineError::InvalidPrefix(domain.to_owned()));
    }
    if version != CHECKPOINT_VERSION {
        return Err(CheckpointLineError::UnsupportedVersion(version.to_owned()));
    }
    let level = level
        .parse::<u32>()
        .map_err(|_| CheckpointLineError::InvalidLevel(level.to_owned()))?;
    let status = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(CheckpointLineError::InvalidEncoding)?;

    Ok(Checkpoint { level, status })
}

/// Errors raised while decoding a checkpoint line.
#[derive(Debug, Error)]
pub(crate) enum CheckpointLineError {
    /// The line was empty or contained only whitespace.
    #[error("checkpoint line was empty")]
    Empty,
    /// The prefix segment was missing.
    #[error("checkpoint line is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("checkpoint line is missing the version")]
    MissingVersion,
    /// The level segment was missing.
    #[error("checkpoint line is missing the level")]
    MissingLevel,
    /// The payload segment was missing.
    #[error("checkpoint line is missing the payload")]
    MissingPayload,
    /// The line used an unexpected prefix.
    #[error("checkpoint prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The line used an unsupported version.
    #[error("checkpoint version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The level number could not be parsed.
    #[error("could not parse checkpoint level '{0}'")]
    InvalidLevel(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode checkpoint payload")]
    InvalidEncoding(#[source] base64::DecodeError),
}

/// Errors raised by the checkpoint file.
#[derive(Debug, Error)]
pub(crate) enum CheckpointFileError {
    /// The file could not be read or appended to.
    #[error("checkpoint file {path} is not accessible")]
    Io {
        /// Checkpoint file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// A line of the file is malformed.
    #[error("line {line} of {path} is not a checkpoint")]
    Line {
        /// Checkpoint file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Underlying decode error.
        #[source]
        source: CheckpointLineError,
    },
}

/// Appends checkpoints to a text file, one line each; the last line wins.
#[derive(Debug)]
pub(crate) struct FileCheckpoints {
    path: PathBuf,
}

impl FileCheckpoints {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn io_error(&self, source: io::Error) -> CheckpointFileError {
        CheckpointFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CheckpointStore for FileCheckpoints {
    fn save(&mut self, level: u32, status: &[u8]) -> Result<(), CollaboratorError> {
        let line = encode(&Checkpoint {
            level,
            status: status.to_vec(),
        });
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        writeln!(file, "{line}").map_err(|source| self.io_error(source))?;
        info!("checkpoint for level {level} written to {}", self.path.display());
        Ok(())
    }

    fn load_last(&mut self) -> Result<Option<Checkpoint>, CollaboratorError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no checkpoint file at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => return Err(self.io_error(source).into()),
        };

        let Some((index, line)) = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .last()
        else {
            return Ok(None);
        };
        let checkpoint = decode(line).map_err(|source| CheckpointFileError::Line {
            path: self.path.clone(),
            line: index + 1,
            source,
        })?;
        Ok(Some(checkpoint))
    }
}

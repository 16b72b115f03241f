//! Game corpus stored as CSV
//!
//! One row per game, one cell per recorded move (`"1a4  b3"`). Every row is
//! replayed from the opening position; rows with a malformed cell or an
//! illegal move are skipped as a whole and reported back to the caller.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use checkers_core::{decode_sequence, encode_sequence, GameState, RecordedMove};
use tracing::{debug, warn};

use crate::error::{CorpusError, RecordError};

/// A row that could not be decoded or replayed
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedRecord {
    /// 1-based row number in the file
    pub row: usize,
    pub error: RecordError,
}

/// Result of loading a corpus
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorpusLoad {
    pub games: Vec<Vec<RecordedMove>>,
    pub rejected: Vec<RejectedRecord>,
}

impl CorpusLoad {
    /// True when every row was accepted
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Load a corpus file
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<CorpusLoad, CorpusError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CorpusError::Io {
        operation: "open",
        path: path.to_path_buf(),
        source,
    })?;
    let load = parse_corpus(io::BufReader::new(file))?;
    debug!(
        path = %path.display(),
        games = load.games.len(),
        rejected = load.rejected.len(),
        "loaded corpus"
    );
    Ok(load)
}

/// Decode a corpus from any reader
pub fn parse_corpus<R: io::Read>(reader: R) -> Result<CorpusLoad, CorpusError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut load = CorpusLoad::default();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = record.position().map_or(index + 1, |pos| pos.line() as usize);
        let cells: Vec<&str> = record.iter().filter(|cell| !cell.is_empty()).collect();
        if cells.is_empty() {
            continue;
        }

        match decode_game(&cells) {
            Ok(game) => load.games.push(game),
            Err(error) => {
                warn!(row, %error, "rejecting corpus row");
                load.rejected.push(RejectedRecord { row, error });
            }
        }
    }
    Ok(load)
}

/// Decode one row and check it against the rules
fn decode_game(cells: &[&str]) -> Result<Vec<RecordedMove>, RecordError> {
    let game = decode_sequence(cells)?;
    GameState::replay(&game)?;
    Ok(game)
}

/// Write games to `path`, replacing its contents
pub fn write_corpus<P: AsRef<Path>>(path: P, games: &[Vec<RecordedMove>]) -> Result<(), CorpusError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| CorpusError::Io {
        operation: "create",
        path: path.to_path_buf(),
        source,
    })?;
    write_games(file, games)
}

/// Append games to `path`, creating it if needed
pub fn append_corpus<P: AsRef<Path>>(path: P, games: &[Vec<RecordedMove>]) -> Result<(), CorpusError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CorpusError::Io {
            operation: "append to",
            path: path.to_path_buf(),
            source,
        })?;
    write_games(file, games)
}

/// Encode games as CSV rows into any writer
pub fn write_games<W: io::Write>(writer: W, games: &[Vec<RecordedMove>]) -> Result<(), CorpusError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    for game in games {
        csv_writer.write_record(encode_sequence(game))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

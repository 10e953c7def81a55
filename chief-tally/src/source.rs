//! Boundary contracts towards the chain. The engine itself never does I/O;
//! everything it consumes arrives through these traits. The file-backed
//! implementations read the JSON dumps a log fetcher produces, which keeps
//! replay runs reproducible and off the network.

use crate::spell::SpellMeta;
use crate::Error;
use chief_replay::{Address, RawEvent};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Supplies the complete raw event set for the chief under inspection.
/// Implementations must deliver every etch and vote with its ordering key,
/// or fail before replay starts; partial fetches must never reach the
/// engine since replay has no rollback.
pub trait EventSource {
    fn events(&self) -> Result<Vec<RawEvent>, Error>;
}

/// Supplies candidate deployment parameters. `None` means the candidate is
/// not a recognizable spell contract, which is not an error.
pub trait SpellMetaSource {
    fn spell_meta(&self, candidate: &Address) -> Result<Option<SpellMeta>, Error>;
}

/// Event dump: one JSON array of raw log records.
pub struct JsonEventFile {
    path: PathBuf,
}

impl JsonEventFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for JsonEventFile {
    fn events(&self) -> Result<Vec<RawEvent>, Error> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[derive(Deserialize)]
struct SpellMetaRecord {
    target: Address,
    selector: String,
    data: String,
}

/// Candidate metadata dump: a JSON object keyed by candidate address, each
/// entry holding the spell's target, selector and argument blob as hex.
pub struct JsonSpellFile {
    records: HashMap<Address, SpellMetaRecord>,
}

impl JsonSpellFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        Ok(Self {
            records: serde_json::from_reader(reader)?,
        })
    }
}

impl SpellMetaSource for JsonSpellFile {
    fn spell_meta(&self, candidate: &Address) -> Result<Option<SpellMeta>, Error> {
        Ok(self.records.get(candidate).and_then(record_to_meta))
    }
}

// A record that does not parse as hex is treated the same as a candidate
// without metadata: not a recognizable spell, decoding stays best-effort.
fn record_to_meta(record: &SpellMetaRecord) -> Option<SpellMeta> {
    let mut selector = [0u8; 4];
    let raw = record.selector.strip_prefix("0x").unwrap_or(&record.selector);
    hex::decode_to_slice(raw, &mut selector).ok()?;
    let data = record.data.strip_prefix("0x").unwrap_or(&record.data);
    Some(SpellMeta {
        target: record.target,
        selector,
        calldata: hex::decode(data).ok()?,
    })
}

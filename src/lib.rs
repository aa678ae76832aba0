//! Decoder for PK6 creature records, the 232 and 260 byte structures the
//! generation 6 games use to store a single Pokémon.
//!
//! ```no_run
//! use pkparse::{decode, tables::Tables, Decoded, Options};
//!
//! let bytes = std::fs::read("pelipper.pk6")?;
//! let tables = Tables::from_path("tables.json")?;
//! let options = Options { parse_names: true };
//! if let Decoded::Named(record) = decode(&bytes, &options, &tables)? {
//!     println!("{:?} is level {:?}", record.species_name, record.derived.level);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bits;
pub mod cipher;
pub mod derived;
pub mod error;
pub mod growth;
pub mod names;
pub mod pokemon;
pub mod tables;
pub mod types;

use serde::Serialize;

pub use derived::DerivedRecord;
pub use error::{Error, Result};
pub use names::{resolve_names, EnrichedRecord};
pub use pokemon::RawRecord;
use tables::Tables;

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Resolve display names for every id in the record.
    pub parse_names: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decoded {
    Plain(DerivedRecord),
    Named(EnrichedRecord),
}

impl Decoded {
    pub fn derived(&self) -> &DerivedRecord {
        match self {
            Decoded::Plain(derived) => derived,
            Decoded::Named(enriched) => &enriched.derived,
        }
    }
}

/// Decodes a stored PK6 record.
pub fn decode(buffer: &[u8], options: &Options, tables: &Tables) -> Result<Decoded> {
    log::trace!("Decoding {} byte record", buffer.len());
    let raw = RawRecord::from_pk6(buffer)?;
    let derived = DerivedRecord::new(raw, tables);
    Ok(if options.parse_names {
        Decoded::Named(names::enrich(derived, tables))
    } else {
        Decoded::Plain(derived)
    })
}

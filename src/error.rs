use crate::pokemon::{PK6_SIZE_BOX, PK6_SIZE_PARTY};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Malformed input: {len} bytes is neither a box ({box_len}) nor a party ({party_len}) record",
        box_len = PK6_SIZE_BOX,
        party_len = PK6_SIZE_PARTY
    )]
    MalformedInput { len: usize },

    #[error("Read of {width} bits at bit offset {bit_offset} exceeds buffer of {len} bytes")]
    BitRange {
        bit_offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Field {name} cannot be read as {expected}")]
    FieldKind {
        name: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid lookup tables: {0}")]
    Tables(#[from] serde_json::Error),
}

#![allow(dead_code)]

use byteorder::{ByteOrder, LittleEndian};
use pkparse::cipher;
use pkparse::pokemon::{PK6_SIZE_BOX, PK6_SIZE_PARTY};
use pkparse::tables::Tables;

pub const TABLES_JSON: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/", "tables.json");

pub fn tables() -> Tables {
    Tables::from_path(TABLES_JSON).unwrap()
}

/// Writes fields into a canonical record, then checksums and encrypts it.
pub struct RecordBuilder {
    data: Vec<u8>,
}

impl RecordBuilder {
    pub fn new_box(seed: u32) -> Self {
        Self::with_len(seed, PK6_SIZE_BOX)
    }

    pub fn new_party(seed: u32) -> Self {
        Self::with_len(seed, PK6_SIZE_PARTY)
    }

    fn with_len(seed: u32, len: usize) -> Self {
        let mut data = vec![0u8; len];
        LittleEndian::write_u32(&mut data[0..4], seed);
        Self { data }
    }

    pub fn u8(mut self, offset: usize, value: u8) -> Self {
        self.data[offset] = value;
        self
    }

    pub fn u16(mut self, offset: usize, value: u16) -> Self {
        LittleEndian::write_u16(&mut self.data[offset..offset + 2], value);
        self
    }

    pub fn u32(mut self, offset: usize, value: u32) -> Self {
        LittleEndian::write_u32(&mut self.data[offset..offset + 4], value);
        self
    }

    pub fn text(mut self, offset: usize, value: &str) -> Self {
        for (idx, unit) in value.encode_utf16().enumerate() {
            let start = offset + idx * 2;
            LittleEndian::write_u16(&mut self.data[start..start + 2], unit);
        }
        self
    }

    pub fn canonical(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        let sum = cipher::checksum(&data);
        LittleEndian::write_u16(&mut data[0x06..0x08], sum);
        data
    }

    pub fn build(&self) -> Vec<u8> {
        cipher::encrypt(&self.canonical()).unwrap()
    }
}

pub const PELIPPER_TID: u16 = 12345;
pub const PELIPPER_SID: u16 = 12345 ^ 37200;
pub const PELIPPER_PID: u32 = (0x1234 << 16) | (0x1234 ^ 46848);

/// Packs IVs given in storage order along with the egg and nickname flags.
pub fn packed_ivs(ivs: [u32; 6], is_egg: bool, is_nicknamed: bool) -> u32 {
    let packed = ivs
        .iter()
        .enumerate()
        .fold(0u32, |packed, (idx, iv)| packed | (iv << (idx * 5)));
    packed | ((is_egg as u32) << 30) | ((is_nicknamed as u32) << 31)
}

/// A level 24 Modest Pelipper caught in Omega Ruby.
pub fn pelipper() -> RecordBuilder {
    RecordBuilder::new_box(0x5E1F_7A93)
        .u16(0x08, 279)
        .u16(0x0C, PELIPPER_TID)
        .u16(0x0E, PELIPPER_SID)
        .u32(0x10, 14319)
        .u8(0x14, 51)
        .u8(0x15, 1)
        .u32(0x18, PELIPPER_PID)
        .u8(0x1C, 15)
        .u8(0x20, 4)
        .text(0x40, "not-aardvark")
        .u16(0x5A, 97)
        .u16(0x5C, 352)
        .u16(0x5E, 371)
        .u16(0x60, 355)
        .u8(0x62, 30)
        .u8(0x63, 20)
        .u8(0x64, 10)
        .u8(0x65, 10)
        .u16(0x6A, 97)
        .u32(0x74, packed_ivs([31, 31, 29, 18, 12, 31], false, true))
        .u8(0xA2, 0)
        .text(0xB0, "Teddy")
        .u8(0xCA, 70)
        .u8(0xCC, 1)
        .u8(0xCD, 4)
        .u16(0xCE, 12)
        .u8(0xD0, 5)
        .u8(0xD4, 15)
        .u8(0xD5, 3)
        .u8(0xD6, 9)
        .u16(0xDA, 204)
        .u8(0xDC, 15)
        .u8(0xDD, 23)
        .u8(0xDF, 27)
        .u8(0xE0, 49)
        .u8(0xE1, 35)
        .u8(0xE2, 1)
        .u8(0xE3, 2)
}

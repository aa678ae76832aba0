//! Bit-level reads over a borrowed byte buffer.
//!
//! Everything in a PK6 record is little-endian, and packed fields count their
//! bits from the least significant bit of the first byte upwards.

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// The shape of a single entry in a record layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    /// `width` bits starting `shift` bits past the field's byte offset.
    Bits { shift: u8, width: u8 },
    /// UTF-16LE text occupying `bytes` bytes, terminator included.
    Text { bytes: usize },
    /// A bitflag array of `bytes` bytes.
    SetBits { bytes: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn u8(name: &'static str, offset: usize) -> Self {
        Self::new(name, offset, FieldKind::U8)
    }

    pub const fn u16(name: &'static str, offset: usize) -> Self {
        Self::new(name, offset, FieldKind::U16)
    }

    pub const fn u32(name: &'static str, offset: usize) -> Self {
        Self::new(name, offset, FieldKind::U32)
    }

    pub const fn bits(name: &'static str, offset: usize, shift: u8, width: u8) -> Self {
        Self::new(name, offset, FieldKind::Bits { shift, width })
    }

    pub const fn flag(name: &'static str, offset: usize, bit: u8) -> Self {
        Self::bits(name, offset, bit, 1)
    }

    pub const fn text(name: &'static str, offset: usize, bytes: usize) -> Self {
        Self::new(name, offset, FieldKind::Text { bytes })
    }

    pub const fn set_bits(name: &'static str, offset: usize, bytes: usize) -> Self {
        Self::new(name, offset, FieldKind::SetBits { bytes })
    }

    const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Field { name, offset, kind }
    }

    /// Absolute bit positions covered by this field.
    pub fn bit_range(&self) -> Range<usize> {
        let start = self.offset * 8;
        match self.kind {
            FieldKind::U8 => start..start + 8,
            FieldKind::U16 => start..start + 16,
            FieldKind::U32 => start..start + 32,
            FieldKind::Bits { shift, width } => {
                let start = start + shift as usize;
                start..start + width as usize
            }
            FieldKind::Text { bytes } | FieldKind::SetBits { bytes } => start..start + bytes * 8,
        }
    }
}

pub struct BitReader<'a> {
    bytes: &'a [u8],
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn check(&self, bit_offset: usize, width: usize) -> Result<()> {
        if width > 32 || bit_offset + width > self.bytes.len() * 8 {
            return Err(Error::BitRange {
                bit_offset,
                width,
                len: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn byte_slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        if offset + len > self.bytes.len() {
            return Err(Error::BitRange {
                bit_offset: offset * 8,
                width: len * 8,
                len: self.bytes.len(),
            });
        }
        Ok(&self.bytes[offset..offset + len])
    }

    /// Reads `width` (at most 32) bits starting at an absolute bit offset.
    pub fn read_bits(&self, bit_offset: usize, width: usize) -> Result<u32> {
        self.check(bit_offset, width)?;

        let mut value = 0u32;
        for idx in 0..width {
            let position = bit_offset + idx;
            let bit = (self.bytes[position / 8] >> (position % 8)) & 1;
            value |= (bit as u32) << idx;
        }

        Ok(value)
    }

    pub fn read_flag(&self, offset: usize, bit: u8) -> Result<bool> {
        Ok(self.read_bits(offset * 8 + bit as usize, 1)? != 0)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.byte_slice(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.byte_slice(offset, 2)?))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.byte_slice(offset, 4)?))
    }

    /// Positions of every set bit in a bitflag array, in ascending order.
    pub fn read_set_bits(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let flags = self.byte_slice(offset, len)?;
        Ok(flags
            .iter()
            .enumerate()
            .flat_map(|(byte_idx, byte)| {
                (0..8u8)
                    .filter(move |bit| (byte >> bit) & 1 != 0)
                    .map(move |bit| (byte_idx * 8) as u8 + bit)
            })
            .collect())
    }

    /// Decodes UTF-16LE text up to the first NUL code unit.
    pub fn read_utf16(&self, offset: usize, len: usize) -> Result<String> {
        let raw = self.byte_slice(offset, len)?;
        let units = raw
            .chunks_exact(2)
            .map(LittleEndian::read_u16)
            .take_while(|unit| *unit != 0x0000)
            .map(remap_private_glyph);

        Ok(char::decode_utf16(units)
            .map(|ch| ch.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }

    pub fn uint(&self, field: &Field) -> Result<u32> {
        match field.kind {
            FieldKind::U8 => self.read_u8(field.offset).map(u32::from),
            FieldKind::U16 => self.read_u16(field.offset).map(u32::from),
            FieldKind::U32 => self.read_u32(field.offset),
            FieldKind::Bits { .. } => {
                let range = field.bit_range();
                self.read_bits(range.start, range.len())
            }
            FieldKind::Text { .. } | FieldKind::SetBits { .. } => Err(Error::FieldKind {
                name: field.name,
                expected: "an integer",
            }),
        }
    }

    pub fn flag(&self, field: &Field) -> Result<bool> {
        Ok(self.uint(field)? != 0)
    }

    pub fn text(&self, field: &Field) -> Result<String> {
        match field.kind {
            FieldKind::Text { bytes } => self.read_utf16(field.offset, bytes),
            _ => Err(Error::FieldKind {
                name: field.name,
                expected: "text",
            }),
        }
    }

    pub fn set_bits(&self, field: &Field) -> Result<Vec<u8>> {
        match field.kind {
            FieldKind::SetBits { bytes } => self.read_set_bits(field.offset, bytes),
            _ => Err(Error::FieldKind {
                name: field.name,
                expected: "a bitflag array",
            }),
        }
    }
}

// The games store the gender symbols in the private use area.
fn remap_private_glyph(unit: u16) -> u16 {
    match unit {
        0xE08E => 0x2642,
        0xE08F => 0x2640,
        other => other,
    }
}

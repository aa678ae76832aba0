//! Block shuffling and stream encryption of PK6 records.
//!
//! A stored record is the canonical record with its four 56 byte blocks
//! permuted and every 16-bit word after the header XORed with a keystream.
//! Both the permutation and the keystream are driven by the encryption
//! constant, which is left in cleartext at the start of the record.

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::pokemon::{PK6_SIZE_BOX, PK6_SIZE_PARTY};

pub const BLOCK_SIZE: usize = 56;
pub const BLOCK_COUNT: usize = 4;
const BLOCK_REGION: Range<usize> = 8..PK6_SIZE_BOX;
const PARTY_REGION: Range<usize> = PK6_SIZE_BOX..PK6_SIZE_PARTY;
const CHECKSUM_OFFSET: usize = 0x06;

const LCG_MULTIPLIER: u32 = 0x41C6_4E6D;
const LCG_INCREMENT: u32 = 0x0000_6073;

/// For each shuffle value, which stored block holds canonical blocks A, B, C and D.
const BLOCK_POSITION: [[usize; BLOCK_COUNT]; 24] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 2, 3, 1],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
    [2, 0, 1, 3],
    [3, 0, 1, 2],
    [2, 0, 3, 1],
    [3, 0, 2, 1],
    [1, 2, 0, 3],
    [1, 3, 0, 2],
    [2, 1, 0, 3],
    [3, 1, 0, 2],
    [2, 3, 0, 1],
    [3, 2, 0, 1],
    [1, 2, 3, 0],
    [1, 3, 2, 0],
    [2, 1, 3, 0],
    [3, 1, 2, 0],
    [2, 3, 1, 0],
    [3, 2, 1, 0],
];

/// A record in canonical layout, along with what was learned while decrypting it.
#[derive(Clone, Debug)]
pub struct Decrypted {
    pub data: Vec<u8>,
    pub seed: u32,
    pub checksum_valid: bool,
}

/// Pseudo-random keystream of 16-bit words seeded by the encryption constant.
struct Keystream {
    state: u32,
}

impl Keystream {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl Iterator for Keystream {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        Some((self.state >> 16) as u16)
    }
}

pub fn check_length(data: &[u8]) -> Result<()> {
    match data.len() {
        PK6_SIZE_BOX | PK6_SIZE_PARTY => Ok(()),
        len => {
            log::error!("Invalid record length. Found: {len}, Expected: {PK6_SIZE_BOX} or {PK6_SIZE_PARTY}");
            Err(Error::MalformedInput { len })
        }
    }
}

pub fn seed(data: &[u8]) -> Result<u32> {
    check_length(data)?;
    Ok(LittleEndian::read_u32(&data[0..4]))
}

/// Index into the block order table for a given seed.
pub fn shuffle_value(seed: u32) -> usize {
    ((seed >> 13) & 0x1f) as usize % 24
}

pub fn block_order(seed: u32) -> [usize; BLOCK_COUNT] {
    BLOCK_POSITION[shuffle_value(seed)]
}

/// Decrypts and unshuffles a stored record into canonical layout.
pub fn decrypt(stored: &[u8]) -> Result<Decrypted> {
    let seed = seed(stored)?;
    log::trace!("Decrypting record with seed 0x{seed:08x}");

    let mut data = stored.to_vec();
    apply_keystream(&mut data, seed);
    let data = permute_blocks(&data, block_order(seed));

    let computed = checksum(&data);
    let stored_checksum = LittleEndian::read_u16(&data[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2]);
    let checksum_valid = computed == stored_checksum;
    if !checksum_valid {
        log::warn!("Computed checksum 0x{computed:04x}, but record checksum was 0x{stored_checksum:04x}");
    }

    Ok(Decrypted {
        data,
        seed,
        checksum_valid,
    })
}

/// Shuffles and encrypts a canonical record, the inverse of [`decrypt`].
///
/// The stored checksum is left untouched.
pub fn encrypt(canonical: &[u8]) -> Result<Vec<u8>> {
    let seed = seed(canonical)?;
    let mut data = permute_blocks(canonical, inverse(block_order(seed)));
    apply_keystream(&mut data, seed);
    Ok(data)
}

/// Wrapping sum of the canonical block region as little-endian words.
pub fn checksum(canonical: &[u8]) -> u16 {
    canonical[BLOCK_REGION]
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .fold(0u16, |sum, word| sum.wrapping_add(word))
}

// XOR is its own inverse, so this both encrypts and decrypts.
fn apply_keystream(data: &mut [u8], seed: u32) {
    let mut regions = vec![BLOCK_REGION];
    if data.len() == PK6_SIZE_PARTY {
        // The battle stats are encrypted separately, restarting from the same seed.
        regions.push(PARTY_REGION);
    }

    for region in regions {
        for (word, key) in data[region].chunks_exact_mut(2).zip(Keystream::new(seed)) {
            let value = LittleEndian::read_u16(word) ^ key;
            LittleEndian::write_u16(word, value);
        }
    }
}

fn permute_blocks(data: &[u8], order: [usize; BLOCK_COUNT]) -> Vec<u8> {
    let mut out = data.to_vec();
    let base = BLOCK_REGION.start;
    for (dest, src) in order.into_iter().enumerate() {
        let dest_offset = base + dest * BLOCK_SIZE;
        let src_offset = base + src * BLOCK_SIZE;
        out[dest_offset..dest_offset + BLOCK_SIZE]
            .copy_from_slice(&data[src_offset..src_offset + BLOCK_SIZE]);
    }
    out
}

fn inverse(order: [usize; BLOCK_COUNT]) -> [usize; BLOCK_COUNT] {
    let mut inverted = [0usize; BLOCK_COUNT];
    for (idx, position) in order.into_iter().enumerate() {
        inverted[position] = idx;
    }
    inverted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_for_shuffle(sv: usize) -> u32 {
        ((sv as u32) << 13) | 0x1234
    }

    fn canonical(seed: u32, len: usize) -> Vec<u8> {
        let mut data: Vec<u8> = (0..len).map(|idx| (idx * 7 + 3) as u8).collect();
        LittleEndian::write_u32(&mut data[0..4], seed);
        let sum = checksum(&data);
        LittleEndian::write_u16(&mut data[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2], sum);
        data
    }

    #[test]
    fn test_block_positions_are_permutations() {
        for order in BLOCK_POSITION {
            let mut sorted = order;
            sorted.sort();
            assert_eq!(sorted, [0, 1, 2, 3]);
        }
        let mut all = BLOCK_POSITION.to_vec();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn test_shuffle_value_uses_bits_13_to_17() {
        assert_eq!(shuffle_value(0), 0);
        assert_eq!(shuffle_value(0x1fff), 0);
        assert_eq!(shuffle_value(5 << 13), 5);
        assert_eq!(shuffle_value(25 << 13), 1);
        assert_eq!(shuffle_value(0xffff_ffff), 31 % 24);
    }

    #[test]
    fn test_round_trip_for_every_block_order() {
        for sv in 0..24 {
            let seed = seed_for_shuffle(sv);
            assert_eq!(shuffle_value(seed), sv);
            for len in [PK6_SIZE_BOX, PK6_SIZE_PARTY] {
                let plain = canonical(seed, len);
                let stored = encrypt(&plain).unwrap();
                assert_ne!(stored, plain, "shuffle value {sv} left the record unencrypted");
                assert_eq!(&stored[0..8], &plain[0..8]);

                let decrypted = decrypt(&stored).unwrap();
                assert_eq!(decrypted.data, plain, "round trip failed for shuffle value {sv}");
                assert_eq!(decrypted.seed, seed);
                assert!(decrypted.checksum_valid);
            }
        }
    }

    #[test]
    fn test_blocks_are_placed_by_order() {
        let seed = seed_for_shuffle(6);
        let mut plain = vec![0u8; PK6_SIZE_BOX];
        LittleEndian::write_u32(&mut plain[0..4], seed);
        for block in 0..BLOCK_COUNT {
            let start = 8 + block * BLOCK_SIZE;
            plain[start..start + BLOCK_SIZE].fill(0xA0 + block as u8);
        }
        let shuffled = permute_blocks(&plain, inverse(block_order(seed)));
        // Order 6 is B, A, C, D: canonical A is stored second.
        assert_eq!(shuffled[8], 0xA1);
        assert_eq!(shuffled[8 + BLOCK_SIZE], 0xA0);
        assert_eq!(permute_blocks(&shuffled, block_order(seed)), plain);
    }

    #[test]
    fn test_keystream_matches_lcg() {
        let mut keys = Keystream::new(1);
        let first = 1u32.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        assert_eq!(keys.next(), Some((first >> 16) as u16));
        let second = first.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        assert_eq!(keys.next(), Some((second >> 16) as u16));
    }

    #[test]
    fn test_checksum_mismatch_is_flagged() {
        let seed = seed_for_shuffle(11);
        let mut plain = canonical(seed, PK6_SIZE_BOX);
        plain[0x06] ^= 0xff;
        let decrypted = decrypt(&encrypt(&plain).unwrap()).unwrap();
        assert!(!decrypted.checksum_valid);
        assert_eq!(decrypted.data, plain);
    }

    #[test]
    fn test_wrong_length_is_malformed() {
        for len in [0, 4, 231, 233, 259, 261] {
            assert!(matches!(
                decrypt(&vec![0u8; len]),
                Err(Error::MalformedInput { len: found }) if found == len
            ));
        }
    }
}

use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

/// (hashX[11], tx_num u32, nout u16) -> amount u64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoKey {
    pub hash_x: HashX,
    pub tx_num: u32,
    pub nout: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtxoValue {
    pub amount: u64,
}

pub struct UtxoRow;

impl UtxoRow {
    pub const PREFIX: u8 = prefix::UTXO;
    pub const CACHE_SIZE: usize = 128 * 1024 * 1024;

    pub fn pack_key(hash_x: &HashX, tx_num: u32, nout: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + HASH_X_LEN + 4 + 2);
        out.push(Self::PREFIX);
        out.extend_from_slice(hash_x);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&nout.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<UtxoKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (hash_x, rest) = take_fixed::<HASH_X_LEN>(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (nout, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(UtxoKey {
            hash_x,
            tx_num,
            nout,
        })
    }

    pub fn pack_value(amount: u64) -> Vec<u8> {
        amount.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<UtxoValue, CodecError> {
        let (amount, rest) = take_u64_be(value)?;
        expect_empty(rest)?;
        Ok(UtxoValue { amount })
    }

    pub fn pack_item(hash_x: &HashX, tx_num: u32, nout: u16, amount: u64) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(hash_x, tx_num, nout), Self::pack_value(amount))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(UtxoKey, UtxoValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(hash_x: &HashX) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(hash_x);
        out
    }

    pub fn key_part_2(hash_x: &HashX, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_1(hash_x);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_3(hash_x: &HashX, tx_num: u32, nout: u16) -> Vec<u8> {
        Self::pack_key(hash_x, tx_num, nout)
    }
}

/// (short_tx_hash[4], tx_num u32, nout u16) -> hashX[11]. Lets a wallet
/// that only remembers a 4-byte tx-hash prefix recover the owning hashX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashXUtxoKey {
    pub short_tx_hash: ShortTxHash,
    pub tx_num: u32,
    pub nout: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashXUtxoValue {
    pub hash_x: HashX,
}

pub struct HashXUtxoRow;

impl HashXUtxoRow {
    pub const PREFIX: u8 = prefix::HASHX_UTXO;
    pub const CACHE_SIZE: usize = 32 * 1024 * 1024;

    pub fn pack_key(short_tx_hash: &ShortTxHash, tx_num: u32, nout: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + SHORT_TX_HASH_LEN + 4 + 2);
        out.push(Self::PREFIX);
        out.extend_from_slice(short_tx_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&nout.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<HashXUtxoKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (short_tx_hash, rest) = take_fixed::<SHORT_TX_HASH_LEN>(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (nout, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(HashXUtxoKey {
            short_tx_hash,
            tx_num,
            nout,
        })
    }

    pub fn pack_value(hash_x: &HashX) -> Vec<u8> {
        hash_x.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<HashXUtxoValue, CodecError> {
        let (hash_x, rest) = take_fixed::<HASH_X_LEN>(value)?;
        expect_empty(rest)?;
        Ok(HashXUtxoValue { hash_x })
    }

    pub fn pack_item(
        short_tx_hash: &ShortTxHash,
        tx_num: u32,
        nout: u16,
        hash_x: &HashX,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(short_tx_hash, tx_num, nout),
            Self::pack_value(hash_x),
        )
    }

    pub fn unpack_item(
        key: &[u8],
        value: &[u8],
    ) -> Result<(HashXUtxoKey, HashXUtxoValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(short_tx_hash: &ShortTxHash) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(short_tx_hash);
        out
    }

    pub fn key_part_2(short_tx_hash: &ShortTxHash, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_1(short_tx_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_3(short_tx_hash: &ShortTxHash, tx_num: u32, nout: u16) -> Vec<u8> {
        Self::pack_key(short_tx_hash, tx_num, nout)
    }
}

/// (hashX[11], height u32) -> a flat BE-u32-per-occurrence list of tx_nums
/// touching that hashX at that height.
///
/// The source stores this as a native-endian `array('I')`; this crate uses
/// explicit big-endian words instead so the on-disk format is portable and
/// stays consistent with every other codec primitive in the catalog (see
/// SPEC_FULL.md §3.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashXHistoryKey {
    pub hash_x: HashX,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashXHistoryValue {
    pub tx_nums: Vec<u32>,
}

pub struct HashXHistoryRow;

impl HashXHistoryRow {
    pub const PREFIX: u8 = prefix::HASHX_HISTORY;
    pub const CACHE_SIZE: usize = 32 * 1024 * 1024;

    pub fn pack_key(hash_x: &HashX, height: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + HASH_X_LEN + 4);
        out.push(Self::PREFIX);
        out.extend_from_slice(hash_x);
        out.extend_from_slice(&height.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<HashXHistoryKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (hash_x, rest) = take_fixed::<HASH_X_LEN>(rest)?;
        let (height, rest) = take_u32_be(rest)?;
        expect_empty(rest)?;
        Ok(HashXHistoryKey { hash_x, height })
    }

    pub fn pack_value(tx_nums: &[u32]) -> Vec<u8> {
        let mut out = Vec::with_capacity(tx_nums.len() * 4);
        for n in tx_nums {
            out.extend_from_slice(&n.to_be_bytes());
        }
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<HashXHistoryValue, CodecError> {
        if value.len() % 4 != 0 {
            return Err(CodecError::ValueLength {
                expected: value.len() - (value.len() % 4) + 4,
                found: value.len(),
            });
        }
        let tx_nums = value
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes(c.try_into().unwrap()))
            .collect();
        Ok(HashXHistoryValue { tx_nums })
    }

    pub fn pack_item(hash_x: &HashX, height: u32, tx_nums: &[u32]) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(hash_x, height), Self::pack_value(tx_nums))
    }

    pub fn unpack_item(
        key: &[u8],
        value: &[u8],
    ) -> Result<(HashXHistoryKey, HashXHistoryValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(hash_x: &HashX) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(hash_x);
        out
    }

    pub fn key_part_2(hash_x: &HashX, height: u32) -> Vec<u8> {
        Self::pack_key(hash_x, height)
    }
}

/// (height u32) -> concatenated 11-byte hashX list: every distinct hashX
/// touched by a transaction at that height, for notification fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchedHashXKey {
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TouchedHashXValue {
    pub hash_xs: Vec<HashX>,
}

pub struct TouchedHashXRow;

impl TouchedHashXRow {
    pub const PREFIX: u8 = prefix::TOUCHED_HASHX;
    pub const CACHE_SIZE: usize = 1024 * 1024;

    pub fn pack_key(height: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 4);
        out.push(Self::PREFIX);
        out.extend_from_slice(&height.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<TouchedHashXKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (height, rest) = take_u32_be(rest)?;
        expect_empty(rest)?;
        Ok(TouchedHashXKey { height })
    }

    pub fn pack_value(hash_xs: &[HashX]) -> Vec<u8> {
        let mut out = Vec::with_capacity(hash_xs.len() * HASH_X_LEN);
        for h in hash_xs {
            out.extend_from_slice(h);
        }
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<TouchedHashXValue, CodecError> {
        if value.len() % HASH_X_LEN != 0 {
            return Err(CodecError::ValueLength {
                expected: value.len() - (value.len() % HASH_X_LEN) + HASH_X_LEN,
                found: value.len(),
            });
        }
        let hash_xs = value
            .chunks_exact(HASH_X_LEN)
            .map(|c| c.try_into().unwrap())
            .collect();
        Ok(TouchedHashXValue { hash_xs })
    }

    pub fn pack_item(height: u32, hash_xs: &[HashX]) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height), Self::pack_value(hash_xs))
    }

    pub fn unpack_item(
        key: &[u8],
        value: &[u8],
    ) -> Result<(TouchedHashXKey, TouchedHashXValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(height: u32) -> Vec<u8> {
        Self::pack_key(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utxo_roundtrip_matches_s1() {
        // S1: pack_item(hashX=0x0102..0B, tx_num=7, nout=2, amount=1000)
        let hash_x: HashX = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B];
        let (key, value) = UtxoRow::pack_item(&hash_x, 7, 2, 1000);
        let mut expected_key = vec![b'u'];
        expected_key.extend_from_slice(&hash_x);
        expected_key.extend_from_slice(&7u32.to_be_bytes());
        expected_key.extend_from_slice(&2u16.to_be_bytes());
        assert_eq!(key, expected_key);
        assert_eq!(value, 1000u64.to_be_bytes().to_vec());

        let (k, v) = UtxoRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k, UtxoKey { hash_x, tx_num: 7, nout: 2 });
        assert_eq!(v, UtxoValue { amount: 1000 });
    }

    #[test]
    fn utxo_rejects_wrong_prefix() {
        let bogus = vec![b'x'; 18];
        assert!(matches!(
            UtxoRow::unpack_key(&bogus),
            Err(CodecError::WrongPrefix { .. })
        ));
    }

    #[test]
    fn utxo_key_parts_are_prefixes_of_each_other() {
        let hash_x: HashX = [9; 11];
        let p0 = UtxoRow::key_part_0();
        let p1 = UtxoRow::key_part_1(&hash_x);
        let p2 = UtxoRow::key_part_2(&hash_x, 7);
        let p3 = UtxoRow::key_part_3(&hash_x, 7, 2);
        assert!(p1.starts_with(&p0));
        assert!(p2.starts_with(&p1));
        assert!(p3.starts_with(&p2));
    }

    #[test]
    fn hashx_history_value_round_trips() {
        let hash_x: HashX = [1; 11];
        let tx_nums = vec![1u32, 2, 300];
        let (key, value) = HashXHistoryRow::pack_item(&hash_x, 42, &tx_nums);
        let (k, v) = HashXHistoryRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k, HashXHistoryKey { hash_x, height: 42 });
        assert_eq!(v.tx_nums, tx_nums);
    }

    #[test]
    fn touched_hashx_value_round_trips() {
        let hash_xs = vec![[1u8; 11], [2u8; 11]];
        let (key, value) = TouchedHashXRow::pack_item(100, &hash_xs);
        let (k, v) = TouchedHashXRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k, TouchedHashXKey { height: 100 });
        assert_eq!(v.hash_xs, hash_xs);
    }
}

use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

macro_rules! height_keyed_row {
    ($row:ident, $key:ident, $prefix:expr, $cache_size:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $key {
            pub height: u32,
        }

        pub struct $row;

        impl $row {
            pub const PREFIX: u8 = $prefix;
            pub const CACHE_SIZE: usize = $cache_size;

            pub fn pack_key(height: u32) -> Vec<u8> {
                let mut out = Vec::with_capacity(5);
                out.push(Self::PREFIX);
                out.extend_from_slice(&height.to_be_bytes());
                out
            }

            pub fn unpack_key(key: &[u8]) -> Result<$key, CodecError> {
                let (tag, rest) = take_u8(key)?;
                if tag != Self::PREFIX {
                    return Err(CodecError::WrongPrefix {
                        expected: Self::PREFIX,
                        found: tag,
                    });
                }
                let (height, rest) = take_u32_be(rest)?;
                expect_empty(rest)?;
                Ok($key { height })
            }

            pub fn key_part_0() -> Vec<u8> {
                vec![Self::PREFIX]
            }

            pub fn key_part_1(height: u32) -> Vec<u8> {
                Self::pack_key(height)
            }
        }
    };
}

height_keyed_row!(BlockHashRow, BlockHashKey, prefix::BLOCK_HASH, 1024 * 1024);
height_keyed_row!(HeaderRow, HeaderKey, prefix::HEADER, 8 * 1024 * 1024);
height_keyed_row!(TxCountRow, TxCountKey, prefix::TX_COUNT, 1024 * 1024);
height_keyed_row!(BlockTxRow, BlockTxKey, prefix::BLOCK_TX, 1024 * 1024);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHashValue {
    pub block_hash: Hash32,
}

impl BlockHashRow {
    pub fn pack_value(block_hash: &Hash32) -> Vec<u8> {
        block_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<BlockHashValue, CodecError> {
        let (block_hash, rest) = take_fixed::<HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(BlockHashValue { block_hash })
    }

    pub fn pack_item(height: u32, block_hash: &Hash32) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height), Self::pack_value(block_hash))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(BlockHashKey, BlockHashValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderValue {
    pub header: HeaderBytes,
}

impl HeaderRow {
    pub fn pack_value(header: &HeaderBytes) -> Vec<u8> {
        header.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<HeaderValue, CodecError> {
        let (header, rest) = take_fixed::<HEADER_LEN>(value)?;
        expect_empty(rest)?;
        Ok(HeaderValue { header })
    }

    pub fn pack_item(height: u32, header: &HeaderBytes) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height), Self::pack_value(header))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(HeaderKey, HeaderValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxCountValue {
    pub tx_count: u32,
}

impl TxCountRow {
    pub fn pack_value(tx_count: u32) -> Vec<u8> {
        tx_count.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<TxCountValue, CodecError> {
        let (tx_count, rest) = take_u32_be(value)?;
        expect_empty(rest)?;
        Ok(TxCountValue { tx_count })
    }

    pub fn pack_item(height: u32, tx_count: u32) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height), Self::pack_value(tx_count))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(TxCountKey, TxCountValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

/// (height u32) -> concatenated 32-byte tx hashes, in block order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockTxValue {
    pub tx_hashes: Vec<Hash32>,
}

impl BlockTxRow {
    pub fn pack_value(tx_hashes: &[Hash32]) -> Vec<u8> {
        let mut out = Vec::with_capacity(tx_hashes.len() * HASH_LEN);
        for h in tx_hashes {
            out.extend_from_slice(h);
        }
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<BlockTxValue, CodecError> {
        if value.len() % HASH_LEN != 0 {
            return Err(CodecError::ValueLength {
                expected: value.len() - (value.len() % HASH_LEN) + HASH_LEN,
                found: value.len(),
            });
        }
        let tx_hashes = value.chunks_exact(HASH_LEN).map(|c| c.try_into().unwrap()).collect();
        Ok(BlockTxValue { tx_hashes })
    }

    pub fn pack_item(height: u32, tx_hashes: &[Hash32]) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height), Self::pack_value(tx_hashes))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(BlockTxKey, BlockTxValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

/// (tx_num u32) -> tx_hash[32].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHashKey {
    pub tx_num: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHashValue {
    pub tx_hash: Hash32,
}

pub struct TxHashRow;

impl TxHashRow {
    pub const PREFIX: u8 = prefix::TX_HASH;
    pub const CACHE_SIZE: usize = 16 * 1024 * 1024;

    pub fn pack_key(tx_num: u32) -> Vec<u8> {
        let mut out = vec![Self::PREFIX];
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<TxHashKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (tx_num, rest) = take_u32_be(rest)?;
        expect_empty(rest)?;
        Ok(TxHashKey { tx_num })
    }

    pub fn pack_value(tx_hash: &Hash32) -> Vec<u8> {
        tx_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<TxHashValue, CodecError> {
        let (tx_hash, rest) = take_fixed::<HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(TxHashValue { tx_hash })
    }

    pub fn pack_item(tx_num: u32, tx_hash: &Hash32) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(tx_num), Self::pack_value(tx_hash))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(TxHashKey, TxHashValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(tx_num: u32) -> Vec<u8> {
        Self::pack_key(tx_num)
    }
}

macro_rules! hash_keyed_row {
    ($row:ident, $key:ident, $prefix:expr, $cache_size:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $key {
            pub tx_hash: Hash32,
        }

        pub struct $row;

        impl $row {
            pub const PREFIX: u8 = $prefix;
            pub const CACHE_SIZE: usize = $cache_size;

            pub fn pack_key(tx_hash: &Hash32) -> Vec<u8> {
                let mut out = Vec::with_capacity(1 + HASH_LEN);
                out.push(Self::PREFIX);
                out.extend_from_slice(tx_hash);
                out
            }

            pub fn unpack_key(key: &[u8]) -> Result<$key, CodecError> {
                let (tag, rest) = take_u8(key)?;
                if tag != Self::PREFIX {
                    return Err(CodecError::WrongPrefix {
                        expected: Self::PREFIX,
                        found: tag,
                    });
                }
                let (tx_hash, rest) = take_fixed::<HASH_LEN>(rest)?;
                expect_empty(rest)?;
                Ok($key { tx_hash })
            }

            pub fn key_part_0() -> Vec<u8> {
                vec![Self::PREFIX]
            }

            pub fn key_part_1(tx_hash: &Hash32) -> Vec<u8> {
                Self::pack_key(tx_hash)
            }
        }
    };
}

hash_keyed_row!(TxNumRow, TxNumKey, prefix::TX_NUM, 16 * 1024 * 1024);
hash_keyed_row!(TxRow, TxKey, prefix::TX, 256 * 1024 * 1024);
hash_keyed_row!(MempoolTxRow, MempoolTxKey, prefix::MEMPOOL_TX, 16 * 1024 * 1024);

/// Sentinel bounds for scanning the mempool_tx key range in isolation.
/// Eviction policy for mempool entries is not this crate's concern (an
/// ingestion-component decision, per the Open Question it is carried from).
pub const MEMPOOL_TX_MIN: Hash32 = [0x00; HASH_LEN];
pub const MEMPOOL_TX_MAX: Hash32 = [0xff; HASH_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxNumValue {
    pub tx_num: u32,
}

impl TxNumRow {
    pub fn pack_value(tx_num: u32) -> Vec<u8> {
        tx_num.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<TxNumValue, CodecError> {
        let (tx_num, rest) = take_u32_be(value)?;
        expect_empty(rest)?;
        Ok(TxNumValue { tx_num })
    }

    pub fn pack_item(tx_hash: &Hash32, tx_num: u32) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(tx_hash), Self::pack_value(tx_num))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(TxNumKey, TxNumValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxValue {
    pub raw_tx: Vec<u8>,
}

impl TxRow {
    pub fn pack_value(raw_tx: &[u8]) -> Vec<u8> {
        raw_tx.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<TxValue, CodecError> {
        Ok(TxValue {
            raw_tx: value.to_vec(),
        })
    }

    pub fn pack_item(tx_hash: &Hash32, raw_tx: &[u8]) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(tx_hash), Self::pack_value(raw_tx))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(TxKey, TxValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MempoolTxValue {
    pub raw_tx: Vec<u8>,
}

impl MempoolTxRow {
    pub fn pack_value(raw_tx: &[u8]) -> Vec<u8> {
        raw_tx.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<MempoolTxValue, CodecError> {
        Ok(MempoolTxValue {
            raw_tx: value.to_vec(),
        })
    }

    pub fn pack_item(tx_hash: &Hash32, raw_tx: &[u8]) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(tx_hash), Self::pack_value(raw_tx))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(MempoolTxKey, MempoolTxValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_hash_round_trips() {
        let hash: Hash32 = [7u8; 32];
        let (key, value) = BlockHashRow::pack_item(100, &hash);
        let (k, v) = BlockHashRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.height, 100);
        assert_eq!(v.block_hash, hash);
    }

    #[test]
    fn tx_round_trips_via_hash_key() {
        let hash: Hash32 = [3u8; 32];
        let raw = vec![1, 2, 3, 4, 5];
        let (key, value) = TxRow::pack_item(&hash, &raw);
        let (k, v) = TxRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.tx_hash, hash);
        assert_eq!(v.raw_tx, raw);
    }

    #[test]
    fn block_tx_concatenates_hashes_in_order() {
        let hashes = vec![[1u8; 32], [2u8; 32], [3u8; 32]];
        let (key, value) = BlockTxRow::pack_item(10, &hashes);
        let (k, v) = BlockTxRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.height, 10);
        assert_eq!(v.tx_hashes, hashes);
    }

    #[test]
    fn mempool_sentinels_bound_full_key_range() {
        let min_key = MempoolTxRow::pack_key(&MEMPOOL_TX_MIN);
        let max_key = MempoolTxRow::pack_key(&MEMPOOL_TX_MAX);
        assert!(min_key < max_key);
    }
}

use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;
use std::collections::BTreeSet;

/// (height u32) -> (touched_len u32, deleted_len u32, sorted touched
/// hashXs, sorted deleted hashXs). Per-block change set used to notify
/// subscribers without re-diffing the whole store; hashXs are stored
/// sorted so the value has one canonical byte representation regardless
/// of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchedOrDeletedKey {
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TouchedOrDeletedValue {
    pub touched: BTreeSet<HashX>,
    pub deleted: BTreeSet<HashX>,
}

pub struct TouchedOrDeletedRow;

impl TouchedOrDeletedRow {
    pub const PREFIX: u8 = prefix::TOUCHED_OR_DELETED;

    pub fn pack_key(height: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(5);
        out.push(Self::PREFIX);
        out.extend_from_slice(&height.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<TouchedOrDeletedKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (height, rest) = take_u32_be(rest)?;
        expect_empty(rest)?;
        Ok(TouchedOrDeletedKey { height })
    }

    pub fn pack_value(touched: &BTreeSet<HashX>, deleted: &BTreeSet<HashX>) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + (touched.len() + deleted.len()) * HASH_X_LEN);
        out.extend_from_slice(&(touched.len() as u32).to_be_bytes());
        out.extend_from_slice(&(deleted.len() as u32).to_be_bytes());
        for h in touched {
            out.extend_from_slice(h);
        }
        for h in deleted {
            out.extend_from_slice(h);
        }
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<TouchedOrDeletedValue, CodecError> {
        let (touched_len, rest) = take_u32_be(value)?;
        let (deleted_len, rest) = take_u32_be(rest)?;
        let (touched_len, deleted_len) = (touched_len as usize, deleted_len as usize);
        let mut rest = rest;
        let mut touched = BTreeSet::new();
        for _ in 0..touched_len {
            let (h, tail) = take_fixed::<HASH_X_LEN>(rest)?;
            touched.insert(h);
            rest = tail;
        }
        let mut deleted = BTreeSet::new();
        for _ in 0..deleted_len {
            let (h, tail) = take_fixed::<HASH_X_LEN>(rest)?;
            deleted.insert(h);
            rest = tail;
        }
        expect_empty(rest)?;
        Ok(TouchedOrDeletedValue { touched, deleted })
    }

    pub fn pack_item(height: u32, touched: &BTreeSet<HashX>, deleted: &BTreeSet<HashX>) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height), Self::pack_value(touched, deleted))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(TouchedOrDeletedKey, TouchedOrDeletedValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(height: u32) -> Vec<u8> {
        Self::pack_key(height)
    }
}

/// (height u64, block_hash[32]) -> opaque undo bytes, produced by
/// [`crate::opstack`]. The height field is a u64 here though every other
/// row's height is u32, matching the upstream layout byte-for-byte so a
/// reader never has to special-case this one row's width at the codec
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoKey {
    pub height: u64,
    pub block_hash: Hash32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoValue {
    pub undo_ops: Vec<u8>,
}

pub struct UndoRow;

impl UndoRow {
    pub const PREFIX: u8 = prefix::UNDO;

    pub fn pack_key(height: u64, block_hash: &Hash32) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 8 + HASH_LEN);
        out.push(Self::PREFIX);
        out.extend_from_slice(&height.to_be_bytes());
        out.extend_from_slice(block_hash);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<UndoKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (height, rest) = take_u64_be(rest)?;
        let (block_hash, rest) = take_fixed::<HASH_LEN>(rest)?;
        expect_empty(rest)?;
        Ok(UndoKey { height, block_hash })
    }

    pub fn pack_value(undo_ops: &[u8]) -> Vec<u8> {
        undo_ops.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<UndoValue, CodecError> {
        Ok(UndoValue {
            undo_ops: value.to_vec(),
        })
    }

    pub fn pack_item(height: u64, block_hash: &Hash32, undo_ops: &[u8]) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(height, block_hash), Self::pack_value(undo_ops))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(UndoKey, UndoValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(height: u64) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(&height.to_be_bytes());
        out
    }

    pub fn key_part_2(height: u64, block_hash: &Hash32) -> Vec<u8> {
        Self::pack_key(height, block_hash)
    }
}

/// Legacy value width before `es_sync_height` was appended: a read must
/// tolerate both, so `unpack_value` silently upgrades a 94-byte legacy
/// record the same way the original store does.
const DB_STATE_LEGACY_LEN: usize = 94;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStateKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStateValue {
    pub genesis: Hash32,
    pub height: u32,
    pub tx_count: u32,
    pub tip: Hash32,
    pub utxo_flush_count: u32,
    pub wall_time: u32,
    pub catching_up: bool,
    pub db_version: u8,
    pub hist_flush_count: i32,
    pub comp_flush_count: i32,
    pub comp_cursor: i32,
    pub es_sync_height: u32,
}

pub struct DbStateRow;

impl DbStateRow {
    pub const PREFIX: u8 = prefix::DB_STATE;

    /// Singleton row: the key is the prefix byte alone.
    pub fn pack_key() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn unpack_key(key: &[u8]) -> Result<DbStateKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        expect_empty(rest)?;
        Ok(DbStateKey)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pack_value(
        genesis: &Hash32,
        height: u32,
        tx_count: u32,
        tip: &Hash32,
        utxo_flush_count: u32,
        wall_time: u32,
        catching_up: bool,
        db_version: u8,
        hist_flush_count: i32,
        comp_flush_count: i32,
        comp_cursor: i32,
        es_sync_height: u32,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(98);
        out.extend_from_slice(genesis);
        out.extend_from_slice(&height.to_be_bytes());
        out.extend_from_slice(&tx_count.to_be_bytes());
        out.extend_from_slice(tip);
        out.extend_from_slice(&utxo_flush_count.to_be_bytes());
        out.extend_from_slice(&wall_time.to_be_bytes());
        out.push(catching_up as u8);
        out.push(db_version);
        out.extend_from_slice(&hist_flush_count.to_be_bytes());
        out.extend_from_slice(&comp_flush_count.to_be_bytes());
        out.extend_from_slice(&comp_cursor.to_be_bytes());
        out.extend_from_slice(&es_sync_height.to_be_bytes());
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<DbStateValue, CodecError> {
        let mut owned;
        let value = if value.len() == DB_STATE_LEGACY_LEN {
            owned = value.to_vec();
            let height = owned[32..36].to_vec();
            owned.extend_from_slice(&height);
            &owned[..]
        } else {
            value
        };

        let (genesis, rest) = take_fixed::<HASH_LEN>(value)?;
        let (height, rest) = take_u32_be(rest)?;
        let (tx_count, rest) = take_u32_be(rest)?;
        let (tip, rest) = take_fixed::<HASH_LEN>(rest)?;
        let (utxo_flush_count, rest) = take_u32_be(rest)?;
        let (wall_time, rest) = take_u32_be(rest)?;
        let (catching_up, rest) = take_u8(rest)?;
        let (db_version, rest) = take_u8(rest)?;
        let (hist_flush_count, rest) = take_i32_be(rest)?;
        let (comp_flush_count, rest) = take_i32_be(rest)?;
        let (comp_cursor, rest) = take_i32_be(rest)?;
        let (es_sync_height, rest) = take_u32_be(rest)?;
        expect_empty(rest)?;
        Ok(DbStateValue {
            genesis,
            height,
            tx_count,
            tip,
            utxo_flush_count,
            wall_time,
            catching_up: catching_up != 0,
            db_version,
            hist_flush_count,
            comp_flush_count,
            comp_cursor,
            es_sync_height,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pack_item(
        genesis: &Hash32,
        height: u32,
        tx_count: u32,
        tip: &Hash32,
        utxo_flush_count: u32,
        wall_time: u32,
        catching_up: bool,
        db_version: u8,
        hist_flush_count: i32,
        comp_flush_count: i32,
        comp_cursor: i32,
        es_sync_height: u32,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(),
            Self::pack_value(
                genesis,
                height,
                tx_count,
                tip,
                utxo_flush_count,
                wall_time,
                catching_up,
                db_version,
                hist_flush_count,
                comp_flush_count,
                comp_cursor,
                es_sync_height,
            ),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(DbStateKey, DbStateValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }
}

fn take_i32_be(buf: &[u8]) -> Result<(i32, &[u8]), CodecError> {
    let (raw, rest) = take_u32_be(buf)?;
    Ok((raw as i32, rest))
}

/// (height u32, claim_hash[20]) -> (previous_amount u64, new_amount u64).
/// A record of a trending-score change, scoped by height so old
/// notifications can be pruned without touching newer ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingNotificationKey {
    pub height: u32,
    pub claim_hash: ClaimHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingNotificationValue {
    pub previous_amount: u64,
    pub new_amount: u64,
}

pub struct TrendingNotificationRow;

impl TrendingNotificationRow {
    pub const PREFIX: u8 = prefix::TRENDING_NOTIFICATION;

    pub fn pack_key(height: u32, claim_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 4 + CLAIM_HASH_LEN);
        out.push(Self::PREFIX);
        out.extend_from_slice(&height.to_be_bytes());
        out.extend_from_slice(claim_hash);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<TrendingNotificationKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (height, rest) = take_u32_be(rest)?;
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        expect_empty(rest)?;
        Ok(TrendingNotificationKey { height, claim_hash })
    }

    pub fn pack_value(previous_amount: u64, new_amount: u64) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        out.extend_from_slice(&previous_amount.to_be_bytes());
        out.extend_from_slice(&new_amount.to_be_bytes());
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<TrendingNotificationValue, CodecError> {
        let (previous_amount, rest) = take_u64_be(value)?;
        let (new_amount, rest) = take_u64_be(rest)?;
        expect_empty(rest)?;
        Ok(TrendingNotificationValue {
            previous_amount,
            new_amount,
        })
    }

    pub fn pack_item(
        height: u32,
        claim_hash: &ClaimHash,
        previous_amount: u64,
        new_amount: u64,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(height, claim_hash),
            Self::pack_value(previous_amount, new_amount),
        )
    }

    pub fn unpack_item(
        key: &[u8],
        value: &[u8],
    ) -> Result<(TrendingNotificationKey, TrendingNotificationValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(height: u32) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(&height.to_be_bytes());
        out
    }

    pub fn key_part_2(height: u32, claim_hash: &ClaimHash) -> Vec<u8> {
        Self::pack_key(height, claim_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touched_or_deleted_sorts_hashxs_on_write() {
        let mut touched = BTreeSet::new();
        touched.insert([2u8; HASH_X_LEN]);
        touched.insert([1u8; HASH_X_LEN]);
        let deleted = BTreeSet::new();
        let (key, value) = TouchedOrDeletedRow::pack_item(10, &touched, &deleted);
        let (k, v) = TouchedOrDeletedRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.height, 10);
        assert_eq!(v.touched, touched);
    }

    #[test]
    fn undo_key_uses_u64_height() {
        let block_hash: Hash32 = [1u8; 32];
        let (key, value) = UndoRow::pack_item(1_000_000_000_000, &block_hash, &[1, 2, 3]);
        let (k, v) = UndoRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.height, 1_000_000_000_000);
        assert_eq!(v.undo_ops, vec![1, 2, 3]);
    }

    #[test]
    fn db_state_round_trips_current_layout() {
        let genesis: Hash32 = [1u8; 32];
        let tip: Hash32 = [2u8; 32];
        let (key, value) = DbStateRow::pack_item(&genesis, 100, 5000, &tip, 3, 1_700_000_000, false, 7, -1, -1, -1, 42);
        let (_, v) = DbStateRow::unpack_item(&key, &value).unwrap();
        assert_eq!(v.height, 100);
        assert_eq!(v.tip, tip);
        assert_eq!(v.es_sync_height, 42);
        assert_eq!(v.hist_flush_count, -1);
    }

    #[test]
    fn db_state_upgrades_legacy_94_byte_value() {
        let genesis: Hash32 = [9u8; 32];
        let tip: Hash32 = [3u8; 32];
        let full = DbStateRow::pack_value(&genesis, 50, 10, &tip, 1, 1_600_000_000, true, 6, 0, 0, 0, 0xAABBCCDD);
        let legacy = &full[..DB_STATE_LEGACY_LEN];
        let v = DbStateRow::unpack_value(legacy).unwrap();
        assert_eq!(v.tip, tip);
        // spec.md §3.3: the legacy shim repeats bytes [32:36] (height) into
        // the tail, not the tip hash that happens to follow it.
        assert_eq!(v.es_sync_height, 50);
        assert_eq!(v.es_sync_height.to_be_bytes(), legacy[32..36]);
    }

    #[test]
    fn trending_notification_round_trips() {
        let claim_hash: ClaimHash = [5u8; 20];
        let (key, value) = TrendingNotificationRow::pack_item(200, &claim_hash, 10, 20);
        let (k, v) = TrendingNotificationRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.height, 200);
        assert_eq!(v.previous_amount, 10);
        assert_eq!(v.new_amount, 20);
    }
}

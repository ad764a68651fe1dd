//! The `PrefixDb` facade: a single-column-family RocksDB handle paired with
//! an [`OpStack`](crate::opstack::OpStack) that owns handle ownership and
//! atomic multi-op commit in one object, which also knows how to invert a
//! batch via the `undo` row.

use std::path::Path;

use rocksdb::{BlockBasedOptions, Cache, Options, ReadOptions, WriteBatch};

use crate::codec::Hash32;
use crate::config::StoreConfig;
use crate::error::{CodecError, StoreError};
use crate::opstack::{Op, OpStack, UndoLog, UndoOp};
use crate::rows::*;

/// Implemented by every row marker type so [`PrefixDb::iterator`] can decode
/// a generic byte-range scan without the caller naming a concrete `unpack_item`.
pub trait RowCodec {
    type Key;
    type Value;

    fn unpack_item(key: &[u8], value: &[u8]) -> Result<(Self::Key, Self::Value), CodecError>;
}

macro_rules! impl_row_codec {
    ($row:ty, $key:ty, $value:ty) => {
        impl RowCodec for $row {
            type Key = $key;
            type Value = $value;

            fn unpack_item(key: &[u8], value: &[u8]) -> Result<(Self::Key, Self::Value), CodecError> {
                <$row>::unpack_item(key, value)
            }
        }
    };
}

impl_row_codec!(ClaimToSupportRow, ClaimToSupportKey, ClaimToSupportValue);
impl_row_codec!(SupportToClaimRow, SupportToClaimKey, SupportToClaimValue);
impl_row_codec!(ClaimToTxoRow, ClaimToTxoKey, ClaimToTxoValue);
impl_row_codec!(TxoToClaimRow, TxoToClaimKey, TxoToClaimValue);
impl_row_codec!(ClaimToChannelRow, ClaimToChannelKey, ClaimToChannelValue);
impl_row_codec!(ChannelToClaimRow, ChannelToClaimKey, ChannelToClaimValue);
impl_row_codec!(ClaimShortIdRow, ClaimShortIdKey, ClaimShortIdValue);
impl_row_codec!(ClaimExpirationRow, ClaimExpirationKey, ClaimExpirationValue);
impl_row_codec!(ClaimTakeoverRow, ClaimTakeoverKey, ClaimTakeoverValue);
impl_row_codec!(PendingActivationRow, PendingActivationKey, PendingActivationValue);
impl_row_codec!(ActivatedRow, ActivatedKey, ActivatedValue);
impl_row_codec!(ActiveAmountRow, ActiveAmountKey, ActiveAmountValue);
impl_row_codec!(EffectiveAmountRow, EffectiveAmountKey, EffectiveAmountValue);
impl_row_codec!(RepostRow, RepostKey, RepostValue);
impl_row_codec!(RepostedClaimRow, RepostedClaimKey, RepostedClaimValue);
impl_row_codec!(UndoRow, UndoKey, UndoValue);
impl_row_codec!(UtxoRow, UtxoKey, UtxoValue);
impl_row_codec!(HashXUtxoRow, HashXUtxoKey, HashXUtxoValue);
impl_row_codec!(HashXHistoryRow, HashXHistoryKey, HashXHistoryValue);
impl_row_codec!(BlockHashRow, BlockHashKey, BlockHashValue);
impl_row_codec!(TxCountRow, TxCountKey, TxCountValue);
impl_row_codec!(TxHashRow, TxHashKey, TxHashValue);
impl_row_codec!(TxNumRow, TxNumKey, TxNumValue);
impl_row_codec!(TxRow, TxKey, TxValue);
impl_row_codec!(HeaderRow, HeaderKey, HeaderValue);
impl_row_codec!(TouchedOrDeletedRow, TouchedOrDeletedKey, TouchedOrDeletedValue);
impl_row_codec!(ChannelCountRow, ChannelCountKey, ChannelCountValue);
impl_row_codec!(DbStateRow, DbStateKey, DbStateValue);
impl_row_codec!(SupportAmountRow, SupportAmountKey, SupportAmountValue);
impl_row_codec!(BlockTxRow, BlockTxKey, BlockTxValue);
impl_row_codec!(MempoolTxRow, MempoolTxKey, MempoolTxValue);
impl_row_codec!(TrendingNotificationRow, TrendingNotificationKey, TrendingNotificationValue);
impl_row_codec!(TouchedHashXRow, TouchedHashXKey, TouchedHashXValue);

/// Finds the smallest key greater than every key with the given prefix, by
/// incrementing the last non-`0xff` byte and truncating. Returns `None` if
/// `prefix` is all `0xff` bytes (no finite upper bound exists).
fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    for i in (0..upper.len()).rev() {
        if upper[i] != 0xff {
            upper[i] += 1;
            upper.truncate(i + 1);
            return Some(upper);
        }
    }
    None
}

pub struct PrefixDb {
    db: rocksdb::DB,
    config: StoreConfig,
    stack: OpStack,
}

impl PrefixDb {
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);

        let mut block_opts = BlockBasedOptions::default();
        let cache = Cache::new_lru_cache(config.block_cache_mb * 1024 * 1024);
        block_opts.set_block_cache(&cache);
        opts.set_block_based_table_factory(&block_opts);

        let db = rocksdb::DB::open(&opts, &config.path)?;
        tracing::info!(
            path = %config.path.display(),
            reorg_window = config.reorg_window,
            "opened prefix store"
        );
        Ok(Self {
            db,
            config,
            stack: OpStack::new(),
        })
    }

    pub fn open_secondary(
        primary_path: impl AsRef<Path>,
        secondary_path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let opts = Options::default();
        let db = rocksdb::DB::open_as_secondary(&opts, primary_path.as_ref(), secondary_path.as_ref())?;
        tracing::info!(
            primary = %primary_path.as_ref().display(),
            "opened secondary read-only handle"
        );
        Ok(Self {
            db,
            config: StoreConfig::new(secondary_path.as_ref()),
            stack: OpStack::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?)
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        let current = self.db.get(&key)?;
        self.stack.put(key, value, || current);
        Ok(())
    }

    pub fn delete(&mut self, key: Vec<u8>) -> Result<(), StoreError> {
        let current = self.db.get(&key)?;
        self.stack.delete(key, || current);
        Ok(())
    }

    pub fn pending_ops(&self) -> usize {
        self.stack.len()
    }

    pub fn discard_batch(&mut self) {
        self.stack.clear();
    }

    /// Commits the buffered ops atomically and writes their inverse into
    /// the `undo` row keyed by `(height, block_hash)`. A no-op batch still
    /// records an empty undo log, so `rollback` always finds an entry for
    /// every height it might be asked to unwind.
    pub fn apply_batch(&mut self, height: u64, block_hash: Hash32) -> Result<(), StoreError> {
        tracing::debug!(ops = self.stack.len(), height, "applying batch");
        let undo_log = self.stack.build_undo_log();
        let undo_bytes = bincode::serialize(&undo_log)?;

        let mut batch = WriteBatch::default();
        for op in self.stack.ops() {
            match op {
                Op::Put { key, value } => batch.put(key, value),
                Op::Delete { key } => batch.delete(key),
            }
        }
        let (undo_key, undo_value) = UndoRow::pack_item(height, &block_hash, &undo_bytes);
        batch.put(&undo_key, &undo_value);

        self.db.write(batch)?;
        self.stack.clear();
        Ok(())
    }

    /// Reads the undo entry for `(height, block_hash)`, applies its inverse
    /// atomically, and removes the entry. Fails with
    /// [`StoreError::UndoMissing`] if no entry exists — the reorg window
    /// has been exceeded, or `height`/`block_hash` never had a batch applied.
    pub fn rollback(&mut self, height: u64, block_hash: Hash32) -> Result<(), StoreError> {
        let undo_key = UndoRow::pack_key(height, &block_hash);
        let undo_value = self
            .db
            .get(&undo_key)?
            .ok_or(StoreError::UndoMissing { height, block_hash })?;
        let undo_log: UndoLog = bincode::deserialize(&undo_value)?;

        let mut batch = WriteBatch::default();
        for op in &undo_log.ops {
            match op {
                UndoOp::Restore { key, value } => batch.put(key, value),
                UndoOp::Remove { key } => batch.delete(key),
            }
        }
        batch.delete(&undo_key);

        self.db.write(batch)?;
        tracing::info!(height, block_hash = %hex::encode(block_hash), "rolled back block");
        Ok(())
    }

    fn scan_raw(
        &self,
        partial_key: &[u8],
        reverse: bool,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut opts = ReadOptions::default();
        opts.set_iterate_lower_bound(partial_key.to_vec());
        if let Some(upper) = prefix_upper_bound(partial_key) {
            opts.set_iterate_upper_bound(upper);
        }
        let mode = if reverse {
            rocksdb::IteratorMode::End
        } else {
            rocksdb::IteratorMode::Start
        };

        let mut out = Vec::new();
        for item in self.db.iterator_opt(mode, opts) {
            let (key, value) = item?;
            out.push((key.to_vec(), value.to_vec()));
            if let Some(limit) = limit {
                if out.len() >= limit {
                    break;
                }
            }
        }
        Ok(out)
    }

    /// A lazy-in-spirit, eagerly-materialized restartable sequence of
    /// decoded `(Key, Value)` pairs over `partial_key`'s range, ordered by
    /// the store's byte order (reversed if `reverse`). Decode failures
    /// propagate rather than falling back to `Raw`, unlike
    /// [`crate::rows::auto_decode_item`] — a caller that names a concrete
    /// row type is asserting the range holds only that row's entries.
    pub fn iterator<R: RowCodec>(
        &self,
        partial_key: &[u8],
        reverse: bool,
        limit: Option<usize>,
    ) -> Result<Vec<(R::Key, R::Value)>, StoreError> {
        self.scan_raw(partial_key, reverse, limit)?
            .into_iter()
            .map(|(k, v)| R::unpack_item(&k, &v).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (PrefixDb, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        (PrefixDb::open(config).unwrap(), dir)
    }

    #[test]
    fn apply_batch_then_rollback_restores_state_s5() {
        let (mut db, _dir) = open_temp();
        let hash_x = [1u8; 11];
        let block_hash: Hash32 = [9u8; 32];

        let (key, value) = UtxoRow::pack_item(&hash_x, 1, 0, 500);
        db.put(key.clone(), value.clone()).unwrap();
        db.apply_batch(100, block_hash).unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(value));

        let (key2, value2) = UtxoRow::pack_item(&hash_x, 2, 0, 700);
        db.put(key2.clone(), value2).unwrap();
        db.delete(key.clone()).unwrap();
        db.apply_batch(101, [8u8; 32]).unwrap();
        assert_eq!(db.get(&key).unwrap(), None);
        assert!(db.get(&key2).unwrap().is_some());

        db.rollback(101, [8u8; 32]).unwrap();
        assert!(db.get(&key).unwrap().is_some());
        assert_eq!(db.get(&key2).unwrap(), None);
    }

    #[test]
    fn rollback_without_undo_entry_fails() {
        let (mut db, _dir) = open_temp();
        let err = db.rollback(9999, [0u8; 32]).unwrap_err();
        assert!(matches!(err, StoreError::UndoMissing { .. }));
    }

    #[test]
    fn iterator_scopes_to_partial_key_prefix() {
        let (mut db, _dir) = open_temp();
        let hash_x_a = [1u8; 11];
        let hash_x_b = [2u8; 11];
        let (k1, v1) = UtxoRow::pack_item(&hash_x_a, 0, 0, 1);
        let (k2, v2) = UtxoRow::pack_item(&hash_x_a, 1, 0, 2);
        let (k3, v3) = UtxoRow::pack_item(&hash_x_b, 0, 0, 3);
        db.put(k1, v1).unwrap();
        db.put(k2, v2).unwrap();
        db.put(k3, v3).unwrap();
        db.apply_batch(1, [0u8; 32]).unwrap();

        let results = db
            .iterator::<UtxoRow>(&UtxoRow::key_part_1(&hash_x_a), false, None)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(k, _)| k.hash_x == hash_x_a));
    }
}

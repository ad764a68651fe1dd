//! The row catalog: one type per index, each owning a single prefix byte,
//! a key layout, a value layout, and partial-key builders for range scans.
//!
//! Rows are pure schemas — zero-sized marker types whose associated
//! functions pack and unpack bytes. None of them own any mutable state;
//! the [`crate::db::PrefixDb`] facade is the only stateful object in this
//! crate (besides the op stack it drives).

pub mod activation;
pub mod channel;
pub mod claim;
pub mod misc;
pub mod repost;
pub mod support;
pub mod tx;
pub mod utxo;

pub use activation::*;
pub use channel::*;
pub use claim::*;
pub use misc::*;
pub use repost::*;
pub use support::*;
pub use tx::*;
pub use utxo::*;

/// Prefix bytes, one per row, stable across versions: once assigned, a byte
/// is never reused for a different schema (§6.1).
pub mod prefix {
    pub const CLAIM_TO_SUPPORT: u8 = b'a';
    pub const SUPPORT_TO_CLAIM: u8 = b'b';
    pub const CLAIM_TO_TXO: u8 = b'c';
    pub const TXO_TO_CLAIM: u8 = b'd';
    pub const CLAIM_TO_CHANNEL: u8 = b'e';
    pub const CHANNEL_TO_CLAIM: u8 = b'f';
    pub const CLAIM_SHORT_ID: u8 = b'g';
    pub const CLAIM_EXPIRATION: u8 = b'h';
    pub const CLAIM_TAKEOVER: u8 = b't';
    pub const PENDING_ACTIVATION: u8 = b'i';
    pub const ACTIVATED: u8 = b'j';
    pub const ACTIVE_AMOUNT: u8 = b'k';
    pub const EFFECTIVE_AMOUNT: u8 = b'l';
    pub const REPOST: u8 = b'm';
    pub const REPOSTED_CLAIM: u8 = b'n';
    pub const UNDO: u8 = b'o';
    pub const UTXO: u8 = b'u';
    pub const HASHX_UTXO: u8 = b'x';
    pub const HASHX_HISTORY: u8 = b'y';
    pub const BLOCK_HASH: u8 = b's';
    pub const TX_COUNT: u8 = b'z';
    pub const TX_HASH: u8 = b'A';
    pub const TX_NUM: u8 = b'B';
    pub const TX: u8 = b'C';
    pub const HEADER: u8 = b'D';
    pub const TOUCHED_OR_DELETED: u8 = b'E';
    pub const CHANNEL_COUNT: u8 = b'F';
    pub const DB_STATE: u8 = b'G';
    pub const SUPPORT_AMOUNT: u8 = b'H';
    pub const BLOCK_TX: u8 = b'I';
    pub const MEMPOOL_TX: u8 = b'J';
    pub const TRENDING_NOTIFICATION: u8 = b'K';
    pub const TOUCHED_HASHX: u8 = b'L';
}

/// Rows that may be written without before-image capture: their own
/// history is not subject to undo (§4.2's unsafe-prefix allowlist).
pub const UNSAFE_PREFIXES: &[u8] = &[prefix::UNDO, prefix::MEMPOOL_TX];

/// A decoded (key, value) pair, tagged by which row it came from. The
/// `Raw` variant carries pairs whose prefix byte matched no known row,
/// supporting tooling that scans the store without knowing every schema
/// version (C5).
#[derive(Debug, Clone)]
pub enum DecodedItem {
    ClaimToSupport(ClaimToSupportKey, ClaimToSupportValue),
    SupportToClaim(SupportToClaimKey, SupportToClaimValue),
    ClaimToTxo(ClaimToTxoKey, ClaimToTxoValue),
    TxoToClaim(TxoToClaimKey, TxoToClaimValue),
    ClaimToChannel(ClaimToChannelKey, ClaimToChannelValue),
    ChannelToClaim(ChannelToClaimKey, ChannelToClaimValue),
    ClaimShortId(ClaimShortIdKey, ClaimShortIdValue),
    ClaimExpiration(ClaimExpirationKey, ClaimExpirationValue),
    ClaimTakeover(ClaimTakeoverKey, ClaimTakeoverValue),
    PendingActivation(PendingActivationKey, PendingActivationValue),
    Activated(ActivatedKey, ActivatedValue),
    ActiveAmount(ActiveAmountKey, ActiveAmountValue),
    EffectiveAmount(EffectiveAmountKey, EffectiveAmountValue),
    Repost(RepostKey, RepostValue),
    RepostedClaim(RepostedClaimKey, RepostedClaimValue),
    Undo(UndoKey, UndoValue),
    Utxo(UtxoKey, UtxoValue),
    HashXUtxo(HashXUtxoKey, HashXUtxoValue),
    HashXHistory(HashXHistoryKey, HashXHistoryValue),
    BlockHash(BlockHashKey, BlockHashValue),
    TxCount(TxCountKey, TxCountValue),
    TxHash(TxHashKey, TxHashValue),
    TxNum(TxNumKey, TxNumValue),
    Tx(TxKey, TxValue),
    Header(HeaderKey, HeaderValue),
    TouchedOrDeleted(TouchedOrDeletedKey, TouchedOrDeletedValue),
    ChannelCount(ChannelCountKey, ChannelCountValue),
    DbState(DbStateKey, DbStateValue),
    SupportAmount(SupportAmountKey, SupportAmountValue),
    BlockTx(BlockTxKey, BlockTxValue),
    MempoolTx(MempoolTxKey, MempoolTxValue),
    TrendingNotification(TrendingNotificationKey, TrendingNotificationValue),
    TouchedHashX(TouchedHashXKey, TouchedHashXValue),
    Raw(Vec<u8>, Vec<u8>),
}

/// Dispatches a raw (key, value) pair to the row whose prefix byte
/// matches, falling back to [`DecodedItem::Raw`] for unknown prefixes.
/// Decode failures within a known prefix also fall back to `Raw` rather
/// than propagating, since auto-decode is explicitly a best-effort
/// tooling aid (§4.4) distinct from a row's own strict `unpack_item`.
pub fn auto_decode_item(key: &[u8], value: &[u8]) -> DecodedItem {
    let Some(&tag) = key.first() else {
        return DecodedItem::Raw(key.to_vec(), value.to_vec());
    };
    let raw = || DecodedItem::Raw(key.to_vec(), value.to_vec());
    match tag {
        prefix::CLAIM_TO_SUPPORT => ClaimToSupportRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ClaimToSupport(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::SUPPORT_TO_CLAIM => SupportToClaimRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::SupportToClaim(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CLAIM_TO_TXO => ClaimToTxoRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ClaimToTxo(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TXO_TO_CLAIM => TxoToClaimRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TxoToClaim(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CLAIM_TO_CHANNEL => ClaimToChannelRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ClaimToChannel(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CHANNEL_TO_CLAIM => ChannelToClaimRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ChannelToClaim(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CLAIM_SHORT_ID => ClaimShortIdRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ClaimShortId(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CLAIM_EXPIRATION => ClaimExpirationRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ClaimExpiration(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CLAIM_TAKEOVER => ClaimTakeoverRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ClaimTakeover(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::PENDING_ACTIVATION => PendingActivationRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::PendingActivation(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::ACTIVATED => ActivatedRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::Activated(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::ACTIVE_AMOUNT => ActiveAmountRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ActiveAmount(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::EFFECTIVE_AMOUNT => EffectiveAmountRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::EffectiveAmount(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::REPOST => RepostRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::Repost(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::REPOSTED_CLAIM => RepostedClaimRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::RepostedClaim(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::UNDO => UndoRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::Undo(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::UTXO => UtxoRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::Utxo(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::HASHX_UTXO => HashXUtxoRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::HashXUtxo(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::HASHX_HISTORY => HashXHistoryRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::HashXHistory(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::BLOCK_HASH => BlockHashRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::BlockHash(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TX_COUNT => TxCountRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TxCount(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TX_HASH => TxHashRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TxHash(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TX_NUM => TxNumRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TxNum(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TX => TxRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::Tx(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::HEADER => HeaderRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::Header(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TOUCHED_OR_DELETED => TouchedOrDeletedRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TouchedOrDeleted(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::CHANNEL_COUNT => ChannelCountRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::ChannelCount(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::DB_STATE => DbStateRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::DbState(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::SUPPORT_AMOUNT => SupportAmountRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::SupportAmount(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::BLOCK_TX => BlockTxRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::BlockTx(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::MEMPOOL_TX => MempoolTxRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::MempoolTx(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TRENDING_NOTIFICATION => TrendingNotificationRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TrendingNotification(k, v))
            .unwrap_or_else(|_| raw()),
        prefix::TOUCHED_HASHX => TouchedHashXRow::unpack_item(key, value)
            .map(|(k, v)| DecodedItem::TouchedHashX(k, v))
            .unwrap_or_else(|_| raw()),
        _ => raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_prefix_falls_back_to_raw() {
        let key = vec![0xFEu8, 1, 2, 3];
        let value = vec![9, 9];
        match auto_decode_item(&key, &value) {
            DecodedItem::Raw(k, v) => {
                assert_eq!(k, key);
                assert_eq!(v, value);
            }
            _ => panic!("expected Raw"),
        }
    }

    #[test]
    fn all_prefixes_are_distinct() {
        let all = [
            prefix::CLAIM_TO_SUPPORT,
            prefix::SUPPORT_TO_CLAIM,
            prefix::CLAIM_TO_TXO,
            prefix::TXO_TO_CLAIM,
            prefix::CLAIM_TO_CHANNEL,
            prefix::CHANNEL_TO_CLAIM,
            prefix::CLAIM_SHORT_ID,
            prefix::CLAIM_EXPIRATION,
            prefix::CLAIM_TAKEOVER,
            prefix::PENDING_ACTIVATION,
            prefix::ACTIVATED,
            prefix::ACTIVE_AMOUNT,
            prefix::EFFECTIVE_AMOUNT,
            prefix::REPOST,
            prefix::REPOSTED_CLAIM,
            prefix::UNDO,
            prefix::UTXO,
            prefix::HASHX_UTXO,
            prefix::HASHX_HISTORY,
            prefix::BLOCK_HASH,
            prefix::TX_COUNT,
            prefix::TX_HASH,
            prefix::TX_NUM,
            prefix::TX,
            prefix::HEADER,
            prefix::TOUCHED_OR_DELETED,
            prefix::CHANNEL_COUNT,
            prefix::DB_STATE,
            prefix::SUPPORT_AMOUNT,
            prefix::BLOCK_TX,
            prefix::MEMPOOL_TX,
            prefix::TRENDING_NOTIFICATION,
            prefix::TOUCHED_HASHX,
        ];
        let mut sorted = all.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), all.len(), "prefix byte collision detected");
    }
}

use thiserror::Error;

/// Corruption-class failures from row key/value (un)packing. These are
/// fatal: a caller that sees one should stop writing rather than guess at
/// recovery.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("key has wrong prefix: expected {expected:#04x}, found {found:#04x}")]
    WrongPrefix { expected: u8, found: u8 },

    #[error("key too short: need at least {needed} bytes, found {found}")]
    KeyTooShort { needed: usize, found: usize },

    #[error("key has trailing bytes after the fixed layout: {extra} unconsumed")]
    TrailingKeyBytes { extra: usize },

    #[error("value length mismatch: expected {expected} bytes, found {found}")]
    ValueLength { expected: usize, found: usize },

    #[error("truncated input: needed {needed} more bytes, had {available}")]
    Truncated { needed: usize, available: usize },

    #[error("name field is not valid utf-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("length-prefixed string exceeds maximum length {max}: got {len}")]
    StringTooLong { len: usize, max: usize },
}

/// Rejected-but-recoverable input to the metadata shims (C7). Distinct from
/// [`CodecError`] because the caller supplied the bad value directly; it is
/// not evidence of a corrupted store.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("latitude {0} out of range (-90..=90)")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range (-180..=180)")]
    LongitudeOutOfRange(f64),

    #[error("unrecognized fee currency: {0}")]
    UnknownCurrency(String),

    #[error("fee address set without a prior amount and currency")]
    FeeAddressWithoutAmount,

    #[error("language tag does not match the expected shape: {0}")]
    MalformedLanguageTag(String),

    #[error("location value is neither a map nor a colon-delimited string: {0}")]
    MalformedLocation(String),
}

/// Source-metadata update errors, kept distinct per spec.md's
/// error-handling requirements (§5).
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("published file not found: {0}")]
    MissingFile(String),

    #[error("published file is empty: {0}")]
    EmptyFile(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("file i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from parsing the extension-tree input forms accepted by the claim
/// modification model (C6): a nested map, a single-key `{schema: attrs}`
/// wrapper, or a JSON string.
#[derive(Debug, Error)]
pub enum ClaimModelError {
    #[error("extension value is not a map and no schema was supplied to disambiguate it")]
    AmbiguousSchema,

    #[error("extension value must be a JSON object, got: {0}")]
    NotAMap(String),

    #[error("malformed extension JSON: {0}")]
    Json(String),
}

/// Top-level store error surfaced by the prefix DB facade (C4).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("rocksdb error: {0}")]
    Rocks(#[from] rocksdb::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("no undo entry for height {height} block_hash {block_hash:02x?}: reorg window exceeded")]
    UndoMissing { height: u64, block_hash: [u8; 32] },
}

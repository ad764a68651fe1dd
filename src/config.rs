use std::path::PathBuf;

/// Store-tuning knobs. Unlike the wider indexer's process-level
/// configuration (`config.toml` plus a global `OnceCell`), a `PrefixDb` is a
/// library type constructed directly by its caller, so the config is a
/// plain value rather than ambient global state — matching the "no hidden
/// singleton" design note.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Height window within which undo entries must remain available for
    /// `rollback` to succeed. Compaction of older entries is a maintenance
    /// operation this crate exposes but never triggers implicitly.
    pub reorg_window: u32,
    /// Global RocksDB block cache budget; bounds the sum of the per-row
    /// `cache_size` hints.
    pub block_cache_mb: usize,
    pub create_if_missing: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reorg_window: 200,
            block_cache_mb: 256,
            create_if_missing: true,
        }
    }

    pub fn with_reorg_window(mut self, window: u32) -> Self {
        self.reorg_window = window;
        self
    }

    pub fn with_block_cache_mb(mut self, mb: usize) -> Self {
        self.block_cache_mb = mb;
        self
    }
}

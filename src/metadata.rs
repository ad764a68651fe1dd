//! Dimensional / source metadata shims (C7): thin typed projections over a
//! claim's stream metadata — width/height/duration, published-file source
//! fields (name, media type, size, SHA-384 hash), a fee amount/currency/
//! address, a language tag, and a location. Grounded on
//! `examples/original_source/hub/schema/attrs.py`'s `Dimmensional`,
//! `Playable`, `Source`, `Fee`, `Language`, and `Location` classes; per
//! design note §9, the class hierarchy there (`Video(Dimmensional,
//! Playable)`, mixins) is replaced with small free-standing structs — no
//! deep inheritance, since there is no shared protobuf message to borrow
//! fields from in this slice.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha384};

use crate::error::{MetadataError, ValidationError};

/// Width/height pair for image and video claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Duration in seconds for audio and video claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Duration {
    pub seconds: u32,
}

/// SHA-384 is computed in chunks sized `128 * sha384.block_size` in the
/// source (`hub/schema/attrs.py::calculate_sha384_file_hash`); SHA-384's
/// block size is 128 bytes, so the chunk is fixed at 16 KiB here rather than
/// read off the hasher, matching the source's constant in practice.
const HASH_CHUNK_LEN: usize = 128 * 128;

/// The published-file fields of a stream claim: basename, guessed media
/// type, size, a SHA-384 content hash, and an optional BitTorrent infohash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub file_hash: [u8; 48],
    /// Stored as raw bytes; always read and written as hex at every
    /// boundary (`bt_infohash_hex`/`set_bt_infohash_hex`). The source reads
    /// this field back with a plain `.decode()`, which fails for arbitrary
    /// binary info-hashes — spec.md §9 flags this as a probable bug and
    /// specifies hex on the wire and in storage instead (see DESIGN.md).
    pub bt_infohash: Option<Vec<u8>>,
}

impl Source {
    /// Populates every field from `file_path` on disk. `media_type_hint`
    /// stands in for the source's `guess_media_type` MIME sniffer, which is
    /// an external collaborator out of this crate's scope (§1) — callers
    /// either supply a hint from their own MIME database or accept the
    /// coarse extension-based fallback in [`guess_media_type`].
    pub fn update_from_file(
        &mut self,
        file_path: impl AsRef<Path>,
        media_type_hint: Option<&str>,
    ) -> Result<(), MetadataError> {
        let file_path = file_path.as_ref();
        let path_str = file_path.display().to_string();

        let metadata = fs::metadata(file_path).map_err(|_| MetadataError::MissingFile(path_str.clone()))?;
        if !metadata.is_file() {
            return Err(MetadataError::MissingFile(path_str));
        }
        let size = metadata.len();
        if size == 0 {
            return Err(MetadataError::EmptyFile(path_str));
        }

        self.name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.media_type = media_type_hint
            .map(str::to_string)
            .unwrap_or_else(|| guess_media_type(file_path));
        self.size = size;
        self.file_hash = sha384_file_hash(file_path)?;
        Ok(())
    }

    pub fn file_hash_hex(&self) -> String {
        hex::encode(self.file_hash)
    }

    pub fn bt_infohash_hex(&self) -> Option<String> {
        self.bt_infohash.as_ref().map(hex::encode)
    }

    pub fn set_bt_infohash_hex(&mut self, hex_str: &str) -> Result<(), hex::FromHexError> {
        self.bt_infohash = Some(hex::decode(hex_str)?);
        Ok(())
    }
}

/// Streams `file_path` through SHA-384 in [`HASH_CHUNK_LEN`]-byte chunks
/// rather than reading it whole, so a large published file doesn't need to
/// fit in memory at once.
fn sha384_file_hash(file_path: &Path) -> Result<[u8; 48], MetadataError> {
    use std::io::Read;

    let mut file = fs::File::open(file_path)?;
    let mut hasher = Sha384::new();
    let mut buf = [0u8; HASH_CHUNK_LEN];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 48];
    out.copy_from_slice(&digest);
    Ok(out)
}

/// A coarse extension-to-MIME-type table, used only when the caller has no
/// better MIME guesser on hand. Full MIME sniffing is explicitly out of
/// scope (§1) and belongs to an external collaborator.
pub fn guess_media_type(file_path: &Path) -> String {
    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// The three fee currencies the protocol recognizes, each with its own
/// integer sub-unit representation (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeCurrency {
    Lbc,
    Btc,
    Usd,
}

impl FeeCurrency {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_ascii_lowercase().as_str() {
            "lbc" => Ok(FeeCurrency::Lbc),
            "btc" => Ok(FeeCurrency::Btc),
            "usd" => Ok(FeeCurrency::Usd),
            other => Err(ValidationError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Sub-units per whole coin/dollar: dewies and satoshis are both 10⁸ per
/// unit, pennies are 10² per unit (§4.6).
const DEWIES_PER_LBC: f64 = 100_000_000.0;
const SATOSHIS_PER_BTC: f64 = 100_000_000.0;
const PENNIES_PER_USD: f64 = 100.0;

/// A claim's fee: currency, integer sub-unit amount, and (only once an
/// amount and currency are set) a payout address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fee {
    currency: Option<FeeCurrency>,
    /// Sub-units of `currency`: dewies, satoshis, or pennies.
    amount: Option<u64>,
    address: Option<Vec<u8>>,
}

impl Fee {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(&self) -> Option<FeeCurrency> {
        self.currency
    }

    /// Sets the fee amount in whole units of `currency`. LBC and BTC
    /// truncate to the nearest sub-unit (matching the source's plain
    /// `int(amount * DEWIES)`); USD rounds up to the nearest cent (matching
    /// `Decimal.quantize(..., ROUND_UP)`), since a publisher should never be
    /// shorted a fraction of a cent by truncation.
    pub fn set_amount(&mut self, currency: FeeCurrency, whole_units: f64) {
        let sub_units = match currency {
            FeeCurrency::Lbc => (whole_units * DEWIES_PER_LBC).trunc() as u64,
            FeeCurrency::Btc => (whole_units * SATOSHIS_PER_BTC).trunc() as u64,
            FeeCurrency::Usd => (whole_units * PENNIES_PER_USD).ceil() as u64,
        };
        self.currency = Some(currency);
        self.amount = Some(sub_units);
    }

    /// Sets the payout address. Fails if no amount/currency has been set
    /// yet — an address without a fee attached to it is meaningless (§4.6,
    /// §7).
    pub fn set_address(&mut self, address: Vec<u8>) -> Result<(), ValidationError> {
        if self.currency.is_none() || self.amount.is_none() {
            return Err(ValidationError::FeeAddressWithoutAmount);
        }
        self.address = Some(address);
        Ok(())
    }

    pub fn address(&self) -> Option<&[u8]> {
        self.address.as_deref()
    }

    pub fn dewies(&self) -> Option<u64> {
        self.amount_in(FeeCurrency::Lbc)
    }

    pub fn satoshis(&self) -> Option<u64> {
        self.amount_in(FeeCurrency::Btc)
    }

    pub fn pennies(&self) -> Option<u64> {
        self.amount_in(FeeCurrency::Usd)
    }

    fn amount_in(&self, currency: FeeCurrency) -> Option<u64> {
        if self.currency == Some(currency) {
            self.amount
        } else {
            None
        }
    }
}

/// A language tag shaped like RFC 5646's `language[-script][-region]`: a
/// 2-8 letter primary subtag, an optional 4-letter script, and an optional
/// region (2 letters or 3 digits). Validates shape only — the source's
/// language/script/region *values* are validated against a generated
/// protobuf enum, which is out of this crate's scope (§1's "full protobuf
/// code generation"); see DESIGN.md.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Language {
    pub language: String,
    pub script: Option<String>,
    pub region: Option<String>,
}

impl Language {
    /// Renders as `language[-Script][-REGION]`, title-casing the script
    /// subtag and upper-casing the region subtag on output, matching the
    /// source's protobuf-enum `Name()` lookups which return tags in that
    /// canonical casing.
    pub fn langtag(&self) -> String {
        let mut parts = vec![self.language.to_ascii_lowercase()];
        if let Some(script) = &self.script {
            parts.push(title_case(script));
        }
        if let Some(region) = &self.region {
            parts.push(region.to_ascii_uppercase());
        }
        parts.join("-")
    }

    /// Parses `langtag` per the shape `language[-script][-region]`, where
    /// `language` is 2-8 letters, `script` is exactly 4 letters, and
    /// `region` is exactly 2 letters or 3 digits — mirrors
    /// `Language.langtag`'s setter, which peels components off the front by
    /// length/character class rather than a full BCP-47 grammar.
    pub fn parse(langtag: &str) -> Result<Self, ValidationError> {
        let mut parts: Vec<&str> = langtag.split('-').collect();
        let is_primary = parts
            .first()
            .is_some_and(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphabetic()));
        if !is_primary {
            return Err(ValidationError::MalformedLanguageTag(langtag.to_string()));
        }
        let language = parts.remove(0).to_string();

        let mut script = None;
        if !parts.is_empty() && parts[0].len() == 4 && parts[0].chars().all(|c| c.is_ascii_alphabetic()) {
            script = Some(parts.remove(0).to_string());
        }

        let mut region = None;
        if !parts.is_empty() {
            let candidate = parts[0];
            let is_region = (candidate.len() == 2 && candidate.chars().all(|c| c.is_ascii_alphabetic()))
                || (candidate.len() == 3 && candidate.chars().all(|c| c.is_ascii_digit()));
            if is_region {
                region = Some(parts.remove(0).to_string());
            }
        }

        if !parts.is_empty() {
            return Err(ValidationError::MalformedLanguageTag(langtag.to_string()));
        }
        Ok(Language { language, script, region })
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

const GPS_PRECISION: f64 = 10_000_000.0;

/// A location: country/state/city/postal code/venue name plus optional
/// latitude and longitude stored as integer micro-degrees (10⁷ precision,
/// §4.6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub latitude_micro_degrees: Option<i64>,
    pub longitude_micro_degrees: Option<i64>,
}

impl Location {
    pub fn set_latitude(&mut self, degrees: f64) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&degrees) {
            return Err(ValidationError::LatitudeOutOfRange(degrees));
        }
        self.latitude_micro_degrees = Some((degrees * GPS_PRECISION).round() as i64);
        Ok(())
    }

    pub fn set_longitude(&mut self, degrees: f64) -> Result<(), ValidationError> {
        if !(-180.0..=180.0).contains(&degrees) {
            return Err(ValidationError::LongitudeOutOfRange(degrees));
        }
        self.longitude_micro_degrees = Some((degrees * GPS_PRECISION).round() as i64);
        Ok(())
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude_micro_degrees.map(|v| v as f64 / GPS_PRECISION)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude_micro_degrees.map(|v| v as f64 / GPS_PRECISION)
    }

    /// Parses a location from either a JSON object with
    /// `country`/`state`/`city`/`code`/`name`/`latitude`/`longitude` keys,
    /// or a colon-delimited string
    /// `country:state:city:code:name:latitude:longitude` (trailing fields
    /// may be omitted) — mirrors `Location.from_value`'s dict-vs-string
    /// dispatch.
    pub fn parse(value: &serde_json::Value) -> Result<Self, ValidationError> {
        match value {
            serde_json::Value::Object(map) => {
                let mut loc = Location::default();
                if let Some(s) = map.get("country").and_then(|v| v.as_str()) {
                    loc.country = Some(s.to_string());
                }
                if let Some(s) = map.get("state").and_then(|v| v.as_str()) {
                    loc.state = Some(s.to_string());
                }
                if let Some(s) = map.get("city").and_then(|v| v.as_str()) {
                    loc.city = Some(s.to_string());
                }
                if let Some(s) = map.get("code").and_then(|v| v.as_str()) {
                    loc.code = Some(s.to_string());
                }
                if let Some(s) = map.get("name").and_then(|v| v.as_str()) {
                    loc.name = Some(s.to_string());
                }
                if let Some(n) = map.get("latitude").and_then(|v| v.as_f64()) {
                    loc.set_latitude(n)?;
                }
                if let Some(n) = map.get("longitude").and_then(|v| v.as_f64()) {
                    loc.set_longitude(n)?;
                }
                Ok(loc)
            }
            serde_json::Value::String(s) => Self::parse_colon_delimited(s),
            other => Err(ValidationError::MalformedLocation(other.to_string())),
        }
    }

    fn parse_colon_delimited(s: &str) -> Result<Self, ValidationError> {
        let mut parts: Vec<&str> = s.split(':').collect();
        let mut loc = Location::default();

        let starts_with_place = parts
            .first()
            .map(|p| p.chars().next().is_some_and(|c| c.is_ascii_alphabetic()))
            .unwrap_or(false);
        if parts.len() > 2 || starts_with_place {
            if let Some(country) = take_nonempty(&mut parts) {
                loc.country = Some(country.to_string());
            }
            if let Some(state) = take_nonempty(&mut parts) {
                loc.state = Some(state.to_string());
            }
            if let Some(city) = take_nonempty(&mut parts) {
                loc.city = Some(city.to_string());
            }
            if let Some(code) = take_nonempty(&mut parts) {
                loc.code = Some(code.to_string());
            }
            if let Some(name) = take_nonempty(&mut parts) {
                loc.name = Some(name.to_string());
            }
        }
        if let Some(lat) = take_nonempty(&mut parts) {
            let degrees: f64 = lat
                .parse()
                .map_err(|_| ValidationError::MalformedLocation(s.to_string()))?;
            loc.set_latitude(degrees)?;
        }
        if let Some(lon) = take_nonempty(&mut parts) {
            let degrees: f64 = lon
                .parse()
                .map_err(|_| ValidationError::MalformedLocation(s.to_string()))?;
            loc.set_longitude(degrees)?;
        }
        Ok(loc)
    }
}

fn take_nonempty<'a>(parts: &mut Vec<&'a str>) -> Option<&'a str> {
    if parts.is_empty() {
        return None;
    }
    let part = parts.remove(0);
    if part.is_empty() {
        None
    } else {
        Some(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn source_rejects_missing_file() {
        let mut source = Source::default();
        let err = source.update_from_file("/no/such/file/here.mp4", None).unwrap_err();
        assert!(matches!(err, MetadataError::MissingFile(_)));
    }

    #[test]
    fn source_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp4");
        fs::File::create(&path).unwrap();

        let mut source = Source::default();
        let err = source.update_from_file(&path, None).unwrap_err();
        assert!(matches!(err, MetadataError::EmptyFile(_)));
    }

    #[test]
    fn source_hashes_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&vec![7u8; HASH_CHUNK_LEN * 2 + 13]).unwrap();

        let mut source = Source::default();
        source.update_from_file(&path, Some("video/mp4")).unwrap();
        assert_eq!(source.name, "clip.mp4");
        assert_eq!(source.media_type, "video/mp4");
        assert_eq!(source.size, (HASH_CHUNK_LEN * 2 + 13) as u64);
        assert_ne!(source.file_hash, [0u8; 48]);
    }

    #[test]
    fn fee_rejects_address_without_amount() {
        let mut fee = Fee::new();
        assert!(fee.set_address(vec![1, 2, 3]).is_err());
    }

    #[test]
    fn fee_usd_rounds_up_to_the_cent() {
        let mut fee = Fee::new();
        fee.set_amount(FeeCurrency::Usd, 1.001);
        assert_eq!(fee.pennies(), Some(101));
    }

    #[test]
    fn fee_lbc_dewies_truncate() {
        let mut fee = Fee::new();
        fee.set_amount(FeeCurrency::Lbc, 1.000000005);
        assert_eq!(fee.dewies(), Some(100_000_000));
    }

    #[test]
    fn fee_amount_is_none_for_other_currency() {
        let mut fee = Fee::new();
        fee.set_amount(FeeCurrency::Btc, 1.0);
        assert_eq!(fee.dewies(), None);
        assert_eq!(fee.satoshis(), Some(100_000_000));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(matches!(
            FeeCurrency::parse("doge"),
            Err(ValidationError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn langtag_round_trips_with_script_and_region() {
        let tag = Language::parse("zh-Hant-TW").unwrap();
        assert_eq!(tag.language, "zh");
        assert_eq!(tag.script.as_deref(), Some("Hant"));
        assert_eq!(tag.region.as_deref(), Some("TW"));
        assert_eq!(tag.langtag(), "zh-Hant-TW");
    }

    #[test]
    fn langtag_rejects_trailing_garbage() {
        assert!(Language::parse("en-US-extra-stuff").is_err());
    }

    #[test]
    fn location_rejects_out_of_range_latitude() {
        let mut loc = Location::default();
        assert!(matches!(
            loc.set_latitude(91.0),
            Err(ValidationError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn location_parses_colon_delimited_string() {
        let loc =
            Location::parse(&serde_json::json!("US:CA:Los Angeles::Staples Center:34.05:-118.25"))
                .unwrap();
        assert_eq!(loc.country.as_deref(), Some("US"));
        assert_eq!(loc.state.as_deref(), Some("CA"));
        assert_eq!(loc.city.as_deref(), Some("Los Angeles"));
        assert_eq!(loc.code, None);
        assert_eq!(loc.name.as_deref(), Some("Staples Center"));
        assert!((loc.latitude().unwrap() - 34.05).abs() < 1e-6);
        assert!((loc.longitude().unwrap() - (-118.25)).abs() < 1e-6);
    }

    #[test]
    fn location_parses_from_map() {
        let loc = Location::parse(
            &serde_json::json!({"country": "US", "name": "Staples Center", "latitude": 10.0}),
        )
        .unwrap();
        assert_eq!(loc.country.as_deref(), Some("US"));
        assert_eq!(loc.name.as_deref(), Some("Staples Center"));
        assert_eq!(loc.latitude(), Some(10.0));
    }

    #[test]
    fn location_rounds_micro_degrees_to_nearest() {
        let mut loc = Location::default();
        loc.set_latitude(34.05123455).unwrap();
        assert_eq!(loc.latitude_micro_degrees, Some(340_512_346));
    }
}

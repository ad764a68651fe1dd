use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

/// (expiration_height u32, tx_num u32, position u16) -> (claim_hash[20],
/// name). Scanned in height order to find claims whose normal (non-takeover)
/// expiration falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimExpirationKey {
    pub expiration_height: u32,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimExpirationValue {
    pub claim_hash: ClaimHash,
    pub name: String,
}

pub struct ClaimExpirationRow;

impl ClaimExpirationRow {
    pub const PREFIX: u8 = prefix::CLAIM_EXPIRATION;

    pub fn pack_key(expiration_height: u32, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(11);
        out.push(Self::PREFIX);
        out.extend_from_slice(&expiration_height.to_be_bytes());
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ClaimExpirationKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (expiration_height, rest) = take_u32_be(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ClaimExpirationKey {
            expiration_height,
            tx_num,
            position,
        })
    }

    pub fn pack_value(claim_hash: &ClaimHash, name: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(CLAIM_HASH_LEN + 2 + name.len());
        out.extend_from_slice(claim_hash);
        write_name(&mut out, name);
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<ClaimExpirationValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        let (name, rest) = take_name(rest)?;
        expect_empty(rest)?;
        Ok(ClaimExpirationValue { claim_hash, name })
    }

    pub fn pack_item(
        expiration_height: u32,
        tx_num: u32,
        position: u16,
        claim_hash: &ClaimHash,
        name: &str,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(expiration_height, tx_num, position),
            Self::pack_value(claim_hash, name),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ClaimExpirationKey, ClaimExpirationValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(expiration_height: u32) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(&expiration_height.to_be_bytes());
        out
    }

    pub fn key_part_2(expiration_height: u32, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_1(expiration_height);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_3(expiration_height: u32, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(expiration_height, tx_num, position)
    }
}

/// (name) -> (claim_hash[20], takeover_height u32). The claim currently
/// controlling a name, and the height at which it took over control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTakeoverKey {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTakeoverValue {
    pub claim_hash: ClaimHash,
    pub takeover_height: u32,
}

pub struct ClaimTakeoverRow;

impl ClaimTakeoverRow {
    pub const PREFIX: u8 = prefix::CLAIM_TAKEOVER;

    pub fn pack_key(name: &str) -> Vec<u8> {
        let mut out = vec![Self::PREFIX];
        write_name(&mut out, name);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ClaimTakeoverKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (name, rest) = take_name(rest)?;
        expect_empty(rest)?;
        Ok(ClaimTakeoverKey { name })
    }

    pub fn pack_value(claim_hash: &ClaimHash, takeover_height: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(CLAIM_HASH_LEN + 4);
        out.extend_from_slice(claim_hash);
        out.extend_from_slice(&takeover_height.to_be_bytes());
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<ClaimTakeoverValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        let (takeover_height, rest) = take_u32_be(rest)?;
        expect_empty(rest)?;
        Ok(ClaimTakeoverValue {
            claim_hash,
            takeover_height,
        })
    }

    pub fn pack_item(name: &str, claim_hash: &ClaimHash, takeover_height: u32) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(name), Self::pack_value(claim_hash, takeover_height))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ClaimTakeoverKey, ClaimTakeoverValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(name: &str) -> Vec<u8> {
        Self::pack_key(name)
    }
}

/// (height u32, txo_type u8, tx_num u32, position u16) -> (claim_hash[20],
/// name). A claim or support queued to activate (or its effective amount to
/// recompute) at a future height, scanned in height order at block
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingActivationKey {
    pub height: u32,
    pub txo_type: u8,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingActivationValue {
    pub claim_hash: ClaimHash,
    pub name: String,
}

pub struct PendingActivationRow;

impl PendingActivationRow {
    pub const PREFIX: u8 = prefix::PENDING_ACTIVATION;

    pub fn pack_key(height: u32, txo_type: u8, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(12);
        out.push(Self::PREFIX);
        out.extend_from_slice(&height.to_be_bytes());
        out.push(txo_type);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<PendingActivationKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (height, rest) = take_u32_be(rest)?;
        let (txo_type, rest) = take_u8(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(PendingActivationKey {
            height,
            txo_type,
            tx_num,
            position,
        })
    }

    pub fn pack_value(claim_hash: &ClaimHash, name: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(CLAIM_HASH_LEN + 2 + name.len());
        out.extend_from_slice(claim_hash);
        write_name(&mut out, name);
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<PendingActivationValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        let (name, rest) = take_name(rest)?;
        expect_empty(rest)?;
        Ok(PendingActivationValue { claim_hash, name })
    }

    pub fn pack_item(
        height: u32,
        txo_type: u8,
        tx_num: u32,
        position: u16,
        claim_hash: &ClaimHash,
        name: &str,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(height, txo_type, tx_num, position),
            Self::pack_value(claim_hash, name),
        )
    }

    pub fn unpack_item(
        key: &[u8],
        value: &[u8],
    ) -> Result<(PendingActivationKey, PendingActivationValue), CodecError> {
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

    pub fn key_part_2(height: u32, txo_type: u8) -> Vec<u8> {
        let mut out = Self::key_part_1(height);
        out.push(txo_type);
        out
    }

    pub fn key_part_3(height: u32, txo_type: u8, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_2(height, txo_type);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_4(height: u32, txo_type: u8, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(height, txo_type, tx_num, position)
    }
}

/// (txo_type u8, tx_num u32, position u16) -> (height u32, claim_hash[20],
/// name). The already-activated counterpart of `pending_activation`: once a
/// claim or support takes effect, its activation record moves here so a
/// reader can find when any given TXO became active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivatedKey {
    pub txo_type: u8,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedValue {
    pub height: u32,
    pub claim_hash: ClaimHash,
    pub name: String,
}

pub struct ActivatedRow;

impl ActivatedRow {
    pub const PREFIX: u8 = prefix::ACTIVATED;

    pub fn pack_key(txo_type: u8, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(8);
        out.push(Self::PREFIX);
        out.push(txo_type);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ActivatedKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (txo_type, rest) = take_u8(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ActivatedKey {
            txo_type,
            tx_num,
            position,
        })
    }

    pub fn pack_value(height: u32, claim_hash: &ClaimHash, name: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + CLAIM_HASH_LEN + 2 + name.len());
        out.extend_from_slice(&height.to_be_bytes());
        out.extend_from_slice(claim_hash);
        write_name(&mut out, name);
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<ActivatedValue, CodecError> {
        let (height, rest) = take_u32_be(value)?;
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        let (name, rest) = take_name(rest)?;
        expect_empty(rest)?;
        Ok(ActivatedValue {
            height,
            claim_hash,
            name,
        })
    }

    pub fn pack_item(
        txo_type: u8,
        tx_num: u32,
        position: u16,
        height: u32,
        claim_hash: &ClaimHash,
        name: &str,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(txo_type, tx_num, position),
            Self::pack_value(height, claim_hash, name),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ActivatedKey, ActivatedValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(txo_type: u8) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.push(txo_type);
        out
    }

    pub fn key_part_2(txo_type: u8, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_1(txo_type);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_3(txo_type: u8, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(txo_type, tx_num, position)
    }
}

/// (claim_hash[20], txo_type u8, activation_height u32, tx_num u32,
/// position u16) -> amount u64. Every currently-active TXO (claim or
/// support) backing a claim, keyed so a reader can enumerate a claim's
/// active stake without touching inactive or expired entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAmountKey {
    pub claim_hash: ClaimHash,
    pub txo_type: u8,
    pub activation_height: u32,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAmountValue {
    pub amount: u64,
}

pub struct ActiveAmountRow;

impl ActiveAmountRow {
    pub const PREFIX: u8 = prefix::ACTIVE_AMOUNT;
    pub const CACHE_SIZE: usize = 128 * 1024 * 1024;

    pub fn pack_key(
        claim_hash: &ClaimHash,
        txo_type: u8,
        activation_height: u32,
        tx_num: u32,
        position: u16,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN + 1 + 4 + 4 + 2);
        out.push(Self::PREFIX);
        out.extend_from_slice(claim_hash);
        out.push(txo_type);
        out.extend_from_slice(&activation_height.to_be_bytes());
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ActiveAmountKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        let (txo_type, rest) = take_u8(rest)?;
        let (activation_height, rest) = take_u32_be(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ActiveAmountKey {
            claim_hash,
            txo_type,
            activation_height,
            tx_num,
            position,
        })
    }

    pub fn pack_value(amount: u64) -> Vec<u8> {
        amount.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<ActiveAmountValue, CodecError> {
        let (amount, rest) = take_u64_be(value)?;
        expect_empty(rest)?;
        Ok(ActiveAmountValue { amount })
    }

    pub fn pack_item(
        claim_hash: &ClaimHash,
        txo_type: u8,
        activation_height: u32,
        tx_num: u32,
        position: u16,
        amount: u64,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(claim_hash, txo_type, activation_height, tx_num, position),
            Self::pack_value(amount),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ActiveAmountKey, ActiveAmountValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(claim_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(claim_hash);
        out
    }

    pub fn key_part_2(claim_hash: &ClaimHash, txo_type: u8) -> Vec<u8> {
        let mut out = Self::key_part_1(claim_hash);
        out.push(txo_type);
        out
    }

    pub fn key_part_3(claim_hash: &ClaimHash, txo_type: u8, activation_height: u32) -> Vec<u8> {
        let mut out = Self::key_part_2(claim_hash, txo_type);
        out.extend_from_slice(&activation_height.to_be_bytes());
        out
    }

    pub fn key_part_4(claim_hash: &ClaimHash, txo_type: u8, activation_height: u32, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_3(claim_hash, txo_type, activation_height);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_5(
        claim_hash: &ClaimHash,
        txo_type: u8,
        activation_height: u32,
        tx_num: u32,
        position: u16,
    ) -> Vec<u8> {
        Self::pack_key(claim_hash, txo_type, activation_height, tx_num, position)
    }
}

/// (name, inverse(effective_amount) u64, tx_num u32, position u16) ->
/// claim_hash[20]. The amount is stored inverted (`u64::MAX - amount`) so
/// that a forward byte-order scan within a name yields claims from highest
/// effective amount to lowest, matching how a wallet resolves "the
/// controlling claim for this name" without a reverse iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveAmountKey {
    pub name: String,
    pub effective_amount: u64,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveAmountValue {
    pub claim_hash: ClaimHash,
}

pub struct EffectiveAmountRow;

impl EffectiveAmountRow {
    pub const PREFIX: u8 = prefix::EFFECTIVE_AMOUNT;
    pub const CACHE_SIZE: usize = 128 * 1024 * 1024;

    pub fn pack_key(name: &str, effective_amount: u64, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = vec![Self::PREFIX];
        write_name(&mut out, name);
        out.extend_from_slice(&inverse_u64(effective_amount).to_be_bytes());
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<EffectiveAmountKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (name, rest) = take_name(rest)?;
        let (effective_amount, rest) = take_inverse_u64_be(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(EffectiveAmountKey {
            name,
            effective_amount,
            tx_num,
            position,
        })
    }

    pub fn pack_value(claim_hash: &ClaimHash) -> Vec<u8> {
        claim_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<EffectiveAmountValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(EffectiveAmountValue { claim_hash })
    }

    pub fn pack_item(
        name: &str,
        effective_amount: u64,
        tx_num: u32,
        position: u16,
        claim_hash: &ClaimHash,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(name, effective_amount, tx_num, position),
            Self::pack_value(claim_hash),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(EffectiveAmountKey, EffectiveAmountValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(name: &str) -> Vec<u8> {
        let mut out = Self::key_part_0();
        write_name(&mut out, name);
        out
    }

    pub fn key_part_2(name: &str, effective_amount: u64) -> Vec<u8> {
        let mut out = Self::key_part_1(name);
        out.extend_from_slice(&inverse_u64(effective_amount).to_be_bytes());
        out
    }

    pub fn key_part_3(name: &str, effective_amount: u64, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_2(name, effective_amount);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_4(name: &str, effective_amount: u64, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(name, effective_amount, tx_num, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_takeover_matches_s4() {
        // S4: pack_item("My Claim", claim_hash, 263) yields key
        // b't' || 0x0008 || "My Claim" and value claim_hash || 263u32be.
        let claim_hash: ClaimHash = [0xAB; 20];
        let (key, value) = ClaimTakeoverRow::pack_item("My Claim", &claim_hash, 263);
        let mut expected_key = vec![b't'];
        expected_key.extend_from_slice(b"\x00\x08My Claim");
        assert_eq!(key, expected_key);
        let mut expected_value = claim_hash.to_vec();
        expected_value.extend_from_slice(&263u32.to_be_bytes());
        assert_eq!(value, expected_value);

        let (k, v) = ClaimTakeoverRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.name, "My Claim");
        assert_eq!(v.claim_hash, claim_hash);
        assert_eq!(v.takeover_height, 263);
    }

    #[test]
    fn effective_amount_orders_descending_within_name() {
        let claim_hash: ClaimHash = [1u8; 20];
        let (low_key, _) = EffectiveAmountRow::pack_item("name", 100, 0, 0, &claim_hash);
        let (high_key, _) = EffectiveAmountRow::pack_item("name", 900, 0, 0, &claim_hash);
        assert!(high_key < low_key, "higher effective amount must sort first");
    }

    #[test]
    fn effective_amount_round_trips() {
        let claim_hash: ClaimHash = [2u8; 20];
        let (key, value) = EffectiveAmountRow::pack_item("somename", 12345, 4, 1, &claim_hash);
        let (k, v) = EffectiveAmountRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.name, "somename");
        assert_eq!(k.effective_amount, 12345);
        assert_eq!(v.claim_hash, claim_hash);
    }

    #[test]
    fn pending_activation_round_trips() {
        let claim_hash: ClaimHash = [3u8; 20];
        let (key, value) = PendingActivationRow::pack_item(500, 0, 1, 0, &claim_hash, "n");
        let (k, v) = PendingActivationRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.height, 500);
        assert_eq!(v.name, "n");
        assert_eq!(v.claim_hash, claim_hash);
    }

    #[test]
    fn activated_round_trips() {
        let claim_hash: ClaimHash = [4u8; 20];
        let (key, value) = ActivatedRow::pack_item(0, 1, 0, 500, &claim_hash, "n");
        let (k, v) = ActivatedRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.tx_num, 1);
        assert_eq!(v.height, 500);
        assert_eq!(v.claim_hash, claim_hash);
    }

    #[test]
    fn active_amount_round_trips() {
        let claim_hash: ClaimHash = [5u8; 20];
        let (key, value) = ActiveAmountRow::pack_item(&claim_hash, 0, 500, 1, 0, 1000);
        let (k, v) = ActiveAmountRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.claim_hash, claim_hash);
        assert_eq!(v.amount, 1000);
    }

    #[test]
    fn claim_expiration_round_trips() {
        let claim_hash: ClaimHash = [6u8; 20];
        let (key, value) = ClaimExpirationRow::pack_item(900_000, 5, 1, &claim_hash, "n");
        let (k, v) = ClaimExpirationRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.expiration_height, 900_000);
        assert_eq!(v.claim_hash, claim_hash);
    }
}

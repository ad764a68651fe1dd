use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

/// (claim_hash[20]) -> (tx_num u32, position u16, root_tx_num u32,
/// root_position u16, amount u64, channel_signature_is_valid bool, name).
/// The claim's current controlling TXO plus its originating ("root") TXO,
/// the amount staked by that TXO, and whether a channel co-signature over
/// it checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimToTxoKey {
    pub claim_hash: ClaimHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimToTxoValue {
    pub tx_num: u32,
    pub position: u16,
    pub root_tx_num: u32,
    pub root_position: u16,
    pub amount: u64,
    pub channel_signature_is_valid: bool,
    pub name: String,
}

pub struct ClaimToTxoRow;

impl ClaimToTxoRow {
    pub const PREFIX: u8 = prefix::CLAIM_TO_TXO;
    pub const CACHE_SIZE: usize = 128 * 1024 * 1024;

    pub fn pack_key(claim_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN);
        out.push(Self::PREFIX);
        out.extend_from_slice(claim_hash);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ClaimToTxoKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        expect_empty(rest)?;
        Ok(ClaimToTxoKey { claim_hash })
    }

    pub fn pack_value(
        tx_num: u32,
        position: u16,
        root_tx_num: u32,
        root_position: u16,
        amount: u64,
        channel_signature_is_valid: bool,
        name: &str,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(21 + 2 + name.len());
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out.extend_from_slice(&root_tx_num.to_be_bytes());
        out.extend_from_slice(&root_position.to_be_bytes());
        out.extend_from_slice(&amount.to_be_bytes());
        out.push(channel_signature_is_valid as u8);
        write_name(&mut out, name);
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<ClaimToTxoValue, CodecError> {
        let (tx_num, rest) = take_u32_be(value)?;
        let (position, rest) = take_u16_be(rest)?;
        let (root_tx_num, rest) = take_u32_be(rest)?;
        let (root_position, rest) = take_u16_be(rest)?;
        let (amount, rest) = take_u64_be(rest)?;
        let (flag, rest) = take_u8(rest)?;
        let (name, rest) = take_name(rest)?;
        expect_empty(rest)?;
        Ok(ClaimToTxoValue {
            tx_num,
            position,
            root_tx_num,
            root_position,
            amount,
            channel_signature_is_valid: flag != 0,
            name,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pack_item(
        claim_hash: &ClaimHash,
        tx_num: u32,
        position: u16,
        root_tx_num: u32,
        root_position: u16,
        amount: u64,
        channel_signature_is_valid: bool,
        name: &str,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(claim_hash),
            Self::pack_value(
                tx_num,
                position,
                root_tx_num,
                root_position,
                amount,
                channel_signature_is_valid,
                name,
            ),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ClaimToTxoKey, ClaimToTxoValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(claim_hash: &ClaimHash) -> Vec<u8> {
        Self::pack_key(claim_hash)
    }
}

/// (tx_num u32, position u16) -> (claim_hash[20], name). The inverse index
/// of `claim_to_txo`, letting a reader resolve a TXO straight to its claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxoToClaimKey {
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxoToClaimValue {
    pub claim_hash: ClaimHash,
    pub name: String,
}

pub struct TxoToClaimRow;

impl TxoToClaimRow {
    pub const PREFIX: u8 = prefix::TXO_TO_CLAIM;
    pub const CACHE_SIZE: usize = 128 * 1024 * 1024;

    pub fn pack_key(tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(7);
        out.push(Self::PREFIX);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<TxoToClaimKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(TxoToClaimKey { tx_num, position })
    }

    pub fn pack_value(claim_hash: &ClaimHash, name: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(CLAIM_HASH_LEN + 2 + name.len());
        out.extend_from_slice(claim_hash);
        write_name(&mut out, name);
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<TxoToClaimValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        let (name, rest) = take_name(rest)?;
        expect_empty(rest)?;
        Ok(TxoToClaimValue { claim_hash, name })
    }

    pub fn pack_item(
        tx_num: u32,
        position: u16,
        claim_hash: &ClaimHash,
        name: &str,
    ) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(tx_num, position), Self::pack_value(claim_hash, name))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(TxoToClaimKey, TxoToClaimValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(tx_num, position)
    }
}

/// (name, partial_claim_id, root_tx_num u32, root_position u16) -> (tx_num
/// u32, position u16). Lets a short, human-typed claim-id prefix resolve
/// unambiguously to the TXO that originated the claim, by scanning the
/// `name`+`partial_claim_id` prefix and checking how many matches remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimShortIdKey {
    pub name: String,
    pub partial_claim_id: String,
    pub root_tx_num: u32,
    pub root_position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimShortIdValue {
    pub tx_num: u32,
    pub position: u16,
}

pub struct ClaimShortIdRow;

impl ClaimShortIdRow {
    pub const PREFIX: u8 = prefix::CLAIM_SHORT_ID;

    pub fn pack_key(
        name: &str,
        partial_claim_id: &str,
        root_tx_num: u32,
        root_position: u16,
    ) -> Result<Vec<u8>, CodecError> {
        let mut out = vec![Self::PREFIX];
        write_name(&mut out, name);
        write_short_string(&mut out, partial_claim_id)?;
        out.extend_from_slice(&root_tx_num.to_be_bytes());
        out.extend_from_slice(&root_position.to_be_bytes());
        Ok(out)
    }

    pub fn unpack_key(key: &[u8]) -> Result<ClaimShortIdKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (name, rest) = take_name(rest)?;
        let (partial_claim_id, rest) = take_short_string(rest)?;
        let (root_tx_num, rest) = take_u32_be(rest)?;
        let (root_position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ClaimShortIdKey {
            name,
            partial_claim_id,
            root_tx_num,
            root_position,
        })
    }

    pub fn pack_value(tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(6);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_value(value: &[u8]) -> Result<ClaimShortIdValue, CodecError> {
        let (tx_num, rest) = take_u32_be(value)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ClaimShortIdValue { tx_num, position })
    }

    pub fn pack_item(
        name: &str,
        partial_claim_id: &str,
        root_tx_num: u32,
        root_position: u16,
        tx_num: u32,
        position: u16,
    ) -> Result<(Vec<u8>, Vec<u8>), CodecError> {
        Ok((
            Self::pack_key(name, partial_claim_id, root_tx_num, root_position)?,
            Self::pack_value(tx_num, position),
        ))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ClaimShortIdKey, ClaimShortIdValue), CodecError> {
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

    pub fn key_part_2(name: &str, partial_claim_id: &str) -> Result<Vec<u8>, CodecError> {
        let mut out = Self::key_part_1(name);
        write_short_string(&mut out, partial_claim_id)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_to_txo_round_trips() {
        let claim_hash: ClaimHash = [5u8; 20];
        let (key, value) = ClaimToTxoRow::pack_item(&claim_hash, 1, 0, 1, 0, 500, true, "somename");
        let (k, v) = ClaimToTxoRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.claim_hash, claim_hash);
        assert_eq!(v.name, "somename");
        assert!(v.channel_signature_is_valid);
        assert_eq!(v.amount, 500);
    }

    #[test]
    fn txo_to_claim_round_trips() {
        let claim_hash: ClaimHash = [6u8; 20];
        let (key, value) = TxoToClaimRow::pack_item(3, 1, &claim_hash, "foo");
        let (k, v) = TxoToClaimRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k, TxoToClaimKey { tx_num: 3, position: 1 });
        assert_eq!(v.claim_hash, claim_hash);
        assert_eq!(v.name, "foo");
    }

    #[test]
    fn claim_short_id_rejects_oversize_partial_id() {
        let too_long = "x".repeat(40);
        assert!(ClaimShortIdRow::pack_key("name", &too_long, 0, 0).is_err());
    }

    #[test]
    fn claim_short_id_round_trips() {
        let (key, value) = ClaimShortIdRow::pack_item("somename", "ab12", 4, 1, 4, 1).unwrap();
        let (k, v) = ClaimShortIdRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.name, "somename");
        assert_eq!(k.partial_claim_id, "ab12");
        assert_eq!(v.tx_num, 4);
    }
}

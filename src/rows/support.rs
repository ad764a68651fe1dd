use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

/// (claim_hash[20], tx_num u32, position u16) -> amount u64. One support
/// TXO backing a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimToSupportKey {
    pub claim_hash: ClaimHash,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimToSupportValue {
    pub amount: u64,
}

pub struct ClaimToSupportRow;

impl ClaimToSupportRow {
    pub const PREFIX: u8 = prefix::CLAIM_TO_SUPPORT;

    pub fn pack_key(claim_hash: &ClaimHash, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN + 4 + 2);
        out.push(Self::PREFIX);
        out.extend_from_slice(claim_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ClaimToSupportKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ClaimToSupportKey {
            claim_hash,
            tx_num,
            position,
        })
    }

    pub fn pack_value(amount: u64) -> Vec<u8> {
        amount.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<ClaimToSupportValue, CodecError> {
        let (amount, rest) = take_u64_be(value)?;
        expect_empty(rest)?;
        Ok(ClaimToSupportValue { amount })
    }

    pub fn pack_item(claim_hash: &ClaimHash, tx_num: u32, position: u16, amount: u64) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(claim_hash, tx_num, position),
            Self::pack_value(amount),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ClaimToSupportKey, ClaimToSupportValue), CodecError> {
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

    pub fn key_part_2(claim_hash: &ClaimHash, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_1(claim_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_3(claim_hash: &ClaimHash, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(claim_hash, tx_num, position)
    }
}

/// (tx_num u32, position u16) -> claim_hash[20]. The inverse of
/// `claim_to_support`, resolving a support TXO back to the claim it backs.
/// No partial-key levels beyond the full key: a support TXO is always
/// looked up whole, never scanned by tx_num alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportToClaimKey {
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportToClaimValue {
    pub claim_hash: ClaimHash,
}

pub struct SupportToClaimRow;

impl SupportToClaimRow {
    pub const PREFIX: u8 = prefix::SUPPORT_TO_CLAIM;

    pub fn pack_key(tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(7);
        out.push(Self::PREFIX);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<SupportToClaimKey, CodecError> {
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
        Ok(SupportToClaimKey { tx_num, position })
    }

    pub fn pack_value(claim_hash: &ClaimHash) -> Vec<u8> {
        claim_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<SupportToClaimValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(SupportToClaimValue { claim_hash })
    }

    pub fn pack_item(tx_num: u32, position: u16, claim_hash: &ClaimHash) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(tx_num, position), Self::pack_value(claim_hash))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(SupportToClaimKey, SupportToClaimValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(tx_num, position)
    }
}

/// (claim_hash[20]) -> amount u64. Total support amount currently backing
/// a claim, maintained incrementally as supports are added and removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportAmountKey {
    pub claim_hash: ClaimHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportAmountValue {
    pub amount: u64,
}

pub struct SupportAmountRow;

impl SupportAmountRow {
    pub const PREFIX: u8 = prefix::SUPPORT_AMOUNT;
    pub const CACHE_SIZE: usize = 1024 * 1024 * 1024 / 16;

    pub fn pack_key(claim_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN);
        out.push(Self::PREFIX);
        out.extend_from_slice(claim_hash);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<SupportAmountKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        expect_empty(rest)?;
        Ok(SupportAmountKey { claim_hash })
    }

    pub fn pack_value(amount: u64) -> Vec<u8> {
        amount.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<SupportAmountValue, CodecError> {
        let (amount, rest) = take_u64_be(value)?;
        expect_empty(rest)?;
        Ok(SupportAmountValue { amount })
    }

    pub fn pack_item(claim_hash: &ClaimHash, amount: u64) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(claim_hash), Self::pack_value(amount))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(SupportAmountKey, SupportAmountValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(claim_hash: &ClaimHash) -> Vec<u8> {
        Self::pack_key(claim_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_to_support_round_trips() {
        let claim_hash: ClaimHash = [9u8; 20];
        let (key, value) = ClaimToSupportRow::pack_item(&claim_hash, 2, 1, 777);
        let (k, v) = ClaimToSupportRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.claim_hash, claim_hash);
        assert_eq!(v.amount, 777);
    }

    #[test]
    fn support_to_claim_round_trips() {
        let claim_hash: ClaimHash = [8u8; 20];
        let (key, value) = SupportToClaimRow::pack_item(2, 1, &claim_hash);
        let (k, v) = SupportToClaimRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k, SupportToClaimKey { tx_num: 2, position: 1 });
        assert_eq!(v.claim_hash, claim_hash);
    }

    #[test]
    fn support_amount_round_trips() {
        let claim_hash: ClaimHash = [7u8; 20];
        let (key, value) = SupportAmountRow::pack_item(&claim_hash, 1_000_000);
        let (k, v) = SupportAmountRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.claim_hash, claim_hash);
        assert_eq!(v.amount, 1_000_000);
    }
}

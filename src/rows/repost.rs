use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

/// (claim_hash[20]) -> reposted_claim_hash[20]. A claim that is itself a
/// repost, pointing at what it reposts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepostKey {
    pub claim_hash: ClaimHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepostValue {
    pub reposted_claim_hash: ClaimHash,
}

pub struct RepostRow;

impl RepostRow {
    pub const PREFIX: u8 = prefix::REPOST;

    pub fn pack_key(claim_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN);
        out.push(Self::PREFIX);
        out.extend_from_slice(claim_hash);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<RepostKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        expect_empty(rest)?;
        Ok(RepostKey { claim_hash })
    }

    pub fn pack_value(reposted_claim_hash: &ClaimHash) -> Vec<u8> {
        reposted_claim_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<RepostValue, CodecError> {
        let (reposted_claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(RepostValue { reposted_claim_hash })
    }

    pub fn pack_item(claim_hash: &ClaimHash, reposted_claim_hash: &ClaimHash) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(claim_hash), Self::pack_value(reposted_claim_hash))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(RepostKey, RepostValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(claim_hash: &ClaimHash) -> Vec<u8> {
        Self::pack_key(claim_hash)
    }
}

/// (reposted_claim_hash[20], tx_num u32, position u16) -> claim_hash[20].
/// The inverse of `repost`: every claim that reposts a given claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepostedClaimKey {
    pub reposted_claim_hash: ClaimHash,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepostedClaimValue {
    pub claim_hash: ClaimHash,
}

pub struct RepostedClaimRow;

impl RepostedClaimRow {
    pub const PREFIX: u8 = prefix::REPOSTED_CLAIM;

    pub fn pack_key(reposted_claim_hash: &ClaimHash, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN + 4 + 2);
        out.push(Self::PREFIX);
        out.extend_from_slice(reposted_claim_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<RepostedClaimKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (reposted_claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(RepostedClaimKey {
            reposted_claim_hash,
            tx_num,
            position,
        })
    }

    pub fn pack_value(claim_hash: &ClaimHash) -> Vec<u8> {
        claim_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<RepostedClaimValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(RepostedClaimValue { claim_hash })
    }

    pub fn pack_item(
        reposted_claim_hash: &ClaimHash,
        tx_num: u32,
        position: u16,
        claim_hash: &ClaimHash,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(reposted_claim_hash, tx_num, position),
            Self::pack_value(claim_hash),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(RepostedClaimKey, RepostedClaimValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(reposted_claim_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(reposted_claim_hash);
        out
    }

    pub fn key_part_2(reposted_claim_hash: &ClaimHash, tx_num: u32) -> Vec<u8> {
        let mut out = Self::key_part_1(reposted_claim_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out
    }

    pub fn key_part_3(reposted_claim_hash: &ClaimHash, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(reposted_claim_hash, tx_num, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repost_round_trips() {
        let claim_hash: ClaimHash = [1u8; 20];
        let reposted: ClaimHash = [2u8; 20];
        let (key, value) = RepostRow::pack_item(&claim_hash, &reposted);
        let (k, v) = RepostRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.claim_hash, claim_hash);
        assert_eq!(v.reposted_claim_hash, reposted);
    }

    #[test]
    fn reposted_claim_round_trips() {
        let reposted: ClaimHash = [3u8; 20];
        let claim_hash: ClaimHash = [4u8; 20];
        let (key, value) = RepostedClaimRow::pack_item(&reposted, 1, 0, &claim_hash);
        let (k, v) = RepostedClaimRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.reposted_claim_hash, reposted);
        assert_eq!(v.claim_hash, claim_hash);
    }
}

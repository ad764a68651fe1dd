use crate::codec::*;
use crate::error::CodecError;
use crate::rows::prefix;

/// (claim_hash[20], tx_num u32, position u16) -> signing_hash[20]. Records
/// which channel claim signed a given claim's controlling TXO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimToChannelKey {
    pub claim_hash: ClaimHash,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimToChannelValue {
    pub signing_hash: ClaimHash,
}

pub struct ClaimToChannelRow;

impl ClaimToChannelRow {
    pub const PREFIX: u8 = prefix::CLAIM_TO_CHANNEL;

    pub fn pack_key(claim_hash: &ClaimHash, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN + 4 + 2);
        out.push(Self::PREFIX);
        out.extend_from_slice(claim_hash);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ClaimToChannelKey, CodecError> {
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
        Ok(ClaimToChannelKey {
            claim_hash,
            tx_num,
            position,
        })
    }

    pub fn pack_value(signing_hash: &ClaimHash) -> Vec<u8> {
        signing_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<ClaimToChannelValue, CodecError> {
        let (signing_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(ClaimToChannelValue { signing_hash })
    }

    pub fn pack_item(
        claim_hash: &ClaimHash,
        tx_num: u32,
        position: u16,
        signing_hash: &ClaimHash,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(claim_hash, tx_num, position),
            Self::pack_value(signing_hash),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ClaimToChannelKey, ClaimToChannelValue), CodecError> {
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

/// (signing_hash[20], name, tx_num u32, position u16) -> claim_hash[20].
/// The inverse of `claim_to_channel`: every claim a channel has signed,
/// keyed so a reader can enumerate a channel's claims by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelToClaimKey {
    pub signing_hash: ClaimHash,
    pub name: String,
    pub tx_num: u32,
    pub position: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelToClaimValue {
    pub claim_hash: ClaimHash,
}

pub struct ChannelToClaimRow;

impl ChannelToClaimRow {
    pub const PREFIX: u8 = prefix::CHANNEL_TO_CLAIM;
    pub const CACHE_SIZE: usize = 1024 * 1024;

    pub fn pack_key(signing_hash: &ClaimHash, name: &str, tx_num: u32, position: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN + 2 + name.len() + 6);
        out.push(Self::PREFIX);
        out.extend_from_slice(signing_hash);
        write_name(&mut out, name);
        out.extend_from_slice(&tx_num.to_be_bytes());
        out.extend_from_slice(&position.to_be_bytes());
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ChannelToClaimKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (signing_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        let (name, rest) = take_name(rest)?;
        let (tx_num, rest) = take_u32_be(rest)?;
        let (position, rest) = take_u16_be(rest)?;
        expect_empty(rest)?;
        Ok(ChannelToClaimKey {
            signing_hash,
            name,
            tx_num,
            position,
        })
    }

    pub fn pack_value(claim_hash: &ClaimHash) -> Vec<u8> {
        claim_hash.to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<ChannelToClaimValue, CodecError> {
        let (claim_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(value)?;
        expect_empty(rest)?;
        Ok(ChannelToClaimValue { claim_hash })
    }

    pub fn pack_item(
        signing_hash: &ClaimHash,
        name: &str,
        tx_num: u32,
        position: u16,
        claim_hash: &ClaimHash,
    ) -> (Vec<u8>, Vec<u8>) {
        (
            Self::pack_key(signing_hash, name, tx_num, position),
            Self::pack_value(claim_hash),
        )
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ChannelToClaimKey, ChannelToClaimValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(signing_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Self::key_part_0();
        out.extend_from_slice(signing_hash);
        out
    }

    pub fn key_part_2(signing_hash: &ClaimHash, name: &str) -> Vec<u8> {
        let mut out = Self::key_part_1(signing_hash);
        write_name(&mut out, name);
        out
    }

    pub fn key_part_3(signing_hash: &ClaimHash, name: &str, tx_num: u32, position: u16) -> Vec<u8> {
        Self::pack_key(signing_hash, name, tx_num, position)
    }
}

/// (signing_hash[20]) -> count u32. Running total of claims signed by a
/// channel, maintained incrementally rather than recomputed by scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCountKey {
    pub signing_hash: ClaimHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCountValue {
    pub count: u32,
}

pub struct ChannelCountRow;

impl ChannelCountRow {
    pub const PREFIX: u8 = prefix::CHANNEL_COUNT;

    pub fn pack_key(signing_hash: &ClaimHash) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + CLAIM_HASH_LEN);
        out.push(Self::PREFIX);
        out.extend_from_slice(signing_hash);
        out
    }

    pub fn unpack_key(key: &[u8]) -> Result<ChannelCountKey, CodecError> {
        let (tag, rest) = take_u8(key)?;
        if tag != Self::PREFIX {
            return Err(CodecError::WrongPrefix {
                expected: Self::PREFIX,
                found: tag,
            });
        }
        let (signing_hash, rest) = take_fixed::<CLAIM_HASH_LEN>(rest)?;
        expect_empty(rest)?;
        Ok(ChannelCountKey { signing_hash })
    }

    pub fn pack_value(count: u32) -> Vec<u8> {
        count.to_be_bytes().to_vec()
    }

    pub fn unpack_value(value: &[u8]) -> Result<ChannelCountValue, CodecError> {
        let (count, rest) = take_u32_be(value)?;
        expect_empty(rest)?;
        Ok(ChannelCountValue { count })
    }

    pub fn pack_item(signing_hash: &ClaimHash, count: u32) -> (Vec<u8>, Vec<u8>) {
        (Self::pack_key(signing_hash), Self::pack_value(count))
    }

    pub fn unpack_item(key: &[u8], value: &[u8]) -> Result<(ChannelCountKey, ChannelCountValue), CodecError> {
        Ok((Self::unpack_key(key)?, Self::unpack_value(value)?))
    }

    pub fn key_part_0() -> Vec<u8> {
        vec![Self::PREFIX]
    }

    pub fn key_part_1(signing_hash: &ClaimHash) -> Vec<u8> {
        Self::pack_key(signing_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_to_channel_round_trips() {
        let claim_hash: ClaimHash = [1u8; 20];
        let signing_hash: ClaimHash = [2u8; 20];
        let (key, value) = ClaimToChannelRow::pack_item(&claim_hash, 9, 0, &signing_hash);
        let (k, v) = ClaimToChannelRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.claim_hash, claim_hash);
        assert_eq!(v.signing_hash, signing_hash);
    }

    #[test]
    fn channel_to_claim_round_trips() {
        let signing_hash: ClaimHash = [3u8; 20];
        let claim_hash: ClaimHash = [4u8; 20];
        let (key, value) = ChannelToClaimRow::pack_item(&signing_hash, "a channel claim", 1, 0, &claim_hash);
        let (k, v) = ChannelToClaimRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.signing_hash, signing_hash);
        assert_eq!(k.name, "a channel claim");
        assert_eq!(v.claim_hash, claim_hash);
    }

    #[test]
    fn channel_count_round_trips() {
        let signing_hash: ClaimHash = [5u8; 20];
        let (key, value) = ChannelCountRow::pack_item(&signing_hash, 42);
        let (k, v) = ChannelCountRow::unpack_item(&key, &value).unwrap();
        assert_eq!(k.signing_hash, signing_hash);
        assert_eq!(v.count, 42);
    }
}

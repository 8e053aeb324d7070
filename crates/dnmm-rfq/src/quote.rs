//! The maker-signed typed quote (§4.10) and its EIP-712 domain separator.

use alloy::primitives::{Address, Signature, B256};
use alloy::sol;
use alloy::sol_types::{eip712_domain, SolStruct};

use crate::error::{RfqError, Result};

sol! {
    #[derive(Debug)]
    struct Quote {
        address taker;
        uint256 amountIn;
        uint256 minAmountOut;
        bool isBaseIn;
        uint256 expiry;
        uint256 salt;
        address pool;
        uint256 chainId;
    }
}

/// A maker-signed, single-use swap authorization (§3 `RFQQuote`, §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfqQuote {
    pub taker: Address,
    pub amount_in: u128,
    pub min_amount_out: u128,
    pub is_base_in: bool,
    pub expiry_sec: u64,
    pub salt: u64,
    pub pool: Address,
    pub chain_id: u64,
}

impl RfqQuote {
    fn sol_struct(&self) -> Quote {
        Quote {
            taker: self.taker,
            amountIn: alloy::primitives::U256::from(self.amount_in),
            minAmountOut: alloy::primitives::U256::from(self.min_amount_out),
            isBaseIn: self.is_base_in,
            expiry: alloy::primitives::U256::from(self.expiry_sec),
            salt: alloy::primitives::U256::from(self.salt),
            pool: self.pool,
            chainId: alloy::primitives::U256::from(self.chain_id),
        }
    }

    /// Domain-separated EIP-712 signing hash: `pool` is the verifying
    /// contract and `chain_id` the domain's chain id, so a quote signed for
    /// one pool/chain can never validate against another (§4.10).
    pub fn signing_hash(&self) -> B256 {
        let domain = eip712_domain! {
            name: "DnmmRfq",
            version: "1",
            chain_id: self.chain_id,
            verifying_contract: self.pool,
        };
        self.sol_struct().eip712_signing_hash(&domain)
    }

    /// Recovers the signer of `signature` over this quote's domain hash and
    /// checks it equals `maker`.
    pub fn verify_signer(&self, signature: &Signature, maker: Address) -> Result<()> {
        let recovered = signature
            .recover_address_from_prehash(&self.signing_hash())
            .map_err(|_| RfqError::InvalidSignature)?;
        if recovered != maker {
            return Err(RfqError::InvalidSignature);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    fn sample_quote(pool: Address) -> RfqQuote {
        RfqQuote {
            taker: Address::repeat_byte(0x11),
            amount_in: 10_000,
            min_amount_out: 9_900,
            is_base_in: true,
            expiry_sec: 2_000,
            salt: 1,
            pool,
            chain_id: 1337,
        }
    }

    #[test]
    fn signature_from_maker_recovers() {
        let maker = PrivateKeySigner::random();
        let quote = sample_quote(Address::repeat_byte(0xaa));
        let signature = maker.sign_hash_sync(&quote.signing_hash()).unwrap();
        quote.verify_signer(&signature, maker.address()).unwrap();
    }

    #[test]
    fn signature_from_wrong_key_rejected() {
        let maker = PrivateKeySigner::random();
        let impostor = PrivateKeySigner::random();
        let quote = sample_quote(Address::repeat_byte(0xaa));
        let signature = impostor.sign_hash_sync(&quote.signing_hash()).unwrap();
        let err = quote.verify_signer(&signature, maker.address()).unwrap_err();
        assert!(matches!(err, RfqError::InvalidSignature));
    }

    #[test]
    fn domain_is_separated_by_pool() {
        let maker = PrivateKeySigner::random();
        let quote_a = sample_quote(Address::repeat_byte(0xaa));
        let mut quote_b = quote_a;
        quote_b.pool = Address::repeat_byte(0xbb);
        assert_ne!(quote_a.signing_hash(), quote_b.signing_hash());

        let signature = maker.sign_hash_sync(&quote_a.signing_hash()).unwrap();
        let err = quote_b.verify_signer(&signature, maker.address()).unwrap_err();
        assert!(matches!(err, RfqError::InvalidSignature));
    }
}

//! The RFQ envelope: validates a maker-signed `RfqQuote` and settles it
//! against a pool's `swap_exact_in`, enforcing single-use salts and
//! `min_amount_out` (§4.10, §8 invariant 10).

use std::collections::HashSet;

use alloy::primitives::{Address, Signature};
use dnmm_core::{BlockCursor, Clock, Event, Observer};
use dnmm_oracle::OracleData;
use dnmm_pool::PoolHandle;
use parking_lot::Mutex;

use crate::error::{RfqError, Result};
use crate::quote::RfqQuote;

/// Binds one pool/chain/maker triple to its settlement entry point. A
/// quote signed for a different pool or chain id fails domain separation
/// at `RfqQuote::signing_hash` as well as the explicit checks here, which
/// exist to give callers a named error instead of an opaque signature
/// mismatch.
pub struct RfqEnvelope {
    pool: PoolHandle,
    maker: Address,
    pool_address: Address,
    chain_id: u64,
    clock: Box<dyn Clock>,
    observer: Box<dyn Observer>,
    seen_salts: Mutex<HashSet<(Address, u64)>>,
}

impl RfqEnvelope {
    pub fn new(
        pool: PoolHandle,
        maker: Address,
        pool_address: Address,
        chain_id: u64,
        clock: Box<dyn Clock>,
        observer: Box<dyn Observer>,
    ) -> Self {
        Self {
            pool,
            maker,
            pool_address,
            chain_id,
            clock,
            observer,
            seen_salts: Mutex::new(HashSet::new()),
        }
    }

    pub fn now(&self) -> BlockCursor {
        self.clock.now()
    }

    /// Verifies signature, domain, expiry, and salt uniqueness, then calls
    /// into `swap_exact_in` with `min_amount_out` enforced. On any failure
    /// after the salt is reserved, the reservation is rolled back — a
    /// rejected quote never burns its salt, mirroring the "no partial
    /// state on a fatal error" rule in §7.
    pub fn verify_and_swap(
        &self,
        quote: &RfqQuote,
        signature: &Signature,
        oracle_data: &OracleData,
    ) -> Result<u128> {
        if quote.pool != self.pool_address {
            return Err(RfqError::WrongPool {
                quote_pool: quote.pool.to_string(),
                envelope_pool: self.pool_address.to_string(),
            });
        }
        if quote.chain_id != self.chain_id {
            return Err(RfqError::WrongChain {
                quote_chain_id: quote.chain_id,
                envelope_chain_id: self.chain_id,
            });
        }

        quote.verify_signer(signature, self.maker)?;

        let block = self.clock.now();
        if block.block_ts_sec > quote.expiry_sec {
            return Err(RfqError::Expired {
                expiry_sec: quote.expiry_sec,
                block_ts_sec: block.block_ts_sec,
            });
        }

        let key = (quote.taker, quote.salt);
        {
            let mut seen = self.seen_salts.lock();
            if seen.contains(&key) {
                return Err(RfqError::Replay {
                    taker: quote.taker.to_string(),
                    salt: quote.salt,
                });
            }
            seen.insert(key);
        }

        let taker = quote.taker.to_string();
        match self.pool.swap_exact_in(
            &taker,
            quote.amount_in,
            quote.min_amount_out,
            quote.is_base_in,
            oracle_data,
            quote.expiry_sec,
        ) {
            Ok(amount_out) => {
                self.observer.emit(Event::QuoteFilled {
                    taker,
                    amount_out,
                });
                Ok(amount_out)
            }
            Err(err) => {
                self.seen_salts.lock().remove(&key);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;
    use dnmm_core::{ManualClock, NullObserver, WAD};
    use dnmm_fee::{FeeConfig, MakerConfig};
    use dnmm_inventory::{InventoryConfig, Reserves, TokenConfig};
    use dnmm_oracle::{OracleConfig, PrimaryReading, SecondaryReading};
    use dnmm_pool::{Pool, PoolConfig};
    use dnmm_pricing::{AomqConfig, FeatureFlags, PreviewConfig};

    fn tokens() -> TokenConfig {
        TokenConfig {
            base_scale: WAD,
            quote_scale: WAD,
            base_decimals: 18,
            quote_decimals: 18,
        }
    }

    fn pool_config() -> PoolConfig {
        PoolConfig {
            tokens: tokens(),
            inventory: InventoryConfig {
                floor_bps: 300,
                ..Default::default()
            },
            oracle: OracleConfig::default(),
            fee: FeeConfig {
                base_bps: 15,
                cap_bps: 150,
                ..Default::default()
            },
            maker: MakerConfig::default(),
            aomq: AomqConfig::default(),
            preview: PreviewConfig::default(),
            flags: FeatureFlags {
                enable_bbo_floor: false,
                enable_inv_tilt: false,
                enable_aomq: false,
                ..FeatureFlags::default()
            },
        }
    }

    fn envelope(maker_address: Address, pool_address: Address, block_ts: u64) -> RfqEnvelope {
        let reserves = Reserves {
            base_units: 100_000 * WAD,
            quote_units: 10_000_000 * WAD,
        };
        let pool = Pool::new(
            reserves,
            pool_config(),
            Box::new(ManualClock::new(BlockCursor::new(1, block_ts))),
            Box::new(NullObserver),
        )
        .unwrap();
        RfqEnvelope::new(
            PoolHandle::new(pool),
            maker_address,
            pool_address,
            1337,
            Box::new(ManualClock::new(BlockCursor::new(1, block_ts))),
            Box::new(NullObserver),
        )
    }

    fn oracle_data() -> OracleData {
        OracleData {
            primary: PrimaryReading {
                mid_wad: Some(WAD),
                mid_age_sec: 1,
                bid_wad: Some(WAD),
                ask_wad: Some(WAD),
                spread_bps: 0,
                book_age_sec: 1,
                ema_mid_wad: None,
                ema_age_sec: 0,
            },
            secondary: SecondaryReading::default(),
        }
    }

    struct SharedObserver(std::sync::Arc<dnmm_core::RecordingObserver>);

    impl dnmm_core::Observer for SharedObserver {
        fn emit(&self, event: dnmm_core::Event) {
            self.0.emit(event);
        }
    }

    #[test]
    fn settlement_emits_quote_filled_with_real_amount_out() {
        use dnmm_core::{Event, RecordingObserver};
        use std::sync::Arc;

        let maker = PrivateKeySigner::random();
        let pool_address = Address::repeat_byte(0xaa);
        let reserves = Reserves {
            base_units: 100_000 * WAD,
            quote_units: 10_000_000 * WAD,
        };
        let pool = Pool::new(
            reserves,
            pool_config(),
            Box::new(ManualClock::new(BlockCursor::new(1, 1_000))),
            Box::new(NullObserver),
        )
        .unwrap();
        let observer = Arc::new(RecordingObserver::new());
        let env = RfqEnvelope::new(
            PoolHandle::new(pool),
            maker.address(),
            pool_address,
            1337,
            Box::new(ManualClock::new(BlockCursor::new(1, 1_000))),
            Box::new(SharedObserver(observer.clone())),
        );

        let quote = RfqQuote {
            taker: Address::repeat_byte(0x11),
            amount_in: 10 * WAD,
            min_amount_out: 0,
            is_base_in: true,
            expiry_sec: 2_000,
            salt: 1,
            pool: pool_address,
            chain_id: 1337,
        };
        let signature = maker.sign_hash_sync(&quote.signing_hash()).unwrap();
        let out = env.verify_and_swap(&quote, &signature, &oracle_data()).unwrap();

        let events = observer.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::QuoteFilled { taker, amount_out } => {
                assert_eq!(taker, "0x1111111111111111111111111111111111111111");
                assert_eq!(*amount_out, out);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn valid_quote_settles_once_and_replay_is_rejected() {
        let maker = PrivateKeySigner::random();
        let pool_address = Address::repeat_byte(0xaa);
        let env = envelope(maker.address(), pool_address, 1_000);

        let quote = RfqQuote {
            taker: Address::repeat_byte(0x11),
            amount_in: 10 * WAD,
            min_amount_out: 0,
            is_base_in: true,
            expiry_sec: 2_000,
            salt: 1,
            pool: pool_address,
            chain_id: 1337,
        };
        let signature = maker.sign_hash_sync(&quote.signing_hash()).unwrap();
        let data = oracle_data();

        let out = env.verify_and_swap(&quote, &signature, &data).unwrap();
        assert_eq!(out, 9_985 * WAD / 1_000);

        let err = env.verify_and_swap(&quote, &signature, &data).unwrap_err();
        assert!(matches!(err, RfqError::Replay { .. }));
    }

    #[test]
    fn expired_quote_rejected_before_touching_the_pool() {
        let maker = PrivateKeySigner::random();
        let pool_address = Address::repeat_byte(0xaa);
        let env = envelope(maker.address(), pool_address, 5_000);

        let quote = RfqQuote {
            taker: Address::repeat_byte(0x11),
            amount_in: 10 * WAD,
            min_amount_out: 0,
            is_base_in: true,
            expiry_sec: 4_000,
            salt: 1,
            pool: pool_address,
            chain_id: 1337,
        };
        let signature = maker.sign_hash_sync(&quote.signing_hash()).unwrap();
        let err = env
            .verify_and_swap(&quote, &signature, &oracle_data())
            .unwrap_err();
        assert!(matches!(err, RfqError::Expired { .. }));
    }

    #[test]
    fn slippage_failure_does_not_burn_the_salt() {
        let maker = PrivateKeySigner::random();
        let pool_address = Address::repeat_byte(0xaa);
        let env = envelope(maker.address(), pool_address, 1_000);

        let quote = RfqQuote {
            taker: Address::repeat_byte(0x11),
            amount_in: 10 * WAD,
            min_amount_out: 10 * WAD, // unreachable after fees
            is_base_in: true,
            expiry_sec: 2_000,
            salt: 7,
            pool: pool_address,
            chain_id: 1337,
        };
        let signature = maker.sign_hash_sync(&quote.signing_hash()).unwrap();
        let err = env
            .verify_and_swap(&quote, &signature, &oracle_data())
            .unwrap_err();
        assert!(matches!(
            err,
            RfqError::Pool(dnmm_pool::PoolError::Slippage { .. })
        ));
        assert!(!env.seen_salts.lock().contains(&(quote.taker, quote.salt)));
    }

    #[test]
    fn wrong_pool_rejected_before_signature_check() {
        let maker = PrivateKeySigner::random();
        let pool_address = Address::repeat_byte(0xaa);
        let env = envelope(maker.address(), pool_address, 1_000);

        let quote = RfqQuote {
            taker: Address::repeat_byte(0x11),
            amount_in: 10 * WAD,
            min_amount_out: 0,
            is_base_in: true,
            expiry_sec: 2_000,
            salt: 1,
            pool: Address::repeat_byte(0xbb), // wrong pool
            chain_id: 1337,
        };
        let signature = maker.sign_hash_sync(&quote.signing_hash()).unwrap();
        let err = env
            .verify_and_swap(&quote, &signature, &oracle_data())
            .unwrap_err();
        assert!(matches!(err, RfqError::WrongPool { .. }));
    }
}

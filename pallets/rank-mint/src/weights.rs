//! Weights for `pallet_rank_mint`.
//!
//! Placeholder figures until the benchmarks in `benchmarking.rs` are run
//! against reference hardware. Storage access counts are exact.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

/// Weight functions needed for `pallet_rank_mint`.
pub trait WeightInfo {
    fn mint() -> Weight;
    fn init_mint() -> Weight;
    fn change_public_sale_status() -> Weight;
    fn change_fee_settings() -> Weight;
    fn add_whitelisting() -> Weight;
    fn remove_whitelisting() -> Weight;
    fn transfer_royalty() -> Weight;
    fn withdraw_reserve() -> Weight;
    fn set_base_uri() -> Weight;
    fn extend_percentile_table(n: u32) -> Weight;
}

/// Rank index depth at the production ceiling of 10 000 contributions.
const RANK_INDEX_DEPTH: u64 = 19;

/// Weights scaled by the runtime's database weight.
pub struct SubstrateWeight<T>(PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Registry scan, rank index path (read and rewrite), two payouts.
    fn mint() -> Weight {
        Weight::from_parts(120_000_000, 12_000)
            .saturating_add(T::DbWeight::get().reads(12 + RANK_INDEX_DEPTH))
            .saturating_add(T::DbWeight::get().writes(10 + RANK_INDEX_DEPTH))
    }
    fn init_mint() -> Weight {
        Weight::from_parts(60_000_000, 4_000)
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().writes(32))
    }
    fn change_public_sale_status() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn change_fee_settings() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
            .saturating_add(T::DbWeight::get().reads_writes(1, 1))
    }
    fn add_whitelisting() -> Weight {
        Weight::from_parts(30_000_000, 6_000)
            .saturating_add(T::DbWeight::get().reads(8))
            .saturating_add(T::DbWeight::get().writes(3))
    }
    fn remove_whitelisting() -> Weight {
        Weight::from_parts(20_000_000, 4_000)
            .saturating_add(T::DbWeight::get().reads_writes(3, 3))
    }
    fn transfer_royalty() -> Weight {
        Weight::from_parts(50_000_000, 6_000)
            .saturating_add(T::DbWeight::get().reads_writes(3, 3))
    }
    fn withdraw_reserve() -> Weight {
        Weight::from_parts(50_000_000, 6_000)
            .saturating_add(T::DbWeight::get().reads_writes(3, 3))
    }
    fn set_base_uri() -> Weight {
        Weight::from_parts(10_000_000, 0)
            .saturating_add(T::DbWeight::get().writes(1))
    }
    fn extend_percentile_table(n: u32) -> Weight {
        Weight::from_parts(10_000_000, 0)
            .saturating_add(Weight::from_parts(2_000_000, 0).saturating_mul(n as u64))
            .saturating_add(T::DbWeight::get().writes(n as u64))
    }
}

// For backwards compatibility and tests.
impl WeightInfo for () {
    fn mint() -> Weight {
        Weight::from_parts(120_000_000, 12_000)
            .saturating_add(RocksDbWeight::get().reads(12 + RANK_INDEX_DEPTH))
            .saturating_add(RocksDbWeight::get().writes(10 + RANK_INDEX_DEPTH))
    }
    fn init_mint() -> Weight {
        Weight::from_parts(60_000_000, 4_000)
            .saturating_add(RocksDbWeight::get().reads(2))
            .saturating_add(RocksDbWeight::get().writes(32))
    }
    fn change_public_sale_status() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
            .saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn change_fee_settings() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
            .saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
    fn add_whitelisting() -> Weight {
        Weight::from_parts(30_000_000, 6_000)
            .saturating_add(RocksDbWeight::get().reads(8))
            .saturating_add(RocksDbWeight::get().writes(3))
    }
    fn remove_whitelisting() -> Weight {
        Weight::from_parts(20_000_000, 4_000)
            .saturating_add(RocksDbWeight::get().reads_writes(3, 3))
    }
    fn transfer_royalty() -> Weight {
        Weight::from_parts(50_000_000, 6_000)
            .saturating_add(RocksDbWeight::get().reads_writes(3, 3))
    }
    fn withdraw_reserve() -> Weight {
        Weight::from_parts(50_000_000, 6_000)
            .saturating_add(RocksDbWeight::get().reads_writes(3, 3))
    }
    fn set_base_uri() -> Weight {
        Weight::from_parts(10_000_000, 0)
            .saturating_add(RocksDbWeight::get().writes(1))
    }
    fn extend_percentile_table(n: u32) -> Weight {
        Weight::from_parts(10_000_000, 0)
            .saturating_add(Weight::from_parts(2_000_000, 0).saturating_mul(n as u64))
            .saturating_add(RocksDbWeight::get().writes(n as u64))
    }
}

//! Benchmarking setup for pallet-rank-mint

use super::*;

#[allow(unused)]
use crate::Pallet as RankMint;
use crate::order_statistics::{ContributionIndex, StorageNodes};
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

const SEED: u32 = 0;

/// Contributions already ranked before the measured mint.
const PRIOR_CONTRIBUTIONS: u32 = 1_000;

fn funded<T: Config>(name: &'static str, index: u32) -> T::AccountId {
    let who: T::AccountId = account(name, index, SEED);
    let floor = Settings::<T>::get().min_fee.max(T::Currency::minimum_balance());
    T::Currency::set_balance(&who, floor.saturating_mul(1_000));
    who
}

fn fund_custody<T: Config>(amount: Balance) {
    let custody = RankMint::<T>::account_id();
    T::Currency::set_balance(&custody, T::Currency::minimum_balance().saturating_add(amount));
}

/// Fill the registry with entries the caller does not qualify through, so a
/// private sale mint has to scan all of them.
fn fill_registry<T: Config>(contract: T::ContractId) -> EntryId {
    let wallet: T::AccountId = account("wallet", 0, SEED);
    let slots = T::MaxWhitelistEntries::get();
    for id in 0..slots {
        let min_balance = if id + 1 == slots { 0 } else { u128::MAX };
        let perc_royal = if id + 1 == slots { MAX_TOTAL_ROYALTY } else { 0 };
        Pallet::<T>::do_add_whitelisting(
            id,
            TokenKind::Fungible,
            contract.clone(),
            wallet.clone(),
            u32::MAX,
            min_balance,
            perc_royal,
        )
        .expect("registry has room");
    }
    slots - 1
}

#[benchmarks(where T::ContractId: Default)]
mod benchmarks {
    use super::*;

    /// Private sale mint closing a payout interval on top of a populated rank index.
    #[benchmark]
    fn mint() {
        let caller = funded::<T>("caller", 0);
        let matched = fill_registry::<T>(T::ContractId::default());

        let mut index = ContributionIndex::<T>::new(StorageNodes::default());
        for value in 0..PRIOR_CONTRIBUTIONS {
            index.insert(value as Balance).expect("index accepts inserts");
        }
        ParticipantMints::<T>::put(PRIOR_CONTRIBUTIONS);

        let interval = T::PayoutInterval::get();
        let token_id = if interval <= T::MaxSupply::get() { interval } else { 1 };
        Settings::<T>::mutate(|settings| settings.total_supply = token_id.saturating_sub(1));
        let pending = T::Currency::minimum_balance().saturating_mul(100);
        Revenue::<T>::mutate(|ledger| {
            ledger.team_pending = pending;
            ledger.donation_pending = pending;
        });
        fund_custody::<T>(pending * 2);

        let contribution = Pallet::<T>::required_fee(&caller).expect("fee divisor is set");

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), contribution);

        assert_eq!(MintedBy::<T>::get(&caller), Some(token_id));
        assert_eq!(Whitelist::<T>::get(matched).map(|entry| entry.tracker), Some(1));
    }

    #[benchmark]
    fn init_mint() {
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin);

        assert_eq!(Settings::<T>::get().total_supply, INITIAL_BATCH_SIZE);
    }

    #[benchmark]
    fn change_public_sale_status() {
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, true);

        assert_eq!(Settings::<T>::get().public_sale, true);
    }

    #[benchmark]
    fn change_fee_settings() {
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, false, 200, 1_000);

        assert_eq!(Settings::<T>::get().perc_fee, 200);
    }

    /// Insert into a registry that is one slot short of full.
    #[benchmark]
    fn add_whitelisting() {
        let wallet: T::AccountId = account("wallet", 1, SEED);
        let slots = T::MaxWhitelistEntries::get();
        for id in 1..slots {
            Pallet::<T>::do_add_whitelisting(
                id,
                TokenKind::NonFungible,
                T::ContractId::default(),
                wallet.clone(),
                1,
                1,
                0,
            )
            .expect("registry has room");
        }
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(
            origin as T::RuntimeOrigin,
            0,
            TokenKind::Multi { id: 1 },
            T::ContractId::default(),
            wallet,
            100,
            1,
            MAX_TOTAL_ROYALTY,
        );

        assert_eq!(ActiveEntries::<T>::get().len() as u32, slots);
    }

    #[benchmark]
    fn remove_whitelisting() {
        let last = fill_registry::<T>(T::ContractId::default());
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, last);

        assert!(Pallet::<T>::get_list_contract(last).is_err());
    }

    #[benchmark]
    fn transfer_royalty() {
        let id = fill_registry::<T>(T::ContractId::default());
        let wallet: T::AccountId = account("wallet", 0, SEED);
        let amount = T::Currency::minimum_balance().saturating_mul(100);
        Whitelist::<T>::mutate(id, |entry| {
            if let Some(entry) = entry {
                entry.collected_balance = amount;
            }
        });
        fund_custody::<T>(amount);

        #[extrinsic_call]
        _(RawOrigin::Signed(wallet.clone()), id);

        assert_eq!(T::Currency::balance(&wallet), amount);
    }

    #[benchmark]
    fn withdraw_reserve() {
        let dest: T::AccountId = account("dest", 0, SEED);
        let amount = T::Currency::minimum_balance().saturating_mul(100);
        Revenue::<T>::mutate(|ledger| ledger.reserve = amount);
        fund_custody::<T>(amount);
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, dest.clone());

        assert_eq!(T::Currency::balance(&dest), amount);
    }

    #[benchmark]
    fn set_base_uri() {
        let uri = alloc::vec![b'u'; MAX_URI_LEN as usize];
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, uri);

        assert_eq!(BaseUri::<T>::get().len() as u32, MAX_URI_LEN);
    }

    #[benchmark]
    fn extend_percentile_table(n: Linear<1, { T::MaxTableChunk::get() }>) {
        let rows: Vec<PercentileEntry> = (0..n)
            .map(|sequence_index| PercentileEntry {
                sequence_index,
                balance: sequence_index as Balance,
                category: 1,
                category_v2: MAX_CATEGORY,
            })
            .collect();
        let rows: BoundedVec<_, T::MaxTableChunk> = rows.try_into().expect("n within chunk size");
        let origin = T::AdminOrigin::try_successful_origin().expect("Admin origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, rows);

        assert!(PercentileTable::<T>::contains_key(n - 1));
    }

    impl_benchmark_test_suite!(RankMint, crate::mock::new_test_ext(), crate::mock::Test);
}

#![cfg_attr(not(feature = "std"), no_std)]
// Allow deprecated storage getters until the public views are moved to a runtime API
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # Rank Mint Pallet
//!
//! One-per-account minting where every participant's record gets an attribute
//! category from the percentile rank of what they paid. The pallet gates the
//! sale through a phase machine and a capped registry of community token
//! contracts, and splits every contribution between the team, a donation
//! account, the qualifying community and a custody reserve.
//!
//! Categories come either from a live order-statistics index over all
//! contributions ([`order_statistics`]) or from an uploaded percentile table.

extern crate alloc;

use frame_support::{
    dispatch::DispatchResult,
    ensure,
    pallet_prelude::*,
    storage::with_storage_layer,
    traits::{
        fungible::{Inspect, Mutate},
        tokens::Preservation,
        EnsureOrigin,
    },
    PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;
pub use traits::TokenBalances;
pub use types::*;
pub use weights::WeightInfo;

mod attributes;
mod distribution;
pub mod order_statistics;
mod registry;
mod sale;
pub mod traits;
pub mod types;
pub mod weights;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

pub(crate) const LOG_TARGET: &str = "runtime::rank-mint";

/// Longest accepted base URI.
pub const MAX_URI_LEN: u32 = 128;

/// Longest permanent path (`{category}_{tokenId}.json`).
pub const MAX_PATH_LEN: u32 = 32;

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use crate::order_statistics::{NodeId, RankNode};

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Origin allowed to run the sale (settings, registry, calibration batch).
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// Native value contributions are paid in.
        type Currency: Inspect<Self::AccountId, Balance = Balance> + Mutate<Self::AccountId>;

        /// Address of an external community token contract.
        type ContractId: Parameter + Member + MaxEncodedLen;

        /// Balance queries against community token contracts.
        type TokenBalances: TokenBalances<Self::AccountId, Self::ContractId>;

        /// Derives the custody account holding undistributed revenue.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Receives the team share on every payout flush.
        #[pallet::constant]
        type TeamAccount: Get<Self::AccountId>;

        /// Receives the donation share on every payout flush.
        #[pallet::constant]
        type DonationAccount: Get<Self::AccountId>;

        /// Collection ceiling, calibration batch included.
        #[pallet::constant]
        type MaxSupply: Get<u32>;

        /// Team and donation shares are flushed when `token_id % PayoutInterval == 0`.
        #[pallet::constant]
        type PayoutInterval: Get<u32>;

        /// Capacity of the whitelisting registry (active entries).
        #[pallet::constant]
        type MaxWhitelistEntries: Get<u32>;

        /// Rows accepted per `extend_percentile_table` call.
        #[pallet::constant]
        type MaxTableChunk: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Sale settings and collection counters.
    #[pallet::storage]
    #[pallet::getter(fn settings)]
    pub type Settings<T> = StorageValue<_, SaleSettings, ValueQuery>;

    /// Every whitelisting entry ever added, tombstones included.
    #[pallet::storage]
    #[pallet::getter(fn whitelisting)]
    pub type Whitelist<T: Config> = StorageMap<
        _,
        Twox64Concat,
        EntryId,
        BeneficiaryEntry<T::AccountId, T::ContractId>,
        OptionQuery,
    >;

    /// Ids of the active entries, ascending.
    #[pallet::storage]
    #[pallet::getter(fn active_entries)]
    pub type ActiveEntries<T: Config> =
        StorageValue<_, BoundedVec<EntryId, T::MaxWhitelistEntries>, ValueQuery>;

    /// Minted records by token id.
    #[pallet::storage]
    #[pallet::getter(fn token)]
    pub type Tokens<T: Config> =
        StorageMap<_, Twox64Concat, TokenId, MintRecord<T::AccountId>, OptionQuery>;

    /// Token id held by each account that minted.
    #[pallet::storage]
    #[pallet::getter(fn minted_by)]
    pub type MintedBy<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, TokenId, OptionQuery>;

    /// Team, donation and reserve accounting of the custody account.
    #[pallet::storage]
    #[pallet::getter(fn bal)]
    pub type Revenue<T> = StorageValue<_, RevenueLedger, ValueQuery>;

    /// How participant mints obtain their category.
    #[pallet::storage]
    #[pallet::getter(fn resolution_mode)]
    pub type Resolution<T> = StorageValue<_, ResolutionMode, ValueQuery>;

    /// Precomputed percentile dataset keyed by participant sequence.
    #[pallet::storage]
    #[pallet::getter(fn percentile_row)]
    pub type PercentileTable<T> = StorageMap<_, Twox64Concat, u32, PercentileEntry, OptionQuery>;

    /// Number of participant (non-calibration) mints so far.
    #[pallet::storage]
    #[pallet::getter(fn participant_mints)]
    pub type ParticipantMints<T> = StorageValue<_, u32, ValueQuery>;

    /// Root of the contribution rank index.
    #[pallet::storage]
    pub type RankRoot<T> = StorageValue<_, NodeId, OptionQuery>;

    /// Number of contributions in the rank index.
    #[pallet::storage]
    pub type RankLen<T> = StorageValue<_, u32, ValueQuery>;

    /// Nodes of the contribution rank index, keyed by insertion sequence.
    #[pallet::storage]
    pub type RankNodes<T> = StorageMap<_, Twox64Concat, NodeId, RankNode<Balance>, OptionQuery>;

    /// Prefix of every token URI.
    #[pallet::storage]
    #[pallet::getter(fn base_uri)]
    pub type BaseUri<T> = StorageValue<_, BoundedVec<u8, ConstU32<MAX_URI_LEN>>, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// A record was minted to `who` for `contribution`
        Minted { who: T::AccountId, token_id: TokenId, contribution: Balance },
        /// Permanent metadata path of a minted record
        PermanentUri { path: BoundedVec<u8, ConstU32<MAX_PATH_LEN>>, token_id: TokenId },
        /// The calibration batch was minted to the team account
        InitialBatchMinted { first_token_id: TokenId, count: u32 },
        PublicSaleStatusChanged { enabled: bool },
        FeeSettingsChanged { free_minting: bool, perc_fee: u32, min_fee: Balance },
        /// A community token contract was whitelisted
        WhitelistingAdded { id: EntryId, wallet: T::AccountId, perc_royal: u8 },
        /// A whitelisting entry was tombstoned
        WhitelistingRemoved { id: EntryId },
        /// Accrued royalties were pulled by the entry wallet
        RoyaltyTransferred { id: EntryId, wallet: T::AccountId, amount: Balance },
        /// Pending team and donation shares were flushed
        PayoutSettled { token_id: TokenId, team: Balance, donation: Balance },
        ReserveWithdrawn { dest: T::AccountId, amount: Balance },
        BaseUriChanged,
        PercentileTableExtended { added: u32 },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller is not eligible in the current sale phase.
        Lock,
        /// Contribution is below the required fee.
        InsufficientFunds,
        /// Caller already holds a record.
        OnlyOneNft,
        /// The collection ceiling is reached.
        TotalSupplyReached,
        /// The calibration batch was already minted.
        OnlyOnce,
        /// A zero fee divisor requires free minting.
        DivideByZero,
        /// Active royalties would exceed the cap.
        FeeTooHigh,
        /// No active whitelisting entry under this id.
        LcNotFound,
        /// Caller is not the wallet of the entry.
        NoCommunityWallet,
        /// The id belongs to an active entry.
        EntryAlreadyActive,
        /// The registry is full.
        TooManyEntries,
        /// The tombstoned entry still holds royalties.
        UnclaimedRoyalty,
        /// No percentile row for the next participant.
        PercentileTableExhausted,
        /// Category outside `1..=MAX_CATEGORY`.
        InvalidCategory,
        /// The rank index references a missing node.
        CorruptRankIndex,
        Overflow,
        UriTooLong,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::PayoutInterval::get() > 0, "PayoutInterval must be non-zero");
            assert!(
                T::MaxSupply::get() >= INITIAL_BATCH_SIZE,
                "MaxSupply must hold the calibration batch"
            );
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Mint the caller's single record, paying `contribution` into custody.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(origin: OriginFor<T>, contribution: Balance) -> DispatchResult {
            let who = ensure_signed(origin)?;
            with_storage_layer(|| Self::do_mint(who, contribution))
        }

        /// Mint the 30-record calibration batch to the team account. Runs once.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::init_mint())]
        pub fn init_mint(origin: OriginFor<T>) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            let mut settings = Settings::<T>::get();
            ensure!(!settings.init_mint_done, Error::<T>::OnlyOnce);
            let total = settings
                .total_supply
                .checked_add(INITIAL_BATCH_SIZE)
                .ok_or(Error::<T>::Overflow)?;
            ensure!(total <= T::MaxSupply::get(), Error::<T>::TotalSupplyReached);

            let owner = T::TeamAccount::get();
            let first_token_id = settings.total_supply + 1;
            for (offset, category) in INITIAL_BATCH_CATEGORIES.iter().copied().enumerate() {
                let token_id = first_token_id + offset as u32;
                Tokens::<T>::insert(token_id, MintRecord { token_id, owner: owner.clone(), category });
                Self::deposit_minted(owner.clone(), token_id, 0, category)?;
            }
            MintedBy::<T>::mutate(&owner, |minted| {
                minted.get_or_insert(first_token_id);
            });

            settings.total_supply = total;
            settings.init_mint_done = true;
            Settings::<T>::put(settings);

            log::info!(
                target: LOG_TARGET,
                "calibration batch minted as tokens {}..={}",
                first_token_id,
                total,
            );
            Self::deposit_event(Event::InitialBatchMinted {
                first_token_id,
                count: INITIAL_BATCH_SIZE,
            });
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::change_public_sale_status())]
        pub fn change_public_sale_status(origin: OriginFor<T>, enabled: bool) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            Settings::<T>::mutate(|settings| settings.public_sale = enabled);
            log::info!(target: LOG_TARGET, "public sale {}", if enabled { "opened" } else { "closed" });
            Self::deposit_event(Event::PublicSaleStatusChanged { enabled });
            Ok(())
        }

        /// Replace the fee rule. `perc_fee` divides the caller's balance.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::change_fee_settings())]
        pub fn change_fee_settings(
            origin: OriginFor<T>,
            free_minting: bool,
            perc_fee: u32,
            min_fee: Balance,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            Self::ensure_fee_settings(free_minting, perc_fee)?;

            Settings::<T>::mutate(|settings| {
                settings.free_minting = free_minting;
                settings.perc_fee = perc_fee;
                settings.min_fee = min_fee;
            });
            log::info!(
                target: LOG_TARGET,
                "fee settings: free_minting={} perc_fee={} min_fee={}",
                free_minting,
                perc_fee,
                min_fee,
            );
            Self::deposit_event(Event::FeeSettingsChanged { free_minting, perc_fee, min_fee });
            Ok(())
        }

        /// Register a community token contract whose holders qualify during the
        /// private sale.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::add_whitelisting())]
        #[allow(clippy::too_many_arguments)]
        pub fn add_whitelisting(
            origin: OriginFor<T>,
            id: EntryId,
            kind: TokenKind,
            token_contract: T::ContractId,
            wallet: T::AccountId,
            max_supply: u32,
            min_balance: u128,
            perc_royal: u8,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            Self::do_add_whitelisting(
                id,
                kind,
                token_contract,
                wallet.clone(),
                max_supply,
                min_balance,
                perc_royal,
            )?;
            Self::deposit_event(Event::WhitelistingAdded { id, wallet, perc_royal });
            Ok(())
        }

        /// Tombstone an entry. Its royalty budget is released, its collected
        /// balance stays withdrawable.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::remove_whitelisting())]
        pub fn remove_whitelisting(origin: OriginFor<T>, id: EntryId) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            Self::do_remove_whitelisting(id)?;
            Self::deposit_event(Event::WhitelistingRemoved { id });
            Ok(())
        }

        /// Pull the royalties accrued by entry `id` to its wallet.
        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::transfer_royalty())]
        pub fn transfer_royalty(origin: OriginFor<T>, id: EntryId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            with_storage_layer(|| Self::do_transfer_royalty(who, id))
        }

        /// Sweep the custody reserve to `dest`.
        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::withdraw_reserve())]
        pub fn withdraw_reserve(origin: OriginFor<T>, dest: T::AccountId) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            with_storage_layer(|| Self::do_withdraw_reserve(dest))
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::set_base_uri())]
        pub fn set_base_uri(origin: OriginFor<T>, uri: Vec<u8>) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            let uri: BoundedVec<u8, ConstU32<MAX_URI_LEN>> =
                uri.try_into().map_err(|_| Error::<T>::UriTooLong)?;
            BaseUri::<T>::put(uri);
            Self::deposit_event(Event::BaseUriChanged);
            Ok(())
        }

        /// Upload a chunk of the percentile dataset. Rows overwrite by sequence index.
        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::extend_percentile_table(entries.len() as u32))]
        pub fn extend_percentile_table(
            origin: OriginFor<T>,
            entries: BoundedVec<PercentileEntry, T::MaxTableChunk>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;
            for entry in entries.iter() {
                ensure!(
                    is_valid_category(entry.category) && is_valid_category(entry.category_v2),
                    Error::<T>::InvalidCategory
                );
            }

            let added = entries.len() as u32;
            for entry in entries {
                PercentileTable::<T>::insert(entry.sequence_index, entry);
            }
            log::info!(target: LOG_TARGET, "percentile table extended by {} rows", added);
            Self::deposit_event(Event::PercentileTableExtended { added });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    pub struct GenesisConfig<T: Config> {
        /// Open the public sale at chain start
        pub public_sale: bool,
        /// Start with free minting
        pub free_minting: bool,
        /// Fee divisor of the caller's balance (100 = 1 %)
        pub perc_fee: u32,
        /// Fee floor
        pub min_fee: Balance,
        /// Category resolution mode, fixed for the lifetime of the chain
        pub resolution_mode: ResolutionMode,
        /// Percentile dataset for table mode
        pub percentile_table: Vec<PercentileEntry>,
        /// Token URI prefix
        pub base_uri: Vec<u8>,
        #[serde(skip)]
        pub _config: core::marker::PhantomData<T>,
    }

    impl<T: Config> Default for GenesisConfig<T> {
        fn default() -> Self {
            Self {
                public_sale: false,
                free_minting: false,
                perc_fee: 100,
                min_fee: 0,
                resolution_mode: ResolutionMode::Live,
                percentile_table: Vec::new(),
                base_uri: Vec::new(),
                _config: Default::default(),
            }
        }
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            assert!(
                self.perc_fee > 0 || self.free_minting,
                "perc_fee of zero requires free minting"
            );
            Settings::<T>::put(SaleSettings {
                public_sale: self.public_sale,
                free_minting: self.free_minting,
                perc_fee: self.perc_fee,
                min_fee: self.min_fee,
                ..Default::default()
            });
            Resolution::<T>::put(self.resolution_mode);

            for entry in &self.percentile_table {
                assert!(
                    is_valid_category(entry.category) && is_valid_category(entry.category_v2),
                    "Percentile table category out of range"
                );
                PercentileTable::<T>::insert(entry.sequence_index, entry);
            }

            let base_uri: BoundedVec<u8, ConstU32<MAX_URI_LEN>> =
                self.base_uri.clone().try_into().expect("Base URI too long (max 128 bytes)");
            BaseUri::<T>::put(base_uri);

            // Custody must exist before the first transfer out of it.
            let custody = Pallet::<T>::account_id();
            let minimum = T::Currency::minimum_balance();
            if T::Currency::balance(&custody) < minimum {
                T::Currency::mint_into(&custody, minimum)
                    .expect("Custody account could not be funded");
            }
        }
    }
}

pub(crate) fn is_valid_category(category: Category) -> bool {
    (1..=MAX_CATEGORY).contains(&category)
}

impl<T: Config> Pallet<T> {
    fn do_mint(who: T::AccountId, contribution: Balance) -> DispatchResult {
        // Checks
        ensure!(!MintedBy::<T>::contains_key(&who), Error::<T>::OnlyOneNft);
        let matched = Self::ensure_eligible(&who)?;
        ensure!(contribution >= Self::required_fee(&who)?, Error::<T>::InsufficientFunds);
        let mut settings = Settings::<T>::get();
        ensure!(settings.total_supply < T::MaxSupply::get(), Error::<T>::TotalSupplyReached);

        // Effects
        let token_id = settings.total_supply + 1;
        let category = Self::resolve_category(contribution)?;
        settings.total_supply = token_id;
        Settings::<T>::put(settings);
        Tokens::<T>::insert(token_id, MintRecord { token_id, owner: who.clone(), category });
        MintedBy::<T>::insert(&who, token_id);
        Self::accrue(contribution, matched)?;

        log::debug!(
            target: LOG_TARGET,
            "token {} minted for {:?}: contribution {} category {} via entry {:?}",
            token_id,
            who,
            contribution,
            category,
            matched,
        );

        // Interactions
        if contribution > 0 {
            T::Currency::transfer(&who, &Self::account_id(), contribution, Preservation::Preserve)?;
        }
        Self::settle_payouts(token_id)?;

        Self::deposit_minted(who, token_id, contribution, category)
    }

    fn deposit_minted(
        who: T::AccountId,
        token_id: TokenId,
        contribution: Balance,
        category: Category,
    ) -> DispatchResult {
        let path: BoundedVec<u8, ConstU32<MAX_PATH_LEN>> = Self::permanent_path(category, token_id)
            .try_into()
            .map_err(|_| Error::<T>::UriTooLong)?;
        Self::deposit_event(Event::Minted { who, token_id, contribution });
        Self::deposit_event(Event::PermanentUri { path, token_id });
        Ok(())
    }

    /// Verify the pallet's cross-storage invariants.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
        let settings = Settings::<T>::get();
        ensure!(
            settings.perc_fee > 0 || settings.free_minting,
            "zero fee divisor without free minting"
        );
        ensure!(settings.total_supply <= T::MaxSupply::get(), "supply above ceiling");

        let calibration = if settings.init_mint_done { INITIAL_BATCH_SIZE } else { 0 };
        let participants = ParticipantMints::<T>::get();
        ensure!(
            settings.total_supply == participants + calibration,
            "supply does not match mints"
        );
        ensure!(
            Tokens::<T>::iter_keys().count() as u32 == settings.total_supply,
            "record count does not match supply"
        );
        if Resolution::<T>::get() == ResolutionMode::Live {
            ensure!(RankLen::<T>::get() == participants, "rank index size does not match mints");
        }

        let active = ActiveEntries::<T>::get();
        ensure!(active.windows(2).all(|w| w[0] < w[1]), "active ids not strictly ascending");
        ensure!(active.len() as u32 == settings.num_contracts, "num_contracts out of sync");

        let mut royalty: u32 = 0;
        let mut collected: Balance = 0;
        for entry in Whitelist::<T>::iter_values() {
            ensure!(entry.active == active.contains(&entry.id), "active flag out of sync");
            ensure!(entry.tracker <= entry.max_supply, "tracker above entry supply");
            if entry.active {
                royalty += entry.perc_royal as u32;
            }
            collected = collected.saturating_add(entry.collected_balance);
        }
        ensure!(royalty <= MAX_TOTAL_ROYALTY as u32, "active royalties above cap");

        let ledger = Revenue::<T>::get();
        let owed = collected
            .saturating_add(ledger.team_pending)
            .saturating_add(ledger.donation_pending)
            .saturating_add(ledger.reserve);
        ensure!(T::Currency::balance(&Self::account_id()) >= owed, "custody cannot cover obligations");
        Ok(())
    }
}

use crate as pallet_rank_mint;
use crate::{PercentileEntry, ResolutionMode, TokenBalances};
use core::cell::RefCell;
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64},
    PalletId,
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage, DispatchError,
};
use std::collections::BTreeMap;

type Block = frame_system::mocking::MockBlock<Test>;

pub const UNIT: u128 = 1_000_000_000_000_000_000;
/// Fee floor of the test sale: 0.02 UNIT.
pub const MIN_FEE: u128 = 2 * UNIT / 100;

pub const ADMIN: u64 = 1;
/// Holds 10 UNIT; every other participant holds 1 UNIT.
pub const WHALE: u64 = 50;
pub const TEAM: u64 = 100;
pub const DONATION: u64 = 101;
/// Unfunded community wallets.
pub const COMMUNITY_WALLET: u64 = 200;
pub const OTHER_COMMUNITY_WALLET: u64 = 201;

pub const FUNGIBLE_TOKEN: u64 = 500;
pub const NFT_TOKEN: u64 = 501;
pub const MULTI_TOKEN: u64 = 502;
/// Balance queries against this contract fail.
pub const UNREACHABLE_TOKEN: u64 = 666;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Balances: pallet_balances,
        RankMint: pallet_rank_mint,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type BlockHashCount = ConstU64<250>;
    type AccountData = pallet_balances::AccountData<u128>;
    type SystemWeightInfo = ();
    type MaxConsumers = ConstU32<16>;
}

parameter_types! {
    pub static ExistentialDeposit: u128 = 1;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
    type Balance = u128;
    type ExistentialDeposit = ExistentialDeposit;
    type AccountStore = System;
}

parameter_types! {
    pub const AdminAccount: u64 = ADMIN;
    pub const TeamAccount: u64 = TEAM;
    pub const DonationAccount: u64 = DONATION;
    pub const RankMintPalletId: PalletId = PalletId(*b"py/rnkmt");
}

pub struct EnsureAdmin;
impl frame_support::traits::EnsureOrigin<RuntimeOrigin> for EnsureAdmin {
    type Success = u64;

    fn try_origin(o: RuntimeOrigin) -> Result<Self::Success, RuntimeOrigin> {
        match o.clone().into() {
            Ok(frame_system::RawOrigin::Signed(account)) if account == AdminAccount::get() => {
                Ok(account)
            },
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<RuntimeOrigin, ()> {
        Ok(RuntimeOrigin::signed(AdminAccount::get()))
    }
}

thread_local! {
    static TOKEN_HOLDINGS: RefCell<BTreeMap<(u64, u64, Option<u128>), u128>> =
        RefCell::new(BTreeMap::new());
}

/// In-memory community token contracts.
pub struct MockTokens;

impl MockTokens {
    pub fn set_balance(contract: u64, who: u64, amount: u128) {
        TOKEN_HOLDINGS.with(|h| h.borrow_mut().insert((contract, who, None), amount));
    }

    pub fn set_class_balance(contract: u64, who: u64, class: u128, amount: u128) {
        TOKEN_HOLDINGS.with(|h| h.borrow_mut().insert((contract, who, Some(class)), amount));
    }

    fn get(contract: u64, who: u64, class: Option<u128>) -> Result<u128, DispatchError> {
        if contract == UNREACHABLE_TOKEN {
            return Err(DispatchError::Other("token contract unreachable"))
        }
        Ok(TOKEN_HOLDINGS.with(|h| h.borrow().get(&(contract, who, class)).copied().unwrap_or(0)))
    }

    fn reset() {
        TOKEN_HOLDINGS.with(|h| h.borrow_mut().clear());
    }
}

impl TokenBalances<u64, u64> for MockTokens {
    fn balance_of(contract: &u64, who: &u64) -> Result<u128, DispatchError> {
        Self::get(*contract, *who, None)
    }

    fn balance_of_class(contract: &u64, who: &u64, id: u128) -> Result<u128, DispatchError> {
        Self::get(*contract, *who, Some(id))
    }
}

impl pallet_rank_mint::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AdminOrigin = EnsureAdmin;
    type Currency = Balances;
    type ContractId = u64;
    type TokenBalances = MockTokens;
    type PalletId = RankMintPalletId;
    type TeamAccount = TeamAccount;
    type DonationAccount = DonationAccount;
    type MaxSupply = ConstU32<100>;
    type PayoutInterval = ConstU32<50>;
    type MaxWhitelistEntries = ConstU32<4>;
    type MaxTableChunk = ConstU32<64>;
    type WeightInfo = ();
}

pub fn default_genesis() -> pallet_rank_mint::GenesisConfig<Test> {
    pallet_rank_mint::GenesisConfig::<Test> {
        public_sale: false,
        free_minting: false,
        perc_fee: 100,
        min_fee: MIN_FEE,
        resolution_mode: ResolutionMode::Live,
        percentile_table: vec![],
        base_uri: b"ipfs://rank/".to_vec(),
        _config: Default::default(),
    }
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
    build_ext(default_genesis())
}

/// Externalities resolving categories from `table`.
pub fn new_table_ext(table: Vec<PercentileEntry>) -> sp_io::TestExternalities {
    build_ext(pallet_rank_mint::GenesisConfig::<Test> {
        resolution_mode: ResolutionMode::Table,
        percentile_table: table,
        ..default_genesis()
    })
}

pub fn build_ext(genesis: pallet_rank_mint::GenesisConfig<Test>) -> sp_io::TestExternalities {
    ExistentialDeposit::set(1);
    MockTokens::reset();

    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    let mut balances: Vec<(u64, u128)> = (1..=40).map(|who| (who, UNIT)).collect();
    balances.push((WHALE, 10 * UNIT));
    pallet_balances::GenesisConfig::<Test> { balances, ..Default::default() }
        .assimilate_storage(&mut t)
        .unwrap();

    genesis.assimilate_storage(&mut t).unwrap();

    let mut ext: sp_io::TestExternalities = t.into();
    ext.execute_with(|| System::set_block_number(1));
    ext
}

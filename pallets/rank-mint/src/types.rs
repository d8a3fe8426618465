//! Storage and call types shared by the pallet modules.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use sp_runtime::RuntimeDebug;
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Native value unit that contributions, fees and payouts are denominated in.
pub type Balance = u128;

/// Sequential identifier of a minted record (1-based).
pub type TokenId = u32;

/// Output attribute bucket assigned to a record (`1..=MAX_CATEGORY`).
pub type Category = u8;

/// Identifier of a whitelisting entry, chosen by the admin.
pub type EntryId = u32;

/// Highest category bucket.
pub const MAX_CATEGORY: Category = 11;

/// Upper bound on the summed `perc_royal` of all active whitelisting entries.
pub const MAX_TOTAL_ROYALTY: u8 = 20;

/// Share of every contribution owed to the team account, in percent.
pub const TEAM_SHARE: u8 = 50;

/// Share of every contribution owed to the donation account, in percent.
pub const DONATION_SHARE: u8 = 30;

/// Hardcoded categories of the one-time calibration batch, in mint order.
pub const INITIAL_BATCH_CATEGORIES: [Category; 30] = [
    11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 1, 2, 3, 4, 5, 6, 7, 8,
    9, 10,
];

/// Number of records minted by `init_mint`.
pub const INITIAL_BATCH_SIZE: u32 = INITIAL_BATCH_CATEGORIES.len() as u32;

/// Mutable sale configuration plus the collection counters.
///
/// Invariant: `perc_fee == 0` implies `free_minting`.
#[derive(
    Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen, Default,
)]
pub struct SaleSettings {
    /// Anyone may mint once this is set (subject to the fee).
    pub public_sale: bool,
    /// Minting requires no payment; overrides every other gate.
    pub free_minting: bool,
    /// Divisor applied to the caller's balance: `100` asks for 1 %.
    pub perc_fee: u32,
    /// Floor of the required fee.
    pub min_fee: Balance,
    /// Number of active whitelisting entries.
    pub num_contracts: u32,
    /// Whether the calibration batch has been minted.
    pub init_mint_done: bool,
    /// Records minted so far, calibration batch included.
    pub total_supply: u32,
}

/// Phase of the sale, derived from [`SaleSettings`] and the registry.
#[derive(Clone, Copy, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum SalePhase {
    /// No public sale and no whitelisting entry to qualify through.
    Locked,
    /// Only holders qualifying through an active whitelisting entry may mint.
    PrivateSale,
    /// Anyone may mint by paying the required fee.
    PublicSale,
    /// Anyone may mint without paying.
    FreeSale,
}

/// Balance interface exposed by an external community token contract.
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub enum TokenKind {
    /// Queried with `balance_of(who)`.
    Fungible,
    /// Queried with `balance_of(who)`; the amount is the number of items held.
    NonFungible,
    /// Queried with `balance_of(who, id)` for a single token class.
    Multi { id: u128 },
}

/// Community beneficiary registered through `add_whitelisting`.
///
/// Entries are never compacted: removal flips `active` and keeps the record so
/// the id stays resolvable and `collected_balance` stays withdrawable.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct BeneficiaryEntry<AccountId, ContractId> {
    pub id: EntryId,
    pub kind: TokenKind,
    pub token_contract: ContractId,
    /// Only account allowed to pull `collected_balance`.
    pub wallet: AccountId,
    /// Maximum number of mints this entry may qualify.
    pub max_supply: u32,
    /// Token balance a holder needs to qualify.
    pub min_balance: u128,
    /// Royalty share of every mint qualified through this entry, in percent.
    pub perc_royal: u8,
    /// Mints qualified so far.
    pub tracker: u32,
    /// Accrued royalties not yet pulled by `wallet`.
    pub collected_balance: Balance,
    pub active: bool,
}

impl<AccountId, ContractId> BeneficiaryEntry<AccountId, ContractId> {
    pub fn has_capacity(&self) -> bool {
        self.tracker < self.max_supply
    }
}

/// One minted record. Immutable after creation.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct MintRecord<AccountId> {
    pub token_id: TokenId,
    pub owner: AccountId,
    pub category: Category,
}

/// Custody accounting of the revenue split.
#[derive(
    Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen, Default,
)]
pub struct RevenueLedger {
    /// Team share awaiting the next payout flush.
    pub team_pending: Balance,
    /// Donation share awaiting the next payout flush.
    pub donation_pending: Balance,
    /// Team share transferred so far.
    pub team_paid: Balance,
    /// Donation share transferred so far.
    pub donation_paid: Balance,
    /// Unallocated part of the community budget plus rounding remainders.
    pub reserve: Balance,
}

/// How a participant mint obtains its category.
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
    Default,
    Serialize,
    Deserialize,
)]
pub enum ResolutionMode {
    /// Rank the contribution against every contribution inserted so far.
    #[default]
    Live,
    /// Look the category up in the precomputed percentile dataset.
    Table,
}

/// One row of the precomputed percentile dataset.
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    Eq,
    PartialEq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
    Serialize,
    Deserialize,
)]
pub struct PercentileEntry {
    /// 0-based participant mint sequence this row applies to.
    pub sequence_index: u32,
    /// Contribution the row was computed for.
    pub balance: Balance,
    /// First-revision category.
    pub category: Category,
    /// Current-revision category; the one the resolver assigns.
    pub category_v2: Category,
}

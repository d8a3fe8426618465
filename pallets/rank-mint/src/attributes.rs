//! Category assignment for participant mints and the permanent metadata paths
//! derived from it.

use alloc::{format, vec::Vec};
use sp_runtime::DispatchError;

use crate::{
    order_statistics::{ContributionIndex, IndexError, StorageNodes},
    pallet::{BaseUri, Config, Error, Pallet, ParticipantMints, PercentileTable, Resolution, Tokens},
    types::{Balance, Category, ResolutionMode, TokenId},
    LOG_TARGET,
};

/// Lowest percentile of each category, category `n` at index `n - 1`.
pub const PERCENTILE_FLOORS: [u32; 11] = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 99];

/// Category of the contribution at 0-based `rank` among `len` contributions.
pub fn category_for_rank(rank: u32, len: u32) -> Category {
    if len == 0 {
        return 1
    }
    let percentile = (rank as u64 * 100 / len as u64) as u32;
    let bucket = PERCENTILE_FLOORS.iter().rposition(|floor| percentile >= *floor).unwrap_or(0);
    bucket as Category + 1
}

impl<T: Config> Pallet<T> {
    /// Assign the category of the next participant mint and advance the
    /// participant sequence.
    pub(crate) fn resolve_category(contribution: Balance) -> Result<Category, DispatchError> {
        let sequence = ParticipantMints::<T>::get();
        let category = match Resolution::<T>::get() {
            ResolutionMode::Table =>
                PercentileTable::<T>::get(sequence)
                    .ok_or(Error::<T>::PercentileTableExhausted)?
                    .category_v2,
            ResolutionMode::Live => {
                let mut index = ContributionIndex::<T>::new(StorageNodes::default());
                let rank = index.insert(contribution).map_err(Self::index_error)?;
                category_for_rank(rank, index.len())
            },
        };
        ParticipantMints::<T>::put(sequence.checked_add(1).ok_or(Error::<T>::Overflow)?);

        log::debug!(
            target: LOG_TARGET,
            "participant {} resolved to category {}",
            sequence,
            category,
        );
        Ok(category)
    }

    /// Contribution at 0-based `rank` in ascending order.
    pub fn contribution_at_rank(rank: u32) -> Result<Option<Balance>, DispatchError> {
        ContributionIndex::<T>::new(StorageNodes::default())
            .select(rank)
            .map_err(Self::index_error)
    }

    /// `{category}_{tokenId}.json`
    pub fn permanent_path(category: Category, token_id: TokenId) -> Vec<u8> {
        format!("{}_{}.json", category, token_id).into_bytes()
    }

    /// Base URI followed by the permanent path of `token_id`.
    pub fn token_uri(token_id: TokenId) -> Option<Vec<u8>> {
        let record = Tokens::<T>::get(token_id)?;
        let mut uri = BaseUri::<T>::get().into_inner();
        uri.extend(Self::permanent_path(record.category, token_id));
        Some(uri)
    }

    fn index_error(err: IndexError) -> DispatchError {
        log::error!(target: LOG_TARGET, "rank index failure: {:?}", err);
        match err {
            IndexError::MissingNode(_) => Error::<T>::CorruptRankIndex.into(),
            IndexError::Full => Error::<T>::Overflow.into(),
        }
    }
}

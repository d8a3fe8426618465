//! Whitelisting registry: capped set of community token contracts whose holders
//! qualify during the private sale.

use frame_support::{dispatch::DispatchResult, ensure};
use sp_runtime::DispatchError;

use crate::{
    pallet::{ActiveEntries, Config, Error, Pallet, Settings, Whitelist},
    traits::TokenBalances,
    types::{BeneficiaryEntry, EntryId, TokenKind, MAX_TOTAL_ROYALTY},
    LOG_TARGET,
};

pub type EntryOf<T> =
    BeneficiaryEntry<<T as frame_system::Config>::AccountId, <T as Config>::ContractId>;

impl<T: Config> Pallet<T> {
    /// Active entry `id`.
    pub fn get_list_contract(id: EntryId) -> Result<EntryOf<T>, DispatchError> {
        Whitelist::<T>::get(id)
            .filter(|entry| entry.active)
            .ok_or_else(|| Error::<T>::LcNotFound.into())
    }

    /// Balance `who` holds of the token contract behind active entry `id`.
    pub fn query_balance(id: EntryId, who: &T::AccountId) -> Result<u128, DispatchError> {
        let entry = Self::get_list_contract(id)?;
        Self::holder_balance(&entry, who)
    }

    pub(crate) fn holder_balance(
        entry: &EntryOf<T>,
        who: &T::AccountId,
    ) -> Result<u128, DispatchError> {
        match entry.kind {
            TokenKind::Fungible | TokenKind::NonFungible =>
                T::TokenBalances::balance_of(&entry.token_contract, who),
            TokenKind::Multi { id } =>
                T::TokenBalances::balance_of_class(&entry.token_contract, who, id),
        }
    }

    /// Summed `perc_royal` of the active entries.
    pub fn active_royalty() -> u32 {
        ActiveEntries::<T>::get()
            .iter()
            .filter_map(|id| Whitelist::<T>::get(id))
            .map(|entry| entry.perc_royal as u32)
            .sum()
    }

    /// First active entry, in ascending id order, that `who` qualifies through.
    pub(crate) fn qualifying_entry(who: &T::AccountId) -> Result<Option<EntryOf<T>>, DispatchError> {
        for id in ActiveEntries::<T>::get() {
            let Some(entry) = Whitelist::<T>::get(id) else { continue };
            if !entry.has_capacity() {
                continue;
            }
            if Self::holder_balance(&entry, who)? >= entry.min_balance {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn do_add_whitelisting(
        id: EntryId,
        kind: TokenKind,
        token_contract: T::ContractId,
        wallet: T::AccountId,
        max_supply: u32,
        min_balance: u128,
        perc_royal: u8,
    ) -> DispatchResult {
        if let Some(previous) = Whitelist::<T>::get(id) {
            ensure!(!previous.active, Error::<T>::EntryAlreadyActive);
            ensure!(previous.collected_balance == 0, Error::<T>::UnclaimedRoyalty);
        }
        ensure!(
            Self::active_royalty() + perc_royal as u32 <= MAX_TOTAL_ROYALTY as u32,
            Error::<T>::FeeTooHigh
        );

        let mut active = ActiveEntries::<T>::get();
        let slot = active.binary_search(&id).unwrap_or_else(|slot| slot);
        active.try_insert(slot, id).map_err(|_| Error::<T>::TooManyEntries)?;

        Whitelist::<T>::insert(
            id,
            BeneficiaryEntry {
                id,
                kind,
                token_contract,
                wallet,
                max_supply,
                min_balance,
                perc_royal,
                tracker: 0,
                collected_balance: 0,
                active: true,
            },
        );
        ActiveEntries::<T>::put(active);
        Settings::<T>::mutate(|settings| settings.num_contracts += 1);

        log::info!(target: LOG_TARGET, "whitelisting {} added with royalty {}%", id, perc_royal);
        Ok(())
    }

    pub(crate) fn do_remove_whitelisting(id: EntryId) -> DispatchResult {
        let mut entry = Self::get_list_contract(id)?;
        entry.active = false;
        Whitelist::<T>::insert(id, entry);
        ActiveEntries::<T>::mutate(|active| active.retain(|active_id| *active_id != id));
        Settings::<T>::mutate(|settings| {
            settings.num_contracts = settings.num_contracts.saturating_sub(1)
        });

        log::info!(target: LOG_TARGET, "whitelisting {} removed", id);
        Ok(())
    }
}

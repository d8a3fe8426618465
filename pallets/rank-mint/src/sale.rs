//! Sale phase machine, eligibility policy and fee rule.

use frame_support::{dispatch::DispatchResult, ensure, traits::fungible::Inspect};
use sp_runtime::DispatchError;

use crate::{
    pallet::{ActiveEntries, Config, Error, Pallet, Settings, Whitelist},
    types::{Balance, EntryId, SalePhase},
    LOG_TARGET,
};

impl<T: Config> Pallet<T> {
    pub fn sale_phase() -> SalePhase {
        let settings = Settings::<T>::get();
        if settings.free_minting {
            SalePhase::FreeSale
        } else if settings.public_sale {
            SalePhase::PublicSale
        } else if !ActiveEntries::<T>::get().is_empty() {
            SalePhase::PrivateSale
        } else {
            SalePhase::Locked
        }
    }

    /// Fee `who` must offer right now: `max(min_fee, balance / perc_fee)`, or
    /// zero under free minting.
    pub fn required_fee(who: &T::AccountId) -> Result<Balance, DispatchError> {
        let settings = Settings::<T>::get();
        if settings.free_minting {
            return Ok(0)
        }
        let share = T::Currency::balance(who)
            .checked_div(settings.perc_fee as Balance)
            .ok_or(Error::<T>::DivideByZero)?;
        Ok(share.max(settings.min_fee))
    }

    /// Whether `who` could pass the eligibility gate. Does not consume capacity.
    pub fn is_eligible(who: &T::AccountId) -> Result<bool, DispatchError> {
        match Self::sale_phase() {
            SalePhase::FreeSale | SalePhase::PublicSale => Ok(true),
            SalePhase::PrivateSale => Ok(Self::qualifying_entry(who)?.is_some()),
            SalePhase::Locked => Ok(false),
        }
    }

    /// Pass the eligibility gate, charging one unit of capacity to the matched
    /// entry during the private sale. Returns that entry.
    pub(crate) fn ensure_eligible(who: &T::AccountId) -> Result<Option<EntryId>, DispatchError> {
        match Self::sale_phase() {
            SalePhase::FreeSale | SalePhase::PublicSale => Ok(None),
            SalePhase::Locked => Err(Error::<T>::Lock.into()),
            SalePhase::PrivateSale => {
                let mut entry = Self::qualifying_entry(who)?.ok_or(Error::<T>::Lock)?;
                entry.tracker += 1;
                let id = entry.id;
                log::debug!(
                    target: LOG_TARGET,
                    "{:?} qualified through whitelisting {} ({}/{})",
                    who,
                    id,
                    entry.tracker,
                    entry.max_supply,
                );
                Whitelist::<T>::insert(id, entry);
                Ok(Some(id))
            },
        }
    }

    pub(crate) fn ensure_fee_settings(free_minting: bool, perc_fee: u32) -> DispatchResult {
        ensure!(perc_fee > 0 || free_minting, Error::<T>::DivideByZero);
        Ok(())
    }
}

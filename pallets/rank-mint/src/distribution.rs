//! Revenue split, royalty accrual and payouts out of the custody account.
//!
//! Every contribution is carved into shares of the full amount:
//!
//! | share     | amount                   | settlement                          |
//! |-----------|--------------------------|-------------------------------------|
//! | community | `v * perc_royal / 100`   | pulled by the entry wallet          |
//! | team      | `v * 50 / 100`           | pushed every `PayoutInterval` mints |
//! | donation  | `v * 30 / 100`           | pushed every `PayoutInterval` mints |
//! | reserve   | remainder                | swept by the admin                  |

use frame_support::{
    dispatch::DispatchResult,
    ensure,
    traits::{
        fungible::Mutate,
        tokens::Preservation,
        Get,
    },
};
use sp_runtime::{traits::AccountIdConversion, Percent};

use crate::{
    pallet::{Config, Error, Event, Pallet, Revenue, Whitelist},
    types::{Balance, EntryId, TokenId, DONATION_SHARE, TEAM_SHARE},
    LOG_TARGET,
};

/// One contribution divided among its beneficiaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevenueSplit {
    pub community: Balance,
    pub team: Balance,
    pub donation: Balance,
    pub reserve: Balance,
}

impl RevenueSplit {
    pub fn of(value: Balance, perc_royal: u8) -> Self {
        let community = Percent::from_percent(perc_royal).mul_floor(value);
        let team = Percent::from_percent(TEAM_SHARE).mul_floor(value);
        let donation = Percent::from_percent(DONATION_SHARE).mul_floor(value);
        // Shares total at most 100 % because royalties are capped at 20 %.
        let reserve = value - community - team - donation;
        Self { community, team, donation, reserve }
    }
}

impl<T: Config> Pallet<T> {
    /// Custody account of undistributed revenue.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    /// Book `value` into the ledger, crediting `entry` with its royalty.
    pub(crate) fn accrue(value: Balance, entry: Option<EntryId>) -> DispatchResult {
        let royalty_entry = match entry {
            Some(id) => Some(Whitelist::<T>::get(id).ok_or(Error::<T>::LcNotFound)?),
            None => None,
        };
        let split = RevenueSplit::of(value, royalty_entry.as_ref().map_or(0, |e| e.perc_royal));

        if let Some(mut royalty_entry) = royalty_entry {
            royalty_entry.collected_balance = royalty_entry
                .collected_balance
                .checked_add(split.community)
                .ok_or(Error::<T>::Overflow)?;
            Whitelist::<T>::insert(royalty_entry.id, royalty_entry);
        }

        Revenue::<T>::try_mutate(|ledger| -> DispatchResult {
            ledger.team_pending =
                ledger.team_pending.checked_add(split.team).ok_or(Error::<T>::Overflow)?;
            ledger.donation_pending =
                ledger.donation_pending.checked_add(split.donation).ok_or(Error::<T>::Overflow)?;
            ledger.reserve = ledger.reserve.checked_add(split.reserve).ok_or(Error::<T>::Overflow)?;
            Ok(())
        })
    }

    /// Flush pending team and donation shares if `token_id` closes a payout interval.
    pub(crate) fn settle_payouts(token_id: TokenId) -> DispatchResult {
        if token_id % T::PayoutInterval::get() != 0 {
            return Ok(())
        }

        let mut ledger = Revenue::<T>::get();
        let team = core::mem::take(&mut ledger.team_pending);
        let donation = core::mem::take(&mut ledger.donation_pending);
        if team == 0 && donation == 0 {
            return Ok(())
        }
        ledger.team_paid = ledger.team_paid.saturating_add(team);
        ledger.donation_paid = ledger.donation_paid.saturating_add(donation);
        Revenue::<T>::put(ledger);

        Self::pay_out(&T::TeamAccount::get(), team)?;
        Self::pay_out(&T::DonationAccount::get(), donation)?;

        log::debug!(
            target: LOG_TARGET,
            "payout at token {}: team {} donation {}",
            token_id,
            team,
            donation,
        );
        Self::deposit_event(Event::PayoutSettled { token_id, team, donation });
        Ok(())
    }

    pub(crate) fn do_transfer_royalty(who: T::AccountId, id: EntryId) -> DispatchResult {
        let mut entry = Whitelist::<T>::get(id).ok_or(Error::<T>::LcNotFound)?;
        ensure!(entry.wallet == who, Error::<T>::NoCommunityWallet);

        let amount = core::mem::take(&mut entry.collected_balance);
        if amount == 0 {
            return Ok(())
        }
        Whitelist::<T>::insert(id, entry);

        Self::pay_out(&who, amount)?;
        Self::deposit_event(Event::RoyaltyTransferred { id, wallet: who, amount });
        Ok(())
    }

    pub(crate) fn do_withdraw_reserve(dest: T::AccountId) -> DispatchResult {
        let amount = Revenue::<T>::mutate(|ledger| core::mem::take(&mut ledger.reserve));
        if amount == 0 {
            return Ok(())
        }

        Self::pay_out(&dest, amount)?;
        log::info!(target: LOG_TARGET, "reserve of {} withdrawn to {:?}", amount, dest);
        Self::deposit_event(Event::ReserveWithdrawn { dest, amount });
        Ok(())
    }

    fn pay_out(dest: &T::AccountId, amount: Balance) -> DispatchResult {
        if amount == 0 {
            return Ok(())
        }
        T::Currency::transfer(&Self::account_id(), dest, amount, Preservation::Preserve)?;
        Ok(())
    }
}

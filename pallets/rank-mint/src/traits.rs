//! Boundary to external community token contracts.

use sp_runtime::DispatchError;

/// Minimal balance capability of the token contracts a whitelisting entry points at.
///
/// Nothing else of these contracts is ever used. Implementations route to
/// whatever hosts the contracts (a contracts pallet, an assets pallet, a bridge).
pub trait TokenBalances<AccountId, ContractId> {
    /// `balanceOf(who)` of a fungible or non-fungible token contract.
    fn balance_of(contract: &ContractId, who: &AccountId) -> Result<u128, DispatchError>;

    /// `balanceOf(who, id)` of a multi-token contract.
    fn balance_of_class(
        contract: &ContractId,
        who: &AccountId,
        id: u128,
    ) -> Result<u128, DispatchError>;
}

impl<AccountId, ContractId> TokenBalances<AccountId, ContractId> for () {
    fn balance_of(_: &ContractId, _: &AccountId) -> Result<u128, DispatchError> {
        Ok(0)
    }

    fn balance_of_class(_: &ContractId, _: &AccountId, _: u128) -> Result<u128, DispatchError> {
        Ok(0)
    }
}

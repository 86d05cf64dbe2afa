//! Bindings for the project's own token contract.
//!
//! The token is a plain ERC20 extended with a holder registry. The ERC20
//! surface is delegated to [`Erc20Binding`].

use alloy::{
    primitives::{Address, U256},
    sol,
};
use async_trait::async_trait;

use super::{erc20::Erc20Binding, NativeTokenContract, TokenContract};
use crate::{
    error::{AppError, Result},
    ethereum::client::DappProvider,
    types::{format_units, TokenHolder, TransactionOutcome},
};

sol! {
    #[sol(rpc)]
    interface INativeToken {
        function standard() external view returns (string memory);
        function ownerOfContract() external view returns (address);
        function _userId() external view returns (uint256);
        function getTokenHolders() external view returns (address[] memory);
        function getTokenHolderData(address holder) external view returns (
            uint256 tokenId,
            address from,
            address to,
            uint256 totalToken,
            bool tokenHolder
        );
    }
}

/// Decimals of the native token.
const NATIVE_DECIMALS: u8 = 18;

/// Alloy-backed binding for the native token.
#[derive(Clone)]
pub struct NativeTokenBinding {
    erc20: Erc20Binding,
    contract: INativeToken::INativeTokenInstance<DappProvider>,
}

impl NativeTokenBinding {
    pub fn new(address: Address, provider: DappProvider) -> Self {
        Self {
            erc20: Erc20Binding::new(address, provider.clone()),
            contract: INativeToken::new(address, provider),
        }
    }

    fn call_failed(&self, method: &str, err: alloy::contract::Error) -> AppError {
        AppError::ContractCallFailed(format!(
            "{method}() on native token {} failed: {err}",
            self.contract.address()
        ))
    }
}

#[async_trait]
impl TokenContract for NativeTokenBinding {
    fn address(&self) -> Address {
        self.erc20.address()
    }

    async fn name(&self) -> Result<String> {
        self.erc20.name().await
    }

    async fn symbol(&self) -> Result<String> {
        self.erc20.symbol().await
    }

    async fn decimals(&self) -> Result<u8> {
        self.erc20.decimals().await
    }

    async fn total_supply(&self) -> Result<U256> {
        self.erc20.total_supply().await
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.erc20.balance_of(owner).await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionOutcome> {
        self.erc20.approve(spender, amount).await
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TransactionOutcome> {
        self.erc20.transfer(to, amount).await
    }
}

#[async_trait]
impl NativeTokenContract for NativeTokenBinding {
    async fn standard(&self) -> Result<String> {
        self.contract.standard().call().await.map_err(|e| self.call_failed("standard", e))
    }

    async fn owner(&self) -> Result<Address> {
        self.contract
            .ownerOfContract()
            .call()
            .await
            .map_err(|e| self.call_failed("ownerOfContract", e))
    }

    async fn holder_count(&self) -> Result<U256> {
        self.contract._userId().call().await.map_err(|e| self.call_failed("_userId", e))
    }

    async fn token_holders(&self) -> Result<Vec<Address>> {
        self.contract
            .getTokenHolders()
            .call()
            .await
            .map_err(|e| self.call_failed("getTokenHolders", e))
    }

    async fn holder_data(&self, holder: Address) -> Result<TokenHolder> {
        let data = self
            .contract
            .getTokenHolderData(holder)
            .call()
            .await
            .map_err(|e| self.call_failed("getTokenHolderData", e))?;

        let token_id: u64 = data.tokenId.try_into().map_err(|_| {
            AppError::NumericOverflow(format!("holder id {} exceeds u64 range", data.tokenId))
        })?;

        Ok(TokenHolder {
            token_id,
            from: data.from,
            to: data.to,
            total_token: format_units(data.totalToken, NATIVE_DECIMALS),
            is_holder: data.tokenHolder,
        })
    }
}

pub mod chain;
pub mod connector;
pub mod counter;
pub mod dapp;
pub mod eip1193;
pub mod gateway;
pub mod notify;

#[cfg(feature = "yew")]
pub mod yew;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use chain::ChainConfig;
pub use connector::{ConnectionState, WalletConnector};
pub use counter::Counter;
pub use dapp::{BankDapp, DappBuilder};
pub use eip1193::{error::Eip1193Error, Eip1193};
pub use gateway::{BankContract, ContractBinding, ContractGateway, DepositAmount, SavingsBank};
pub use notify::{BrowserAlert, Notifier};

/// Errors surfaced to the user of the bank dApp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DappError {
    #[error("Ethereum wallet not detected")]
    ProviderUnavailable,

    /// A connect, add-chain or switch-chain step was declined or failed
    #[error("{0}")]
    ConnectionRejected(String),

    /// The contract call was rejected, reverted or never confirmed
    #[error("{0}")]
    ContractCallFailed(String),
}

impl DappError {
    /// A wallet that vanished from the page is unavailable; any other wallet
    /// error is wrapped with the text the wallet gave for it.
    pub(crate) fn from_wallet(err: Eip1193Error, wrap: fn(String) -> Self) -> Self {
        match err {
            Eip1193Error::JsNoEthereum => DappError::ProviderUnavailable,
            err => wrap(err.user_message()),
        }
    }
}

/// Notifications emitted by the wallet connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StateChanged(ConnectionState),
    AccountChanged(String),
}

//! Typed access to the deployed savings contract.
//!
//! Every call resolves a fresh handle: the wallet's current account becomes the
//! sender and the handle is bound to the configured contract address. Nothing
//! is cached between calls; all state lives on-chain.

use crate::{eip1193::error::Eip1193Error, DappError};
use async_trait::async_trait;
use ethers::{
    contract::{abigen, ContractCall},
    providers::{JsonRpcClient, Middleware, Provider},
    types::{Address, TransactionReceipt, TxHash, U256, U64},
};
use log::{debug, info};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

abigen!(
    SavingsBank,
    r#"[
        function deposit(uint256 amount) external
        function withdraw() external
        function getInterest(address account) external view returns (uint256)
        function getTotalAmount(address account) external view returns (uint256)
    ]"#
);

/// Remote methods of the savings contract. Mutating calls resolve once the
/// transaction is included.
#[async_trait(?Send)]
pub trait BankContract {
    type Amount: Display;

    async fn deposit(&self, amount: U256) -> Result<(), DappError>;

    async fn withdraw(&self) -> Result<(), DappError>;

    async fn get_interest(&self, account: Address) -> Result<Self::Amount, DappError>;

    async fn get_total_amount(&self, account: Address) -> Result<Self::Amount, DappError>;
}

/// Obtains a signer and binds the contract handle to it.
#[async_trait(?Send)]
pub trait ContractBinding {
    type Handle: BankContract;

    async fn bind(&self) -> Result<Self::Handle, DappError>;
}

#[async_trait(?Send)]
impl<M: Middleware + 'static> BankContract for SavingsBank<M> {
    type Amount = U256;

    async fn deposit(&self, amount: U256) -> Result<(), DappError> {
        confirm(SavingsBank::deposit(self, amount)).await
    }

    async fn withdraw(&self) -> Result<(), DappError> {
        confirm(SavingsBank::withdraw(self)).await
    }

    async fn get_interest(&self, account: Address) -> Result<U256, DappError> {
        SavingsBank::get_interest(self, account).call().await.map_err(failed)
    }

    async fn get_total_amount(&self, account: Address) -> Result<U256, DappError> {
        SavingsBank::get_total_amount(self, account).call().await.map_err(failed)
    }
}

async fn confirm<M: Middleware>(call: ContractCall<M, ()>) -> Result<(), DappError> {
    let pending = call.send().await.map_err(failed)?;
    let tx_hash = *pending;
    info!("Transaction {tx_hash:?} sent, awaiting confirmation");

    let receipt = pending.await.map_err(failed)?;
    check_receipt(tx_hash, receipt)
}

/// A mutating call only succeeds once it is included without reverting.
fn check_receipt(tx_hash: TxHash, receipt: Option<TransactionReceipt>) -> Result<(), DappError> {
    match receipt {
        Some(receipt) if receipt.status == Some(U64::zero()) => {
            Err(failed(format!("transaction {tx_hash:?} reverted")))
        }
        Some(receipt) => {
            info!("Transaction {tx_hash:?} included in block {:?}", receipt.block_number);
            Ok(())
        }
        None => Err(failed(format!("transaction {tx_hash:?} dropped before inclusion"))),
    }
}

/// Binds the contract to the first account of an EIP-1193 wallet.
///
/// The wallet is asked for its accounts on every bind, so a wallet injected
/// after start-up is picked up by the next call.
#[derive(Clone, Debug)]
pub struct InjectedBinding<P> {
    wallet: P,
    contract: Option<Address>,
}

impl<P: JsonRpcClient<Error = Eip1193Error>> InjectedBinding<P> {
    pub fn new(wallet: P, contract: Option<Address>) -> Self {
        Self { wallet, contract }
    }
}

#[async_trait(?Send)]
impl<P: JsonRpcClient<Error = Eip1193Error> + Clone + 'static> ContractBinding for InjectedBinding<P> {
    type Handle = SavingsBank<Provider<P>>;

    async fn bind(&self) -> Result<Self::Handle, DappError> {
        let accounts: Vec<Address> = self
            .wallet
            .request("eth_accounts", ())
            .await
            .map_err(|err| DappError::from_wallet(err, DappError::ContractCallFailed))?;
        let signer = *accounts.first().ok_or_else(|| failed("no account available to sign"))?;

        let contract = self.contract.ok_or_else(|| failed("bank contract address not configured"))?;
        debug!("Binding contract {contract:?} to signer {signer:?}");

        let client = Provider::new(self.wallet.clone()).with_sender(signer);
        Ok(SavingsBank::new(contract, Arc::new(client)))
    }
}

/// Amount typed into the deposit field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositAmount(U256);

impl DepositAmount {
    /// Lenient coercion of the input text, exact for every plain decimal.
    ///
    /// The fraction of `digits.digits` is truncated. Anything else (signs,
    /// exponents, values past `U256::MAX`) reads as zero.
    pub fn coerce(input: &str) -> Self {
        let input = input.trim();
        let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Self::default();
        }
        U256::from_dec_str(whole).map(Self).unwrap_or_default()
    }

    pub fn value(&self) -> U256 {
        self.0
    }
}

impl From<u64> for DepositAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl Display for DepositAmount {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Runs the four contract operations against whatever handle the binding resolves.
#[derive(Clone, Debug)]
pub struct ContractGateway<B> {
    binding: Option<B>,
}

type Amount<B> = <<B as ContractBinding>::Handle as BankContract>::Amount;

impl<B: ContractBinding> ContractGateway<B> {
    /// `None` leaves the gateway without any wallet transport.
    pub fn new(binding: Option<B>) -> Self {
        Self { binding }
    }

    pub fn is_available(&self) -> bool {
        self.binding.is_some()
    }

    async fn contract(&self) -> Result<B::Handle, DappError> {
        let binding = self.binding.as_ref().ok_or(DappError::ProviderUnavailable)?;
        binding.bind().await
    }

    pub async fn deposit(&self, amount: DepositAmount) -> Result<(), DappError> {
        let contract = self.contract().await?;
        debug!("Depositing {amount}");
        contract.deposit(amount.value()).await
    }

    pub async fn withdraw(&self) -> Result<(), DappError> {
        let contract = self.contract().await?;
        debug!("Withdrawing");
        contract.withdraw().await
    }

    pub async fn get_interest(&self, account: &str) -> Result<Amount<B>, DappError> {
        let contract = self.contract().await?;
        contract.get_interest(parse_account(account)?).await
    }

    pub async fn get_total_amount(&self, account: &str) -> Result<Amount<B>, DappError> {
        let contract = self.contract().await?;
        contract.get_total_amount(parse_account(account)?).await
    }
}

fn parse_account(account: &str) -> Result<Address, DappError> {
    account
        .parse::<Address>()
        .map_err(|err| failed(format!("invalid account address {account:?}: {err}")))
}

fn failed(err: impl Display) -> DappError {
    DappError::ContractCallFailed(err.to_string())
}

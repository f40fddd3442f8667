use crate::{
    chain::ChainConfig,
    connector::{ConnectionState, WalletConnector},
    eip1193::{error::Eip1193Error, Eip1193},
    gateway::{ContractBinding, ContractGateway, DepositAmount, InjectedBinding},
    notify::{BrowserAlert, Notifier},
    DappError, Event,
};
use ethers::{providers::JsonRpcClient, types::Address};
use log::{error, info, warn};
use std::{cell::Ref, rc::Rc};

pub struct DappBuilder {
    pub chain: ChainConfig,
    pub contract: Option<Address>,
    listener: Option<Rc<dyn Fn(Event)>>,
}

impl DappBuilder {
    pub fn new() -> Self {
        Self { chain: ChainConfig::base_sepolia(), contract: None, listener: None }
    }

    pub fn chain(&mut self, chain: ChainConfig) -> &mut Self {
        self.chain = chain;
        self
    }

    pub fn rpc_url(&mut self, rpc_url: &str) -> &mut Self {
        self.chain.rpc_urls = vec![rpc_url.to_string()];
        self
    }

    /// Ignored with a warning when the address does not parse.
    pub fn contract_address(&mut self, address: &str) -> &mut Self {
        match address.parse::<Address>() {
            Ok(address) => self.contract = Some(address),
            Err(err) => warn!("Ignoring bank contract address {address:?}: {err}"),
        }
        self
    }

    pub fn listener(&mut self, listener: Rc<dyn Fn(Event)>) -> &mut Self {
        self.listener = Some(listener);
        self
    }

    /// Wires the page's injected wallet to browser alerts.
    ///
    /// `window.ethereum` is looked up on every request, so a wallet that
    /// injects after start-up is still found.
    pub fn build(&self) -> BankDapp<Eip1193, InjectedBinding<Eip1193>> {
        if !Eip1193::is_available() {
            warn!("No injected wallet found yet");
        }
        let wallet = Eip1193::new();
        let binding = InjectedBinding::new(wallet.clone(), self.contract);

        let mut connector = WalletConnector::new(Some(wallet), self.chain.clone());
        if let Some(listener) = &self.listener {
            connector = connector.with_listener(listener.clone());
        }

        BankDapp::new(connector, ContractGateway::new(Some(binding)), Rc::new(BrowserAlert))
    }
}

impl Default for DappBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Button handlers of the bank page.
///
/// Every failure is logged and shown in exactly one alert, then handed back
/// to the caller. Nothing is retried.
pub struct BankDapp<P, B> {
    connector: WalletConnector<P>,
    gateway: ContractGateway<B>,
    notifier: Rc<dyn Notifier>,
}

impl<P: JsonRpcClient<Error = Eip1193Error>, B: ContractBinding> BankDapp<P, B> {
    pub fn new(
        connector: WalletConnector<P>,
        gateway: ContractGateway<B>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self { connector, gateway, notifier }
    }

    pub fn address(&self) -> Ref<'_, String> {
        self.connector.address()
    }

    pub fn state(&self) -> ConnectionState {
        self.connector.state()
    }

    pub fn connect_label(&self) -> String {
        self.connector.label()
    }

    pub async fn connect_wallet(&self) -> Result<String, DappError> {
        match self.connector.connect().await {
            Ok(account) => {
                info!("Connected {account}");
                Ok(account)
            }
            Err(DappError::ProviderUnavailable) => {
                self.notifier.alert("Ethereum wallet not detected. Please install MetaMask.");
                Err(DappError::ProviderUnavailable)
            }
            Err(err) => {
                let reason = err.to_string();
                self.notifier.alert(&format!(
                    "Failed to connect wallet: {}. Please try again.",
                    reason.trim_end_matches('.')
                ));
                Err(err)
            }
        }
    }

    /// Nothing is shown once the deposit is confirmed.
    pub async fn deposit_funds(&self, amount: DepositAmount) -> Result<(), DappError> {
        let result = self.gateway.deposit(amount).await;
        self.report(result, "Deposit failed")
    }

    pub async fn withdraw_funds(&self) -> Result<(), DappError> {
        let result = self.gateway.withdraw().await;
        self.report(result, "Withdraw failed")
    }

    pub async fn get_interest(&self) -> Result<String, DappError> {
        let account = self.address().clone();
        let result = self.gateway.get_interest(&account).await;
        let interest = self.report(result, "Fetching failed")?.to_string();
        self.notifier.alert(&format!("Accumulated Interest: {interest}"));
        Ok(interest)
    }

    pub async fn get_total_amount(&self) -> Result<String, DappError> {
        let account = self.address().clone();
        let result = self.gateway.get_total_amount(&account).await;
        let total = self.report(result, "Fetching failed")?.to_string();
        self.notifier.alert(&format!("Total Amount: {total}"));
        Ok(total)
    }

    fn report<T>(&self, result: Result<T, DappError>, context: &str) -> Result<T, DappError> {
        match result {
            Ok(value) => Ok(value),
            Err(DappError::ProviderUnavailable) => {
                self.notifier.alert("Ethereum wallet not detected.");
                Err(DappError::ProviderUnavailable)
            }
            Err(err) => {
                error!("{context}: {err}");
                self.notifier.alert(&format!("{context}: {err}"));
                Err(err)
            }
        }
    }
}

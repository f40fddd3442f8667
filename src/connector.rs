use crate::{chain::ChainConfig, eip1193::error::Eip1193Error, DappError, Event};
use ethers::providers::JsonRpcClient;
use log::{debug, error};
use serde_json::Value;
use std::{
    cell::{Cell, Ref, RefCell},
    fmt::{Debug, Formatter, Result as FmtResult},
    rc::Rc,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Points the injected wallet at the configured chain and asks for its accounts.
///
/// Lives on the UI thread only. The state cells are never borrowed across an
/// await point, so overlapping connect attempts simply race. Whichever attempt
/// settles last leaves a state consistent with the stored address.
pub struct WalletConnector<P> {
    provider: Option<P>,
    chain: ChainConfig,
    state: Cell<ConnectionState>,
    address: RefCell<String>,
    listener: Option<Rc<dyn Fn(Event)>>,
}

impl<P> Debug for WalletConnector<P> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "WalletConnector on chain {} state: {:?} address: {:?}",
            self.chain.chain_id,
            self.state.get(),
            self.address.borrow()
        )
    }
}

impl<P: JsonRpcClient<Error = Eip1193Error>> WalletConnector<P> {
    pub fn new(provider: Option<P>, chain: ChainConfig) -> Self {
        Self {
            provider,
            chain,
            state: Cell::new(ConnectionState::Disconnected),
            address: RefCell::new(String::new()),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: Rc<dyn Fn(Event)>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Last successfully connected account, empty until the first connect.
    pub fn address(&self) -> Ref<'_, String> {
        self.address.borrow()
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Label of the wallet button.
    pub fn label(&self) -> String {
        connect_label(&self.address())
    }

    /// Adds the chain, requests accounts, then switches to the chain.
    ///
    /// The first failing step aborts the sequence; the address is only
    /// written once all three succeeded. A failed attempt falls back to
    /// `Connected` if an account is known, otherwise to `Disconnected`.
    pub async fn connect(&self) -> Result<String, DappError> {
        let provider = self.provider.as_ref().ok_or(DappError::ProviderUnavailable)?;

        self.set_state(ConnectionState::Connecting);

        match self.handshake(provider).await {
            Ok(account) => {
                *self.address.borrow_mut() = account.clone();
                self.set_state(ConnectionState::Connected);
                self.emit(Event::AccountChanged(account.clone()));
                Ok(account)
            }
            Err(err) => {
                error!("Wallet connection error: {err}");
                let settled = if self.address.borrow().is_empty() {
                    ConnectionState::Disconnected
                } else {
                    ConnectionState::Connected
                };
                self.set_state(settled);
                Err(err)
            }
        }
    }

    async fn handshake(&self, provider: &P) -> Result<String, DappError> {
        debug!("Adding chain {}", self.chain.chain_name);
        provider
            .request::<_, Value>("wallet_addEthereumChain", [&self.chain])
            .await
            .map_err(rejected)?;

        let accounts: Vec<String> =
            provider.request("eth_requestAccounts", ()).await.map_err(rejected)?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| DappError::ConnectionRejected("wallet returned no accounts".to_string()))?;

        debug!("Switching to chain {}", self.chain.hex_chain_id());
        provider
            .request::<_, Value>("wallet_switchEthereumChain", [self.chain.switch_params()])
            .await
            .map_err(rejected)?;

        Ok(account)
    }

    fn set_state(&self, state: ConnectionState) {
        if self.state.replace(state) != state {
            self.emit(Event::StateChanged(state));
        }
    }

    fn emit(&self, event: Event) {
        if let Some(listener) = &self.listener {
            listener(event);
        }
    }
}

pub fn connect_label(address: &str) -> String {
    if address.is_empty() {
        "Connect Wallet".to_string()
    } else {
        format!("Connected: {address}")
    }
}

fn rejected(err: Eip1193Error) -> DappError {
    DappError::from_wallet(err, DappError::ConnectionRejected)
}

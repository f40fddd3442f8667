//! Stand-ins for the wallet, the contract and the alert box.

use crate::{
    eip1193::error::Eip1193Error,
    gateway::{BankContract, ContractBinding},
    notify::Notifier,
    DappError,
};
use async_trait::async_trait;
use ethers::{
    providers::{JsonRpcClient, JsonRpcError},
    types::{Address, U256},
};
use futures::channel::oneshot;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::{
    cell::RefCell,
    collections::VecDeque,
    fmt::Debug,
    rc::Rc,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

/// Wallet that accepts every request, except the methods it was told to reject.
///
/// `eth_requestAccounts` can be held open per call with [`ScriptedWallet::gate`],
/// and the whole wallet can be taken off the page with [`ScriptedWallet::set_absent`].
/// Clones share the script and the call log.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScriptedWallet {
    accounts: Vec<String>,
    rejected: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    gates: Arc<Mutex<VecDeque<oneshot::Receiver<bool>>>>,
    absent: Arc<AtomicBool>,
}

impl ScriptedWallet {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self { accounts: accounts.iter().map(|a| a.to_string()).collect(), ..Default::default() }
    }

    pub fn rejecting(self, method: &str) -> Self {
        self.reject(method);
        self
    }

    pub fn reject(&self, method: &str) {
        self.rejected.lock().unwrap().push(method.to_string());
    }

    /// Holds the next unanswered `eth_requestAccounts` until the sender fires:
    /// `true` approves it, `false` rejects it.
    pub fn gate(&self) -> oneshot::Sender<bool> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().unwrap().push_back(receiver);
        sender
    }

    pub fn set_absent(&self, absent: bool) {
        self.absent.store(absent, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

fn user_rejection() -> Eip1193Error {
    Eip1193Error::JsonRpcError(JsonRpcError {
        code: 4001,
        message: "User rejected the request.".to_string(),
        data: None,
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl JsonRpcClient for ScriptedWallet {
    type Error = Eip1193Error;

    async fn request<T: Debug + Serialize + Send + Sync, R: DeserializeOwned + Send>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, Self::Error> {
        if self.absent.load(Ordering::SeqCst) {
            return Err(Eip1193Error::JsNoEthereum);
        }
        self.calls.lock().unwrap().push((method.to_string(), serde_json::to_value(&params)?));

        let gate = match method {
            "eth_requestAccounts" => self.gates.lock().unwrap().pop_front(),
            _ => None,
        };
        let approved = match gate {
            Some(gate) => gate.await.unwrap_or(false),
            None => true,
        };
        let rejected = !approved || self.rejected.lock().unwrap().iter().any(|m| m == method);
        if rejected {
            return Err(user_rejection());
        }

        let response = match method {
            "eth_requestAccounts" | "eth_accounts" => json!(self.accounts),
            _ => Value::Null,
        };
        Ok(serde_json::from_value(response)?)
    }
}

/// Contract whose answers are fixed up front. Clones share the call log.
#[derive(Clone, Debug)]
pub(crate) struct StubBank {
    pub deposit: Result<(), String>,
    pub withdraw: Result<(), String>,
    pub value: Result<String, String>,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl Default for StubBank {
    fn default() -> Self {
        Self {
            deposit: Ok(()),
            withdraw: Ok(()),
            value: Ok("0".to_string()),
            calls: Rc::default(),
        }
    }
}

impl StubBank {
    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl BankContract for StubBank {
    type Amount = String;

    async fn deposit(&self, amount: U256) -> Result<(), DappError> {
        self.record(format!("deposit({amount})"));
        self.deposit.clone().map_err(DappError::ContractCallFailed)
    }

    async fn withdraw(&self) -> Result<(), DappError> {
        self.record("withdraw()".to_string());
        self.withdraw.clone().map_err(DappError::ContractCallFailed)
    }

    async fn get_interest(&self, account: Address) -> Result<String, DappError> {
        self.record(format!("getInterest({account:?})"));
        self.value.clone().map_err(DappError::ContractCallFailed)
    }

    async fn get_total_amount(&self, account: Address) -> Result<String, DappError> {
        self.record(format!("getTotalAmount({account:?})"));
        self.value.clone().map_err(DappError::ContractCallFailed)
    }
}

/// Hands out the same stub contract on every bind, or fails to find a signer.
#[derive(Clone, Debug, Default)]
pub(crate) struct StubBinding {
    pub bank: StubBank,
    pub no_signer: bool,
}

#[async_trait(?Send)]
impl ContractBinding for StubBinding {
    type Handle = StubBank;

    async fn bind(&self) -> Result<StubBank, DappError> {
        if self.no_signer {
            return Err(DappError::ContractCallFailed("no account available to sign".to_string()));
        }
        Ok(self.bank.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

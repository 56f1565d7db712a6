//! Capability contract of the wallet the page talks to.
//!
//! The browser implementation lives in [`crate::injected`]; unit tests drive the
//! same seam with an in-memory double.

use std::rc::Rc;

use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// `eth_call` / `eth_sendTransaction` payload. Gas and value are left to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `0x1` on success, `0x0` on revert.
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |status| status == U64::from(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<B256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    /// Set when a reorg took the log back out of the chain.
    #[serde(default)]
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub String);

/// Wallet-initiated changes the page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(String),
}

pub type LogHandler = Rc<dyn Fn(RawLog)>;
pub type WalletEventHandler = Rc<dyn Fn(WalletEvent)>;

#[async_trait(?Send)]
pub trait WalletProvider {
    /// Accounts already authorized for this origin (`eth_accounts`). Never prompts.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Prompt the user for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Hex chain identifier as reported by the wallet, e.g. `0x5`.
    async fn chain_id(&self) -> Result<String>;

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes>;

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256>;

    /// Resolves once the transaction has one confirmation.
    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt>;

    async fn subscribe_logs(&self, filter: &LogFilter, handler: LogHandler)
        -> Result<SubscriptionId>;

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()>;

    fn watch_wallet(&self, handler: WalletEventHandler) -> Result<()>;
}

//! In-memory wallet used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use futures::channel::oneshot;

use crate::config::CONTRACT_ADDRESS;
use crate::contract::MyEpicNft;
use crate::error::{Error, Result};
use crate::provider::{
    LogFilter, LogHandler, RawLog, SubscriptionId, TransactionReceipt, TransactionRequest,
    WalletEventHandler, WalletProvider,
};

pub struct MockProvider {
    pub contract: Address,
    pub authorized: RefCell<Vec<Address>>,
    pub grantable: RefCell<Vec<Address>>,
    pub chain: RefCell<String>,
    pub count: Cell<u64>,
    pub prompts: Cell<usize>,
    pub reject_prompt: Cell<bool>,
    pub reject_send: Cell<bool>,
    pub revert_next: Cell<bool>,
    pub sent: RefCell<Vec<TransactionRequest>>,
    pending_mints: RefCell<HashMap<B256, u64>>,
    pub reject_unsubscribe: Cell<bool>,
    hold: RefCell<Option<oneshot::Receiver<()>>>,
    hold_subscribe: RefCell<Option<oneshot::Receiver<()>>>,
    listeners: RefCell<HashMap<SubscriptionId, LogHandler>>,
    next_id: Cell<u64>,
    pub wallet_handlers: RefCell<Vec<WalletEventHandler>>,
}

impl MockProvider {
    /// A wallet on chain `0x5` with `authorized` already granted to the page.
    pub fn goerli(authorized: Vec<Address>) -> Self {
        Self {
            contract: CONTRACT_ADDRESS,
            grantable: RefCell::new(authorized.clone()),
            authorized: RefCell::new(authorized),
            chain: RefCell::new("0x5".to_string()),
            count: Cell::new(0),
            prompts: Cell::new(0),
            reject_prompt: Cell::new(false),
            reject_send: Cell::new(false),
            revert_next: Cell::new(false),
            sent: RefCell::default(),
            pending_mints: RefCell::default(),
            reject_unsubscribe: Cell::new(false),
            hold: RefCell::new(None),
            hold_subscribe: RefCell::new(None),
            listeners: RefCell::default(),
            next_id: Cell::new(0),
            wallet_handlers: RefCell::default(),
        }
    }

    pub fn on_chain(self, chain: &str) -> Self {
        *self.chain.borrow_mut() = chain.to_string();
        self
    }

    pub fn with_count(self, count: u64) -> Self {
        self.count.set(count);
        self
    }

    /// Accounts the interactive prompt hands out when approved.
    pub fn granting(self, accounts: Vec<Address>) -> Self {
        *self.grantable.borrow_mut() = accounts;
        self
    }

    /// Keep the next receipt pending until the returned sender fires.
    pub fn hold_receipt(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.borrow_mut() = Some(rx);
        tx
    }

    /// Keep the next `eth_subscribe` unanswered until the returned sender fires.
    pub fn hold_subscribe(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold_subscribe.borrow_mut() = Some(rx);
        tx
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Push a log to every live subscription.
    pub fn deliver(&self, log: RawLog) {
        let listeners: Vec<LogHandler> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(log.clone());
        }
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.authorized.borrow().clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.prompts.set(self.prompts.get() + 1);
        if self.reject_prompt.get() {
            return Err(Error::Rpc { code: 4001, message: "User rejected the request.".into() });
        }
        let granted = self.grantable.borrow().clone();
        *self.authorized.borrow_mut() = granted.clone();
        Ok(granted)
    }

    async fn chain_id(&self) -> Result<String> {
        Ok(self.chain.borrow().clone())
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        assert_eq!(tx.to, self.contract);
        assert_eq!(tx.data.as_ref(), MyEpicNft::getCurrentTokenIdCall {}.abi_encode().as_slice());
        Ok(U256::from(self.count.get()).abi_encode().into())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256> {
        if self.reject_send.get() {
            return Err(Error::Rpc { code: 4001, message: "User denied transaction signature.".into() });
        }
        self.sent.borrow_mut().push(tx.clone());
        let hash = B256::with_last_byte(self.sent.borrow().len() as u8);
        let token_id = self.count.get();
        self.count.set(token_id + 1);
        self.pending_mints.borrow_mut().insert(hash, token_id);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt> {
        let hold = self.hold.borrow_mut().take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        let token_id = self.pending_mints.borrow_mut().remove(&hash);
        if self.revert_next.replace(false) {
            if token_id.is_some() {
                self.count.set(self.count.get() - 1);
            }
            return Ok(TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(1)),
                status: Some(U64::ZERO),
            });
        }
        let from = self.sent.borrow().last().and_then(|tx| tx.from);
        if let (Some(token_id), Some(from)) = (token_id, from) {
            let event = MyEpicNft::NewEpicNFTMinted { sender: from, tokenId: U256::from(token_id) };
            let data = event.encode_log_data();
            self.deliver(RawLog {
                address: self.contract,
                topics: data.topics().to_vec(),
                data: data.data,
                removed: false,
            });
        }
        Ok(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(1)),
            status: Some(U64::from(1)),
        })
    }

    async fn subscribe_logs(&self, filter: &LogFilter, handler: LogHandler) -> Result<SubscriptionId> {
        assert_eq!(filter.address, self.contract);
        let hold = self.hold_subscribe.borrow_mut().take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        let id = SubscriptionId(format!("0x{:x}", self.next_id.get()));
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().insert(id.clone(), handler);
        Ok(id)
    }

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()> {
        if self.reject_unsubscribe.get() {
            return Err(Error::Rpc { code: -32000, message: "subscription not found".into() });
        }
        self.listeners.borrow_mut().remove(id);
        Ok(())
    }

    fn watch_wallet(&self, handler: WalletEventHandler) -> Result<()> {
        self.wallet_handlers.borrow_mut().push(handler);
        Ok(())
    }
}

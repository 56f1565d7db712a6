//! `window.ethereum` (EIP-1193) behind [`WalletProvider`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise, Reflect};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::Result;
use crate::provider::{
    LogFilter, LogHandler, RawLog, SubscriptionId, TransactionReceipt, TransactionRequest,
    WalletEvent, WalletEventHandler, WalletProvider,
};

type Listener = Closure<dyn FnMut(JsValue)>;

pub struct InjectedProvider {
    ethereum: JsValue,
    poll_interval_ms: i32,
    subscriptions: Rc<RefCell<HashMap<String, LogHandler>>>,
    // Dropping a closure invalidates it on the JS side.
    listeners: RefCell<Vec<Listener>>,
}

impl InjectedProvider {
    /// `None` when no wallet extension injected `window.ethereum`.
    pub fn detect(poll_interval_ms: i32) -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        debug!("we have the ethereum object");
        let provider = Self {
            ethereum,
            poll_interval_ms,
            subscriptions: Rc::default(),
            listeners: RefCell::default(),
        };
        if let Err(err) = provider.route_subscription_messages() {
            warn!("contract events will not be delivered: {err}");
        }
        Some(provider)
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        debug!("{method} {params}");
        let args = JsValue::from_serde(&json!({ "method": method, "params": params }))?;
        let request: Function =
            Reflect::get(&self.ethereum, &JsValue::from_str("request"))?.dyn_into()?;
        let promise: Promise = request.call1(&self.ethereum, &args)?.dyn_into()?;
        let value = JsFuture::from(promise).await?;
        Ok(value.into_serde()?)
    }

    fn on(&self, event: &str, listener: Listener) -> Result<()> {
        let on: Function = Reflect::get(&self.ethereum, &JsValue::from_str("on"))?.dyn_into()?;
        on.call2(&self.ethereum, &JsValue::from_str(event), listener.as_ref())?;
        self.listeners.borrow_mut().push(listener);
        Ok(())
    }

    /// Dispatch `eth_subscription` messages to the handler registered for their id.
    fn route_subscription_messages(&self) -> Result<()> {
        let subscriptions = self.subscriptions.clone();
        let listener = Listener::new(move |message: JsValue| {
            let message: Value = match message.into_serde() {
                Ok(message) => message,
                Err(err) => {
                    warn!("unreadable provider message: {err}");
                    return;
                }
            };
            if message["type"] != "eth_subscription" {
                return;
            }
            let Some(id) = message["data"]["subscription"].as_str() else {
                return;
            };
            let Some(handler) = subscriptions.borrow().get(id).cloned() else {
                debug!("message for unknown subscription {id}");
                return;
            };
            match serde_json::from_value::<RawLog>(message["data"]["result"].clone()) {
                Ok(log) => handler(log),
                Err(err) => warn!("malformed log on {id}: {err}"),
            }
        });
        self.on("message", listener)
    }
}

async fn sleep(ms: i32) -> Result<()> {
    let promise = Promise::new(&mut |resolve, reject| {
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            });
        if let Err(err) = scheduled {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    });
    JsFuture::from(promise).await?;
    Ok(())
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_accounts", json!([])).await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_requestAccounts", json!([])).await
    }

    async fn chain_id(&self) -> Result<String> {
        self.request("eth_chainId", json!([])).await
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        let tx = serde_json::to_value(tx)?;
        self.request("eth_call", json!([tx, "latest"])).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256> {
        let tx = serde_json::to_value(tx)?;
        self.request("eth_sendTransaction", json!([tx])).await
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt> {
        loop {
            let receipt: Option<TransactionReceipt> =
                self.request("eth_getTransactionReceipt", json!([hash])).await?;
            match receipt {
                Some(receipt) if receipt.block_number.is_some() => return Ok(receipt),
                _ => sleep(self.poll_interval_ms).await?,
            }
        }
    }

    async fn subscribe_logs(
        &self,
        filter: &LogFilter,
        handler: LogHandler,
    ) -> Result<SubscriptionId> {
        let filter = serde_json::to_value(filter)?;
        let id: String = self.request("eth_subscribe", json!(["logs", filter])).await?;
        self.subscriptions.borrow_mut().insert(id.clone(), handler);
        Ok(SubscriptionId(id))
    }

    async fn unsubscribe(&self, id: &SubscriptionId) -> Result<()> {
        self.subscriptions.borrow_mut().remove(&id.0);
        let removed: bool = self.request("eth_unsubscribe", json!([id.0])).await?;
        if !removed {
            debug!("subscription {} was already gone", id.0);
        }
        Ok(())
    }

    fn watch_wallet(&self, handler: WalletEventHandler) -> Result<()> {
        let on_accounts = handler.clone();
        self.on(
            "accountsChanged",
            Listener::new(move |accounts: JsValue| match accounts.into_serde() {
                Ok(accounts) => on_accounts(WalletEvent::AccountsChanged(accounts)),
                Err(err) => warn!("unreadable accountsChanged payload: {err}"),
            }),
        )?;
        self.on(
            "chainChanged",
            Listener::new(move |chain: JsValue| match chain.as_string() {
                Some(chain) => handler(WalletEvent::ChainChanged(chain)),
                None => warn!("unreadable chainChanged payload"),
            }),
        )
    }
}

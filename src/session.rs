//! Connect/check cycle and the contract operations behind the page's two buttons.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy_primitives::{Address, B256};
use log::{info, warn};

use crate::config::MintConfig;
use crate::contract::{ContractGateway, MintedToken};
use crate::error::{Error, Result};
use crate::network::check_network;
use crate::provider::{WalletEventHandler, WalletProvider};

/// Outcome of a successful connect or passive check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub account: Address,
    pub chain_id: String,
    pub accepted_network: bool,
}

/// Results of the contract setup run after each connection.
#[derive(Debug)]
pub struct Wiring {
    pub subscribed: Result<()>,
    pub minted: Result<u64>,
}

pub struct MintSession<P: ?Sized> {
    provider: Option<Rc<P>>,
    config: MintConfig,
    gateway: RefCell<Option<Rc<ContractGateway<P>>>>,
    minting: Cell<bool>,
}

impl<P: WalletProvider + ?Sized> MintSession<P> {
    pub fn new(provider: Option<Rc<P>>, config: MintConfig) -> Self {
        Self { provider, config, gateway: RefCell::new(None), minting: Cell::new(false) }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn is_minting(&self) -> bool {
        self.minting.get()
    }

    pub fn signer(&self) -> Option<Address> {
        self.gateway.borrow().as_ref().map(|gateway| gateway.signer())
    }

    /// Adopt an account the wallet already authorized, without prompting.
    ///
    /// `Ok(None)` when there is no wallet or no authorized account. A signer
    /// the wallet no longer authorizes is dropped.
    pub async fn check_existing_connection(&self) -> Result<Option<Connection>> {
        let Some(provider) = self.provider.clone() else {
            warn!("make sure you have MetaMask installed");
            return Ok(None);
        };
        let accounts = provider.accounts().await?;
        let Some(&account) = accounts.first() else {
            info!("no authorized account found");
            self.disconnect().await;
            return Ok(None);
        };
        info!("found an authorized account: {account}");
        self.establish(provider, account).await.map(Some)
    }

    /// Prompt the wallet for account access.
    pub async fn request_connection(&self) -> Result<Connection> {
        let provider = self.provider.clone().ok_or(Error::ProviderMissing)?;
        let accounts = provider.request_accounts().await?;
        let account = *accounts.first().ok_or(Error::NoAccounts)?;
        info!("connected {account}");
        self.establish(provider, account).await
    }

    async fn establish(&self, provider: Rc<P>, account: Address) -> Result<Connection> {
        let network = check_network(&*provider, &self.config.expected_chain_id).await?;
        if !network.accepted {
            warn!(
                "wallet is on chain {}, expected {}",
                network.chain_id, self.config.expected_chain_id
            );
        }
        self.bind_gateway(provider, account, &network.chain_id).await;
        Ok(Connection { account, chain_id: network.chain_id, accepted_network: network.accepted })
    }

    /// Keep the current gateway if it already serves `account` on `chain_id`,
    /// otherwise replace it and detach the old one's listener.
    async fn bind_gateway(&self, provider: Rc<P>, account: Address, chain_id: &str) {
        let current = self.gateway.borrow().clone();
        if current.as_ref().is_some_and(|gateway| gateway.is_bound_to(account, chain_id)) {
            return;
        }
        let gateway = ContractGateway::new(
            provider,
            self.config.contract_address,
            account,
            chain_id.to_string(),
        );
        *self.gateway.borrow_mut() = Some(Rc::new(gateway));
        if let Some(stale) = current {
            info!("rebinding contract to {account} on {chain_id}");
            if let Err(err) = stale.retire().await {
                warn!("failed to detach previous mint listener: {err}");
            }
        }
    }

    /// Forget the current signer and detach its mint listener.
    pub async fn disconnect(&self) {
        let current = self.gateway.borrow_mut().take();
        if let Some(gateway) = current {
            info!("wallet no longer authorizes {}", gateway.signer());
            if let Err(err) = gateway.retire().await {
                warn!("failed to detach mint listener: {err}");
            }
        }
    }

    fn gateway(&self) -> Result<Rc<ContractGateway<P>>> {
        if self.provider.is_none() {
            return Err(Error::ProviderMissing);
        }
        self.gateway.borrow().clone().ok_or(Error::NotConnected)
    }

    pub async fn read_minted_count(&self) -> Result<u64> {
        self.gateway()?.read_minted_count().await
    }

    pub async fn subscribe_mint_events(&self, on_mint: Rc<dyn Fn(MintedToken)>) -> Result<()> {
        self.gateway()?.subscribe_mint_events(on_mint).await
    }

    /// Mint one token. Rejected while another mint is still pending.
    pub async fn submit_mint(&self) -> Result<B256> {
        let gateway = self.gateway()?;
        if self.minting.replace(true) {
            return Err(Error::MintInProgress);
        }
        let _pending = PendingMint(&self.minting);
        let hash = gateway.submit_mint().await?;
        info!("minted, see transaction: {}", self.config.transaction_url(hash));
        Ok(hash)
    }

    /// Attach the mint listener and load the counter.
    pub async fn wire_contract(&self, on_mint: Rc<dyn Fn(MintedToken)>) -> Wiring {
        let subscribed = self.subscribe_mint_events(on_mint).await;
        let minted = self.read_minted_count().await;
        Wiring { subscribed, minted }
    }

    pub fn watch_wallet(&self, handler: WalletEventHandler) -> Result<()> {
        match &self.provider {
            Some(provider) => provider.watch_wallet(handler),
            None => Ok(()),
        }
    }
}

/// Clears the in-progress flag however the mint future ends.
struct PendingMint<'a>(&'a Cell<bool>);

impl Drop for PendingMint<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

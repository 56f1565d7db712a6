use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy_primitives::{Address, B256};
use alloy_sol_types::{sol, SolCall, SolEvent};
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::provider::{LogFilter, RawLog, SubscriptionId, TransactionRequest, WalletProvider};

sol! {
    interface MyEpicNft {
        function makeAnEpicNFT() external;
        function getCurrentTokenId() external view returns (uint256);
        event NewEpicNFTMinted(address sender, uint256 tokenId);
    }
}

/// A decoded `NewEpicNFTMinted` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedToken {
    pub sender: Address,
    pub token_id: u64,
}

/// Binding of the NFT contract to one signer account on one chain.
///
/// Built once per connected session; the session replaces it when the wallet
/// switches account or network.
pub struct ContractGateway<P: ?Sized> {
    provider: Rc<P>,
    address: Address,
    signer: Address,
    chain_id: String,
    subscription: RefCell<Option<SubscriptionId>>,
    retired: Cell<bool>,
}

impl<P: WalletProvider + ?Sized> ContractGateway<P> {
    pub fn new(provider: Rc<P>, address: Address, signer: Address, chain_id: String) -> Self {
        Self {
            provider,
            address,
            signer,
            chain_id,
            subscription: RefCell::new(None),
            retired: Cell::new(false),
        }
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn is_bound_to(&self, signer: Address, chain_id: &str) -> bool {
        self.signer == signer && self.chain_id == chain_id
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    pub fn is_retired(&self) -> bool {
        self.retired.get()
    }

    /// Take the gateway out of service. Its listener is detached now, and any
    /// subscription still in flight is dropped as soon as it lands.
    pub async fn retire(&self) -> Result<()> {
        self.retired.set(true);
        self.unsubscribe().await
    }

    pub async fn read_minted_count(&self) -> Result<u64> {
        let tx = self.request(MyEpicNft::getCurrentTokenIdCall {}.abi_encode(), false);
        let output = self.provider.call(&tx).await?;
        let count = MyEpicNft::getCurrentTokenIdCall::abi_decode_returns(&output)?;
        let count = u64::try_from(count).map_err(|_| Error::CountOverflow(count.to_string()))?;
        debug!("getCurrentTokenId {count}");
        Ok(count)
    }

    /// Send `makeAnEpicNFT()` and wait for its confirmation.
    pub async fn submit_mint(&self) -> Result<B256> {
        let tx = self.request(MyEpicNft::makeAnEpicNFTCall {}.abi_encode(), true);
        info!("opening wallet to pay for gas");
        let hash = self.provider.send_transaction(&tx).await?;
        info!("minting, waiting for {hash}");
        let receipt = self.provider.wait_for_receipt(hash).await?;
        if !receipt.succeeded() {
            return Err(Error::Reverted(hash));
        }
        Ok(receipt.transaction_hash)
    }

    /// Listen for `NewEpicNFTMinted`. A second call on the same gateway is a no-op.
    pub async fn subscribe_mint_events(&self, on_mint: Rc<dyn Fn(MintedToken)>) -> Result<()> {
        if self.is_retired() {
            debug!("gateway for {} is retired, not listening", self.signer);
            return Ok(());
        }
        if self.is_subscribed() {
            debug!("mint listener already attached");
            return Ok(());
        }
        let filter = LogFilter {
            address: self.address,
            topics: vec![MyEpicNft::NewEpicNFTMinted::SIGNATURE_HASH],
        };
        let handler = Rc::new(move |log: RawLog| {
            if log.removed {
                debug!("skipping mint log dropped by a reorg");
                return;
            }
            match decode_minted(&log.topics, &log.data) {
                Ok(token) => {
                    info!("{} minted token {}", token.sender, token.token_id);
                    on_mint(token);
                }
                Err(err) => warn!("ignoring undecodable mint log: {err}"),
            }
        });
        let id = self.provider.subscribe_logs(&filter, handler).await?;
        if self.is_retired() {
            debug!("gateway for {} retired while subscribing", self.signer);
            if let Err(err) = self.provider.unsubscribe(&id).await {
                warn!("failed to detach mint listener of retired gateway: {err}");
            }
            return Ok(());
        }
        // A concurrent call may have won the race while we awaited.
        let stale = self.subscription.borrow_mut().replace(id);
        if let Some(stale) = stale {
            if let Err(err) = self.provider.unsubscribe(&stale).await {
                warn!("failed to detach duplicate mint listener: {err}");
            }
        }
        info!("mint event listener attached");
        Ok(())
    }

    pub async fn unsubscribe(&self) -> Result<()> {
        let id = self.subscription.borrow_mut().take();
        if let Some(id) = id {
            self.provider.unsubscribe(&id).await?;
            debug!("mint event listener detached");
        }
        Ok(())
    }

    fn request(&self, data: Vec<u8>, signed: bool) -> TransactionRequest {
        TransactionRequest {
            from: signed.then_some(self.signer),
            to: self.address,
            data: data.into(),
        }
    }
}

pub fn decode_minted(topics: &[B256], data: &[u8]) -> Result<MintedToken> {
    let event = MyEpicNft::NewEpicNFTMinted::decode_raw_log(topics.iter().copied(), data)?;
    let token_id = u64::try_from(event.tokenId)
        .map_err(|_| Error::CountOverflow(event.tokenId.to_string()))?;
    Ok(MintedToken { sender: event.sender, token_id })
}

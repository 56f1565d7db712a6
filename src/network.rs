use log::info;

use crate::error::Result;
use crate::provider::WalletProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatus {
    pub chain_id: String,
    pub accepted: bool,
}

pub async fn check_network<P: WalletProvider + ?Sized>(
    provider: &P,
    expected: &str,
) -> Result<NetworkStatus> {
    let chain_id = provider.chain_id().await?;
    info!("connected to chain {chain_id}");
    let accepted = chain_id == expected;
    Ok(NetworkStatus { chain_id, accepted })
}

/// Read the wallet's chain id and compare it verbatim with `expected`.
pub async fn is_accepted_network<P: WalletProvider + ?Sized>(
    provider: &P,
    expected: &str,
) -> Result<bool> {
    check_network(provider, expected).await.map(|status| status.accepted)
}

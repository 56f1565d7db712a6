use alloy_primitives::{address, Address};

pub const CONTRACT_ADDRESS: Address = address!("53f42B5BD1Dac8609d4AC92D427611127760558f");
/// Goerli testnet.
pub const EXPECTED_CHAIN_ID: &str = "0x5";
pub const TOTAL_MINT_COUNT: u64 = 50;
pub const TWITTER_HANDLE: &str = "ramirogc21";
pub const RECEIPT_POLL_INTERVAL_MS: i32 = 4_000;

const OPENSEA_ASSETS: &str = "https://testnets.opensea.io/assets";
const EXPLORER_TX: &str = "https://goerli.etherscan.io/tx";

/// Fixed deployment settings of the minting page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintConfig {
    pub contract_address: Address,
    pub expected_chain_id: String,
    pub total_mint_count: u64,
    pub twitter_handle: String,
    pub receipt_poll_interval_ms: i32,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            contract_address: CONTRACT_ADDRESS,
            expected_chain_id: EXPECTED_CHAIN_ID.to_string(),
            total_mint_count: TOTAL_MINT_COUNT,
            twitter_handle: TWITTER_HANDLE.to_string(),
            receipt_poll_interval_ms: RECEIPT_POLL_INTERVAL_MS,
        }
    }
}

impl MintConfig {
    pub fn collection_url(&self) -> String {
        format!("{OPENSEA_ASSETS}/goerli/{}", self.contract_address)
    }

    pub fn token_url(&self, token_id: u64) -> String {
        format!("{OPENSEA_ASSETS}/{}/{token_id}", self.contract_address)
    }

    pub fn transaction_url(&self, hash: impl std::fmt::Display) -> String {
        format!("{EXPLORER_TX}/{hash}")
    }

    pub fn twitter_url(&self) -> String {
        format!("https://twitter.com/{}", self.twitter_handle)
    }
}

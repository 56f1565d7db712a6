use std::fmt;

use alloy_primitives::Address;

use crate::error::Error;
use crate::provider::WalletEvent;
use crate::session::Connection;

/// Everything the page renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub account: Option<Address>,
    pub minted: u64,
    pub wrong_network: bool,
    pub mint_in_progress: bool,
    pub last_error: Option<String>,
}

impl ViewState {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn can_mint(&self) -> bool {
        self.is_connected() && !self.wrong_network && !self.mint_in_progress
    }

    /// Explicit connect click. Returns the notice to show instead of prompting.
    pub fn connect_requested(&self, wallet_present: bool) -> Option<Notice> {
        (!wallet_present).then_some(Notice::InstallWallet)
    }

    /// Adopt a connection. Returns the wrong-network notice when the wallet
    /// is not on `expected_chain_id`.
    pub fn connected(&mut self, connection: &Connection, expected_chain_id: &str) -> Option<Notice> {
        self.account = Some(connection.account);
        self.wrong_network = !connection.accepted_network;
        self.last_error = None;
        self.wrong_network
            .then(|| Notice::WrongNetwork { expected: expected_chain_id.to_string() })
    }

    pub fn disconnected(&mut self) {
        self.account = None;
        self.wrong_network = false;
    }

    /// React to a wallet-side change. An empty account list means the page
    /// lost its authorization.
    pub fn wallet_changed(&mut self, event: &WalletEvent) -> bool {
        match event {
            WalletEvent::AccountsChanged(accounts) if accounts.is_empty() => {
                self.disconnected();
                true
            }
            _ => false,
        }
    }

    pub fn count_loaded(&mut self, minted: u64) {
        self.minted = minted;
    }

    /// Enter the pending state. `false` if a mint is already running.
    pub fn begin_mint(&mut self) -> bool {
        if self.mint_in_progress {
            return false;
        }
        self.mint_in_progress = true;
        self.last_error = None;
        true
    }

    pub fn mint_finished(&mut self) {
        self.mint_in_progress = false;
    }

    /// Record a failure. Everything else stays as it was.
    pub fn failed(&mut self, err: &Error) {
        self.last_error = Some(err.to_string());
    }
}

/// Blocking messages shown with `window.alert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InstallWallet,
    WrongNetwork { expected: String },
    Minted { token_id: u64, url: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallWallet => f.write_str("Get MetaMask!"),
            Self::WrongNetwork { expected } => {
                write!(f, "You are not connected to the Goerli test network (chain {expected})!")
            }
            Self::Minted { token_id, url } => write!(
                f,
                "Hey there! We've minted your NFT #{token_id}. It may be blank right now. \
                 It can take a max of 10 min to show up on OpenSea. Here's the link: <{url}>"
            ),
        }
    }
}

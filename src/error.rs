use alloy_primitives::B256;
use serde::Deserialize;
use wasm_bindgen::JsValue;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no injected wallet found, install MetaMask")]
    ProviderMissing,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error("not connected to a wallet")]
    NotConnected,
    #[error("wallet error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("javascript error: {0}")]
    Js(String),
    #[error("failed to decode contract response: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    #[error("failed to (de)serialize wallet payload: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("minted count {0} does not fit in 64 bits")]
    CountOverflow(String),
    #[error("a mint is already in progress")]
    MintInProgress,
    #[error("transaction {0} reverted")]
    Reverted(B256),
}

/// Shape of EIP-1193 rejections (`{ code, message }`).
#[derive(Deserialize)]
struct ProviderRpcError {
    code: i64,
    message: String,
}

impl Error {
    /// Classify a rejected wallet promise.
    pub fn from_js(value: JsValue) -> Self {
        use gloo_utils::format::JsValueSerdeExt;

        if let Ok(ProviderRpcError { code, message }) = value.into_serde::<ProviderRpcError>() {
            return Self::Rpc { code, message };
        }
        match value.as_string() {
            Some(message) => Self::Js(message),
            None => Self::Js(format!("{value:?}")),
        }
    }

    /// EIP-1193 code 4001: the user dismissed the wallet prompt.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rpc { code: 4001, .. })
    }
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Self::from_js(value)
    }
}

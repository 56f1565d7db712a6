use std::rc::Rc;

use alloy_primitives::B256;
use log::{error, info};
use yew::prelude::*;

use crate::components::{mint_form::MintForm, wallet::WalletConnect};
use crate::config::MintConfig;
use crate::contract::MintedToken;
use crate::error::{Error, Result};
use crate::injected::InjectedProvider;
use crate::provider::WalletEvent;
use crate::session::{Connection, MintSession, Wiring};
use crate::state::{Notice, ViewState};
use crate::utils::alert;

pub struct App {
    session: Rc<MintSession<InjectedProvider>>,
    state: ViewState,
}

pub enum Msg {
    CheckExisting,
    Connect,
    Connected(Connection),
    Wired(Wiring),
    Mint,
    MintFinished(Result<B256>),
    TokenMinted(MintedToken),
    WalletChanged(WalletEvent),
    Failed(Error),
}

impl App {
    fn mint_listener(ctx: &Context<Self>) -> Rc<dyn Fn(MintedToken)> {
        let link = ctx.link().clone();
        Rc::new(move |token: MintedToken| link.send_message(Msg::TokenMinted(token)))
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = MintConfig::default();
        let provider = InjectedProvider::detect(config.receipt_poll_interval_ms).map(Rc::new);
        let session = Rc::new(MintSession::new(provider, config));

        let link = ctx.link().clone();
        let watched = session.watch_wallet(Rc::new(move |event: WalletEvent| {
            link.send_message(Msg::WalletChanged(event))
        }));
        if let Err(err) = watched {
            error!("cannot follow wallet changes: {err}");
        }
        ctx.link().send_message(Msg::CheckExisting);

        Self { session, state: ViewState::default() }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::CheckExisting => {
                let session = self.session.clone();
                let link = ctx.link().clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match session.check_existing_connection().await {
                        Ok(Some(connection)) => link.send_message(Msg::Connected(connection)),
                        Ok(None) => {}
                        Err(err) => link.send_message(Msg::Failed(err)),
                    }
                });
                false
            }
            Msg::Connect => {
                if let Some(notice) = self.state.connect_requested(self.session.has_provider()) {
                    alert(&notice);
                    return false;
                }
                let session = self.session.clone();
                let link = ctx.link().clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match session.request_connection().await {
                        Ok(connection) => link.send_message(Msg::Connected(connection)),
                        Err(err) => link.send_message(Msg::Failed(err)),
                    }
                });
                false
            }
            Msg::Connected(connection) => {
                let expected = &self.session.config().expected_chain_id;
                if let Some(notice) = self.state.connected(&connection, expected) {
                    alert(&notice);
                }

                let session = self.session.clone();
                let link = ctx.link().clone();
                let on_mint = Self::mint_listener(ctx);
                wasm_bindgen_futures::spawn_local(async move {
                    link.send_message(Msg::Wired(session.wire_contract(on_mint).await));
                });
                true
            }
            Msg::Wired(Wiring { subscribed, minted }) => {
                if let Err(err) = subscribed {
                    error!("{err}");
                    self.state.failed(&err);
                }
                match minted {
                    Ok(minted) => self.state.count_loaded(minted),
                    Err(err) => {
                        error!("{err}");
                        self.state.failed(&err);
                    }
                }
                true
            }
            Msg::Mint => {
                if !self.state.begin_mint() {
                    return false;
                }
                let session = self.session.clone();
                let link = ctx.link().clone();
                wasm_bindgen_futures::spawn_local(async move {
                    link.send_message(Msg::MintFinished(session.submit_mint().await));
                });
                true
            }
            Msg::MintFinished(result) => {
                self.state.mint_finished();
                if let Err(err) = result {
                    error!("{err}");
                    self.state.failed(&err);
                }
                true
            }
            Msg::TokenMinted(token) => {
                let url = self.session.config().token_url(token.token_id);
                alert(&Notice::Minted { token_id: token.token_id, url });
                false
            }
            Msg::WalletChanged(event) => {
                info!("wallet changed: {event:?}");
                let rerender = self.state.wallet_changed(&event);
                ctx.link().send_message(Msg::CheckExisting);
                rerender
            }
            Msg::Failed(err) => {
                error!("{err}");
                self.state.failed(&err);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let config = self.session.config();
        let on_connect = ctx.link().callback(|_: ()| Msg::Connect);
        let on_mint = ctx.link().callback(|_: ()| Msg::Mint);

        html! {
            <div class="App">
                <div class="container">
                    if self.state.wrong_network {
                        <div class="top warning">{"Only Goerli network is supported"}</div>
                    }
                    <div class="header-container">
                        <p class="header gradient-text">{"My NFT Collection"}</p>
                        <p class="sub-text">{"Each unique. Each beautiful. Discover your NFT today."}</p>
                        <WalletConnect account={self.state.account} {on_connect} />
                        if self.state.is_connected() {
                            <MintForm
                                minted={self.state.minted}
                                total={config.total_mint_count}
                                loading={self.state.mint_in_progress}
                                disabled={!self.state.can_mint()}
                                {on_mint}
                            />
                        }
                        if let Some(error) = &self.state.last_error {
                            <div class="status-message">{error.clone()}</div>
                        }
                        <br />
                        <a href={config.collection_url()}>
                            <button class="cta-button connect-wallet-button">
                                {"See all collection in OpenSea"}
                            </button>
                        </a>
                    </div>
                    <div class="footer-container">
                        <a
                            class="footer-text"
                            href={config.twitter_url()}
                            target="_blank"
                            rel="noreferrer"
                        >
                            {format!("built by @{}", config.twitter_handle)}
                        </a>
                    </div>
                </div>
            </div>
        }
    }
}

use alloy_primitives::Address;
use yew::prelude::*;

use crate::utils::short_address;

pub struct WalletConnect;

pub enum Msg {
    Connect,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub account: Option<Address>,
    pub on_connect: Callback<()>,
}

impl Component for WalletConnect {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Connect => {
                ctx.props().on_connect.emit(());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::Connect);

        html! {
            <div class="wallet-section">
                if let Some(account) = ctx.props().account {
                    <div class="connected-status">
                        <div class="wallet-address">
                            {format!("Address: {}", short_address(&account.to_string()))}
                        </div>
                    </div>
                } else {
                    <button class="cta-button connect-wallet-button" {onclick}>
                        {"Connect Wallet"}
                    </button>
                }
            </div>
        }
    }
}

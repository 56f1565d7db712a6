use yew::prelude::*;

pub struct MintForm;

pub enum Msg {
    Mint,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub minted: u64,
    pub total: u64,
    pub loading: bool,
    pub disabled: bool,
    pub on_mint: Callback<()>,
}

impl Component for MintForm {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Mint => {
                let props = ctx.props();
                // The button disables only after the next render; drop clicks until then.
                if !props.loading && !props.disabled {
                    props.on_mint.emit(());
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::Mint);

        html! {
            <>
                <p class="sub-text">
                    {format!("{}/{}", props.minted, props.total)}
                </p>
                <div>
                    if props.loading {
                        <div class="btnContainer">
                            <div class="loading"></div>
                        </div>
                    } else {
                        <button
                            class="cta-button connect-wallet-button"
                            disabled={props.disabled}
                            {onclick}
                        >
                            {"Mint NFT"}
                        </button>
                    }
                </div>
            </>
        }
    }
}

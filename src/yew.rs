use crate::{
    connector::connect_label,
    counter::Counter,
    dapp::{BankDapp, DappBuilder},
    eip1193::Eip1193,
    gateway::{DepositAmount, InjectedBinding},
    Event,
};
use log::info;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::{platform::spawn_local, prelude::*};

pub enum CounterAction {
    Increase,
    Decrease,
    Reset,
}

impl Reducible for Counter {
    type Action = CounterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = *self;
        match action {
            CounterAction::Increase => next.increase(),
            CounterAction::Decrease => next.decrease(),
            CounterAction::Reset => next.reset(),
        };
        Rc::new(next)
    }
}

#[derive(Properties, PartialEq)]
pub struct CounterDisplayProps {
    pub count: i64,
}

#[function_component(CounterDisplay)]
pub fn counter_display(props: &CounterDisplayProps) -> Html {
    html! {
        <div class="text-3xl font-bold mt-5">
            <p>{"Current Count: "}<strong>{props.count}</strong></p>
        </div>
    }
}

#[function_component(CounterApp)]
pub fn counter_app() -> Html {
    let counter = use_reducer(Counter::new);

    let initial = counter.count();
    yew_hooks::use_mount(move || info!("Count is now: {initial}"));

    let dispatch = |action: fn() -> CounterAction| {
        let counter = counter.clone();
        Callback::from(move |_: MouseEvent| counter.dispatch(action()))
    };

    html! {
        <div class="min-h-dvh flex flex-col items-center justify-center">
            <h1>{"Rust Counter App"}</h1>
            <CounterDisplay count={counter.count()} />
            <div class="mt-5 flex gap-5 justify-center items-center">
                <button class="px-4 py-2 bg-green-600 rounded-md" onclick={dispatch(|| CounterAction::Increase)}>
                    {"Increase"}
                </button>
                <button class="px-4 py-2 bg-red-600 rounded-md" onclick={dispatch(|| CounterAction::Decrease)}>
                    {"Decrease"}
                </button>
                <button class="px-4 py-2 bg-neutral-600 rounded-md" onclick={dispatch(|| CounterAction::Reset)}>
                    {"Reset"}
                </button>
            </div>
        </div>
    }
}

type InjectedDapp = BankDapp<Eip1193, InjectedBinding<Eip1193>>;

/// Builds the dApp once per mount and mirrors the connected account into `address`.
#[hook]
fn use_bank_dapp(address: UseStateHandle<String>) -> Rc<InjectedDapp> {
    use_memo((), move |_| {
        let mut builder = DappBuilder::new();

        if let Some(rpc_url) = std::option_env!("RPC_URL") {
            builder.rpc_url(rpc_url);
        }
        if let Some(contract) = std::option_env!("BANK_CONTRACT_ADDRESS") {
            builder.contract_address(contract);
        }
        builder.listener(Rc::new(move |event: Event| {
            if let Event::AccountChanged(account) = event {
                address.set(account);
            }
        }));
        builder.build()
    })
}

/// Spawns a handler on the UI loop; its outcome was already alerted.
fn on_click<F, Fut>(dapp: &Rc<InjectedDapp>, handler: F) -> Callback<MouseEvent>
where
    F: Fn(Rc<InjectedDapp>) -> Fut + 'static,
    Fut: std::future::Future<Output = ()> + 'static,
{
    let dapp = dapp.clone();
    Callback::from(move |_: MouseEvent| spawn_local(handler(dapp.clone())))
}

#[function_component(BankApp)]
pub fn bank_app() -> Html {
    let address = use_state(String::new);
    let amount = use_state(DepositAmount::default);
    let dapp = use_bank_dapp(address.clone());

    let on_connect = on_click(&dapp, |dapp| async move {
        _ = dapp.connect_wallet().await;
    });
    let on_deposit = {
        let amount = *amount;
        on_click(&dapp, move |dapp| async move {
            _ = dapp.deposit_funds(amount).await;
        })
    };
    let on_withdraw = on_click(&dapp, |dapp| async move {
        _ = dapp.withdraw_funds().await;
    });
    let on_interest = on_click(&dapp, |dapp| async move {
        _ = dapp.get_interest().await;
    });
    let on_total = on_click(&dapp, |dapp| async move {
        _ = dapp.get_total_amount().await;
    });
    let on_amount = {
        let amount = amount.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            amount.set(DepositAmount::coerce(&input.value()));
        })
    };

    let action = "text-white bg-green-500 text-2xl p-4 rounded-md mb-4 hover:bg-green-600";

    html! {
        <div>
            <div class="min-h-[10dvh] bg-neutral-800 items-center flex justify-between">
                <div class="text-white text-4xl font-bold ml-5">{"Bank dApp"}</div>
                <button
                    onclick={on_connect}
                    class="text-black text-xl p-4 rounded-md bg-white hover:bg-neutral-400 mr-5"
                >
                    {connect_label(&address)}
                </button>
            </div>
            <div class="min-h-[90dvh] bg-neutral-400 flex flex-col items-center justify-center">
                <input
                    type="number"
                    value={amount.to_string()}
                    oninput={on_amount}
                    placeholder="Enter deposit amount"
                    class="p-3 rounded-md border border-gray-300 mb-4 text-xl text-black"
                />
                <button onclick={on_deposit} class="text-white bg-blue-400 text-2xl p-4 rounded-md mb-4 hover:bg-blue-600">
                    {format!("Deposit {}", *amount)}
                </button>
                <button onclick={on_withdraw} class={action}>{"Withdraw"}</button>
                <button onclick={on_interest} class={action}>{"Get Interest"}</button>
                <button onclick={on_total} class={action}>{"Get Total Amount"}</button>
            </div>
        </div>
    }
}

use bank_dapp::yew::BankApp;
use log::Level;

fn main() {
    _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
    yew::Renderer::<BankApp>::new().render();
}

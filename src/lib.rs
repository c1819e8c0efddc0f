pub mod balance_check;
mod env;
mod log;

pub use balance_check::check_wallet_balances;

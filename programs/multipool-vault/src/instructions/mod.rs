pub mod add_vault;
pub mod admin;
pub mod create_position;
pub mod deposit;
pub mod execute_protocol_action;
pub mod finalize_withdraw_request;
pub mod initialize;
pub mod initialize_config;
pub mod manage_pools;
pub mod request_withdraw;
pub mod unstake_queue;
pub mod update_total_lent;
pub mod withdraw;

pub use add_vault::*;
pub use admin::*;
pub use create_position::*;
pub use deposit::*;
pub use execute_protocol_action::*;
pub use finalize_withdraw_request::*;
pub use initialize::*;
pub use initialize_config::*;
pub use manage_pools::*;
pub use request_withdraw::*;
pub use unstake_queue::*;
pub use update_total_lent::*;
pub use withdraw::*;

//! Command implementations.

pub mod check;
pub mod digest;
pub mod models;

pub use self::check::execute_check_server;
pub use self::digest::execute_digest;
pub use self::models::execute_list_models;

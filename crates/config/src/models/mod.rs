pub mod app_config;
pub mod cluster_state;
pub mod server_observability;

pub use app_config::*;
pub use cluster_state::*;
pub use server_observability::*;

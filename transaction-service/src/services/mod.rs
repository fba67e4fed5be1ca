pub mod gateway;
pub mod metrics;
pub mod repository;

pub use gateway::GatewayClient;
pub use metrics::{get_metrics, init_metrics};
pub use repository::TransactionRepository;

pub mod api;
pub mod app;
pub mod fallback;
pub mod storage;
pub mod sync;
pub mod utils;

pub use api::{ApiClient, ChatGateway, GatewayError, SendOutcome};
pub use app::Settings;
pub use fallback::FallbackDataset;
pub use storage::{ChatStore, DataSource};
pub use sync::{SharedEngine, SyncEngine, SyncError};

pub mod aggregate;
pub mod app;
pub mod client;
pub mod errors;
pub mod expansion;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod period;
pub mod state;
pub mod storage;
pub mod ui;
pub mod view;

pub use app::router;
pub use client::{ApiClient, FetchError};
pub use period::{DateInterval, Period};
pub use state::AppState;
pub use storage::{load_data, resolve_data_path, sample_dataset};

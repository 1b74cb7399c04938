pub mod config;
pub mod error;
pub mod project;
pub mod schema;
pub mod store;

pub use config::{CONFIG_FILE, Config};
pub use error::{Result, StoreError};
pub use project::{ProjectStore, default_base_dir};
pub use store::Store;

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::{AppConfig, DEFAULT_RACK_HEIGHT, MAX_HISTORY_DEPTH};
pub use error::RackError;
pub use result::RackResult;
pub use traits::Editable;

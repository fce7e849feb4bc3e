pub mod api;
pub mod models;
pub mod settings;
pub mod store;
pub mod utils;

pub use api::*;
pub use models::*;
pub use settings::Settings;
pub use store::*;
pub use utils::*;

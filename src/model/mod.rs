pub mod config;
pub mod item;
pub mod record;
pub mod session;

pub use config::*;
pub use item::*;
pub use record::*;
pub use session::*;

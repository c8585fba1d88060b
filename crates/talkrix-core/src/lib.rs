pub mod actions;
pub mod builtin_tools;
pub mod config;
pub mod export;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod reducer;
pub mod resource;
pub mod routing;
pub mod session;
pub mod state;
pub mod tour;
pub mod validation;

pub use actions::*;
pub use reducer::*;
pub use state::*;

pub use config::Config;
pub use pagination::Paginator;
pub use resource::Resource;
pub use session::FileStore;
pub use session::KeyValueStore;
pub use session::MemoryStore;
pub use session::SessionStore;

pub mod cli;
pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use cli::Cli;
pub use self::config::{Environment, Settings};
pub use router::create_router;
pub use state::AppState;

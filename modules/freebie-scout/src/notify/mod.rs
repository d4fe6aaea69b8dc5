pub mod backend;
pub mod discord;
pub mod noop;

pub use backend::{NotifyBackend, StartupInfo};
pub use discord::DiscordBackend;
pub use noop::NoopBackend;

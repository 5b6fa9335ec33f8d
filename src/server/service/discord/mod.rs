pub mod channel;

pub use channel::DiscordChannelDirectory;

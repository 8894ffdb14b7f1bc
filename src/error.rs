use poise::serenity_prelude::ChannelId;
use thiserror::Error;

/// Failure kinds a single status tick can hit. Every variant is recovered
/// locally by the loop; none of them terminates it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("discord api error: {0}")]
    Discord(#[from] poise::serenity_prelude::Error),

    #[error("channel {0} does not resolve to a server channel")]
    ChannelNotFound(ChannelId),
}

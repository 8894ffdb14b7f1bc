use crate::{
    config::Config,
    error::Error as StatusError,
    realm::RealmSource,
    status::{self, ChannelSink, StatusLoop},
};
use anyhow::Result;
use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, ChannelId, EditChannel, Http};
use sqlx::MySqlPool;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

struct Data {
    source: RealmSource,
}
type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

pub async fn create_client(
    config: Config,
    pool: MySqlPool,
    shutdown: watch::Receiver<bool>,
) -> Result<serenity::Client> {
    let token = config.discord_token.clone();
    let intents = serenity::GatewayIntents::non_privileged();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![status()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("logged in as {}", ready.user.name);
                let source = RealmSource::new(&config, pool);
                let channel = StatusChannel::new(ctx.http.clone(), config.channel_id);
                let status_loop = StatusLoop::new(source.clone(), channel, config.poll_interval);
                tokio::spawn(status_loop.run(shutdown));
                Ok(Data { source })
            })
        })
        .build();
    let client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;
    Ok(client)
}

/// The Discord channel whose name mirrors the realm status.
pub struct StatusChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl StatusChannel {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl ChannelSink for StatusChannel {
    async fn current_name(&self) -> Result<String, StatusError> {
        let channel = self
            .channel_id
            .to_channel(&self.http)
            .await?
            .guild()
            .ok_or(StatusError::ChannelNotFound(self.channel_id))?;
        Ok(channel.name)
    }

    async fn rename(&self, name: &str) -> Result<(), StatusError> {
        self.channel_id
            .edit(&self.http, EditChannel::new().name(name))
            .await?;
        Ok(())
    }
}

/// Gets the current status of the realm
#[poise::command(prefix_command, slash_command)]
async fn status(ctx: Context<'_>) -> Result<(), Error> {
    info!("status command called by {}", ctx.author().name);
    ctx.defer().await?;
    let status = status::observe(&ctx.data().source).await;
    ctx.say(status::format_name(&status)).await?;
    Ok(())
}

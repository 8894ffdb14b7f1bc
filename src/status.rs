use crate::error::Error;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

/// Snapshot of the realm taken by one tick. Recomputed from scratch every
/// cycle, never carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealmStatus {
    pub reachable: bool,
    pub player_count: i64,
}

impl RealmStatus {
    pub const OFFLINE: RealmStatus = RealmStatus {
        reachable: false,
        player_count: 0,
    };
}

/// Where the loop reads realm state from: a reachability probe plus the
/// online player count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn probe(&self) -> bool;
    async fn player_count(&self) -> Result<i64, Error>;
}

/// The channel whose name mirrors the realm status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelSink: Send + Sync {
    async fn current_name(&self) -> Result<String, Error>;
    async fn rename(&self, name: &str) -> Result<(), Error>;
}

/// Formats the channel display name. Total: every status maps to a string.
pub fn format_name(status: &RealmStatus) -> String {
    if !status.reachable {
        return "Offline".to_string();
    }
    let label = if status.player_count == 1 {
        "Player"
    } else {
        "Players"
    };
    format!("Online — {} {}", status.player_count, label)
}

/// Takes one snapshot of the realm. A failed count query degrades to zero
/// rather than keeping a stale value; the error only reaches the log.
pub async fn observe<S: StatusSource + ?Sized>(source: &S) -> RealmStatus {
    if !source.probe().await {
        return RealmStatus::OFFLINE;
    }
    let player_count = match source.player_count().await {
        Ok(count) => {
            info!("{count} players online");
            count
        }
        Err(e) => {
            error!("player count query failed: {e}");
            0
        }
    };
    RealmStatus {
        reachable: true,
        player_count,
    }
}

pub struct StatusLoop<S, C> {
    source: S,
    channel: C,
    interval: Duration,
}

impl<S: StatusSource, C: ChannelSink> StatusLoop<S, C> {
    pub fn new(source: S, channel: C, interval: Duration) -> Self {
        Self {
            source,
            channel,
            interval,
        }
    }

    /// Runs ticks until the shutdown signal flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("status loop started, polling every {:?}", self.interval);
        loop {
            self.tick().await;
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("status loop stopping");
                    return;
                }
            }
        }
    }

    /// One probe/query/format/update cycle. Every failure is logged and
    /// dropped here; a mismatched name left behind is retried next tick.
    async fn tick(&self) {
        let status = observe(&self.source).await;
        let name = format_name(&status);
        let current = match self.channel.current_name().await {
            Ok(current) => current,
            Err(e) => {
                error!("cannot resolve status channel: {e}");
                return;
            }
        };
        if current != name {
            match self.channel.rename(&name).await {
                Ok(()) => info!("channel renamed to '{name}'"),
                Err(e) => error!("channel rename failed: {e}"),
            }
        }
    }
}

use crate::{config::Config, db, error::Error, status::StatusSource};
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::time::Duration;
use tokio::{net::TcpStream, time::timeout};

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Single TCP handshake against the realm endpoint, dropped as soon as it
/// connects. Refusal, timeout, and resolution errors all count as
/// unreachable; nothing propagates.
pub async fn probe(host: &str, port: u16) -> bool {
    matches!(
        timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

/// Live realm backing the status loop: the TCP endpoint plus the characters
/// database.
#[derive(Clone)]
pub struct RealmSource {
    host: String,
    port: u16,
    pool: MySqlPool,
}

impl RealmSource {
    pub fn new(config: &Config, pool: MySqlPool) -> Self {
        Self {
            host: config.realm_host.clone(),
            port: config.realm_port,
            pool,
        }
    }
}

#[async_trait]
impl StatusSource for RealmSource {
    async fn probe(&self) -> bool {
        probe(&self.host, self.port).await
    }

    async fn player_count(&self) -> Result<i64, Error> {
        db::online_count(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn probe_detects_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(probe("127.0.0.1", port).await);
    }

    #[tokio::test]
    async fn probe_maps_refused_connection_to_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(!probe("127.0.0.1", port).await);
    }

    #[tokio::test]
    async fn probe_timeout_is_not_a_fault() {
        // Non-routable address: either times out or errors immediately,
        // both of which must resolve to false.
        assert!(!probe("10.255.255.1", 9).await);
    }
}

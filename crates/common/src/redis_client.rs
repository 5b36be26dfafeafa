use std::time::Duration;

use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::config::RedisSettings;
use crate::error::AppError;

/// Build a Redis client for the configured server host.
///
/// No connection is made here; the client only holds the address and credentials.
pub fn open_client(settings: &RedisSettings) -> Result<Client, AppError> {
    let port: u16 = settings.port.parse().map_err(|_| {
        AppError::Config(format!(
            "REDIS_SERVER_PORT must be a valid port, got '{}'",
            settings.port
        ))
    })?;

    let info = ConnectionInfo {
        addr: ConnectionAddr::Tcp(settings.server_host.clone(), port),
        redis: RedisConnectionInfo {
            password: settings.password.clone(),
            ..Default::default()
        },
    };

    Ok(Client::open(info)?)
}

/// Open a fresh connection and issue a `PING`, bounded by `timeout`.
pub async fn ping(settings: &RedisSettings, timeout: Duration) -> Result<(), AppError> {
    let client = open_client(settings)?;

    let round_trip = async {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok::<_, redis::RedisError>(())
    };

    match tokio::time::timeout(timeout, round_trip).await {
        Ok(result) => {
            result?;
            tracing::debug!(host = %settings.server_host, "Redis answered PING");
            Ok(())
        }
        Err(_) => Err(AppError::Internal(format!(
            "timed out connecting to {}:{} after {}ms",
            settings.server_host,
            settings.port,
            timeout.as_millis()
        ))),
    }
}

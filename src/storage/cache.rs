//! Redis liveness probe

use anyhow::Context;

use crate::error::AppError;

#[derive(Clone)]
pub struct CacheProbe {
    client: redis::Client,
}

impl CacheProbe {
    /// Parse the URL; connecting is deferred to `ping`
    pub fn open(url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(url)
            .map_err(|e| AppError::Config(format!("cache.url is invalid: {e}")))?;
        Ok(Self { client })
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("redis connect failed")?;
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis ping failed")?;
        anyhow::ensure!(reply == "PONG", "unexpected PING reply: {reply}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(
            CacheProbe::open("not a url"),
            Err(AppError::Config(_))
        ));
    }
}

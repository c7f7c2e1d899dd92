use anyhow::Context;
use tracing::error;

/// Work factor used when `BCRYPT_COST` is not set.
pub const DEFAULT_COST: u32 = 10;

/// Salted bcrypt hashing. Both operations run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let plain = plain.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash_password(&plain, cost))
            .await
            .context("hash task failed")?
    }

    /// `Ok(false)` for a wrong password; `Err` only when `hash` is not a bcrypt string.
    pub async fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
            .await
            .context("verify task failed")?
    }
}

pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
}

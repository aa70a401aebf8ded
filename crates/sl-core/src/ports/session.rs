use async_trait::async_trait;
use tokio::sync::watch;

use crate::auth::AuthSnapshot;

/// Auth/session collaborator.
///
/// Owns the session and profile; navigation reads snapshots and listens for
/// changes but never writes auth state itself.
///
/// 会话提供者。导航层只读取快照并订阅变化。
#[async_trait]
pub trait SessionProviderPort: Send + Sync {
    /// Bootstraps the session (restore token, load profile).
    async fn initialize(&self) -> anyhow::Result<()>;

    fn current(&self) -> AuthSnapshot;

    /// Change notifications. The receiver starts at the current snapshot.
    fn subscribe(&self) -> watch::Receiver<AuthSnapshot>;

    /// Reloads the profile, e.g. after onboarding was submitted.
    async fn refresh_profile(&self) -> anyhow::Result<()>;

    async fn sign_out(&self) -> anyhow::Result<()>;
}

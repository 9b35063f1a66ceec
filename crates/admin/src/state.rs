//! Process-wide console state.

use std::sync::Arc;

use tokio::sync::RwLock;
use vendor_desk_core::types::VendorProfile;

use crate::config::ConsoleConfig;
use crate::editor::EditorSettings;
use crate::error::ConsoleError;
use crate::gateway::VendorApiClient;
use crate::profile::ProfileStore;

/// State shared by every screen: configuration, the API client and the
/// one profile store.
///
/// Screens own their collections; nothing else here is mutable except the
/// profile.
#[derive(Clone)]
pub struct ConsoleState {
    inner: Arc<ConsoleStateInner>,
}

struct ConsoleStateInner {
    config: ConsoleConfig,
    client: VendorApiClient,
    profile: RwLock<ProfileStore>,
}

impl ConsoleState {
    /// Build the API client and load the profile mirror.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError` if the client cannot be built or the profile
    /// file exists but is unreadable.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let client = VendorApiClient::new(&config)?;
        let profile = ProfileStore::load(&config.profile_path)?;
        Ok(Self {
            inner: Arc::new(ConsoleStateInner {
                config,
                client,
                profile: RwLock::new(profile),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &VendorApiClient {
        &self.inner.client
    }

    #[must_use]
    pub fn editor_settings(&self) -> EditorSettings {
        self.inner.config.editor_settings()
    }

    /// Current profile as last loaded or saved.
    pub async fn profile(&self) -> VendorProfile {
        self.inner.profile.read().await.profile().clone()
    }

    /// Push a profile to the backend, then mirror the server's copy locally.
    ///
    /// The local mirror is untouched if the backend refuses.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError` if validation, the remote call, or the local
    /// write fails.
    pub async fn save_profile(&self, profile: VendorProfile) -> Result<VendorProfile, ConsoleError> {
        vendor_desk_core::types::Validate::validate(&profile)?;
        let saved = self.inner.client.update_profile(&profile).await?;
        self.inner.profile.write().await.save(saved.clone())?;
        Ok(saved)
    }

    /// Fetch the profile from the backend and refresh the local mirror.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError` if the remote call or the local write fails.
    pub async fn refresh_profile(&self) -> Result<VendorProfile, ConsoleError> {
        let remote = self.inner.client.get_profile().await?;
        self.inner.profile.write().await.save(remote.clone())?;
        Ok(remote)
    }
}

impl std::fmt::Debug for ConsoleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleState")
            .field("config", &self.inner.config)
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

// Emby adapter - Media library rescan trigger

use async_trait::async_trait;

use crate::config::LibrarySettings;
use crate::domain::errors::*;
use crate::ports::*;

/// Library rescan through the Emby HTTP API
pub struct EmbyRescanAdapter {
    http_client: reqwest::Client,
    settings: LibrarySettings,
}

impl EmbyRescanAdapter {
    pub fn new(settings: LibrarySettings) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| DomainError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn refresh_url(&self) -> String {
        format!(
            "http://{}:{}/Library/Refresh?api_key={}",
            self.settings.emby_server,
            self.settings.emby_port,
            urlencoding::encode(&self.settings.emby_api_key)
        )
    }

    async fn request_refresh(&self) -> Result<(), DomainError> {
        let response = self
            .http_client
            .post(self.refresh_url())
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Network(format!(
                "Emby Library Scan request failed with status code: {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LibraryRescanPort for EmbyRescanAdapter {
    async fn rescan(&self) {
        if !self.settings.emby_refresh {
            tracing::info!("emby_refresh is false. Skipping emby scan.");
            return;
        }
        tracing::info!(server = %self.settings.emby_server, port = self.settings.emby_port, "Sending Emby library scan request");
        match self.request_refresh().await {
            Ok(()) => tracing::info!("Emby Library Scan request successful"),
            Err(e) => tracing::error!(error = %e, "Emby Library Scan request failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_url() {
        let adapter = EmbyRescanAdapter::new(LibrarySettings {
            emby_refresh: true,
            emby_server: "media.local".to_string(),
            emby_port: 8096,
            emby_api_key: "abc123".to_string(),
        })
        .unwrap();
        assert_eq!(
            adapter.refresh_url(),
            "http://media.local:8096/Library/Refresh?api_key=abc123"
        );
    }

    #[tokio::test]
    async fn test_disabled_rescan_is_noop() {
        let adapter = EmbyRescanAdapter::new(LibrarySettings::default()).unwrap();
        adapter.rescan().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_is_swallowed() {
        let adapter = EmbyRescanAdapter::new(LibrarySettings {
            emby_refresh: true,
            emby_server: "127.0.0.1".to_string(),
            emby_port: 9,
            emby_api_key: String::new(),
        })
        .unwrap();
        adapter.rescan().await;
    }
}

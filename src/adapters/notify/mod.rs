// Notification adapter - Best-effort fan-out to push services

use async_trait::async_trait;
use serde_json::json;

use crate::config::NotifySettings;
use crate::domain::errors::*;
use crate::ports::*;

const PUSHBULLET_URL: &str = "https://api.pushbullet.com/v2/pushes";
const IFTTT_URL: &str = "https://maker.ifttt.com/trigger";
const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";
const NTFY_URL: &str = "https://ntfy.sh";

/// One configured push channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationChannel {
    Pushbullet { access_token: String },
    Ifttt { key: String, event: String },
    Pushover { user_key: String, app_key: String },
    /// Full topic URL
    Ntfy { topic_url: String },
}

impl NotificationChannel {
    /// Channels with a non-empty key, in delivery order
    pub fn from_settings(settings: &NotifySettings) -> Vec<NotificationChannel> {
        let mut channels = Vec::new();
        if !settings.pushbullet_key.is_empty() {
            channels.push(NotificationChannel::Pushbullet {
                access_token: settings.pushbullet_key.clone(),
            });
        }
        if !settings.ifttt_key.is_empty() {
            channels.push(NotificationChannel::Ifttt {
                key: settings.ifttt_key.clone(),
                event: settings.ifttt_event.clone(),
            });
        }
        if !settings.pushover_user_key.is_empty() {
            channels.push(NotificationChannel::Pushover {
                user_key: settings.pushover_user_key.clone(),
                app_key: settings.pushover_app_key.clone(),
            });
        }
        let topic = settings.ntfy_topic.trim();
        if !topic.is_empty() {
            let topic_url = if topic.starts_with("http://") || topic.starts_with("https://") {
                topic.to_string()
            } else {
                format!("{}/{}", NTFY_URL, topic)
            };
            channels.push(NotificationChannel::Ntfy { topic_url });
        }
        channels
    }

    pub fn name(&self) -> &'static str {
        match self {
            NotificationChannel::Pushbullet { .. } => "PushBullet",
            NotificationChannel::Ifttt { .. } => "IFTTT",
            NotificationChannel::Pushover { .. } => "PushOver",
            NotificationChannel::Ntfy { .. } => "ntfy",
        }
    }

    fn request(&self, client: &reqwest::Client, title: &str, body: &str) -> reqwest::RequestBuilder {
        match self {
            NotificationChannel::Pushbullet { access_token } => client
                .post(PUSHBULLET_URL)
                .header("Access-Token", access_token)
                .json(&json!({ "type": "note", "title": title, "body": body })),
            NotificationChannel::Ifttt { key, event } => client
                .post(format!("{}/{}/with/key/{}", IFTTT_URL, event, key))
                .json(&json!({ "value1": title, "value2": body })),
            NotificationChannel::Pushover { user_key, app_key } => client.post(PUSHOVER_URL).json(
                &json!({ "token": app_key, "user": user_key, "title": title, "message": body }),
            ),
            NotificationChannel::Ntfy { topic_url } => client
                .post(topic_url)
                .header("Title", title)
                .body(body.to_string()),
        }
    }

    async fn send(&self, client: &reqwest::Client, title: &str, body: &str) -> Result<(), DomainError> {
        let response = self
            .request(client, title, body)
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Network(format!("HTTP {}", status)));
        }
        Ok(())
    }
}

/// Notifier that attempts every configured channel
pub struct PushNotifier {
    http_client: reqwest::Client,
    channels: Vec<NotificationChannel>,
}

impl PushNotifier {
    pub fn new(settings: &NotifySettings) -> Result<Self, DomainError> {
        Self::with_channels(NotificationChannel::from_settings(settings))
    }

    pub fn with_channels(channels: Vec<NotificationChannel>) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| DomainError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            channels,
        })
    }

    pub fn channels(&self) -> &[NotificationChannel] {
        &self.channels
    }
}

#[async_trait]
impl NotifyPort for PushNotifier {
    async fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "Notification");
        for channel in &self.channels {
            if let Err(e) = channel.send(&self.http_client, title, body).await {
                tracing::error!(
                    channel = channel.name(),
                    error = %e,
                    "Failed sending notification. Continuing processing..."
                );
            }
        }
    }
}

//! Announcement endpoints.
//!
//! District leaders publish announcements; everyone signed in can read
//! them. Listing and creation share one path.

use samadhan_report_models::{Announcement, AnnouncementPriority};

use crate::transport::ApiRequest;
use crate::{ApiClient, ApiError};

pub(crate) const ANNOUNCEMENTS_PATH: &str = "/api/announcements/";

/// A new announcement to publish.
#[derive(Debug, Clone)]
pub struct NewAnnouncement<'a> {
    /// Headline.
    pub title: &'a str,
    /// Body text.
    pub description: &'a str,
    /// Priority; defaults to medium in the portal's composer.
    pub priority: AnnouncementPriority,
}

impl ApiClient {
    /// Lists published announcements.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if not signed in or the listing fails.
    pub async fn list_announcements(&self) -> Result<Vec<Announcement>, ApiError> {
        let response = self
            .send_authed(ApiRequest::get(ANNOUNCEMENTS_PATH))
            .await?;
        response.parse()
    }

    /// Publishes an announcement (district leaders only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] if the backend refuses, e.g. a
    /// citizen account attempting to publish.
    pub async fn post_announcement(
        &self,
        announcement: &NewAnnouncement<'_>,
    ) -> Result<Announcement, ApiError> {
        log::info!(
            "Publishing {} priority announcement: {}",
            announcement.priority.as_ref(),
            announcement.title,
        );
        let response = self
            .send_authed(ApiRequest::post_json(
                ANNOUNCEMENTS_PATH,
                serde_json::json!({
                    "title": announcement.title,
                    "description": announcement.description,
                    "priority": announcement.priority,
                }),
            ))
            .await?;
        response.parse()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::test_transport::{ScriptedTransport, signed_in_store};
    use crate::transport::RequestBody;

    #[tokio::test]
    async fn listing_parses_announcements() {
        let transport = Arc::new(ScriptedTransport::new(vec![(
            200,
            json!([{
                "id": 1,
                "title": "Water Supply Alert",
                "description": "No supply tomorrow from 9AM to 2PM",
                "date": "2025-09-12T10:30:00Z",
                "priority": "High",
            }]),
        )]));
        let client = ApiClient::with_transport(transport, signed_in_store("announce-list"));

        let announcements = client.list_announcements().await.unwrap();
        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].title, "Water Supply Alert");
        assert_eq!(announcements[0].priority, AnnouncementPriority::High);
        client.store().clear().unwrap();
    }

    #[tokio::test]
    async fn publishing_sends_portal_wire_priority() {
        let transport = Arc::new(ScriptedTransport::new(vec![(
            201,
            json!({
                "id": 2,
                "title": "Road closure",
                "description": "Main road closed for repairs",
                "date": "2025-09-13T08:00:00Z",
                "priority": "Medium",
            }),
        )]));
        let client = ApiClient::with_transport(transport.clone(), signed_in_store("announce-post"));

        client
            .post_announcement(&NewAnnouncement {
                title: "Road closure",
                description: "Main road closed for repairs",
                priority: AnnouncementPriority::Medium,
            })
            .await
            .unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].path, ANNOUNCEMENTS_PATH);
        match &requests[0].body {
            RequestBody::Json(body) => {
                assert_eq!(body["priority"], "Medium");
                assert_eq!(body["title"], "Road closure");
            }
            other => panic!("unexpected body: {other:?}"),
        }
        drop(requests);
        client.store().clear().unwrap();
    }
}

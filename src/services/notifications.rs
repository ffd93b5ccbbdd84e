use super::Ack;
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::Notification;
use tracing::info;

/// 알림 조회
pub async fn get_notifications(client: &ApiClient) -> Result<Vec<Notification>> {
    info!("{:<12} --> 알림 조회", "Notify");
    client.get("/notifications").await
}

/// 알림 읽음 처리
pub async fn mark_as_read(client: &ApiClient, notification_id: &str) -> Result<()> {
    info!("{:<12} --> 알림 읽음 처리 id: {}", "Notify", notification_id);
    client
        .put_empty::<Ack>(&format!("/notifications/{notification_id}/read"))
        .await
        .map(|_| ())
}

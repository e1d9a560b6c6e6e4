use axum::extract::ws::Message;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, Mutex};

use crate::models::config::DebugConfig;
use crate::models::event::ServerEvent;
use crate::models::room::Room;

/// 接続ごとの送信チャネル。個別通知（役職通知・占い結果）を
/// 他の接続に流さないため、ブロードキャストもこのマップ経由で行う
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<Mutex<HashMap<String, Room>>>,
    pub connections: Arc<Mutex<HashMap<String, ConnectionSender>>>,
    pub debug_config: Arc<DebugConfig>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_debug_config(DebugConfig::default())
    }

    pub fn with_debug_config(debug_config: DebugConfig) -> Self {
        AppState {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            connections: Arc::new(Mutex::new(HashMap::new())),
            debug_config: Arc::new(debug_config),
        }
    }

    pub async fn register_connection(&self, player_id: &str, sender: ConnectionSender) {
        self.connections
            .lock()
            .await
            .insert(player_id.to_string(), sender);
    }

    pub async fn unregister_connection(&self, player_id: &str) {
        self.connections.lock().await.remove(player_id);
    }

    /// 特定のプレイヤーにのみ送信する
    pub async fn send_to(&self, player_id: &str, event: &ServerEvent) {
        let text = envelope(event);
        let connections = self.connections.lock().await;
        if let Some(sender) = connections.get(player_id) {
            if let Err(e) = sender.send(Message::Text(text)) {
                log::warn!("failed to send to player {}: {}", player_id, e);
            }
        }
    }

    /// ルームの参加者全員（ホスト含む）に送信する
    pub async fn broadcast_room(&self, room: &Room, event: &ServerEvent) {
        let text = envelope(event);
        let connections = self.connections.lock().await;

        let mut recipients: Vec<&str> = room.players.iter().map(|p| p.id.as_str()).collect();
        if !recipients.contains(&room.host_id.as_str()) {
            recipients.push(room.host_id.as_str());
        }

        for player_id in recipients {
            if let Some(sender) = connections.get(player_id) {
                if let Err(e) = sender.send(Message::Text(text.clone())) {
                    log::warn!("failed to broadcast to player {}: {}", player_id, e);
                }
            }
        }
    }
}

// 通知に共通のタイムスタンプを付けてJSON文字列にする
fn envelope(event: &ServerEvent) -> String {
    let mut value = serde_json::to_value(event).unwrap_or_default();
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "timestamp".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    value.to_string()
}

use serde::{Deserialize, Serialize};

use super::game::{GamePhase, Winner};
use super::player::Player;
use super::role::Role;

/// クライアントから届く操作。WebSocketのテキストフレームに
/// `type` タグ付きJSONで載ってくる
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientIntent {
    CreateRoom,
    JoinRoom { room_id: String, name: String },
    StartGame { room_id: String },
    NextPhase { room_id: String },
    MafiaVote { room_id: String, target_id: String },
    NurseAction { room_id: String, target_id: String },
    DetectiveAction { room_id: String, target_id: String },
    HostKill { room_id: String, target_id: String },
    HostSkip { room_id: String },
}

/// サーバーからの通知。`message_type` タグ付きJSONで送る
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected {
        player_id: String,
    },
    RoomCreated {
        room_id: String,
    },
    PlayerJoined {
        players: Vec<Player>,
    },
    GameStarted {
        players: Vec<Player>,
        host_id: String,
    },
    // 本人にのみ送る
    RoleAssigned {
        role: Role,
    },
    PhaseChange {
        phase: GamePhase,
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        discussion_seconds: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        victim_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        saved: Option<bool>,
    },
    MafiaActionConfirmed {
        target_id: String,
    },
    NurseActionConfirmed,
    // 探偵にのみ送る
    DetectiveResult {
        target_name: String,
        target_role: Role,
    },
    PlayerKilled {
        player_id: String,
    },
    GameOver {
        winner: Winner,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn phase_change(phase: GamePhase) -> Self {
        ServerEvent::PhaseChange {
            phase,
            round: None,
            discussion_seconds: None,
            victim_id: None,
            saved: None,
        }
    }
}

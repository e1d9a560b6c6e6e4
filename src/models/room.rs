use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::{GamePhase, NightActions, Winner};
use super::player::Player;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub host_id: String,
    pub players: Vec<Player>,
    pub phase: GamePhase,
    // 進行中の夜に提出されたアクション。クライアントに見せる情報ではない
    #[serde(skip_serializing, default)]
    pub night_actions: NightActions,
    pub round: u32,
    pub winner: Option<Winner>,
    pub last_activity: DateTime<Utc>,
}

impl Room {
    pub fn new(room_id: String, host_id: String) -> Self {
        Room {
            room_id,
            host_id,
            players: Vec::new(),
            phase: GamePhase::Lobby,
            night_actions: NightActions::default(),
            round: 1,
            winner: None,
            last_activity: Utc::now(),
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host_id == player_id
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

use serde::{Deserialize, Serialize};

use super::role::Role;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    // 役職は本人への個別通知でのみ知らせる。ブロードキャストやREST応答に
    // 混ざらないようシリアライズ対象から外す
    #[serde(skip_serializing, default)]
    pub role: Option<Role>,
    pub is_alive: bool,
}

impl Player {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            role: None,
            is_alive: true,
        }
    }
}

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::{
    models::{
        event::ServerEvent,
        game::GamePhase,
        player::Player,
        room::Room,
        rule::RULE,
    },
    services::GameError,
    state::AppState,
};

// 読み間違えやすい文字（0/O, 1/I）を除いたルームコード用の文字種
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 6;

fn generate_room_code<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// ルームを作成し、コードを作成者に通知する。
/// コードは稼働中のルームと衝突しなくなるまで引き直す
pub async fn create_room(state: AppState, host_id: &str) -> String {
    let mut rooms = state.rooms.lock().await;

    let room_id = {
        let mut rng = rand::thread_rng();
        loop {
            let code = generate_room_code(&mut rng);
            if !rooms.contains_key(&code) {
                break code;
            }
        }
    };

    let room = Room::new(room_id.clone(), host_id.to_string());
    rooms.insert(room_id.clone(), room);
    drop(rooms);

    log::info!("room {} created by {}", room_id, host_id);
    state
        .send_to(
            host_id,
            &ServerEvent::RoomCreated {
                room_id: room_id.clone(),
            },
        )
        .await;

    room_id
}

/// ロビー中のルームにプレイヤーを追加し、参加者一覧を全員に配信する
pub async fn join_room(
    state: AppState,
    room_id: &str,
    player_id: &str,
    name: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if room.phase != GamePhase::Lobby {
        return Err(GameError::InvalidPhase);
    }
    if room.player(player_id).is_some() {
        return Err(GameError::RuleViolation(
            "既にこのルームに参加しています".to_string(),
        ));
    }

    room.players
        .push(Player::new(player_id.to_string(), name.to_string()));
    room.touch();

    log::info!("player {} ({}) joined room {}", player_id, name, room_id);
    let event = ServerEvent::PlayerJoined {
        players: room.players.clone(),
    };
    let room = room.clone();
    drop(rooms);
    state.broadcast_room(&room, &event).await;

    Ok(())
}

pub async fn get_rooms(state: &AppState) -> HashMap<String, Room> {
    state.rooms.lock().await.clone()
}

pub async fn get_room_info(state: &AppState, room_id: &str) -> Option<Room> {
    state.rooms.lock().await.get(room_id).cloned()
}

pub async fn delete_room(state: AppState, room_id: &str) -> bool {
    let removed = state.rooms.lock().await.remove(room_id).is_some();
    if removed {
        log::info!("room {} deleted", room_id);
    }
    removed
}

/// 放置されたルームと空のルームを回収する。回収した数を返す
pub async fn sweep_idle_rooms(state: &AppState, max_idle: Duration) -> usize {
    let now = Utc::now();
    let mut rooms = state.rooms.lock().await;
    let before = rooms.len();

    rooms.retain(|room_id, room| {
        let idle = (now - room.last_activity)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let keep = idle < max_idle;
        if !keep {
            log::info!("sweeping idle room {} ({} players)", room_id, room.players.len());
        }
        keep
    });

    before - rooms.len()
}

/// 定期的にルームを掃除するバックグラウンドタスクを起動する
pub fn spawn_idle_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            let swept = sweep_idle_rooms(&state, RULE.idle_room_timeout).await;
            if swept > 0 {
                log::info!("idle sweeper removed {} room(s)", swept);
            }
        }
    });
}

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    models::{
        event::ServerEvent,
        game::GamePhase,
        role,
        room::Room,
        rule::RULE,
    },
    services::GameError,
    state::AppState,
};

/// ホストがゲームを開始する。役職を割り当て、夜の導入フェーズへ進める。
/// 役職の割り当てはルームにつき一度だけ（ロビー以外では開始できない）
pub async fn start_game(state: AppState, room_id: &str, sender_id: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if !room.is_host(sender_id) {
        return Err(GameError::Unauthorized);
    }
    if room.phase != GamePhase::Lobby {
        return Err(GameError::InvalidPhase);
    }
    if room.players.len() < RULE.min_players {
        return Err(GameError::RuleViolation(format!(
            "ゲーム開始には{}人以上必要です",
            RULE.min_players
        )));
    }

    let player_ids: Vec<String> = room.players.iter().map(|p| p.id.clone()).collect();
    // デバッグ用シードが指定されていれば決定的なシャッフルになる
    let roles = match state.debug_config.role_seed {
        Some(seed) => role::assign_roles(&player_ids, &mut StdRng::seed_from_u64(seed)),
        None => role::assign_roles(&player_ids, &mut rand::thread_rng()),
    };
    for player in room.players.iter_mut() {
        player.role = roles.get(&player.id).copied();
    }

    room.phase = GamePhase::NightIntro;
    room.touch();
    log::info!(
        "game started in room {} with {} players",
        room_id,
        room.players.len()
    );

    let room = room.clone();
    drop(rooms);

    state
        .broadcast_room(
            &room,
            &ServerEvent::GameStarted {
                players: room.players.clone(),
                host_id: room.host_id.clone(),
            },
        )
        .await;

    // 役職は本人にだけ知らせる
    for player in &room.players {
        if let Some(role) = player.role {
            state
                .send_to(&player.id, &ServerEvent::RoleAssigned { role })
                .await;
        }
    }

    state
        .broadcast_room(
            &room,
            &ServerEvent::PhaseChange {
                phase: GamePhase::NightIntro,
                round: Some(room.round),
                discussion_seconds: None,
                victim_id: None,
                saved: None,
            },
        )
        .await;

    Ok(())
}

/// ホストによるフェーズ送り。夜の役職ターン中は提出されたアクションだけが
/// フェーズを進めるため、ここでは何もしない
pub async fn advance_phase(
    state: AppState,
    room_id: &str,
    sender_id: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if !room.is_host(sender_id) {
        return Err(GameError::Unauthorized);
    }
    // 決着後はフェーズを進めない
    if room.winner.is_some() {
        return Ok(());
    }

    let event = match room.phase {
        GamePhase::Lobby => return Err(GameError::InvalidPhase),
        GamePhase::NightIntro => {
            room.phase = GamePhase::NightMafia;
            ServerEvent::phase_change(GamePhase::NightMafia)
        }
        // アクション待ちのフェーズ。ホスト操作では進まない
        GamePhase::NightMafia | GamePhase::NightNurse | GamePhase::NightDetective => {
            return Ok(());
        }
        GamePhase::NightResult => {
            room.phase = GamePhase::DayDiscussion;
            ServerEvent::PhaseChange {
                phase: GamePhase::DayDiscussion,
                round: None,
                discussion_seconds: Some(RULE.discussion_seconds),
                victim_id: None,
                saved: None,
            }
        }
        GamePhase::DayDiscussion => begin_next_night(room),
    };

    room.touch();
    let room = room.clone();
    drop(rooms);
    state.broadcast_room(&room, &event).await;

    Ok(())
}

/// 昼の議論の結末としてホストが一人を追放する。勝敗が決まらなければ
/// そのまま次の夜に進む
pub async fn host_kill(
    state: AppState,
    room_id: &str,
    sender_id: &str,
    target_id: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if !room.is_host(sender_id) {
        return Err(GameError::Unauthorized);
    }
    if room.winner.is_some() {
        return Ok(());
    }
    if room.phase != GamePhase::DayDiscussion {
        return Err(GameError::InvalidPhase);
    }

    let target = room
        .player_mut(target_id)
        .ok_or_else(|| GameError::RuleViolation("対象プレイヤーが見つかりません".to_string()))?;
    target.is_alive = false;
    room.touch();
    log::info!("host eliminated player {} in room {}", target_id, room_id);

    let killed = ServerEvent::PlayerKilled {
        player_id: target_id.to_string(),
    };

    // 追放の結果で決着したかを確認し、続くなら次の夜へ
    let follow_up = match room.judge_winner() {
        Some(winner) => {
            room.winner = Some(winner);
            ServerEvent::GameOver { winner }
        }
        None => begin_next_night(room),
    };

    let room = room.clone();
    drop(rooms);
    state.broadcast_room(&room, &killed).await;
    state.broadcast_room(&room, &follow_up).await;

    Ok(())
}

/// 追放なしで昼を終えて次の夜へ進む
pub async fn host_skip(state: AppState, room_id: &str, sender_id: &str) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if !room.is_host(sender_id) {
        return Err(GameError::Unauthorized);
    }
    if room.winner.is_some() {
        return Ok(());
    }
    if room.phase != GamePhase::DayDiscussion {
        return Err(GameError::InvalidPhase);
    }

    let event = begin_next_night(room);
    room.touch();
    let room = room.clone();
    drop(rooms);
    state.broadcast_room(&room, &event).await;

    Ok(())
}

// 周回カウントを進め、夜アクションをリセットして夜の導入へ戻る
fn begin_next_night(room: &mut Room) -> ServerEvent {
    room.round += 1;
    room.reset_night_actions();
    room.phase = GamePhase::NightIntro;
    ServerEvent::PhaseChange {
        phase: GamePhase::NightIntro,
        round: Some(room.round),
        discussion_seconds: None,
        victim_id: None,
        saved: None,
    }
}

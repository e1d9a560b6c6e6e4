use crate::{
    models::{event::ServerEvent, game::GamePhase, role::Role},
    services::GameError,
    state::AppState,
};

/// マフィアの襲撃投票。先に処理された一票だけが有効で、同じ夜の
/// 残りの票は（二人目のマフィアのものも含めて）黙って無視する
pub async fn mafia_vote(
    state: AppState,
    room_id: &str,
    sender_id: &str,
    target_id: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if room.phase != GamePhase::NightMafia {
        return Err(GameError::InvalidPhase);
    }
    if !is_alive_with_role(room.player(sender_id).map(|p| (p.is_alive, p.role)), Role::Mafia) {
        return Err(GameError::Unauthorized);
    }

    if !room.register_mafia_vote(target_id) {
        log::debug!(
            "ignoring late mafia vote from {} in room {}",
            sender_id,
            room_id
        );
        return Ok(());
    }
    room.touch();
    drop(rooms);

    state
        .send_to(
            sender_id,
            &ServerEvent::MafiaActionConfirmed {
                target_id: target_id.to_string(),
            },
        )
        .await;

    // ホスト端末の演出が終わるのを待ってから看護師のターンへ
    schedule_phase_after_cue(
        state,
        room_id.to_string(),
        GamePhase::NightMafia,
        GamePhase::NightNurse,
    );

    Ok(())
}

/// 看護師の護衛。自己指定はゲームを通して一度だけ
pub async fn nurse_action(
    state: AppState,
    room_id: &str,
    sender_id: &str,
    target_id: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if room.phase != GamePhase::NightNurse {
        return Err(GameError::InvalidPhase);
    }
    if !is_alive_with_role(room.player(sender_id).map(|p| (p.is_alive, p.role)), Role::Nurse) {
        return Err(GameError::Unauthorized);
    }

    if !room.register_nurse_action(sender_id, target_id) {
        return Err(GameError::RuleViolation(
            "自己治療はゲーム中一度しか使えません".to_string(),
        ));
    }
    room.touch();
    drop(rooms);

    state
        .send_to(sender_id, &ServerEvent::NurseActionConfirmed)
        .await;

    schedule_phase_after_cue(
        state,
        room_id.to_string(),
        GamePhase::NightNurse,
        GamePhase::NightDetective,
    );

    Ok(())
}

/// 探偵の調査。対象の役職を探偵本人にだけ明かし、演出の後に
/// 夜全体の解決へ進む
pub async fn detective_action(
    state: AppState,
    room_id: &str,
    sender_id: &str,
    target_id: &str,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

    if room.phase != GamePhase::NightDetective {
        return Err(GameError::InvalidPhase);
    }
    if !is_alive_with_role(
        room.player(sender_id).map(|p| (p.is_alive, p.role)),
        Role::Detective,
    ) {
        return Err(GameError::Unauthorized);
    }

    let (target_name, target_role) = match room.player(target_id) {
        Some(target) => match target.role {
            Some(role) => (target.name.clone(), role),
            None => return Err(GameError::RuleViolation("役職が未割り当てです".to_string())),
        },
        None => {
            return Err(GameError::RuleViolation(
                "対象プレイヤーが見つかりません".to_string(),
            ))
        }
    };

    room.register_detective_target(target_id);
    room.touch();
    drop(rooms);

    state
        .send_to(
            sender_id,
            &ServerEvent::DetectiveResult {
                target_name,
                target_role,
            },
        )
        .await;

    schedule_night_resolution(state, room_id.to_string());

    Ok(())
}

/// 演出待ちの後に次の夜フェーズへ進める。タイマーはキャンセルされないため、
/// 発火時点でルームの存在とフェーズを検証し直し、合わなければ何もしない
fn schedule_phase_after_cue(
    state: AppState,
    room_id: String,
    expected: GamePhase,
    next: GamePhase,
) {
    let delay = state.debug_config.action_cue();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let mut rooms = state.rooms.lock().await;
        let Some(room) = rooms.get_mut(&room_id) else {
            log::debug!("scheduled transition: room {} is gone", room_id);
            return;
        };
        if room.winner.is_some() || room.phase != expected {
            log::debug!(
                "scheduled transition: room {} moved on (phase {:?})",
                room_id,
                room.phase
            );
            return;
        }

        room.phase = next;
        let room = room.clone();
        drop(rooms);
        state
            .broadcast_room(&room, &ServerEvent::phase_change(next))
            .await;
    });
}

/// 探偵のターンの後、演出を挟んで夜を解決する。犠牲者の確定、
/// 結果のブロードキャスト、勝敗判定までをまとめて行う
fn schedule_night_resolution(state: AppState, room_id: String) {
    let delay = state.debug_config.action_cue();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let mut rooms = state.rooms.lock().await;
        let Some(room) = rooms.get_mut(&room_id) else {
            log::debug!("night resolution: room {} is gone", room_id);
            return;
        };
        if room.winner.is_some() || room.phase != GamePhase::NightDetective {
            log::debug!(
                "night resolution: room {} moved on (phase {:?})",
                room_id,
                room.phase
            );
            return;
        }

        let outcome = room.resolve_night();
        room.phase = GamePhase::NightResult;
        log::info!(
            "night {} resolved in room {}: victim={:?} saved={}",
            room.round,
            room_id,
            outcome.victim_id,
            outcome.saved
        );

        let result_event = ServerEvent::PhaseChange {
            phase: GamePhase::NightResult,
            round: None,
            discussion_seconds: None,
            victim_id: outcome.victim_id.clone(),
            saved: Some(outcome.saved),
        };

        let winner = match room.judge_winner() {
            Some(winner) => {
                room.winner = Some(winner);
                Some(winner)
            }
            None => None,
        };

        let room = room.clone();
        drop(rooms);

        state.broadcast_room(&room, &result_event).await;
        if let Some(victim_id) = outcome.victim_id {
            state
                .broadcast_room(&room, &ServerEvent::PlayerKilled { player_id: victim_id })
                .await;
        }
        if let Some(winner) = winner {
            state
                .broadcast_room(&room, &ServerEvent::GameOver { winner })
                .await;
        }
    });
}

// 夜アクションの資格チェック：生存していて該当の役職を持っていること
fn is_alive_with_role(player: Option<(bool, Option<Role>)>, role: Role) -> bool {
    matches!(player, Some((true, Some(r))) if r == role)
}

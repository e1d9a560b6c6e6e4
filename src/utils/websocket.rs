use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::event::{ClientIntent, ServerEvent};
use crate::services::{game_service, night_service, room_service, GameError};
use crate::state::AppState;

pub async fn handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.clone()))
}

pub async fn handle_socket(ws: WebSocket, state: AppState) {
    // 接続ごとにIDを振る。これがルーム内でのプレイヤーIDになる
    let player_id = Uuid::new_v4().to_string();
    info!("new WebSocket connection: {}", player_id);

    let (tx, mut rx) = mpsc::unbounded_channel();
    state.register_connection(&player_id, tx).await;
    state
        .send_to(
            &player_id,
            &ServerEvent::Connected {
                player_id: player_id.clone(),
            },
        )
        .await;

    let (mut sender, mut receiver) = ws.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(msg).await {
                warn!("error sending message: {}", e);
                break;
            }
        }
    });

    let state_for_receive = state.clone();
    let player_id_for_receive = player_id.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };

            match serde_json::from_str::<ClientIntent>(&text) {
                Ok(intent) => {
                    info!(
                        "intent from {}: {:?}",
                        player_id_for_receive, intent
                    );
                    if let Err(e) =
                        dispatch(state_for_receive.clone(), &player_id_for_receive, intent).await
                    {
                        // 拒否された操作は送信者にだけ伝える
                        state_for_receive
                            .send_to(
                                &player_id_for_receive,
                                &ServerEvent::Error {
                                    message: e.to_string(),
                                },
                            )
                            .await;
                    }
                }
                Err(e) => {
                    state_for_receive
                        .send_to(
                            &player_id_for_receive,
                            &ServerEvent::Error {
                                message: format!("メッセージのフォーマットが不正です: {}", e),
                            },
                        )
                        .await;
                }
            }
        }
    });

    // どちらかのタスクが終わったら接続は終わり
    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }

    state.unregister_connection(&player_id).await;
    // 切断はログに残すだけ。ルームの状態には触れない
    info!("player {} disconnected", player_id);
}

async fn dispatch(
    state: AppState,
    player_id: &str,
    intent: ClientIntent,
) -> Result<(), GameError> {
    match intent {
        ClientIntent::CreateRoom => {
            room_service::create_room(state, player_id).await;
            Ok(())
        }
        ClientIntent::JoinRoom { room_id, name } => {
            room_service::join_room(state, &room_id, player_id, &name).await
        }
        ClientIntent::StartGame { room_id } => {
            game_service::start_game(state, &room_id, player_id).await
        }
        ClientIntent::NextPhase { room_id } => {
            game_service::advance_phase(state, &room_id, player_id).await
        }
        ClientIntent::MafiaVote { room_id, target_id } => {
            night_service::mafia_vote(state, &room_id, player_id, &target_id).await
        }
        ClientIntent::NurseAction { room_id, target_id } => {
            night_service::nurse_action(state, &room_id, player_id, &target_id).await
        }
        ClientIntent::DetectiveAction { room_id, target_id } => {
            night_service::detective_action(state, &room_id, player_id, &target_id).await
        }
        ClientIntent::HostKill { room_id, target_id } => {
            game_service::host_kill(state, &room_id, player_id, &target_id).await
        }
        ClientIntent::HostSkip { room_id } => {
            game_service::host_skip(state, &room_id, player_id).await
        }
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use crate::{services::room_service, state::AppState, utils::websocket};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // ルーム一覧取得
        // curl http://localhost:8080/api/room/rooms
        .route("/rooms", get(get_rooms))
        // 特定のルーム情報取得
        // curl http://localhost:8080/api/room/{roomid}
        .route("/:roomid", get(get_room_info))
        // ルーム削除
        // curl -X DELETE http://localhost:8080/api/room/{roomid}/delete
        .route("/:roomid/delete", delete(delete_room))
        // WebSocket接続。ゲーム操作はすべてここを通る
        // websocat ws://localhost:8080/api/room/ws
        .route("/ws", get(websocket::handler))
        .with_state(state)
}

async fn get_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms = room_service::get_rooms(&state).await;
    (StatusCode::OK, Json(rooms))
}

async fn get_room_info(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match room_service::get_room_info(&state, &room_id).await {
        Some(room) => (StatusCode::OK, Json(room)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json("ルームが見つかりません".to_string()),
        )
            .into_response(),
    }
}

async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    let success = room_service::delete_room(state, &room_id).await;
    if success {
        (
            StatusCode::OK,
            Json(format!("Room {} deleted successfully", room_id)),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(format!("Failed to delete room {}", room_id)),
        )
    }
}

use crate::routes;
use crate::state::AppState;
use axum::Router;

pub fn create_app() -> Router {
    create_app_with_state(AppState::new())
}

/// 状態を外から渡す入口。本体の起動処理とテストはこちらを使う
pub fn create_app_with_state(state: AppState) -> Router {
    routes::create_routes(state)
}

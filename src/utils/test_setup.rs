use dotenvy::dotenv;
use std::sync::Once;

use crate::models::config::DebugConfig;
use crate::state::AppState;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        if std::env::var("DEBUG_MODE").is_err() {
            std::env::set_var("DEBUG_MODE", "true");
        }
    });
}

/// テスト用のAppState。役職シャッフルを固定シードにし、
/// 演出待ちを短縮してタイマー絡みのテストを速くする
pub fn test_state(role_seed: u64) -> AppState {
    let config = DebugConfig {
        role_seed: Some(role_seed),
        action_cue_override_ms: Some(10),
        ..DebugConfig::default()
    };
    AppState::with_debug_config(config)
}

use std::env;
use std::time::Duration;

use crate::models::rule::RULE;

#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub verbose_logging: bool,
    // 役職シャッフルを固定シードで行うかどうか
    pub role_seed: Option<u64>,
    // 夜アクション後の待ち時間の上書き（テストで短縮する）
    pub action_cue_override_ms: Option<u64>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let debug_mode = cfg!(debug_assertions) || env::var("DEBUG_MODE").is_ok();

        Self {
            enabled: debug_mode,
            verbose_logging: debug_mode,
            role_seed: None,
            action_cue_override_ms: None,
        }
    }
}

impl DebugConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("DEBUG_ENABLED")
            .map(|v| v == "true")
            .unwrap_or_else(|_| cfg!(debug_assertions));
        let verbose_logging = env::var("DEBUG_VERBOSE_LOGGING")
            .map(|v| v == "true")
            .unwrap_or(enabled);
        let role_seed = env::var("DEBUG_ROLE_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());
        let action_cue_override_ms = env::var("DEBUG_ACTION_CUE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        Self {
            enabled,
            verbose_logging,
            role_seed,
            action_cue_override_ms,
        }
    }

    /// 実際に使う待ち時間。上書きがなければルールの既定値
    pub fn action_cue(&self) -> Duration {
        match self.action_cue_override_ms {
            Some(ms) => Duration::from_millis(ms),
            None => RULE.action_cue,
        }
    }
}

pub mod game_service;
pub mod night_service;
pub mod room_service;

/// 1つの操作を拒否するだけで済む回復可能なエラー。
/// 送信者にのみエラー通知を返し、ルームの状態には触れない
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("ルームが見つかりません")]
    RoomNotFound,
    #[error("現在のフェーズではその操作はできません")]
    InvalidPhase,
    #[error("その操作を行う権限がありません")]
    Unauthorized,
    #[error("{0}")]
    RuleViolation(String),
}

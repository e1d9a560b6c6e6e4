use std::time::Duration;

use once_cell::sync::Lazy;

pub static RULE: Lazy<Rule> = Lazy::new(Rule::default);

/// ゲームルールの固定値
#[derive(Debug)]
pub struct Rule {
    // 役職割り当てに必要な最低人数（マフィア1 + 探偵1 + 看護師1 + 市民1）
    pub min_players: usize,
    // この人数以上でマフィアが2人になる
    pub double_mafia_at: usize,
    // 夜アクション受理からフェーズを進めるまでの待ち時間
    // （ホスト端末の音声演出が鳴り終わるのを待つ）
    pub action_cue: Duration,
    // 昼の議論時間（クライアント表示用。サーバーは強制しない）
    pub discussion_seconds: u64,
    // これ以上放置されたルームは回収対象になる
    pub idle_room_timeout: Duration,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            min_players: 4,
            double_mafia_at: 9,
            action_cue: Duration::from_secs(3),
            discussion_seconds: 105,
            idle_room_timeout: Duration::from_secs(60 * 60),
        }
    }
}

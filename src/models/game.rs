use serde::{Deserialize, Serialize};

use super::player::Player;
use super::role::Role;
use super::room::Room;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,          // ゲーム開始前
    NightIntro,     // 夜の導入（全員目を閉じる）
    NightMafia,     // マフィアのターン
    NightNurse,     // 看護師のターン
    NightDetective, // 探偵のターン
    NightResult,    // 夜の結果発表
    DayDiscussion,  // 昼の議論
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    Citizens, // 市民陣営勝利
    Mafia,    // マフィア陣営勝利
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NightActions {
    pub mafia_target: Option<String>,
    pub nurse_target: Option<String>,
    pub detective_target: Option<String>, // 記録のみ。結果には影響しない
    // 看護師の自己治療はゲームを通して一度だけ。毎晩のリセットでも持ち越す
    pub nurse_self_heal_used: bool,
}

/// 夜の解決結果。saved = true のとき victim_id は None になる
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NightOutcome {
    pub victim_id: Option<String>,
    pub saved: bool,
}

/// 勝敗判定。生存者の役職構成だけを見る純粋関数
pub fn judge_winner(players: &[Player]) -> Option<Winner> {
    let mafia = players
        .iter()
        .filter(|p| p.is_alive && p.role == Some(Role::Mafia))
        .count();
    let others = players
        .iter()
        .filter(|p| p.is_alive && p.role.is_some() && p.role != Some(Role::Mafia))
        .count();

    if mafia == 0 {
        Some(Winner::Citizens)
    } else if mafia >= others {
        Some(Winner::Mafia)
    } else {
        None
    }
}

impl Room {
    pub fn role_of(&self, player_id: &str) -> Option<Role> {
        self.player(player_id).and_then(|p| p.role)
    }

    /// マフィアの投票を記録する。先着一票のみ有効で、
    /// 同じ夜の二票目以降は黙って無視する（falseを返す）。
    pub fn register_mafia_vote(&mut self, target_id: &str) -> bool {
        if self.night_actions.mafia_target.is_some() {
            return false;
        }
        self.night_actions.mafia_target = Some(target_id.to_string());
        true
    }

    /// 看護師の護衛対象を記録する。自己治療は一度しか使えないため、
    /// 二度目の自己指定は記録せずfalseを返す。
    pub fn register_nurse_action(&mut self, nurse_id: &str, target_id: &str) -> bool {
        let is_self = nurse_id == target_id;
        if is_self && self.night_actions.nurse_self_heal_used {
            return false;
        }
        if is_self {
            self.night_actions.nurse_self_heal_used = true;
        }
        self.night_actions.nurse_target = Some(target_id.to_string());
        true
    }

    pub fn register_detective_target(&mut self, target_id: &str) {
        self.night_actions.detective_target = Some(target_id.to_string());
    }

    /// 夜のアクションを解決する。護衛対象と襲撃対象が一致した場合のみ救出
    pub fn resolve_night(&mut self) -> NightOutcome {
        let victim = self.night_actions.mafia_target.clone();
        match victim {
            Some(target_id) => {
                if self.night_actions.nurse_target.as_deref() == Some(target_id.as_str()) {
                    NightOutcome {
                        victim_id: None,
                        saved: true,
                    }
                } else {
                    if let Some(player) = self.player_mut(&target_id) {
                        player.is_alive = false;
                    }
                    NightOutcome {
                        victim_id: Some(target_id),
                        saved: false,
                    }
                }
            }
            None => NightOutcome {
                victim_id: None,
                saved: false,
            },
        }
    }

    /// 夜アクションをリセットする。自己治療の使用済みフラグだけは持ち越す
    pub fn reset_night_actions(&mut self) {
        let used = self.night_actions.nurse_self_heal_used;
        self.night_actions = NightActions::default();
        self.night_actions.nurse_self_heal_used = used;
    }

    pub fn judge_winner(&self) -> Option<Winner> {
        judge_winner(&self.players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, role: Role, is_alive: bool) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            role: Some(role),
            is_alive,
        }
    }

    fn test_room() -> Room {
        Room::new("TEST42".to_string(), "host".to_string())
    }

    #[test]
    fn test_judge_winner_truth_table() {
        // マフィア全滅 → 市民勝利
        let players = vec![
            player("a", Role::Mafia, false),
            player("b", Role::Citizen, true),
            player("c", Role::Nurse, true),
        ];
        assert_eq!(judge_winner(&players), Some(Winner::Citizens));

        // マフィア数 >= 他陣営数 → マフィア勝利
        let players = vec![
            player("a", Role::Mafia, true),
            player("b", Role::Citizen, true),
            player("c", Role::Detective, false),
        ];
        assert_eq!(judge_winner(&players), Some(Winner::Mafia));

        // マフィアが少数で残存 → 続行
        let players = vec![
            player("a", Role::Mafia, true),
            player("b", Role::Citizen, true),
            player("c", Role::Nurse, true),
        ];
        assert_eq!(judge_winner(&players), None);
    }

    #[test]
    fn test_judge_winner_is_idempotent() {
        let players = vec![
            player("a", Role::Mafia, true),
            player("b", Role::Citizen, true),
            player("c", Role::Nurse, true),
        ];
        assert_eq!(judge_winner(&players), judge_winner(&players));
    }

    #[test]
    fn test_mafia_vote_is_first_submission_wins() {
        let mut room = test_room();
        assert!(room.register_mafia_vote("b"));
        // 二票目は無視され、最初の対象が残る
        assert!(!room.register_mafia_vote("c"));
        assert_eq!(room.night_actions.mafia_target.as_deref(), Some("b"));
    }

    #[test]
    fn test_nurse_self_heal_only_once() {
        let mut room = test_room();
        assert!(room.register_nurse_action("n", "n"));
        assert!(room.night_actions.nurse_self_heal_used);

        room.reset_night_actions();
        // フラグはリセット後も残り、二度目の自己指定は拒否される
        assert!(room.night_actions.nurse_self_heal_used);
        assert!(!room.register_nurse_action("n", "n"));
        assert!(room.night_actions.nurse_target.is_none());

        // 他人への護衛は引き続き可能
        assert!(room.register_nurse_action("n", "x"));
    }

    #[test]
    fn test_resolve_night_kills_unprotected_target() {
        let mut room = test_room();
        room.players = vec![
            player("m", Role::Mafia, true),
            player("x", Role::Citizen, true),
            player("n", Role::Nurse, true),
            player("d", Role::Detective, true),
        ];
        room.register_mafia_vote("x");
        room.register_nurse_action("n", "d");

        let outcome = room.resolve_night();
        assert_eq!(outcome.victim_id.as_deref(), Some("x"));
        assert!(!outcome.saved);
        assert!(!room.player("x").unwrap().is_alive);
    }

    #[test]
    fn test_resolve_night_saves_protected_target() {
        let mut room = test_room();
        room.players = vec![
            player("m", Role::Mafia, true),
            player("x", Role::Citizen, true),
            player("n", Role::Nurse, true),
        ];
        room.register_mafia_vote("x");
        room.register_nurse_action("n", "x");

        let outcome = room.resolve_night();
        assert_eq!(outcome.victim_id, None);
        assert!(outcome.saved);
        assert!(room.player("x").unwrap().is_alive);
    }

    #[test]
    fn test_resolve_night_without_target() {
        let mut room = test_room();
        room.players = vec![player("x", Role::Citizen, true)];

        let outcome = room.resolve_night();
        assert_eq!(outcome.victim_id, None);
        assert!(!outcome.saved);
    }
}

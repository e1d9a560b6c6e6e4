use std::collections::HashMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::rule::RULE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Mafia,     // マフィア
    Detective, // 探偵
    Nurse,     // 看護師
    Citizen,   // 市民
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Mafia => write!(f, "Mafia"),
            Role::Detective => write!(f, "Detective"),
            Role::Nurse => write!(f, "Nurse"),
            Role::Citizen => write!(f, "Citizen"),
        }
    }
}

/// プレイヤー数に応じたマフィアの人数
pub fn mafia_count(player_count: usize) -> usize {
    if player_count >= RULE.double_mafia_at {
        2
    } else {
        1
    }
}

// 固定順（マフィア→探偵→看護師→残りは市民）で役職リストを作る
fn role_deck(player_count: usize) -> Vec<Role> {
    let mafia = mafia_count(player_count);
    let mut deck = vec![Role::Mafia; mafia];
    deck.push(Role::Detective);
    deck.push(Role::Nurse);
    while deck.len() < player_count {
        deck.push(Role::Citizen);
    }
    deck
}

/// 役職をランダムに割り当てる。乱数源は呼び出し側から注入する
/// （テストではシード付きのStdRngを渡す）。
pub fn assign_roles<R: Rng>(player_ids: &[String], rng: &mut R) -> HashMap<String, Role> {
    let mut deck = role_deck(player_ids.len());
    deck.shuffle(rng);

    player_ids.iter().cloned().zip(deck.into_iter()).collect()
}

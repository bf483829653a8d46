use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures_util::future::join_all;

use crate::{constants::BATTLE_STATUS_ENDED, error::Result, integrations::BattleOracle};

/// Outcome of one status/winner lookup pair for a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleVerdict {
    /// Status was something other than `ended`; the winner was not queried.
    NotEnded,
    Ended { winner: String },
    /// The oracle failed; nothing is claimable.
    Unknown,
}

impl BattleVerdict {
    pub fn allows(&self, entry_id: &str) -> bool {
        match self {
            BattleVerdict::Ended { winner } => winner == entry_id,
            BattleVerdict::NotEnded | BattleVerdict::Unknown => false,
        }
    }
}

/// Decides whether a bet's owner may claim, fail-closed on oracle errors.
pub struct EligibilityEvaluator {
    oracle: Arc<dyn BattleOracle>,
}

impl EligibilityEvaluator {
    pub fn new(oracle: Arc<dyn BattleOracle>) -> Self {
        Self { oracle }
    }

    async fn lookup(&self, battle_id: &str) -> Result<BattleVerdict> {
        let status = self.oracle.battle_status(battle_id).await?;
        if status != BATTLE_STATUS_ENDED {
            return Ok(BattleVerdict::NotEnded);
        }
        let winner = self.oracle.winning_entry(battle_id).await?;
        Ok(BattleVerdict::Ended { winner })
    }

    pub async fn verdict(&self, battle_id: &str) -> BattleVerdict {
        match self.lookup(battle_id).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!("Battle {} treated as not claimable: {}", battle_id, e);
                BattleVerdict::Unknown
            }
        }
    }

    pub async fn can_claim(&self, battle_id: &str, entry_id: &str) -> bool {
        self.verdict(battle_id).await.allows(entry_id)
    }

    /// One lookup per distinct battle, run concurrently.
    pub async fn evaluate_battles<'a, I>(&self, battle_ids: I) -> HashMap<String, BattleVerdict>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<&str> = battle_ids.into_iter().collect();
        let lookups = unique.iter().map(|battle_id| async move {
            (battle_id.to_string(), self.verdict(battle_id).await)
        });
        join_all(lookups).await.into_iter().collect()
    }
}

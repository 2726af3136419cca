//! Three bounded top-N tables (cumulative bonus yield, single highest roll,
//! tasks completed), kept sorted on every write.
//!
//! Tables hold at most `LEADERBOARD_CAPACITY` entries, so insertion into a
//! sorted `Vec` on write is the whole algorithm. Ordering is by value
//! descending, then by earlier `achieved_at`; on an exact tie the entry
//! already in the table stays ahead.

use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::error::Error;
use crate::events::LeaderboardUpdatedEvent;
use crate::storage::{
    DataKey, HolderStats, LeaderboardCategory, LeaderboardEntry, LEADERBOARD_CAPACITY,
};

/// Per-holder aggregates the tables are ranked on.
pub fn holder_stats(env: &Env, holder: &Address) -> HolderStats {
    env.storage()
        .persistent()
        .get(&DataKey::HolderStats(holder.clone()))
        .unwrap_or(HolderStats {
            total_bonus_yield: 0,
            best_roll: 0,
            tasks_completed: 0,
        })
}

pub fn save_holder_stats(env: &Env, holder: &Address, stats: &HolderStats) {
    env.storage()
        .persistent()
        .set(&DataKey::HolderStats(holder.clone()), stats);
}

impl LeaderboardCategory {
    pub fn from_u32(value: u32) -> Result<LeaderboardCategory, Error> {
        match value {
            0 => Ok(LeaderboardCategory::CumulativeYield),
            1 => Ok(LeaderboardCategory::HighestRoll),
            2 => Ok(LeaderboardCategory::TasksCompleted),
            _ => Err(Error::InvalidCategory),
        }
    }
}

pub struct Leaderboard<'a> {
    env: &'a Env,
}

impl<'a> Leaderboard<'a> {
    pub fn new(env: &'a Env) -> Self {
        Leaderboard { env }
    }

    pub fn entries(&self, category: LeaderboardCategory) -> Vec<LeaderboardEntry> {
        self.env
            .storage()
            .instance()
            .get(&DataKey::Leaderboard(category))
            .unwrap_or_else(|| Vec::new(self.env))
    }

    /// Top `limit` entries for a category given as its wire value.
    pub fn query(&self, category: u32, limit: u32) -> Result<Vec<LeaderboardEntry>, Error> {
        let category = LeaderboardCategory::from_u32(category)?;
        if limit == 0 || limit > LEADERBOARD_CAPACITY {
            return Err(Error::InvalidLimit);
        }

        let entries = self.entries(category);
        let mut top = Vec::new(self.env);
        for entry in entries.iter().take(limit as usize) {
            top.push_back(entry);
        }
        Ok(top)
    }

    /// Records `value` as the holder's current metric for `category`.
    ///
    /// Returns the holder's 1-based rank, or 0 if the value did not make the table.
    pub fn update(&self, category: LeaderboardCategory, holder: &Address, value: i128) -> u32 {
        let mut entries = self.entries(category);
        let now = self.env.ledger().timestamp();

        let mut achieved_at = now;
        if let Some(index) = position_of(&entries, holder) {
            if let Some(existing) = entries.get(index) {
                // Keep the original timestamp when the metric did not move.
                if existing.value == value {
                    achieved_at = existing.achieved_at;
                }
            }
            entries.remove(index);
        }

        if entries.len() >= LEADERBOARD_CAPACITY {
            match entries.last() {
                Some(last) if value > last.value => {
                    entries.pop_back();
                }
                _ => {
                    self.publish(category, holder, value, 0);
                    return 0;
                }
            }
        }

        let entry = LeaderboardEntry {
            holder: holder.clone(),
            value,
            achieved_at,
        };
        let index = insertion_index(&entries, &entry);
        entries.insert(index, entry);
        self.save(category, &entries);

        let rank = index + 1;
        self.publish(category, holder, value, rank);
        rank
    }

    fn save(&self, category: LeaderboardCategory, entries: &Vec<LeaderboardEntry>) {
        self.env
            .storage()
            .instance()
            .set(&DataKey::Leaderboard(category), entries);
    }

    fn publish(&self, category: LeaderboardCategory, holder: &Address, value: i128, rank: u32) {
        self.env.events().publish(
            (Symbol::new(self.env, "leaderboard_updated"), category as u32),
            LeaderboardUpdatedEvent {
                category,
                holder: holder.clone(),
                value,
                rank,
            },
        );
    }
}

fn position_of(entries: &Vec<LeaderboardEntry>, holder: &Address) -> Option<u32> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.holder == *holder {
            return Some(index as u32);
        }
    }
    None
}

/// First index whose entry ranks strictly below `new`.
fn insertion_index(entries: &Vec<LeaderboardEntry>, new: &LeaderboardEntry) -> u32 {
    for (index, entry) in entries.iter().enumerate() {
        let ranks_below = entry.value < new.value
            || (entry.value == new.value && entry.achieved_at > new.achieved_at);
        if ranks_below {
            return index as u32;
        }
    }
    entries.len()
}

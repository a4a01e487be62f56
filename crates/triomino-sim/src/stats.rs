//! Aggregate statistics and run logs for simulated matches.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use triomino_core::MatchOutcome;

/// Statistics accumulated over a series of matches.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SimStats {
    pub total_matches: u32,
    pub total_rounds: u32,
    pub total_turns: u32,
    /// Wins keyed by player name; a tied match credits every tied player.
    pub wins_per_player: HashMap<String, u32>,
    pub tied_matches: u32,
    pub highest_score: i32,
    pub highest_scorer: String,
}

impl SimStats {
    /// Fold one match outcome into the totals.
    pub fn update(&mut self, names: &[String], outcome: &MatchOutcome) {
        self.total_matches += 1;
        self.total_rounds += outcome.rounds_played;
        self.total_turns += outcome.turns_played;

        if outcome.winners.len() > 1 {
            self.tied_matches += 1;
        }
        for winner in &outcome.winners {
            let name = names[*winner as usize].clone();
            *self.wins_per_player.entry(name).or_insert(0) += 1;
        }

        for (i, score) in outcome.final_scores.iter().enumerate() {
            if self.total_matches == 1 && i == 0 || *score > self.highest_score {
                self.highest_score = *score;
                self.highest_scorer = names[i].clone();
            }
        }
    }

    /// Mean rounds per match.
    pub fn avg_rounds(&self) -> f64 {
        if self.total_matches == 0 {
            0.0
        } else {
            f64::from(self.total_rounds) / f64::from(self.total_matches)
        }
    }
}

/// One match in the run log.
#[derive(Debug, Clone, Serialize)]
pub struct RunEntry {
    pub seed: u64,
    pub winners: Vec<String>,
    pub final_scores: Vec<i32>,
    pub rounds_played: u32,
    pub turns_played: u32,
}

/// The JSON payload persisted after a run.
#[derive(Debug, Serialize)]
pub struct RunLog {
    pub matches: u32,
    pub base_seed: u64,
    pub players: Vec<String>,
    pub strategies: Vec<String>,
    pub target_score: i32,
    pub stats: SimStats,
    pub results: Vec<RunEntry>,
}

impl RunLog {
    /// Write the log as pretty JSON under `dir`, named by the base seed and
    /// wall-clock seconds so repeated runs never clobber each other.
    pub fn write_to(&self, dir: &Path) -> anyhow::Result<std::path::PathBuf> {
        fs::create_dir_all(dir)?;
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let path = dir.join(format!("run-{}-{stamp}.json", self.base_seed));
        fs::write(&path, serde_json::to_vec_pretty(self)?)?;
        Ok(path)
    }
}

//! Match statistics and end-of-session summary
//!
//! Statistics are folded from the effect events the simulator publishes, so
//! they always agree with what the presentation layer saw.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::events::EffectEvent;
use crate::game::state::{CombatantId, DuelState};

/// Per-combatant counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub attacks: u32,
    pub hits_landed: u32,
    pub hits_taken: u32,
    pub dodges: u32,
    pub impacts_won: u32,
    pub knockouts: u32,
    /// Hits landed since this combatant last took one
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Counters for both combatants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub combatants: [CombatantStats; 2],
}

impl MatchStats {
    pub fn get(&self, id: CombatantId) -> &CombatantStats {
        &self.combatants[id.index()]
    }

    fn get_mut(&mut self, id: CombatantId) -> &mut CombatantStats {
        &mut self.combatants[id.index()]
    }

    /// Fold one event into the counters
    pub fn record(&mut self, event: &EffectEvent) {
        match *event {
            EffectEvent::AttackStarted { attacker } => self.get_mut(attacker).attacks += 1,
            EffectEvent::Hit { attacker, target, .. } => {
                let stats = self.get_mut(attacker);
                stats.hits_landed += 1;
                stats.current_streak += 1;
                stats.best_streak = stats.best_streak.max(stats.current_streak);

                let victim = self.get_mut(target);
                victim.hits_taken += 1;
                victim.current_streak = 0;
            }
            EffectEvent::Dodge { combatant, .. } => self.get_mut(combatant).dodges += 1,
            EffectEvent::Impact {
                scorer: Some(scorer),
                ..
            } => self.get_mut(scorer).impacts_won += 1,
            EffectEvent::Knockout { winner, .. } => self.get_mut(winner).knockouts += 1,
            EffectEvent::Impact { scorer: None, .. } | EffectEvent::RoundStart { .. } => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Final line for one combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantResult {
    pub id: CombatantId,
    pub score: u32,
    pub stats: CombatantStats,
    /// Finished the session without taking a hit
    pub flawless: bool,
}

/// Summary produced when a session ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub session_id: Uuid,
    /// Leader on score, `None` on a tie
    pub winner: Option<CombatantId>,
    pub rounds_played: u32,
    pub duration: f64,
    pub results: [CombatantResult; 2],
}

/// Build the summary from the final state and collected stats
pub fn summarize(session_id: Uuid, state: &DuelState, stats: &MatchStats, started_at: f64) -> MatchSummary {
    let result = |id: CombatantId| {
        let stats = *stats.get(id);
        CombatantResult {
            id,
            score: state.get(id).score,
            flawless: stats.hits_taken == 0,
            stats,
        }
    };

    MatchSummary {
        session_id,
        winner: state.leader(),
        rounds_played: state.round,
        duration: (state.time - started_at).max(0.0),
        results: [result(CombatantId::One), result(CombatantId::Two)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::vec3::Vec3;

    fn hit(attacker: CombatantId) -> EffectEvent {
        EffectEvent::Hit {
            attacker,
            target: attacker.opponent(),
            damage: 20,
            remaining_health: 80,
        }
    }

    #[test]
    fn test_hit_streaks() {
        let mut stats = MatchStats::default();
        stats.record(&hit(CombatantId::One));
        stats.record(&hit(CombatantId::One));
        stats.record(&hit(CombatantId::One));
        stats.record(&hit(CombatantId::Two));
        stats.record(&hit(CombatantId::One));

        let one = stats.get(CombatantId::One);
        assert_eq!(one.hits_landed, 4);
        assert_eq!(one.hits_taken, 1);
        assert_eq!(one.best_streak, 3);
        assert_eq!(one.current_streak, 1);

        let two = stats.get(CombatantId::Two);
        assert_eq!(two.hits_taken, 4);
        assert_eq!(two.current_streak, 0);
    }

    #[test]
    fn test_impacts_and_knockouts() {
        let mut stats = MatchStats::default();
        stats.record(&EffectEvent::Impact {
            point: Vec3::ZERO,
            normal: Vec3::X,
            speed_one: 0.3,
            speed_two: 0.1,
            scorer: Some(CombatantId::One),
        });
        stats.record(&EffectEvent::Impact {
            point: Vec3::ZERO,
            normal: Vec3::X,
            speed_one: 0.1,
            speed_two: 0.1,
            scorer: None,
        });
        stats.record(&EffectEvent::Knockout {
            winner: CombatantId::Two,
            loser: CombatantId::One,
            round: 1,
        });

        assert_eq!(stats.get(CombatantId::One).impacts_won, 1);
        assert_eq!(stats.get(CombatantId::Two).impacts_won, 0);
        assert_eq!(stats.get(CombatantId::Two).knockouts, 1);
    }

    #[test]
    fn test_dodges_and_attacks() {
        let mut stats = MatchStats::default();
        stats.record(&EffectEvent::AttackStarted {
            attacker: CombatantId::Two,
        });
        stats.record(&EffectEvent::Dodge {
            combatant: CombatantId::Two,
            direction: Vec3::X,
        });
        assert_eq!(stats.get(CombatantId::Two).attacks, 1);
        assert_eq!(stats.get(CombatantId::Two).dodges, 1);

        stats.reset();
        assert_eq!(stats, MatchStats::default());
    }

    #[test]
    fn test_summarize() {
        let mut state = DuelState::new(Vec3::new(3.0, 0.5, 0.0), Vec3::new(-3.0, 0.5, 0.0), 100);
        state.round = 3;
        state.time = 42.0;
        state.get_mut(CombatantId::Two).score = 2;

        let mut stats = MatchStats::default();
        stats.record(&hit(CombatantId::Two));

        let summary = summarize(Uuid::new_v4(), &state, &stats, 2.0);

        assert_eq!(summary.winner, Some(CombatantId::Two));
        assert_eq!(summary.rounds_played, 3);
        assert!((summary.duration - 40.0).abs() < 1e-9);
        assert!(summary.results[0].stats.hits_taken == 1 && !summary.results[0].flawless);
        assert!(summary.results[1].flawless);
        assert_eq!(summary.results[1].score, 2);
    }

    #[test]
    fn test_summary_serializes() {
        let state = DuelState::new(Vec3::ZERO, Vec3::X, 100);
        let summary = summarize(Uuid::new_v4(), &state, &MatchStats::default(), 0.0);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"winner\":null"));
    }
}

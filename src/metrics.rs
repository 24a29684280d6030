//! Population counts and the per-tick series of them.
use serde::Serialize;

use crate::agent::{Agent, EpidemicState};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub susceptible: usize,
    pub infected: usize,
    pub immune: usize,
}

impl Counts {
    /// Tallies the state of every agent.
    pub fn from_agents<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Self {
        let mut counts = Counts::default();
        for agent in agents {
            match agent.state() {
                EpidemicState::Susceptible => counts.susceptible += 1,
                EpidemicState::Infected => counts.infected += 1,
                EpidemicState::Immune => counts.immune += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.immune
    }

    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.susceptible, self.infected, self.immune)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetricsRecord {
    pub tick: usize,
    #[serde(flatten)]
    pub counts: Counts,
}

/// Append-only series of counts, one record per tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSeries {
    records: Vec<MetricsRecord>,
}

impl MetricsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, tick: usize, counts: Counts) {
        debug_assert!(
            self.records.last().map_or(true, |last| last.tick < tick),
            "ticks must be recorded in increasing order"
        );
        self.records.push(MetricsRecord { tick, counts });
    }

    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&MetricsRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricsRecord> {
        self.records.iter()
    }

    pub fn susceptible(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.counts.susceptible)
    }

    pub fn infected(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.counts.infected)
    }

    pub fn immune(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.counts.immune)
    }

    /// The record with the most infected agents; the earliest one on ties.
    pub fn peak_infected(&self) -> Option<&MetricsRecord> {
        self.records
            .iter()
            .rev()
            .max_by_key(|r| r.counts.infected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::grid::Position;

    fn counts(s: usize, i: usize, r: usize) -> Counts {
        Counts {
            susceptible: s,
            infected: i,
            immune: r,
        }
    }

    #[test]
    fn counts_from_agents() {
        let agents = vec![
            Agent::new(AgentId(0), Position::new(0, 0), false, true, 4),
            Agent::new(AgentId(1), Position::new(0, 0), true, false, 0),
            Agent::new(AgentId(2), Position::new(1, 0), false, false, 0),
        ];
        let counts = Counts::from_agents(&agents);
        assert_eq!(counts.as_tuple(), (2, 1, 0));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn series_accessors() {
        let mut series = MetricsSeries::new();
        assert!(series.is_empty());
        series.record(0, counts(9, 1, 0));
        series.record(1, counts(7, 3, 0));
        series.record(2, counts(6, 3, 1));

        assert_eq!(series.len(), 3);
        assert_eq!(series.infected().collect::<Vec<_>>(), vec![1, 3, 3]);
        assert_eq!(series.immune().collect::<Vec<_>>(), vec![0, 0, 1]);
        assert_eq!(series.last().unwrap().tick, 2);
        assert_eq!(series.peak_infected().unwrap().tick, 1);
    }

    #[test]
    fn record_serializes_flat() {
        let record = MetricsRecord {
            tick: 3,
            counts: counts(1, 2, 3),
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tick": 3, "susceptible": 1, "infected": 2, "immune": 3})
        );
    }
}

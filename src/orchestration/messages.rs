// Inter-agent communication bus
//
// Append-only, chronological log of every message exchanged between
// registered agents. Nothing is ever removed for the lifetime of the
// process.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{OrchestratorError, OrchestratorResult};
use crate::domain::communication::{Communication, CommunicationType};

/// Upper bound reported by [`CommunicationBus::collaboration_strength`]
pub const MAX_COLLABORATION_STRENGTH: usize = 5;

#[derive(Debug, Default)]
pub struct CommunicationBus {
    endpoints: HashSet<String>,
    log: Vec<Communication>,
}

impl CommunicationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `agent_id` a valid sender and recipient
    pub fn register_endpoint(&mut self, agent_id: impl Into<String>) {
        self.endpoints.insert(agent_id.into());
    }

    /// Appends a message and returns the stored entry
    ///
    /// Timestamps never go backwards, even if the wall clock does.
    pub fn send(
        &mut self,
        from: &str,
        to: &str,
        message: impl Into<String>,
        kind: CommunicationType,
        related_task: Option<Uuid>,
    ) -> OrchestratorResult<Communication> {
        for endpoint in [from, to] {
            if !self.endpoints.contains(endpoint) {
                return Err(OrchestratorError::UnknownAgent(endpoint.to_string()));
            }
        }

        let now = Utc::now();
        let timestamp = match self.log.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let communication = Communication {
            id: Uuid::new_v4(),
            from_agent: from.to_string(),
            to_agent: to.to_string(),
            message: message.into(),
            kind,
            related_task,
            timestamp,
        };
        self.log.push(communication.clone());
        Ok(communication)
    }

    /// Chronological history, optionally limited to one agent's messages
    pub fn history(&self, agent_id: Option<&str>) -> Vec<Communication> {
        match agent_id {
            Some(id) => self.log.iter().filter(|c| c.involves(id)).cloned().collect(),
            None => self.log.clone(),
        }
    }

    /// The last `limit` messages, oldest first
    pub fn recent(&self, limit: usize) -> Vec<Communication> {
        let start = self.log.len().saturating_sub(limit);
        self.log[start..].to_vec()
    }

    /// Number of messages sent at or after `cutoff`
    pub fn count_since(&self, cutoff: DateTime<Utc>) -> usize {
        // Log is sorted by timestamp, so scan from the end.
        self.log
            .iter()
            .rev()
            .take_while(|c| c.timestamp >= cutoff)
            .count()
    }

    /// Messages exchanged between two agents in either direction,
    /// capped at [`MAX_COLLABORATION_STRENGTH`]
    pub fn collaboration_strength(&self, a: &str, b: &str) -> usize {
        self.log
            .iter()
            .filter(|c| {
                (c.from_agent == a && c.to_agent == b) || (c.from_agent == b && c.to_agent == a)
            })
            .take(MAX_COLLABORATION_STRENGTH)
            .count()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bus() -> CommunicationBus {
        let mut bus = CommunicationBus::new();
        for id in ["product_manager", "architect", "designer"] {
            bus.register_endpoint(id);
        }
        bus
    }

    #[test]
    fn send_appends_immediately() {
        let mut bus = bus();
        let task_id = Uuid::new_v4();

        let comm = bus
            .send(
                "product_manager",
                "architect",
                "Draft the service layout",
                CommunicationType::Request,
                Some(task_id),
            )
            .unwrap();

        assert_eq!(bus.len(), 1);
        assert_eq!(bus.history(None), vec![comm.clone()]);
        assert_eq!(comm.related_task, Some(task_id));
    }

    #[test]
    fn send_to_unknown_agent_leaves_log_unchanged() {
        let mut bus = bus();
        bus.send("architect", "designer", "hi", CommunicationType::Question, None)
            .unwrap();

        let result = bus.send("architect", "agentX", "hi", CommunicationType::Request, None);

        assert_eq!(result, Err(OrchestratorError::UnknownAgent("agentX".to_string())));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn send_from_unknown_agent_fails() {
        let mut bus = bus();
        let result = bus.send("ghost", "architect", "boo", CommunicationType::Request, None);

        assert!(matches!(result, Err(OrchestratorError::UnknownAgent(id)) if id == "ghost"));
        assert!(bus.is_empty());
    }

    #[test]
    fn history_filters_by_participant() {
        let mut bus = bus();
        bus.send("product_manager", "architect", "1", CommunicationType::Request, None)
            .unwrap();
        bus.send("architect", "designer", "2", CommunicationType::Request, None)
            .unwrap();
        bus.send("designer", "product_manager", "3", CommunicationType::Response, None)
            .unwrap();

        let architect: Vec<String> = bus
            .history(Some("architect"))
            .into_iter()
            .map(|c| c.message)
            .collect();
        assert_eq!(architect, ["1", "2"]);
        assert!(bus.history(Some("devops")).is_empty());
    }

    #[test]
    fn timestamps_are_chronological() {
        let mut bus = bus();
        for i in 0..20 {
            bus.send("architect", "designer", i.to_string(), CommunicationType::Notification, None)
                .unwrap();
        }

        let history = bus.history(None);
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn recent_returns_tail() {
        let mut bus = bus();
        for i in 0..5 {
            bus.send("architect", "designer", i.to_string(), CommunicationType::Request, None)
                .unwrap();
        }

        let recent: Vec<String> = bus.recent(2).into_iter().map(|c| c.message).collect();
        assert_eq!(recent, ["3", "4"]);
        assert_eq!(bus.recent(50).len(), 5);
    }

    #[test]
    fn count_since_respects_window() {
        let mut bus = bus();
        bus.send("architect", "designer", "x", CommunicationType::Request, None)
            .unwrap();

        assert_eq!(bus.count_since(Utc::now() - Duration::minutes(5)), 1);
        assert_eq!(bus.count_since(Utc::now() + Duration::minutes(5)), 0);
    }

    #[test]
    fn collaboration_strength_is_capped() {
        let mut bus = bus();
        for _ in 0..4 {
            bus.send("architect", "designer", "a", CommunicationType::Request, None)
                .unwrap();
            bus.send("designer", "architect", "b", CommunicationType::Response, None)
                .unwrap();
        }
        bus.send("architect", "product_manager", "c", CommunicationType::Request, None)
            .unwrap();

        assert_eq!(bus.collaboration_strength("architect", "designer"), MAX_COLLABORATION_STRENGTH);
        assert_eq!(bus.collaboration_strength("product_manager", "architect"), 1);
        assert_eq!(bus.collaboration_strength("designer", "product_manager"), 0);
    }
}

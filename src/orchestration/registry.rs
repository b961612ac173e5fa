use std::collections::HashMap;

use uuid::Uuid;

use super::errors::{OrchestratorError, OrchestratorResult};
use crate::domain::agent::{Agent, AgentStatus};
use crate::domain::task::TaskType;

/// Owns the agent roster and answers capability queries
///
/// Agents are kept in registration order, which is also the final
/// tie-break when several agents match a task equally well.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    positions: HashMap<String, usize>,
    capability_index: HashMap<String, Vec<usize>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent to the roster
    pub fn register(&mut self, agent: Agent) -> OrchestratorResult<()> {
        if self.positions.contains_key(agent.id()) {
            return Err(OrchestratorError::DuplicateAgent(agent.id().to_string()));
        }

        let position = self.agents.len();
        for capability in agent.capabilities() {
            self.capability_index
                .entry(capability.clone())
                .or_default()
                .push(position);
        }
        self.positions.insert(agent.id().to_string(), position);
        self.agents.push(agent);
        Ok(())
    }

    pub fn get(&self, id: &str) -> OrchestratorResult<&Agent> {
        self.positions
            .get(id)
            .map(|&position| &self.agents[position])
            .ok_or_else(|| OrchestratorError::agent_not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Snapshot of every agent in registration order
    pub fn list(&self) -> Vec<Agent> {
        self.agents.clone()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Moves an agent to `status`, holding `task` when working
    pub fn transition(
        &mut self,
        id: &str,
        status: AgentStatus,
        task: Option<Uuid>,
    ) -> OrchestratorResult<()> {
        self.get_mut(id)?
            .transition(status, task)
            .map_err(OrchestratorError::InvalidTransition)
    }

    pub fn record_completion(&mut self, id: &str, task_id: Uuid) -> OrchestratorResult<()> {
        self.get_mut(id)?.record_completion(task_id);
        Ok(())
    }

    /// Agents whose capability set contains `capability`
    pub fn find_by_capability(&self, capability: &str) -> Vec<Agent> {
        self.capability_index
            .get(capability)
            .map(|positions| positions.iter().map(|&p| self.agents[p].clone()).collect())
            .unwrap_or_default()
    }

    /// Picks the agent that should run a task of `task_type`
    ///
    /// Candidates must share at least one required capability and be
    /// available. Idle agents rank before errored ones, then the larger
    /// capability overlap wins, then registration order.
    pub fn select_for(&self, task_type: TaskType) -> OrchestratorResult<&Agent> {
        let required = task_type.required_capabilities();

        let mut candidates: Vec<usize> = required
            .iter()
            .filter_map(|capability| self.capability_index.get(*capability))
            .flatten()
            .copied()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .map(|position| &self.agents[position])
            .filter(|agent| agent.status().is_available())
            .enumerate()
            .max_by_key(|(order, agent)| {
                (
                    agent.status() == AgentStatus::Idle,
                    agent.capability_overlap(required),
                    std::cmp::Reverse(*order),
                )
            })
            .map(|(_, agent)| agent)
            .ok_or_else(|| OrchestratorError::NoEligibleAgent(task_type.to_string()))
    }

    /// Checks that the agent `id` may run a task of `task_type`
    ///
    /// Fails with `NotFound` for an unregistered agent and with
    /// `NoEligibleAgent` when it is busy or lacks every required capability.
    pub fn select_named(&self, id: &str, task_type: TaskType) -> OrchestratorResult<&Agent> {
        let agent = self.get(id)?;
        if !agent.status().is_available()
            || agent.capability_overlap(task_type.required_capabilities()) == 0
        {
            return Err(OrchestratorError::NoEligibleAgent(format!(
                "{} (requested agent {})",
                task_type, id
            )));
        }
        Ok(agent)
    }

    fn get_mut(&mut self, id: &str) -> OrchestratorResult<&mut Agent> {
        let position = *self
            .positions
            .get(id)
            .ok_or_else(|| OrchestratorError::agent_not_found(id))?;
        Ok(&mut self.agents[position])
    }
}

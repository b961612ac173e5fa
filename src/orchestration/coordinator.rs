use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn, Instrument};
use uuid::Uuid;

use super::aggregator::ProjectSummary;
use super::errors::{OrchestratorError, OrchestratorResult};
use super::executor::{SimulatedExecutor, TaskExecutor};
use super::messages::CommunicationBus;
use super::planner::{self, Decomposer, RoleBasedDecomposer};
use super::registry::AgentRegistry;
use super::roster::{self, PRODUCT_MANAGER_ID};
use super::state::{ClaimedTask, OrchestrationState};
use super::types::{
    Cancellation, ExecutionOutcome, ExecutionReport, SystemHealth, SystemStatus, TaskRequest,
    TaskResult,
};
use crate::config::CoordinatorConfig;
use crate::domain::agent::{Agent, AgentStatus};
use crate::domain::communication::{Communication, CommunicationType};
use crate::domain::project::Project;
use crate::domain::task::{Task, TaskStatus, TaskType};

/// Facade over registry, scheduler, bus and aggregator
///
/// Built once at startup and shared behind an `Arc`. All mutation of
/// agents and tasks goes through the single state lock; the bus has its
/// own lock and is always taken after the state lock, never before.
pub struct Coordinator {
    state: Arc<RwLock<OrchestrationState>>,
    bus: Arc<RwLock<CommunicationBus>>,
    executor: Arc<dyn TaskExecutor>,
    decomposer: Arc<dyn Decomposer>,
    config: CoordinatorConfig,
}

impl Coordinator {
    /// Creates a coordinator staffed with the default roster
    pub fn new(config: CoordinatorConfig) -> OrchestratorResult<Self> {
        Self::with_roster(config, roster::default_roster())
    }

    /// Creates a coordinator staffed with `agents`
    pub fn with_roster(config: CoordinatorConfig, agents: Vec<Agent>) -> OrchestratorResult<Self> {
        let mut registry = AgentRegistry::new();
        let mut bus = CommunicationBus::new();
        for agent in agents {
            bus.register_endpoint(agent.id());
            registry.register(agent)?;
        }

        info!(agents = registry.len(), "Coordinator initialized");

        Ok(Self {
            state: Arc::new(RwLock::new(OrchestrationState::new(registry))),
            bus: Arc::new(RwLock::new(bus)),
            executor: Arc::new(SimulatedExecutor::new(config.simulated_latency)),
            decomposer: Arc::new(RoleBasedDecomposer),
            config,
        })
    }

    /// Replace the execution capability
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the request decomposer
    #[must_use]
    pub fn with_decomposer(mut self, decomposer: Arc<dyn Decomposer>) -> Self {
        self.decomposer = decomposer;
        self
    }

    /// Create a project and its initial task plan from a request
    ///
    /// No agents are assigned; call [`run_project`](Self::run_project) or
    /// [`execute_task`](Self::execute_task) to start work.
    #[instrument(skip(self, request))]
    pub async fn start_project(&self, request: &str) -> OrchestratorResult<Project> {
        let project = Project::from_request(request).map_err(|_| OrchestratorError::EmptyRequest)?;
        let request = project.description().to_string();

        let drafts = match self.decomposer.decompose(&request).await {
            Ok(drafts) => drafts,
            Err(err) => {
                warn!(error = %err, "Decomposition failed, falling back to coordination task");
                planner::coordination_only(&request)
            }
        };
        let tasks = planner::materialize(&request, drafts)?;

        let mut state = self.state.write().await;
        let project_id = state.graph.create_project(project);
        for task in tasks {
            if let Err(err) = state.graph.add_task(project_id, task) {
                state.graph.discard_empty_project(project_id);
                return Err(err);
            }
        }
        let project = state.graph.project(project_id)?.clone();

        info!(
            project_id = %project_id,
            name = %project.name(),
            tasks = project.tasks().len(),
            "Project started"
        );
        Ok(project)
    }

    /// Insert (when new) and run a single task
    ///
    /// Returns `Ok` once the task has run, even when it failed or timed
    /// out; inspect [`TaskResult::outcome`]. When no agent is free the
    /// call fails with `NoEligibleAgent` and the task stays pending.
    #[instrument(skip(self, request), fields(task_type = ?request.task_type))]
    pub async fn execute_task(&self, request: TaskRequest) -> OrchestratorResult<TaskResult> {
        let deadline = request
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.config.task_timeout);
        if let Some(agent_id) = request.assigned_agent.as_deref() {
            self.state.read().await.registry.get(agent_id)?;
        }
        let requested = request.assigned_agent.clone();
        let task_id = self.admit(request).await?;
        self.run_task(task_id, deadline, requested).await
    }

    /// Run every runnable task of a project, round by round
    ///
    /// Each round starts all runnable tasks concurrently. Stops once a
    /// round starts nothing, which happens when the project is done,
    /// blocked on failed dependencies, or short of free agents.
    #[instrument(skip(self))]
    pub async fn run_project(&self, project_id: Uuid) -> OrchestratorResult<Vec<TaskResult>> {
        let mut results = Vec::new();

        loop {
            let runnable = self.state.read().await.graph.runnable_tasks(project_id)?;
            if runnable.is_empty() {
                break;
            }

            let round = join_all(
                runnable
                    .iter()
                    .map(|task| self.run_task(task.id(), self.config.task_timeout, None)),
            )
            .await;

            let mut started = 0;
            for outcome in round {
                match outcome {
                    Ok(result) => {
                        started += 1;
                        results.push(result);
                    }
                    Err(err) => debug!(error = %err, "Task not started this round"),
                }
            }
            if started == 0 {
                break;
            }
        }

        info!(project_id = %project_id, executed = results.len(), "Project run finished");
        Ok(results)
    }

    /// Withdraw a pending task or signal an in-flight one
    pub async fn cancel_task(&self, task_id: Uuid) -> OrchestratorResult<Cancellation> {
        let mut state = self.state.write().await;
        let status = state.graph.task(task_id)?.status();

        match status {
            TaskStatus::Pending => {
                state.graph.cancel(task_id)?;
                info!(task_id = %task_id, "Task withdrawn");
                Ok(Cancellation::Withdrawn)
            }
            TaskStatus::InProgress => {
                state.signal_cancellation(task_id);
                info!(task_id = %task_id, "Cancellation requested for running task");
                Ok(Cancellation::Requested)
            }
            TaskStatus::Completed | TaskStatus::Failed => Err(OrchestratorError::InvalidTransition(
                format!("Task {} already finished as {}", task_id, status),
            )),
        }
    }

    /// Send a request message between two agents
    pub async fn send_message(
        &self,
        from: &str,
        to: &str,
        message: &str,
    ) -> OrchestratorResult<Communication> {
        self.send_typed_message(from, to, message, CommunicationType::Request, None)
            .await
    }

    pub async fn send_typed_message(
        &self,
        from: &str,
        to: &str,
        message: &str,
        kind: CommunicationType,
        related_task: Option<Uuid>,
    ) -> OrchestratorResult<Communication> {
        let communication = self
            .bus
            .write()
            .await
            .send(from, to, message, kind, related_task)?;
        debug!(from = %from, to = %to, kind = %kind, "Message sent");
        Ok(communication)
    }

    /// Chronological message log, optionally for one agent
    pub async fn communication_history(&self, agent_id: Option<&str>) -> Vec<Communication> {
        self.bus.read().await.history(agent_id)
    }

    pub async fn recent_communications(&self, limit: usize) -> Vec<Communication> {
        self.bus.read().await.recent(limit)
    }

    pub async fn collaboration_strength(&self, a: &str, b: &str) -> usize {
        self.bus.read().await.collaboration_strength(a, b)
    }

    pub async fn get_all_agents(&self) -> Vec<Agent> {
        self.state.read().await.registry.list()
    }

    pub async fn get_agent(&self, agent_id: &str) -> OrchestratorResult<Agent> {
        self.state.read().await.registry.get(agent_id).cloned()
    }

    pub async fn get_all_projects(&self) -> Vec<Project> {
        self.state.read().await.graph.projects()
    }

    pub async fn get_project(&self, project_id: Uuid) -> OrchestratorResult<Project> {
        self.state.read().await.graph.project(project_id).cloned()
    }

    pub async fn project_tasks(&self, project_id: Uuid) -> OrchestratorResult<Vec<Task>> {
        self.state.read().await.graph.project_tasks(project_id)
    }

    pub async fn project_summary(&self, project_id: Uuid) -> OrchestratorResult<ProjectSummary> {
        self.state.read().await.graph.summary(project_id)
    }

    pub async fn runnable_tasks(&self, project_id: Uuid) -> OrchestratorResult<Vec<Task>> {
        self.state.read().await.graph.runnable_tasks(project_id)
    }

    pub async fn get_task(&self, task_id: Uuid) -> OrchestratorResult<Task> {
        self.state.read().await.graph.task(task_id).cloned()
    }

    pub async fn get_system_status(&self) -> SystemStatus {
        let (active_projects, total_agents, active_agents, errored_agents) = {
            let state = self.state.read().await;
            let agents = state.registry.list();
            (
                state
                    .graph
                    .projects()
                    .iter()
                    .filter(|p| p.status().is_active())
                    .count(),
                agents.len(),
                agents
                    .iter()
                    .filter(|a| a.status() != AgentStatus::Idle)
                    .count(),
                agents
                    .iter()
                    .filter(|a| a.status() == AgentStatus::Error)
                    .count(),
            )
        };

        let window = chrono::Duration::from_std(self.config.communication_window)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        let recent_communications = self.bus.read().await.count_since(Utc::now() - window);

        let system_health = if total_agents == 0 || errored_agents * 2 > total_agents {
            SystemHealth::Error
        } else if errored_agents > 0 {
            SystemHealth::Warning
        } else if active_agents > 0 || active_projects == 0 {
            SystemHealth::Healthy
        } else {
            SystemHealth::Warning
        };

        SystemStatus {
            active_projects,
            total_agents,
            active_agents,
            recent_communications,
            system_health,
        }
    }

    /// Resolve a request to a task id, inserting the task when it is new
    async fn admit(&self, request: TaskRequest) -> OrchestratorResult<Uuid> {
        let mut state = self.state.write().await;

        if let Some(id) = request.id.filter(|id| state.graph.contains_task(*id)) {
            let owner = state.graph.task(id)?.project_id();
            if let Some(project_id) = request.project_id {
                if owner != Some(project_id) {
                    return Err(OrchestratorError::task_not_found(id));
                }
            }
            return Ok(id);
        }

        let mut task = Task::new(
            request.task_type.unwrap_or(TaskType::CoordinateProject),
            request.description,
        )
        .map_err(OrchestratorError::InvalidPlan)?
        .with_priority(request.priority.unwrap_or_default())
        .with_dependencies(request.dependencies);
        if let Some(id) = request.id {
            task = task.with_id(id);
        }

        let (project_id, fresh_implicit) = match request.project_id {
            Some(id) => {
                state.graph.project(id)?;
                (id, false)
            }
            None => {
                let fresh = !state.has_implicit_project();
                (state.implicit_project()?, fresh)
            }
        };

        let task_id = match state.graph.add_task(project_id, task) {
            Ok(task_id) => task_id,
            Err(err) => {
                if fresh_implicit {
                    state.discard_implicit_project();
                }
                return Err(err);
            }
        };
        info!(task_id = %task_id, project_id = %project_id, "Task added");
        Ok(task_id)
    }

    /// Claim one task, then execute and release it on its own tokio task
    ///
    /// The release always runs, even when the caller's future is dropped
    /// mid-execution.
    async fn run_task(
        &self,
        task_id: Uuid,
        deadline: Duration,
        requested: Option<String>,
    ) -> OrchestratorResult<TaskResult> {
        let claimed = self
            .state
            .write()
            .await
            .claim_with(task_id, requested.as_deref())?;
        info!(task_id = %task_id, agent_id = %claimed.agent.id, "Task started");

        let run = tokio::spawn(
            finish_run(
                Arc::clone(&self.state),
                Arc::clone(&self.bus),
                Arc::clone(&self.executor),
                claimed,
                deadline,
            )
            .in_current_span(),
        );

        run.await
            .map_err(|err| OrchestratorError::ExecutionFailed(err.to_string()))?
    }
}

/// Execute a claimed task under `deadline`, release it and notify
async fn finish_run(
    state: Arc<RwLock<OrchestrationState>>,
    bus: Arc<RwLock<CommunicationBus>>,
    executor: Arc<dyn TaskExecutor>,
    claimed: ClaimedTask,
    deadline: Duration,
) -> OrchestratorResult<TaskResult> {
    let ClaimedTask {
        task,
        agent,
        cancellation,
    } = claimed;
    let task_id = task.id();
    let agent_id = agent.id.clone();

    let mut execution =
        tokio::spawn(async move { executor.execute(&task, &agent, cancellation).await });
    let report = match tokio::time::timeout(deadline, &mut execution).await {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => ExecutionReport::failure(format!("executor aborted: {}", err)),
        Err(_) => {
            execution.abort();
            ExecutionReport::timeout()
        }
    };

    let error = match report.outcome {
        ExecutionOutcome::Success => None,
        ExecutionOutcome::Timeout => Some(OrchestratorError::ExecutionTimeout(deadline)),
        ExecutionOutcome::Failure => Some(OrchestratorError::ExecutionFailed(
            report
                .result
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| report.result.to_string()),
        )),
    }
    .map(|err| err.to_string());

    let (task, notify_to) = {
        let mut state = state.write().await;
        let task = state.release(task_id, &agent_id, &report, error.as_deref())?;
        let notify_to = if state.registry.contains(PRODUCT_MANAGER_ID) {
            PRODUCT_MANAGER_ID.to_string()
        } else {
            agent_id.clone()
        };
        (task, notify_to)
    };
    let project_id = task.project_id().ok_or_else(|| OrchestratorError::NotFound {
        kind: "Project",
        id: format!("owner of task {}", task_id),
    })?;

    let message = match &error {
        None => format!("Completed {} task: {}", task.task_type(), task.description()),
        Some(err) => format!("Failed {} task: {} ({})", task.task_type(), task.description(), err),
    };
    let notification = bus.write().await.send(
        &agent_id,
        &notify_to,
        &message,
        CommunicationType::Notification,
        Some(task_id),
    );
    if let Err(err) = notification {
        warn!(error = %err, "Could not record task notification");
    }

    match &error {
        None => info!(task_id = %task_id, agent_id = %agent_id, "Task completed"),
        Some(err) => warn!(task_id = %task_id, agent_id = %agent_id, error = %err, "Task failed"),
    }

    Ok(TaskResult {
        task_id,
        project_id,
        agent_id,
        outcome: report.outcome,
        status: task.status(),
        result: task.result().cloned(),
        error,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectStatus;

    fn coordinator() -> Coordinator {
        Coordinator::new(CoordinatorConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn start_project_with_blank_request_fails() {
        let coordinator = coordinator();

        let result = coordinator.start_project("   ").await;

        assert_eq!(result, Err(OrchestratorError::EmptyRequest));
        assert!(coordinator.get_all_projects().await.is_empty());
    }

    #[tokio::test]
    async fn start_project_creates_plan_without_assignments() {
        let coordinator = coordinator();

        let project = coordinator.start_project("Build a habit tracker").await.unwrap();

        assert_eq!(project.status(), ProjectStatus::Planning);
        assert_eq!(project.description(), "Build a habit tracker");
        let tasks = coordinator.project_tasks(project.id()).await.unwrap();
        assert_eq!(tasks[0].task_type(), TaskType::CoordinateProject);
        assert!(tasks.iter().all(|t| t.assigned_agent().is_none()));
        assert!(coordinator
            .get_all_agents()
            .await
            .iter()
            .all(|a| a.status() == AgentStatus::Idle));
    }

    #[tokio::test]
    async fn duplicate_roster_is_rejected() {
        let mut agents = roster::default_roster();
        agents.push(agents[0].clone());

        let result = Coordinator::with_roster(CoordinatorConfig::default(), agents);
        assert!(matches!(result, Err(OrchestratorError::DuplicateAgent(_))));
    }

    #[tokio::test]
    async fn execute_task_without_project_uses_implicit_project() {
        let coordinator = coordinator();

        let first = coordinator
            .execute_task(TaskRequest::new("Plan sprint one"))
            .await
            .unwrap();
        let second = coordinator
            .execute_task(TaskRequest::new("Plan sprint two"))
            .await
            .unwrap();

        assert_eq!(first.project_id, second.project_id);
        assert!(!first.project_id.is_nil());
        assert_eq!(
            coordinator.get_project(first.project_id).await.unwrap().tasks(),
            [first.task_id, second.task_id]
        );
        assert_eq!(first.agent_id, PRODUCT_MANAGER_ID);
        assert_eq!(coordinator.get_all_projects().await.len(), 1);
    }

    #[tokio::test]
    async fn execute_existing_task_by_id() {
        let coordinator = coordinator();
        let project = coordinator.start_project("Build a blog").await.unwrap();
        let first = project.tasks()[0];

        let mut request = TaskRequest::new("ignored for existing tasks");
        request.id = Some(first);
        let result = coordinator.execute_task(request).await.unwrap();

        assert_eq!(result.task_id, first);
        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(coordinator.project_tasks(project.id()).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn system_status_counts_projects_and_agents() {
        let coordinator = coordinator();
        coordinator.start_project("Build a chat app").await.unwrap();
        coordinator
            .send_message("product_manager", "architect", "Kickoff at ten")
            .await
            .unwrap();

        let status = coordinator.get_system_status().await;

        assert_eq!(status.active_projects, 1);
        assert_eq!(status.total_agents, 7);
        assert_eq!(status.active_agents, 0);
        assert_eq!(status.recent_communications, 1);
        assert_eq!(status.system_health, SystemHealth::Warning);
    }

    #[tokio::test]
    async fn idle_system_without_projects_is_healthy() {
        let status = coordinator().get_system_status().await;

        assert_eq!(status.active_projects, 0);
        assert_eq!(status.system_health, SystemHealth::Healthy);
    }

    #[tokio::test]
    async fn cancel_finished_task_fails() {
        let coordinator = coordinator();
        let result = coordinator
            .execute_task(TaskRequest::new("Write a status report"))
            .await
            .unwrap();

        let cancel = coordinator.cancel_task(result.task_id).await;
        assert!(matches!(cancel, Err(OrchestratorError::InvalidTransition(_))));
    }
}

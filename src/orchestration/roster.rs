use crate::domain::agent::{Agent, AgentType};

/// Id of the agent that receives task outcome notifications
pub const PRODUCT_MANAGER_ID: &str = "product_manager";

/// The fixed development team created at startup
pub fn default_roster() -> Vec<Agent> {
    vec![
        Agent::new(
            PRODUCT_MANAGER_ID,
            "Alex",
            AgentType::ProductManager,
            [
                "project_coordination",
                "stakeholder_communication",
                "requirements_analysis",
                "user_stories",
            ],
        ),
        Agent::new(
            "architect",
            "Morgan",
            AgentType::Architect,
            ["system_design", "architecture_review", "technology_selection"],
        ),
        Agent::new(
            "designer",
            "Riley",
            AgentType::Designer,
            ["ui_design", "prototyping", "ux_research"],
        ),
        Agent::new(
            "frontend_developer",
            "Sam",
            AgentType::FrontendDeveloper,
            ["frontend_development", "ui_implementation", "react"],
        ),
        Agent::new(
            "backend_developer",
            "Jordan",
            AgentType::BackendDeveloper,
            ["backend_development", "api_design", "database_design"],
        ),
        Agent::new(
            "qa_tester",
            "Casey",
            AgentType::QaTester,
            ["testing", "test_automation", "quality_assurance"],
        ),
        Agent::new(
            "devops",
            "Taylor",
            AgentType::Devops,
            ["deployment", "ci_cd", "infrastructure"],
        ),
    ]
}

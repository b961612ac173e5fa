// Prompt templates handed to the execution capability
//
// Each role gets a system prompt; every task is framed with the same
// execution brief. Templates are versioned so executors can log which
// wording produced a result.

use std::collections::HashMap;

/// Prompt template structure
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the user template, replacing `{{key}}` placeholders
    ///
    /// Unknown placeholders are left as they are.
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        let mut rendered = self.user_template.clone();
        for (key, value) in variables {
            rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
        }
        rendered
    }
}

pub mod library {
    use super::PromptTemplate;
    use crate::domain::agent::AgentType;

    /// System prompt describing how an agent of `agent_type` works
    pub fn agent_system(agent_type: AgentType) -> PromptTemplate {
        let focus = match agent_type {
            AgentType::ProductManager => {
                "You turn requests into clear requirements, keep the team aligned and \
                 report progress to stakeholders."
            }
            AgentType::Architect => {
                "You design system structure, choose technologies and review technical \
                 decisions for consistency."
            }
            AgentType::Designer => {
                "You design user interfaces and flows and produce prototypes that \
                 developers can implement."
            }
            AgentType::FrontendDeveloper => {
                "You implement user interfaces faithfully to the design and wire them \
                 to backend APIs."
            }
            AgentType::BackendDeveloper => {
                "You implement APIs, data models and business logic with attention to \
                 correctness and performance."
            }
            AgentType::QaTester => {
                "You write and run tests, report defects precisely and verify fixes."
            }
            AgentType::Devops => {
                "You build pipelines, provision infrastructure and deploy releases safely."
            }
        };

        PromptTemplate {
            name: format!("agent_system_{}", agent_type),
            version: "1.0.0".to_string(),
            system: format!("You are the team's {}. {}", agent_type.title(), focus),
            user_template: "You are {{name}}. Your capabilities: {{capabilities}}.".to_string(),
        }
    }

    pub fn task_execution() -> PromptTemplate {
        PromptTemplate {
            name: "task_execution".to_string(),
            version: "1.0.0".to_string(),
            system: "You are completing one task of a larger software project. \
                     Respond with the deliverable only."
                .to_string(),
            user_template: "Task type: {{task_type}}\n\
                            Priority: {{priority}}\n\n\
                            {{description}}"
                .to_string(),
        }
    }
}

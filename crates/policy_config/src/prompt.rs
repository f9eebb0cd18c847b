use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::{ConfigError, PolicyConfig};

const DEFAULT_INSTRUCTIONS: &str = include_str!("../prompt/instructions.md");

/// Instruction template followed by the knowledge base document. Assembled
/// once at startup and shared read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct SystemPrompt(Arc<str>);

impl SystemPrompt {
    pub fn assemble(instructions: &str, knowledge_base: &str) -> Self {
        let mut prompt = String::with_capacity(instructions.len() + knowledge_base.len());
        prompt.push_str(instructions);
        prompt.push_str(knowledge_base);
        Self(prompt.into())
    }

    /// Reads the knowledge base (and the instruction template, when
    /// overridden) named by `config`.
    pub fn load(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let instructions = match &config.instructions_path {
            Some(path) => read(path).map_err(|source| ConfigError::Instructions {
                path: path.clone(),
                source,
            })?,
            None => DEFAULT_INSTRUCTIONS.to_string(),
        };

        let knowledge_base =
            read(&config.knowledge_base_path).map_err(|source| ConfigError::KnowledgeBase {
                path: config.knowledge_base_path.clone(),
                source,
            })?;
        tracing::info!(chars = knowledge_base.chars().count(), "Knowledge base loaded");

        let prompt = Self::assemble(&instructions, &knowledge_base);
        tracing::info!(chars = prompt.as_str().chars().count(), "System prompt assembled");
        Ok(prompt)
    }

    pub fn default_instructions() -> &'static str {
        DEFAULT_INSTRUCTIONS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SystemPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SystemPrompt")
            .field(&format_args!("<{} chars>", self.0.chars().count()))
            .finish()
    }
}

fn read(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

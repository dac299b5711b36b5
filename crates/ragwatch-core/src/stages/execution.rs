//! Stage 2: core execution monitoring.
//!
//! Observational bookkeeping of the expected path. The answering call itself
//! happens in the pipeline after this stage returns.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::domain::{ExecutionVerdict, ToolInvocation};
use crate::memory::ConversationBuffer;
use crate::obs;
use crate::stage::Stage;

pub const RETRIEVAL_STARTED: &str = "retrieval_started";
pub const REASONING_STARTED: &str = "reasoning_started";
pub const RESPONSE_GENERATION: &str = "response_generation";

/// Tool identifier recorded for the retrieval call.
pub const RETRIEVER_TOOL: &str = "vector_retriever";

pub fn monitor_execution(query: &str, memory: &mut ConversationBuffer) -> ExecutionVerdict {
    obs::emit_stage_entered(Stage::CoreExecution);

    let mut action_sequence = vec![RETRIEVAL_STARTED.to_string()];
    info!("document retrieval initiated");

    let tools_called = vec![ToolInvocation {
        tool: RETRIEVER_TOOL.to_string(),
        parameters: json!({ "query": query }),
        timestamp: Utc::now(),
    }];

    memory.add_user_message(query);
    let memory_context = Some(memory.buffer());

    action_sequence.push(REASONING_STARTED.to_string());
    action_sequence.push(RESPONSE_GENERATION.to_string());

    ExecutionVerdict {
        action_sequence,
        tools_called,
        memory_context,
        execution_successful: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_fixed_action_sequence() {
        let mut memory = ConversationBuffer::new();
        let v = monitor_execution("What is covered?", &mut memory);

        assert_eq!(
            v.action_sequence,
            vec![RETRIEVAL_STARTED, REASONING_STARTED, RESPONSE_GENERATION]
        );
        assert!(v.execution_successful);
    }

    #[test]
    fn records_retriever_invocation_with_query() {
        let mut memory = ConversationBuffer::new();
        let v = monitor_execution("What is covered?", &mut memory);

        assert_eq!(v.tools_called.len(), 1);
        assert_eq!(v.tools_called[0].tool, RETRIEVER_TOOL);
        assert_eq!(v.tools_called[0].parameters["query"], "What is covered?");
    }

    #[test]
    fn memory_context_accumulates_across_queries() {
        let mut memory = ConversationBuffer::new();
        monitor_execution("first", &mut memory);
        let v = monitor_execution("second", &mut memory);

        assert_eq!(
            v.memory_context.as_deref(),
            Some("Human: first\nHuman: second")
        );
    }
}

// Resume optimization: stage-1/2 prompts, the three-stage pipeline and its handlers.
// All LLM calls go through the llm_client gateway; nothing here talks HTTP to the model.

pub mod handlers;
pub mod pipeline;
pub mod prompts;

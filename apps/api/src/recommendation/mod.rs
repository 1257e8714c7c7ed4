// Property recommendations: prompt construction, completion call, and
// reconciliation of the model's answer against the catalog.
// All completion calls go through llm_client.

pub mod handlers;
pub mod prompts;
pub mod resolver;

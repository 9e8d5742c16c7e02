//! Minimal Azure OpenAI agent sample.
//!
//! Authentication is resolved in this order:
//!
//! 1. Service principal (`AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`,
//!    `AZURE_TENANT_ID`)
//! 2. Azure CLI session (`az login`)
//! 3. Developer-tools credential chain (fallback)
//!
//! The chat client reads `AZURE_OPENAI_ENDPOINT` and
//! `AZURE_OPENAI_CHAT_DEPLOYMENT_NAME` from the environment. The agent
//! answers with the local `get_weather` function tool.

use azure_agent_demo::agent::ChatAgent;
use azure_agent_demo::auth::resolve_credential;
use azure_agent_demo::chat::{ChatClient, ChatCredential};
use azure_agent_demo::error::AgentResult;
use azure_agent_demo::tools;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> AgentResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (credential, kind) = resolve_credential()?;
    println!("Using {kind} authentication");

    let client = ChatClient::builder()
        .credential(ChatCredential::token(credential))
        .build()?;

    let agent = ChatAgent::new(client, "WeatherAgent", "You are a helpful weather agent.")
        .with_tool(tools::weather_tool());

    let reply = agent.run("What's the weather like in Seattle?").await?;
    println!("{reply}");

    Ok(())
}

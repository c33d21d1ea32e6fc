//! Interactive chat loop.
//!
//! Reads one message per line from stdin. Ctrl-C cancels the message in
//! flight; `/quit` or end of input leaves the loop.

use std::sync::Arc;

use anyhow::Result;
use shopwise_application::{ChatError, ConversationOrchestrator, ToolExecutorPort};
use shopwise_domain::ChatRequest;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::commands::OutputFormat;
use crate::output::{format_outcome, metrics_table};

pub struct ChatRepl {
    orchestrator: Arc<ConversationOrchestrator>,
    executor: Arc<dyn ToolExecutorPort>,
    conversation_id: i64,
    user_id: String,
    credentials: Option<String>,
    format: OutputFormat,
}

impl ChatRepl {
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        executor: Arc<dyn ToolExecutorPort>,
        conversation_id: i64,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            executor,
            conversation_id,
            user_id: user_id.into(),
            credentials: None,
            format: OutputFormat::Text,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<String>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub async fn run(&self) -> Result<()> {
        println!("Shopwise chat (conversation {}). Type /help for commands.", self.conversation_id);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            match line {
                "" => continue,
                "/quit" | "/exit" => break,
                "/help" => {
                    println!("/metrics  show per-tool metrics\n/quit     leave the chat");
                    continue;
                }
                "/metrics" => {
                    println!("{}", metrics_table(&self.executor.metrics()));
                    continue;
                }
                _ => {}
            }

            self.send(line).await;
        }
        Ok(())
    }

    async fn send(&self, message: &str) {
        let mut request = ChatRequest::new(message, self.user_id.clone())
            .with_conversation(self.conversation_id);
        if let Some(credentials) = &self.credentials {
            request = request.with_credentials(credentials.clone());
        }

        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        match self.orchestrator.handle(request, &cancel).await {
            Ok(outcome) => println!("{}\n", format_outcome(&outcome, self.format)),
            Err(ChatError::Cancelled) => println!("(cancelled)\n"),
            Err(e) => {
                warn!(error = %e, "Chat request rejected");
                println!("Error: {}\n", e);
            }
        }
        watcher.abort();
    }
}

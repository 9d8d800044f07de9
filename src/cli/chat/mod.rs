pub mod conversation_state;
pub mod interpreter;
pub mod prompt;

use std::io::Write;
use std::process::ExitCode;

use conversation_state::ConversationState;
use eyre::{Result, bail};
use prompt::generate_prompt;
use tracing::debug;

use crate::generation_client::GenerationClient;
use crate::message::{RenderedMessage, Segment};

const WELCOME_TEXT: &str = "
Hi, I'm Deck Chat. Tell me what to make a presentation about.

Things to try
• Create a presentation about AI trends with 5 slides
• Make a deck about async Rust
• Summarize these into 8 slides: https://example.com

/help         Show the help dialogue
/quit         Quit the application
";

const HELP_TEXT: &str = "
Deck Chat CLI

/clear        Clear the conversation history
/help         Show this help dialogue
/quit         Quit the application

The first line of a prompt becomes the presentation topic. Prompts may
include source URLs and a \"<N> slides\" hint (default 6).
";

pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    conversation_state: ConversationState,
    in_flight: bool,
    generation_client: Option<GenerationClient>,
}

impl ChatContext {
    pub fn new(output: Box<dyn Write>, input: Option<String>, interactive: bool) -> Self {
        Self {
            output,
            input,
            interactive,
            conversation_state: ConversationState::new(),
            in_flight: false,
            generation_client: None,
        }
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        // Initialize generation client from the environment
        self.generation_client = match GenerationClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                writeln!(self.output, "Failed to initialize generation client: {}", e)?;
                return Ok(ExitCode::FAILURE);
            }
        };

        if self.interactive {
            self.print_welcome()?;
        }

        // Handle non-interactive mode (single prompt)
        if let Some(input) = self.input.take() {
            self.handle_input(&input).await?;
            return Ok(ExitCode::SUCCESS);
        }

        if self.interactive {
            self.run_interactive().await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", WELCOME_TEXT)?;
        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;

        loop {
            let prompt_text = generate_prompt(None);
            let readline = rl.readline(&prompt_text);

            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line.as_str());

                    if line.trim() == "/quit" {
                        break;
                    }

                    if let Err(e) = self.handle_input(&line).await {
                        writeln!(self.output, "Error: {}", e)?;
                    }
                }
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<()> {
        match input.trim() {
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            "/clear" => {
                self.conversation_state.clear();
                writeln!(self.output, "Conversation cleared.")?;
            }
            _ => {
                self.process_chat_input(input).await?;
            }
        }

        Ok(())
    }

    /// One send cycle: append the User entry, perform the round trip,
    /// append exactly one Assistant entry. A second send attempted
    /// while one is outstanding is rejected, not queued.
    async fn process_chat_input(&mut self, input: &str) -> Result<()> {
        if self.in_flight {
            writeln!(
                self.output,
                "A request is already in flight; wait for it to finish."
            )?;
            return Ok(());
        }

        let Some(client) = self.generation_client.as_ref() else {
            bail!("generation client not initialized");
        };

        let request = interpreter::interpret(input);
        debug!("Interpreted prompt as {:?}", request);

        self.conversation_state.push_user(input);
        self.in_flight = true;
        writeln!(self.output, "Generating PowerPoint...")?;

        let message = client.send(&request).await;

        self.in_flight = false;
        self.display_message(&message)?;
        self.conversation_state.push_assistant(message.to_string());

        Ok(())
    }

    fn display_message(&mut self, message: &RenderedMessage) -> Result<()> {
        for segment in message.segments() {
            match segment {
                Segment::Text(line) => {
                    writeln!(self.output, "{}", line)?;
                }
                Segment::Link { label, url } => {
                    // The URL goes on its own line so terminals keep it clickable
                    writeln!(self.output, "{}:", label)?;
                    writeln!(self.output, "  {}", url)?;
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn conversation(&self) -> &ConversationState {
        &self.conversation_state
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::conversation_state::Role;
    use super::*;

    fn context_with_endpoint(endpoint: &str) -> ChatContext {
        let mut context = ChatContext::new(Box::new(io::sink()), None, false);
        context.generation_client = Some(GenerationClient::new(endpoint).unwrap());
        context
    }

    #[tokio::test]
    async fn send_cycle_appends_user_then_assistant() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"download_url": "https://x/y.pptx"}"#)
            .create_async()
            .await;

        let mut context = context_with_endpoint(&server.url());
        context
            .process_chat_input("Make a deck about cats with 3 slides")
            .await
            .unwrap();

        let entries = context.conversation().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Assistant);
        assert!(entries[1].content.contains("PowerPoint created successfully"));
        assert!(!context.in_flight);
    }

    #[tokio::test]
    async fn failed_cycle_still_appends_one_assistant_entry() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let mut context = context_with_endpoint(&server.url());
        context.process_chat_input("Make a deck").await.unwrap();

        let entries = context.conversation().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].role, Role::Assistant);
        assert!(entries[1].content.starts_with("Error:"));
        assert!(!context.in_flight);
    }

    #[tokio::test]
    async fn in_flight_guard_rejects_a_second_send() {
        let mut context = context_with_endpoint("http://127.0.0.1:9/");
        context.in_flight = true;

        context.process_chat_input("another prompt").await.unwrap();

        assert!(context.conversation().is_empty());
    }

    #[tokio::test]
    async fn clear_command_resets_conversation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{}"#)
            .create_async()
            .await;

        let mut context = context_with_endpoint(&server.url());
        context.process_chat_input("Make a deck").await.unwrap();
        context.handle_input("/clear").await.unwrap();

        assert!(context.conversation().is_empty());
    }
}

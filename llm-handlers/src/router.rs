//! Command and reaction router: the profiling opt-in flow on top of the stores and the
//! completion client.
//!
//! Every handler reads the conversation's state fresh from disk, so two events for the same chat
//! must not run concurrently; the dispatcher serializes them per chat.

use dbot_core::{Bot, Chat, Message, Reaction, Result};
use llm_client::CompletionClient;
use prompt::{Message as PromptMessage, Role};
use std::sync::Arc;
use storage::{ChatHistorial, HistorialUpdate, StorageError, UserRecord};
use tracing::{error, info, instrument, warn};

use crate::context::AppContext;
use crate::replies;
use crate::state::{ConversationState, ProfilingReaction};

/// A parsed chat command with its argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Chat(String),
    Profile(String),
    Help,
}

/// What the router did with an event. Mostly for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    ProfilingPrompted,
    ReactionReminder,
    ProfileReminder,
    ProfileAlreadyDecided,
    ProfilingAccepted,
    ProfilingDeclined,
    ProfileSet,
    Replied,
    EmptyPrompt,
    Help,
    Ignored,
    Failed,
}

#[derive(Clone)]
pub struct ChatRouter {
    ctx: AppContext,
    bot: Arc<dyn Bot>,
}

impl ChatRouter {
    pub fn new(ctx: AppContext, bot: Arc<dyn Bot>) -> Self {
        Self { ctx, bot }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    // ---------- Commands ----------

    /// Handles `/chat`, `/profile` and `/help`. Errors returned here are transport errors from
    /// the bot; store and API failures are reported to the user and come back as
    /// [`RouteOutcome::Failed`].
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle_command(
        &self,
        message: &Message,
        command: ChatCommand,
    ) -> Result<RouteOutcome> {
        if command == ChatCommand::Help {
            self.bot.reply_to(message, replies::HELP).await?;
            return Ok(RouteOutcome::Help);
        }

        let user = match self.ensure_user(&message.user) {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "Failed to register user");
                return self.fail(&message.chat).await;
            }
        };
        let user_key = user.key();
        let chat_key = message.chat.id.to_string();

        let historial = match self.ctx.historials.load(&user_key, &chat_key) {
            Ok(historial) => historial,
            Err(e) => {
                error!(error = %e, "Failed to load chat historial");
                return self.fail(&message.chat).await;
            }
        };
        let state = ConversationState::of(historial.as_ref());
        info!(?state, "Routing command");

        match (state, command) {
            (ConversationState::New, _) => {
                self.prompt_profiling(message, &user_key, &chat_key, &user.name)
                    .await
            }
            (ConversationState::AwaitingProfileReaction, _) => {
                self.bot.reply_to(message, replies::REACT_FIRST).await?;
                Ok(RouteOutcome::ReactionReminder)
            }
            (ConversationState::ProfilingAccepted, ChatCommand::Chat(_)) => {
                self.bot.reply_to(message, replies::PROFILE_FIRST).await?;
                Ok(RouteOutcome::ProfileReminder)
            }
            (ConversationState::ProfilingAccepted, ChatCommand::Profile(text)) => {
                self.set_profile(message, user, &chat_key, text.trim()).await
            }
            (_, ChatCommand::Profile(_)) => {
                self.bot
                    .reply_to(message, replies::PROFILE_ALREADY_DECIDED)
                    .await?;
                Ok(RouteOutcome::ProfileAlreadyDecided)
            }
            (_, ChatCommand::Chat(text)) => self.chat(message, user, &chat_key, text.trim()).await,
            (_, ChatCommand::Help) => Ok(RouteOutcome::Help),
        }
    }

    /// First contact in a chat: send the opt-in prompt and create an empty history tied to it.
    async fn prompt_profiling(
        &self,
        message: &Message,
        user_key: &str,
        chat_key: &str,
        author_name: &str,
    ) -> Result<RouteOutcome> {
        let prompt_id = self
            .bot
            .send_message_and_return_id(&message.chat, &replies::profiling_prompt(author_name))
            .await?;
        let prompt_id = Some(prompt_id).filter(|id| !id.is_empty());
        if let Err(e) = self.ctx.historials.create(user_key, chat_key, prompt_id) {
            error!(error = %e, "Failed to create chat historial");
            return self.fail(&message.chat).await;
        }
        Ok(RouteOutcome::ProfilingPrompted)
    }

    /// Sends the profile as a system message, relays the acknowledgement, and stores the profile
    /// as the last message of the history.
    async fn set_profile(
        &self,
        message: &Message,
        user: UserRecord,
        chat_key: &str,
        profile: &str,
    ) -> Result<RouteOutcome> {
        if profile.is_empty() {
            self.bot.reply_to(message, replies::PROFILE_INSTRUCTIONS).await?;
            return Ok(RouteOutcome::EmptyPrompt);
        }
        let user_key = user.key();
        let client = self.completion_client(user);

        let ack = match client
            .send_chat_completion(chat_key, profile, Role::System, false, false)
            .await
        {
            Ok(response) => response.first_content().map(str::to_string),
            Err(e) => {
                error!(error = %e, "Profile completion failed");
                return self.fail(&message.chat).await;
            }
        };

        let update = HistorialUpdate::system_profile(PromptMessage::system(profile));
        if let Err(e) = self.ctx.historials.update(&user_key, chat_key, update) {
            error!(error = %e, "Failed to store system profile");
            return self.fail(&message.chat).await;
        }

        let text = ack
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| replies::PROFILE_SET.to_string());
        self.bot.send_message(&message.chat, &text).await?;
        Ok(RouteOutcome::ProfileSet)
    }

    /// Relays a user prompt through the stored history and persists the exchange.
    async fn chat(
        &self,
        message: &Message,
        user: UserRecord,
        chat_key: &str,
        text: &str,
    ) -> Result<RouteOutcome> {
        if text.is_empty() {
            self.bot.reply_to(message, replies::EMPTY_PROMPT).await?;
            return Ok(RouteOutcome::EmptyPrompt);
        }
        let client = self.completion_client(user);

        let response = match client
            .send_chat_completion(chat_key, text, Role::User, true, true)
            .await
        {
            Ok(response) => response,
            Err(e) => match e.unsaved_response() {
                Some(response) => {
                    warn!(error = %e, "Delivering reply that could not be saved");
                    response.clone()
                }
                None => {
                    error!(error = %e, "Chat completion failed");
                    return self.fail(&message.chat).await;
                }
            },
        };

        match response.first_content() {
            Some(reply) if !reply.trim().is_empty() => {
                self.bot.send_message(&message.chat, reply).await?;
                Ok(RouteOutcome::Replied)
            }
            _ => {
                warn!("Completion returned an empty reply");
                self.fail(&message.chat).await
            }
        }
    }

    // ---------- Reactions ----------

    /// Records the answer to the profiling prompt. Reactions on other messages, unknown emoji,
    /// and repeated answers are ignored.
    #[instrument(skip(self, reaction), fields(user_id = reaction.user.id, chat_id = reaction.chat.id))]
    pub async fn handle_reaction(&self, reaction: &Reaction) -> Result<RouteOutcome> {
        let Some(answer) = ProfilingReaction::from_emojis(&reaction.emojis) else {
            return Ok(RouteOutcome::Ignored);
        };
        let user_key = reaction.user.id.to_string();
        let chat_key = reaction.chat.id.to_string();

        let historial = match self.ctx.historials.load(&user_key, &chat_key) {
            Ok(Some(historial)) => historial,
            Ok(None) => return Ok(RouteOutcome::Ignored),
            Err(e) => {
                error!(error = %e, "Failed to load chat historial");
                return self.fail(&reaction.chat).await;
            }
        };
        if !Self::is_profiling_prompt(&historial, &reaction.message_id) {
            return Ok(RouteOutcome::Ignored);
        }
        if historial.reacted_to_profiling_step {
            info!("Profiling step already answered");
            return Ok(RouteOutcome::Ignored);
        }

        let update = HistorialUpdate::reaction(answer.is_positive());
        if let Err(e) = self.ctx.historials.update(&user_key, &chat_key, update) {
            error!(error = %e, "Failed to record profiling reaction");
            return self.fail(&reaction.chat).await;
        }

        if answer.is_positive() {
            self.bot
                .send_message(&reaction.chat, replies::PROFILE_INSTRUCTIONS)
                .await?;
            Ok(RouteOutcome::ProfilingAccepted)
        } else {
            self.bot
                .send_message(&reaction.chat, replies::PROFILING_DECLINED)
                .await?;
            Ok(RouteOutcome::ProfilingDeclined)
        }
    }

    /// Without a stored prompt id any message in the chat counts.
    fn is_profiling_prompt(historial: &ChatHistorial, message_id: &str) -> bool {
        match historial.message_to_react_id.as_deref() {
            Some(id) => id == message_id,
            None => true,
        }
    }

    // ---------- Helpers ----------

    /// Returns the stored user, registering it on first contact.
    fn ensure_user(&self, author: &dbot_core::User) -> storage::Result<UserRecord> {
        let key = author.id.to_string();
        if let Some(existing) = self.ctx.users.load(&key)? {
            return Ok(existing);
        }
        let record = UserRecord::new(author.id, author.username.clone(), author.display_name());
        match self.ctx.users.create(&record) {
            Ok(_) => {
                info!(user_id = author.id, "Registered new user");
                Ok(record)
            }
            // First commands from two chats can race; the other one registered the user.
            Err(StorageError::AlreadyExists(_)) => {
                Ok(self.ctx.users.load(&key)?.unwrap_or(record))
            }
            Err(e) => Err(e),
        }
    }

    /// Credentials were checked once in [`AppContext::connect`]; no per-command token check.
    fn completion_client(&self, user: UserRecord) -> CompletionClient {
        CompletionClient::new(
            self.ctx.llm.clone(),
            user,
            self.ctx.model.clone(),
            self.ctx.historials.clone(),
        )
    }

    async fn fail(&self, chat: &Chat) -> Result<RouteOutcome> {
        self.bot.send_message(chat, replies::GENERIC_ERROR).await?;
        Ok(RouteOutcome::Failed)
    }
}

//! The bot's command set.

use llm_handlers::ChatCommand;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "talk with the bot: /chat <message>")]
    Chat(String),
    #[command(description = "give the bot a persona: /profile <description>")]
    Profile(String),
    #[command(description = "show this help")]
    Help,
}

impl From<Command> for ChatCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Chat(text) => ChatCommand::Chat(text),
            Command::Profile(text) => ChatCommand::Profile(text),
            Command::Help => ChatCommand::Help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/chat hello there", "dbot").unwrap(),
            Command::Chat("hello there".into())
        );
        assert_eq!(
            Command::parse("/profile a pirate", "dbot").unwrap(),
            Command::Profile("a pirate".into())
        );
        assert_eq!(Command::parse("/help", "dbot").unwrap(), Command::Help);
        assert!(Command::parse("/unknown", "dbot").is_err());
    }

    #[test]
    fn test_into_chat_command() {
        let command: ChatCommand = Command::Profile("a pirate".into()).into();
        assert_eq!(command, ChatCommand::Profile("a pirate".into()));
    }
}

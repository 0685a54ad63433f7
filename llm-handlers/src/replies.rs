//! User-facing reply texts.

/// Asks the user to opt in or out of the profiling step. `{name}` is the author's name.
pub const PROFILING_PROMPT: &str = "Hi {name}! Looks like this is the first time we talk in this chat. \
Do you want me to take on a specific profile? React with ✅ (or 👍) to give me one, \
or with ❌ (or 👎) to just keep chatting...";

pub const REACT_FIRST: &str =
    "Please react to my previous message with ✅ or ❌ so we can continue our conversation.";

pub const PROFILE_INSTRUCTIONS: &str = "Great! Send /profile followed by who you want me to be, \
for example: /profile a grumpy pirate who loves poetry.";

pub const PROFILE_FIRST: &str =
    "I'm still waiting for my profile. Send /profile followed by a description first.";

pub const PROFILING_DECLINED: &str =
    "No problem! Just use /chat followed by your message to talk with me.";

pub const PROFILE_ALREADY_DECIDED: &str =
    "The profile for this chat has already been decided.";

pub const PROFILE_SET: &str = "Profile saved. Use /chat to start talking.";

pub const EMPTY_PROMPT: &str = "Please add some text after the command, for example: /chat hello.";

pub const GENERIC_ERROR: &str = "Something went wrong on my side. Please contact an admin.";

pub const HELP: &str = "/chat <message> - talk with me\n\
/profile <description> - give me a persona (after accepting the profiling step)\n\
/help - show this message";

pub fn profiling_prompt(author_name: &str) -> String {
    PROFILING_PROMPT.replace("{name}", author_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiling_prompt_names_the_author() {
        let text = profiling_prompt("Ada");
        assert!(text.starts_with("Hi Ada!"));
        assert!(text.contains('✅') && text.contains('❌'));
    }
}

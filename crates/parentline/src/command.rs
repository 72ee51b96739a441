//! Input line parsing.

use std::path::PathBuf;

use parentline_api::UserId;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show conversations, newest first.
    List,
    /// Show the peer directory.
    Peers,
    /// Open the conversation with a peer.
    Open(UserId),
    /// Add a file to the draft.
    Attach(PathBuf),
    /// Remove a draft attachment by index.
    Drop(usize),
    /// Start a new conversation.
    Start {
        /// Peer to contact.
        peer: UserId,
        /// First message.
        text: String,
    },
    /// Show available commands.
    Help,
    /// Leave.
    Quit,
    /// Send text to the open conversation.
    Send(String),
}

impl Command {
    /// Parses a line. Lines not starting with `/` are message text.
    ///
    /// # Errors
    ///
    /// Returns a usage hint for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Send(line.to_string()));
        };

        let (name, args) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(name, args)| (name, args.trim()));

        match name {
            "list" => Ok(Self::List),
            "peers" => Ok(Self::Peers),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "open" if !args.is_empty() => Ok(Self::Open(UserId::from(args))),
            "attach" if !args.is_empty() => Ok(Self::Attach(PathBuf::from(args))),
            "drop" => args
                .parse()
                .map(Self::Drop)
                .map_err(|_| "usage: /drop <index>".to_string()),
            "start" => match args.split_once(char::is_whitespace) {
                Some((peer, text)) => Ok(Self::Start {
                    peer: UserId::from(peer),
                    text: text.trim().to_string(),
                }),
                None => Err("usage: /start <peer> <message>".to_string()),
            },
            "open" => Err("usage: /open <peer>".to_string()),
            "attach" => Err("usage: /attach <path>".to_string()),
            other => Err(format!("unknown command /{other}; try /help")),
        }
    }
}

/// Command summary printed by `/help`.
pub const HELP: &str = "\
/list                  conversations, newest first
/peers                 contacts you can message
/open <peer>           open a conversation
/attach <path>         add a file to the message
/drop <index>          remove an attached file
/start <peer> <text>   start a new conversation
/quit                  leave
anything else          send to the open conversation";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_send() {
        assert_eq!(
            Command::parse("Hello there\n").unwrap(),
            Command::Send("Hello there".into())
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse("/list").unwrap(), Command::List);
        assert_eq!(
            Command::parse("/open t1").unwrap(),
            Command::Open("t1".into())
        );
        assert_eq!(Command::parse("/drop 2").unwrap(), Command::Drop(2));
        assert_eq!(
            Command::parse("/attach ./report card.pdf").unwrap(),
            Command::Attach(PathBuf::from("./report card.pdf"))
        );
        assert_eq!(
            Command::parse("/start t1 Hello, Ms. Amina").unwrap(),
            Command::Start {
                peer: "t1".into(),
                text: "Hello, Ms. Amina".into()
            }
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(Command::parse("/open").is_err());
        assert!(Command::parse("/drop x").is_err());
        assert!(Command::parse("/start t1").is_err());
        assert!(Command::parse("/frobnicate").is_err());
    }
}

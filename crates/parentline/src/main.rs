//! `parentline` - headless terminal driver for the messaging engine.
//!
//! Reads commands from stdin and push events from the server on one event
//! loop. Logs go to stderr; set `RUST_LOG` to change verbosity.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod command;
mod render;

use anyhow::Context;
use parentline_api::{Client, LocalFile, MessagingApi};
use parentline_core::{Messenger, Settings};
use parentline_push::{PushClient, PushEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use command::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parentline=info,parentline_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = Settings::default_path();
    let mut settings = Settings::load(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    settings.apply_env()?;

    let session = settings.session()?;
    info!(user = %session.user_id(), role = %session.role(), "starting parentline");

    let client = Client::new(settings.api_config()?, session.clone())?;
    let mut messenger = Messenger::new(client, &session, settings.engine_options());

    // Failures here are shown by the list and retried on demand.
    let _ = messenger.hydrate().await;
    let _ = messenger.load_peers().await;
    render::conversations(messenger.engine());

    let mut push = PushClient::connect(settings.push_config()?, &session)?;
    let mut push_alive = true;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = push.next_event(), if push_alive => match event {
                Some(PushEvent::Message(message)) => {
                    let shown = message.clone();
                    if messenger.handle_push_event(PushEvent::Message(message)).await {
                        render::pushed(messenger.engine_mut(), &shown);
                    }
                }
                Some(event) => {
                    if messenger.handle_push_event(event).await {
                        render::timeline(messenger.engine_mut());
                    }
                }
                None => {
                    tracing::warn!("push channel stopped; updates arrive on /list and /open only");
                    push_alive = false;
                }
            },
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if !handle_line(&mut messenger, &line).await {
                    break;
                }
            }
        }
    }

    push.disconnect().await;
    messenger.reset();
    Ok(())
}

/// Runs one input line. Returns false to quit.
async fn handle_line<A: MessagingApi>(messenger: &mut Messenger<A>, line: &str) -> bool {
    let parsed = match Command::parse(line) {
        Ok(parsed) => parsed,
        Err(usage) => {
            println!("{usage}");
            return true;
        }
    };

    match parsed {
        Command::Quit => return false,
        Command::Help => println!("{}", command::HELP),
        Command::List => {
            let _ = messenger.hydrate().await;
            render::conversations(messenger.engine());
        }
        Command::Peers => {
            let _ = messenger.load_peers().await;
            render::peers(messenger.engine());
        }
        Command::Open(peer) => {
            let _ = messenger.open_conversation(peer).await;
            render::timeline(messenger.engine_mut());
        }
        Command::Attach(path) => match LocalFile::from_path(&path).await {
            Ok(file) if file.is_empty() => println!("! {} is empty", path.display()),
            Ok(file) => match messenger.draft_mut().attach(file) {
                Ok(()) => render::draft(messenger.draft()),
                Err(e) => println!("! {e}"),
            },
            Err(e) => println!("! cannot read {}: {e}", path.display()),
        },
        Command::Drop(index) => {
            messenger.remove_local_attachment(index);
            render::draft(messenger.draft());
        }
        Command::Start { peer, text } => match messenger.start_conversation(&peer, &text).await {
            Ok(_) => render::timeline(messenger.engine_mut()),
            Err(e) => println!("! {e}"),
        },
        Command::Send(text) => {
            if messenger.engine().open_peer().is_none() {
                println!("Open a conversation first (/open <peer>).");
                return true;
            }
            messenger.draft_mut().content = text;
            match messenger.send().await {
                Ok(Some(sent)) => {
                    messenger.engine_mut().take_autoscroll();
                    render::message(messenger.engine(), &sent);
                }
                Ok(None) => {}
                Err(_) => render::status(messenger),
            }
        }
    }
    true
}

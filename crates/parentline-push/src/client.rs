//! Push channel client and its background socket task.

use futures::{Sink, SinkExt, StreamExt};
use parentline_api::{Message, Session, UserId};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::PushConfig;
use crate::error::{Error, Result};
use crate::frame::{self, ServerEvent};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Event delivered to the owner of a [`PushHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The socket is open and `join` has been sent.
    Connected {
        /// True for every connection after the first.
        reconnect: bool,
    },
    /// A message was pushed by the server.
    Message(Message),
    /// The connection was lost or could not be established.
    Disconnected(String),
}

#[derive(Debug)]
enum Command {
    Join(UserId),
    Disconnect,
}

/// Why a connected session ended.
enum Outcome {
    Shutdown,
    Lost(String),
}

/// Entry point of the push channel.
#[derive(Debug, Clone, Copy)]
pub struct PushClient;

impl PushClient {
    /// Starts the push channel for `session`.
    ///
    /// The socket is owned by a background task that connects, sends
    /// `join` with the session's user id, and reconnects after failures.
    /// Connection failures are reported as [`PushEvent::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns an error if the upgrade request cannot be built from the
    /// configuration and session token.
    pub fn connect(config: PushConfig, session: &Session) -> Result<PushHandle> {
        let auth = HeaderValue::from_str(&session.bearer())?;
        upgrade_request(&config, &auth)?;

        let (event_tx, event_rx) = mpsc::channel(config.event_buffer);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            config,
            auth,
            user_id: session.user_id().clone(),
            events: event_tx,
            commands: command_rx,
        };
        let task = tokio::spawn(worker.run());

        Ok(PushHandle {
            events: event_rx,
            commands: command_tx,
            task: Some(task),
        })
    }
}

/// Handle owning one push connection.
///
/// Dropping the handle aborts the background task; [`PushHandle::disconnect`]
/// closes the socket cleanly first.
#[derive(Debug)]
pub struct PushHandle {
    events: mpsc::Receiver<PushEvent>,
    commands: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<()>>,
}

impl PushHandle {
    /// Waits for the next event.
    ///
    /// Returns `None` once the background task has stopped.
    pub async fn next_event(&mut self) -> Option<PushEvent> {
        self.events.recv().await
    }

    /// Re-registers the connection under `user_id`.
    ///
    /// The id is also used for every later reconnect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the background task has stopped.
    pub fn join(&self, user_id: UserId) -> Result<()> {
        self.commands
            .send(Command::Join(user_id))
            .map_err(|_| Error::Closed)
    }

    /// Sends a close frame and waits for the background task to finish.
    pub async fn disconnect(mut self) {
        self.events.close();
        let _ = self.commands.send(Command::Disconnect);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "push task ended abnormally");
            }
        }
        tracing::info!("push channel disconnected");
    }
}

impl Drop for PushHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn upgrade_request(config: &PushConfig, auth: &HeaderValue) -> Result<Request> {
    let mut request = config.url.as_str().into_client_request()?;
    request.headers_mut().insert(AUTHORIZATION, auth.clone());
    Ok(request)
}

struct Worker {
    config: PushConfig,
    auth: HeaderValue,
    user_id: UserId,
    events: mpsc::Sender<PushEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl Worker {
    async fn run(mut self) {
        let mut failures: u32 = 0;
        let mut connected_before = false;

        loop {
            let Some(opened) = self.open_or_stop().await else {
                tracing::debug!("push channel stopped while connecting");
                return;
            };
            match opened {
                Ok(socket) => {
                    failures = 0;
                    let reconnect = connected_before;
                    connected_before = true;
                    match self.serve(socket, reconnect).await {
                        Outcome::Shutdown => return,
                        Outcome::Lost(reason) => {
                            tracing::warn!(reason = %reason, "push connection lost");
                            if !self.emit(PushEvent::Disconnected(reason)).await {
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(url = %self.config.url, error = %e, "push connect failed");
                    if !self.emit(PushEvent::Disconnected(e.to_string())).await {
                        return;
                    }
                }
            }

            failures += 1;
            if self
                .config
                .max_reconnect_attempts
                .is_some_and(|max| failures > max)
            {
                tracing::warn!(attempts = failures, "giving up on push channel");
                return;
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.reconnect_delay) => {}
                command = self.commands.recv() => match command {
                    Some(Command::Join(user_id)) => self.user_id = user_id,
                    Some(Command::Disconnect) | None => return,
                },
            }
        }
    }

    /// Connects while still listening for commands.
    ///
    /// Returns `None` if a disconnect arrives before the handshake finishes.
    async fn open_or_stop(&mut self) -> Option<Result<Socket>> {
        let request = match upgrade_request(&self.config, &self.auth) {
            Ok(request) => request,
            Err(e) => return Some(Err(e)),
        };
        let connecting = open(request, self.config.url.clone());
        tokio::pin!(connecting);

        loop {
            tokio::select! {
                result = &mut connecting => return Some(result),
                command = self.commands.recv() => match command {
                    Some(Command::Join(user_id)) => self.user_id = user_id,
                    Some(Command::Disconnect) | None => return None,
                },
            }
        }
    }

    async fn serve(&mut self, socket: Socket, reconnect: bool) -> Outcome {
        let (mut sink, mut stream) = socket.split();

        if let Err(e) = send_join(&mut sink, &self.user_id).await {
            return Outcome::Lost(e.to_string());
        }
        if !self.emit(PushEvent::Connected { reconnect }).await {
            let _ = sink.send(WsMessage::Close(None)).await;
            return Outcome::Shutdown;
        }

        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if !self.handle_text(&text).await {
                            return Outcome::Shutdown;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        return Outcome::Lost("closed by server".to_string());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Outcome::Lost(e.to_string()),
                },
                command = self.commands.recv() => match command {
                    Some(Command::Join(user_id)) => {
                        self.user_id = user_id;
                        if let Err(e) = send_join(&mut sink, &self.user_id).await {
                            return Outcome::Lost(e.to_string());
                        }
                    }
                    Some(Command::Disconnect) | None => {
                        let _ = sink.send(WsMessage::Close(None)).await;
                        return Outcome::Shutdown;
                    }
                },
            }
        }
    }

    /// Returns false once nobody is listening for events.
    async fn handle_text(&self, text: &str) -> bool {
        match frame::decode(text) {
            Ok(ServerEvent::NewMessage(message)) => {
                tracing::debug!(id = ?message.id, sender = %message.sender_id(), "push message");
                self.emit(PushEvent::Message(message)).await
            }
            Ok(ServerEvent::Unknown(event)) => {
                tracing::debug!(event = %event, "ignoring push event");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable push frame");
                true
            }
        }
    }

    async fn emit(&self, event: PushEvent) -> bool {
        self.events.send(event).await.is_ok()
    }
}

async fn open(request: Request, url: Url) -> Result<Socket> {
    let (socket, _) = tokio_tungstenite::connect_async(request).await?;
    tracing::info!(url = %url, "push channel connected");
    Ok(socket)
}

async fn send_join<S>(sink: &mut S, user_id: &UserId) -> Result<()>
where
    S: Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let text = frame::encode_join(user_id)?;
    sink.send(WsMessage::Text(text)).await?;
    tracing::info!(user = %user_id, "joined push channel");
    Ok(())
}

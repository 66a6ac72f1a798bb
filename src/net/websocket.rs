use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::logger;
use crate::net::connection::{Connector, SessionEvent, SessionId, Transport, TransportEvent};
use crate::net::events::ClientEvent;
use crate::utils::errors::NetworkError;

enum Outbound {
    Text(String),
    Close,
}

/// Opens real websocket sessions, one background task per session.
///
/// Each task forwards what it reads to the event loop as `ClientEvent::Transport`
/// and writes whatever the matching `WsTransport` queues. It must be used from
/// inside a tokio runtime.
pub struct WsConnector {
    events: UnboundedSender<ClientEvent>,
}

impl WsConnector {
    pub fn new(events: UnboundedSender<ClientEvent>) -> Self {
        Self { events }
    }
}

impl Connector for WsConnector {
    fn open(&mut self, session: SessionId, url: &str) -> Result<Box<dyn Transport>, NetworkError> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_session(
            session,
            url.to_string(),
            outbound_rx,
            self.events.clone(),
        ));
        Ok(Box::new(WsTransport {
            outbound: outbound_tx,
        }))
    }
}

pub struct WsTransport {
    outbound: UnboundedSender<Outbound>,
}

impl Transport for WsTransport {
    fn send_text(&mut self, text: String) -> Result<(), NetworkError> {
        self.outbound
            .send(Outbound::Text(text))
            .map_err(|_| NetworkError::SendError("session task has stopped".to_string()))
    }

    fn close(&mut self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}

fn report(events: &UnboundedSender<ClientEvent>, session: SessionId, event: SessionEvent) {
    let _ = events.send(ClientEvent::Transport(TransportEvent { session, event }));
}

/// Drives one websocket session until either side closes it.
///
/// Always finishes by reporting `SessionEvent::Closed`, including when the
/// connection could not be established at all.
async fn run_session(
    session: SessionId,
    url: String,
    mut outbound: UnboundedReceiver<Outbound>,
    events: UnboundedSender<ClientEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(error) => {
            logger!(ERROR, "[SESSION] Could not connect to `{url}` ({error})");
            report(&events, session, SessionEvent::Closed);
            return;
        }
    };

    logger!(DEBUG, "[SESSION] Connected to `{url}`");
    report(&events, session, SessionEvent::Opened);
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            outgoing = outbound.recv() => match outgoing {
                Some(Outbound::Text(text)) => {
                    if let Err(error) = write.send(Message::text(text)).await {
                        logger!(ERROR, "[SESSION] Failed to write to `{url}` ({error})");
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = write.close().await;
                    break;
                }
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    report(&events, session, SessionEvent::Message(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    logger!(WARN, "[SESSION] Read error on `{url}` ({error})");
                    break;
                }
            },
        }
    }

    report(&events, session, SessionEvent::Closed);
}

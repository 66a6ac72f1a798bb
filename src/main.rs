use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use durak_client::game::gesture::ActionSink;
use durak_client::game::identity_store::FileIdentityStore;
use durak_client::game::instance::ClientInstance;
use durak_client::game::reconciler::ChangeSet;
use durak_client::logger;
use durak_client::models::settings::Settings;
use durak_client::net::events::ClientEvent;
use durak_client::net::rest::HttpRoomService;
use durak_client::net::websocket::WsConnector;
use durak_client::render::commands::{parse_command, Command, HELP};
use durak_client::render::frame::Frame;
use durak_client::utils::errors::{FlowError, SettingsError};
use durak_client::utils::logger::{LogLevel, Logger};

const TICK: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "durak-client")]
#[command(about = "Terminal client for online Durak rooms")]
struct Args {
    /// Invite link or room code to join on start
    #[arg(long)]
    link: Option<String>,

    /// Settings file (defaults to ./durak-client.toml when present)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), SettingsError> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    Logger::set_level(LogLevel::parse(&settings.log_level));
    logger!(INFO, "[CLIENT] Using server `{}`", settings.base_url());

    let (events, mut inbox) = mpsc::unbounded_channel();
    let connector = WsConnector::new(events.clone());
    let store = FileIdentityStore::open(&settings.identity_file);
    let rooms = HttpRoomService::new(settings.base_url(), events.clone());
    let mut client = ClientInstance::new(settings, Box::new(connector), Box::new(store), Box::new(rooms));

    spawn_input_reader(events);

    println!("{HELP}\n");
    if let Some(link) = args.link.as_deref() {
        client.start_from_link(link);
    }
    let mut changes = ChangeSet::default();
    draw(&client, &changes);

    let mut ticker = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            event = inbox.recv() => {
                let Some(event) = event else { break };
                changes = ChangeSet::default();
                match event {
                    ClientEvent::Transport(event) => {
                        if let Some(applied) = client.handle_transport(event) {
                            changes = applied;
                        }
                    }
                    ClientEvent::RoomCreated { player_name, result } => {
                        client.handle_room_created(player_name, result);
                    }
                    ClientEvent::Input(line) => match parse_command(&line) {
                        Ok(Some(Command::Gesture(gesture))) => client.dispatch(gesture),
                        Ok(Some(Command::Help)) => println!("{HELP}"),
                        Ok(Some(Command::Link)) => match client.view.invite_link.clone() {
                            Some(link) => println!("{link}"),
                            None => client.notify(FlowError::NoRoom.to_string()),
                        },
                        Ok(Some(Command::Quit)) => break,
                        Ok(None) => {}
                        Err(error) => client.notify(error.to_string()),
                    },
                    ClientEvent::InputClosed => break,
                }
                draw(&client, &changes);
            }
            _ = ticker.tick() => {
                if client.tick(Instant::now()) {
                    draw(&client, &changes);
                }
            }
        }
    }

    client.shutdown();
    logger!(INFO, "[CLIENT] Bye");
    Ok(())
}

fn draw(client: &ClientInstance, changes: &ChangeSet) {
    println!("{}", Frame::project(&client.view, changes));
}

fn spawn_input_reader(events: UnboundedSender<ClientEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if events.send(ClientEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    logger!(ERROR, "[CLIENT] Could not read input ({error})");
                    break;
                }
            }
        }
        let _ = events.send(ClientEvent::InputClosed);
    });
}

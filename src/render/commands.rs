use crate::game::gesture::{GameAction, Gesture};
use crate::models::card::Card;
use crate::utils::errors::InputError;

pub const HELP: &str = "\
create <name> <players>   create a room for 2-6 players
join <code> <name>        join a room
name <name>               your name for an invite link
wait | leave              wait for the game to start / stop waiting
play <card>               play a card from your hand (e.g. play 10S)
defend <n> | cancel       beat table card n / close the defense prompt
pass | take | surrender
start | rematch | norematch
say <text>                chat
menu | link | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Gesture(Gesture),
    Link,
    Help,
    Quit,
}

/// Parses one line of terminal input.
///
/// # Returns
/// * `Ok(Some(Command))` - A recognised command.
/// * `Ok(None)` - For a blank line.
/// * `Err(InputError)` - For an unknown command, a bad card or missing arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let gesture = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "help" | "?" => return Ok(Some(Command::Help)),
        "link" => return Ok(Some(Command::Link)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "create" => {
            let (name, count) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or(InputError::Usage("create <name> <players>"))?;
            Gesture::CreateGame {
                name: name.trim().to_string(),
                max_players: count.to_string(),
            }
        }
        "join" => {
            let (code, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if code.is_empty() {
                return Err(InputError::Usage("join <code> <name>"));
            }
            Gesture::JoinGame {
                code: code.to_string(),
                name: name.trim().to_string(),
            }
        }
        "name" => Gesture::SubmitName(rest.to_string()),
        "wait" => Gesture::ElectWait,
        "leave" => Gesture::CancelWaiting,
        "menu" => Gesture::ExitToMenu,
        "cancel" => Gesture::CancelDefense,
        "defend" => {
            let slot = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or(InputError::Usage("defend <slot number>"))?;
            Gesture::ChooseDefenseTarget(slot - 1)
        }
        "play" => {
            if rest.is_empty() {
                return Err(InputError::Usage("play <card>"));
            }
            Gesture::Play(GameAction::SelectCard(rest.parse::<Card>()?))
        }
        "pass" => Gesture::Play(GameAction::PassAttack),
        "take" => Gesture::Play(GameAction::TakeCards),
        "surrender" => Gesture::Play(GameAction::Surrender),
        "start" => Gesture::Play(GameAction::StartGame),
        "rematch" => Gesture::Play(GameAction::RequestRematch),
        "norematch" => Gesture::Play(GameAction::CancelRematch),
        "say" => Gesture::Play(GameAction::SendChat(rest.to_string())),
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(Command::Gesture(gesture)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(line: &str) -> Gesture {
        match parse_command(line) {
            Ok(Some(Command::Gesture(gesture))) => gesture,
            other => panic!("`{line}` parsed as {other:?}"),
        }
    }

    #[test]
    fn test_create_takes_last_word_as_count() {
        assert_eq!(
            gesture("create Anna Maria 3"),
            Gesture::CreateGame {
                name: "Anna Maria".to_string(),
                max_players: "3".to_string()
            }
        );
        assert_eq!(parse_command("create Ann"), Err(InputError::Usage("create <name> <players>")));
    }

    #[test]
    fn test_join_and_name() {
        assert_eq!(
            gesture("join abc123 Bob"),
            Gesture::JoinGame {
                code: "abc123".to_string(),
                name: "Bob".to_string()
            }
        );
        assert_eq!(gesture("name  Bob "), Gesture::SubmitName("Bob".to_string()));
    }

    #[test]
    fn test_defend_is_one_based() {
        assert_eq!(gesture("defend 2"), Gesture::ChooseDefenseTarget(1));
        assert!(parse_command("defend 0").is_err());
        assert!(parse_command("defend x").is_err());
    }

    #[test]
    fn test_play_parses_card() {
        assert_eq!(
            gesture("PLAY 10s"),
            Gesture::Play(GameAction::SelectCard("10S".parse().unwrap()))
        );
        assert_eq!(parse_command("play 1Z"), Err(InputError::InvalidCard("1Z".to_string())));
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(gesture("pass"), Gesture::Play(GameAction::PassAttack));
        assert_eq!(gesture("norematch"), Gesture::Play(GameAction::CancelRematch));
        assert_eq!(
            gesture("say good luck"),
            Gesture::Play(GameAction::SendChat("good luck".to_string()))
        );
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse_command("fly"), Err(InputError::UnknownCommand("fly".to_string())));
    }
}

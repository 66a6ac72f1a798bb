use crate::models::card::Card;

/// In-game gestures that go through the action gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    SelectCard(Card),
    PassAttack,
    TakeCards,
    Surrender,
    StartGame,
    RequestRematch,
    CancelRematch,
    SendChat(String),
}

/// Every gesture the presentation layer can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    CreateGame { name: String, max_players: String },
    JoinGame { code: String, name: String },
    SubmitName(String),
    ElectWait,
    CancelWaiting,
    ExitToMenu,
    ChooseDefenseTarget(usize),
    CancelDefense,
    Play(GameAction),
}

/// Receives gestures from the presentation layer.
pub trait ActionSink {
    fn dispatch(&mut self, gesture: Gesture);
}

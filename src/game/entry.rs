use crate::utils::errors::InputError;

pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 6;
pub const ROOM_CODE_LEN: usize = 6;

/// Validates the create-room form.
///
/// # Returns
/// * `Ok((String, u8))` - The trimmed creator name and the seat count.
/// * `Err(InputError)` - If the name is blank or the count is not a number in 2..=6.
pub fn validate_create(name: &str, max_players: &str) -> Result<(String, u8), InputError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::MissingCreatorName);
    }
    let count = max_players
        .trim()
        .parse::<u8>()
        .map_err(|_| InputError::PlayerCount)?;
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        return Err(InputError::PlayerCount);
    }
    Ok((name.to_string(), count))
}

/// Validates the join form. The code is upper-cased before checking its length.
///
/// # Returns
/// * `Ok((String, String))` - The room code and the trimmed name.
/// * `Err(InputError)` - If the code is not exactly six characters or the name is blank.
pub fn validate_join(code: &str, name: &str) -> Result<(String, String), InputError> {
    let code = code.trim().to_ascii_uppercase();
    if code.chars().count() != ROOM_CODE_LEN {
        return Err(InputError::JoinCode);
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::MissingName);
    }
    Ok((code, name.to_string()))
}

pub const ERR_UNAUTHORIZED: &str = "ERR_UNAUTHORIZED";
pub const ERR_INVALID_STATE: &str = "ERR_INVALID_STATE";
pub const ERR_CLOSED: &str = "ERR_CLOSED";
pub const ERR_NOT_INITIALIZED: &str = "ERR_NOT_INITIALIZED";
pub const ERR_INSUFFICIENT_FUNDS: &str = "ERR_INSUFFICIENT_FUNDS";
pub const ERR_DUPLICATE_MISSION_ID: &str = "ERR_DUPLICATE_MISSION_ID";
pub const ERR_ALREADY_INITIALIZED: &str = "ERR_ALREADY_INITIALIZED";
pub const ERR_INVALID_PERCENTAGE: &str = "ERR_INVALID_PERCENTAGE";
pub const ERR_INVALID_AMOUNT: &str = "ERR_INVALID_AMOUNT";
pub const ERR_INVALID_ARGUMENT: &str = "ERR_INVALID_ARGUMENT";
pub const ERR_PAUSED: &str = "ERR_PAUSED";

/// Failure of a mission or registry operation. Every variant is detected
/// before any state is written, so the contract can abort the whole call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MissionError {
    Unauthorized,
    InvalidState,
    Closed,
    NotInitialized,
    InsufficientFunds,
    DuplicateMissionId,
    AlreadyInitialized,
    InvalidPercentage,
    InvalidAmount,
    InvalidArgument,
    Paused,
}

impl MissionError {
    pub fn as_str(self) -> &'static str {
        match self {
            MissionError::Unauthorized => ERR_UNAUTHORIZED,
            MissionError::InvalidState => ERR_INVALID_STATE,
            MissionError::Closed => ERR_CLOSED,
            MissionError::NotInitialized => ERR_NOT_INITIALIZED,
            MissionError::InsufficientFunds => ERR_INSUFFICIENT_FUNDS,
            MissionError::DuplicateMissionId => ERR_DUPLICATE_MISSION_ID,
            MissionError::AlreadyInitialized => ERR_ALREADY_INITIALIZED,
            MissionError::InvalidPercentage => ERR_INVALID_PERCENTAGE,
            MissionError::InvalidAmount => ERR_INVALID_AMOUNT,
            MissionError::InvalidArgument => ERR_INVALID_ARGUMENT,
            MissionError::Paused => ERR_PAUSED,
        }
    }
}

use arena_core::PlayerId;

/// Rejected game or match configuration. Reported before any tick runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoPlayers,
    DuplicatePlayer(PlayerId),
    TooManyPlayers { players: usize, slots: usize },
    ZeroTickLimit,
    NoGames,
    /// A numeric setting that must be finite and positive is not.
    InvalidValue { field: &'static str, value: f64 },
    /// Grid cells smaller than one tick of travel or than the collision
    /// radius would let collisions fall between scanned cells.
    CellTooSmall { cell_size: f64, required: f64 },
    InvalidGapRange { field: &'static str, min: u32, max: u32 },
    SpawnOutOfBounds { index: usize, x: f64, y: f64 },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlayers => write!(f, "at least one player is required"),
            Self::DuplicatePlayer(id) => write!(f, "duplicate player id: {id}"),
            Self::TooManyPlayers { players, slots } => {
                write!(f, "{players} players but only {slots} spawn slots")
            },
            Self::ZeroTickLimit => write!(f, "tick limit must be greater than zero"),
            Self::NoGames => write!(f, "a match needs at least one game"),
            Self::InvalidValue { field, value } => {
                write!(f, "{field} must be finite and positive, got {value}")
            },
            Self::CellTooSmall {
                cell_size,
                required,
            } => write!(f, "cell_size {cell_size} is smaller than required {required}"),
            Self::InvalidGapRange { field, min, max } => {
                write!(f, "gap {field} range {min}..={max} is empty")
            },
            Self::SpawnOutOfBounds { index, x, y } => {
                write!(f, "spawn point {index} at ({x}, {y}) is outside the board")
            },
            Self::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

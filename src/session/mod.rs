pub mod game_session;
pub mod snapshot;

pub use game_session::*;
pub use snapshot::*;

//! Everything around the interpreter that a player touches: the live
//! session, saved progress, achievements and terminal settings.

pub mod achievements;
pub mod progress;
pub mod session;
pub mod settings;
pub mod store;

pub use achievements::Achievement;
pub use progress::{load_progress, reset_progress, save_progress, GameProgress};
pub use session::{hint_for, Session};
pub use settings::Settings;

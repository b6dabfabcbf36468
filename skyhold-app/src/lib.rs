pub mod commands;
pub mod context;
pub mod error;
pub mod navigation;
pub mod notify;
pub mod pages;
pub mod shell;
pub mod timer;

pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use navigation::HistoryNavigator;
pub use notify::{RecordingNotifier, TracingNotifier};
pub use pages::{AdminPage, BookingPage, HomePage};
pub use shell::Shell;
pub use timer::{HoldTimer, Tick, TokioClock};

//! Preference menus
//!
//! Flows describe steps and what a selection persists; the coordinator
//! owns sessions, timers and dispatch. Presentation and timers are host
//! seams (see `host`).

pub mod coordinator;
pub mod flow;
pub mod guns;
pub mod host;
pub mod session;
pub mod vote;

pub use coordinator::{MenuCoordinator, MenuEvent, MenuOutcome};
pub use flow::{FlowContext, FlowOutcome, FlowTransition, MenuFlow};
pub use guns::GunsMenu;
pub use host::{ManualScheduler, MenuPresenter, RecordingPresenter, TimerScheduler, TokioScheduler};
pub use session::{
    AwpPolicy, MenuChoice, MenuKind, MenuOption, MenuSession, MenuStep, MenuView, TimerToken,
};
pub use vote::NextRoundVoteMenu;

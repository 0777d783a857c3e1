use tracing::debug;

use crate::settings::StartupPolicy;

/// Progress of the one-shot startup preview pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchState {
    /// The host has not reported that its layout is ready.
    #[default]
    Pending,
    /// Layout is ready but no eligible view existed; the next view fires.
    AwaitingView,
    /// The startup pass has run or was skipped. Terminal.
    Done,
}

/// What the controller should do when the host layout becomes ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupAction {
    /// Run the preview pass now.
    RunPass,
    /// Defer until a view shows up.
    Wait,
    /// Startup preview is off.
    Skip,
    /// First launch under [`StartupPolicy::AfterFirstLaunch`]: skip, and
    /// remember that the app has now started once.
    RecordFirstLaunch,
    /// The latch already left `Pending`.
    Ignored,
}

/// Explicit one-shot latch gating the startup preview pass.
#[derive(Debug, Clone, Default)]
pub struct StartupLatch {
    state: LatchState,
}

impl StartupLatch {
    pub const fn new() -> Self {
        Self {
            state: LatchState::Pending,
        }
    }

    pub const fn state(&self) -> LatchState {
        self.state
    }

    /// Transition out of `Pending` once the host reports layout ready.
    pub fn on_layout_ready(
        &mut self,
        enabled: bool,
        policy: StartupPolicy,
        has_started_once: bool,
        eligible_views: usize,
    ) -> StartupAction {
        if self.state != LatchState::Pending {
            return StartupAction::Ignored;
        }
        let action = if !enabled {
            StartupAction::Skip
        } else {
            match policy {
                StartupPolicy::LayoutReady => StartupAction::RunPass,
                StartupPolicy::AfterFirstLaunch if !has_started_once => {
                    StartupAction::RecordFirstLaunch
                }
                StartupPolicy::FirstView | StartupPolicy::AfterFirstLaunch => {
                    if eligible_views > 0 {
                        StartupAction::RunPass
                    } else {
                        StartupAction::Wait
                    }
                }
            }
        };
        self.state = if action == StartupAction::Wait {
            LatchState::AwaitingView
        } else {
            LatchState::Done
        };
        debug!(?policy, enabled, eligible_views, ?action, state = ?self.state, "startup latch");
        action
    }

    /// Returns true when a deferred startup pass should run now.
    pub fn on_view_available(&mut self, eligible_views: usize) -> bool {
        if self.state != LatchState::AwaitingView || eligible_views == 0 {
            return false;
        }
        self.state = LatchState::Done;
        debug!(eligible_views, "startup latch released by first view");
        true
    }
}

//! Paced dealer play. The dealer draws one card per interval so the page can
//! show each card as it lands; the loop ends on the tick where the dealer
//! stands. The sleep is supplied by the caller, so the browser can pass a
//! timer and tests can pass an immediately ready future.

use std::{cell::Cell, cell::RefCell, future::Future, rc::Rc, time::Duration};

use tracing::{debug, warn};

use crate::engine::{DealerTick, Resolution, RoundEngine};

#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Cancels every task holding the current token and hands out a fresh one.
    pub fn renew(&mut self) -> CancelToken {
        self.cancel();
        *self = CancelToken::new();
        self.clone()
    }
}

/// Drives the dealer's turn one tick per `interval`. Returns the resolution,
/// or `None` if cancelled or if the engine was not in the dealer's turn.
pub async fn run_dealer_turn<S, Fut, F>(
    engine: &RefCell<RoundEngine>,
    token: &CancelToken,
    interval: Duration,
    mut sleep: S,
    mut on_tick: F,
) -> Option<Resolution>
where
    S: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
    F: FnMut(&DealerTick),
{
    loop {
        sleep(interval).await;
        if token.is_cancelled() {
            debug!("dealer turn cancelled");
            return None;
        }

        let tick = engine.borrow_mut().dealer_tick();
        match tick {
            Ok(tick) => {
                on_tick(&tick);
                if let DealerTick::Stood(resolution) = tick {
                    return Some(resolution);
                }
            }
            Err(err) => {
                warn!(%err, "dealer turn stopped");
                return None;
            }
        }
    }
}

/// Shows the game-over message, waits `delay`, then deals the player back in.
/// Does nothing unless the last round left the player broke. `on_change`
/// fires after the message is set and again after the reset.
pub async fn run_game_over_reset<S, Fut, F>(
    engine: &RefCell<RoundEngine>,
    token: &CancelToken,
    delay: Duration,
    mut sleep: S,
    mut on_change: F,
) -> bool
where
    S: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
    F: FnMut(),
{
    if !engine.borrow_mut().mark_game_over() {
        return false;
    }
    on_change();

    sleep(delay).await;
    // The player may have reset by hand while we waited.
    if token.is_cancelled() || !engine.borrow().is_bankrupt() {
        return false;
    }
    let reset = engine.borrow_mut().reset_round();
    match reset {
        Ok(()) => {
            on_change();
            true
        }
        Err(err) => {
            warn!(%err, "game over reset refused");
            false
        }
    }
}

use std::{cell::RefCell, rc::Rc, time::Duration};

use gloo_timers::future::sleep;
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::{
    config::TableConfig,
    engine::{Phase, RoundEngine},
    error::ActionError,
    pacing::{self, CancelToken},
};

/// The table as seen from JavaScript. Every action returns the new view;
/// dealer draws and the game-over reset arrive later through the `onChange`
/// listener.
#[wasm_bindgen]
pub struct BlackjackTable {
    engine: Rc<RefCell<RoundEngine>>,
    listener: Option<Function>,
    pending: CancelToken,
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

fn notify(engine: &RefCell<RoundEngine>, listener: Option<&Function>) {
    let Some(listener) = listener else {
        return;
    };
    let view = engine.borrow().view();
    match to_js(&view) {
        Ok(value) => {
            if let Err(err) = listener.call1(&JsValue::NULL, &value) {
                tracing::warn!(?err, "onChange listener threw");
            }
        }
        Err(err) => tracing::warn!(?err, "could not serialize table view"),
    }
}

#[wasm_bindgen]
impl BlackjackTable {
    #[wasm_bindgen(constructor)]
    pub fn new(params: &JsValue) -> Result<BlackjackTable, JsValue> {
        console_error_panic_hook::set_once();
        let _ = tracing_wasm::try_set_as_global_default();

        let config: TableConfig = if params.is_undefined() || params.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(params.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?
        };
        let engine = RoundEngine::new(config)
            .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?;

        Ok(BlackjackTable {
            engine: Rc::new(RefCell::new(engine)),
            listener: None,
            pending: CancelToken::new(),
        })
    }

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, listener: Function) {
        self.listener = Some(listener);
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.borrow().view())
    }

    #[wasm_bindgen(js_name = placeBet)]
    pub fn place_bet(&mut self, amount: u32) -> Result<JsValue, JsValue> {
        self.act(|engine| engine.place_bet(u64::from(amount)))
    }

    #[wasm_bindgen(js_name = startRound)]
    pub fn start_round(&mut self) -> Result<JsValue, JsValue> {
        self.act(RoundEngine::start_round)
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        self.act(|engine| engine.hit().map(|_| ()))
    }

    pub fn stand(&mut self) -> Result<JsValue, JsValue> {
        self.act(RoundEngine::stand)
    }

    #[wasm_bindgen(js_name = doubleDown)]
    pub fn double_down(&mut self) -> Result<JsValue, JsValue> {
        self.act(|engine| engine.double_down().map(|_| ()))
    }

    #[wasm_bindgen(js_name = resetRound)]
    pub fn reset_round(&mut self) -> Result<JsValue, JsValue> {
        self.act(RoundEngine::reset_round)
    }

    /// Stops any paced dealer turn or pending game-over reset.
    #[wasm_bindgen(js_name = cancelPending)]
    pub fn cancel_pending(&mut self) {
        self.pending.renew();
    }
}

impl BlackjackTable {
    fn act<F>(&mut self, action: F) -> Result<JsValue, JsValue>
    where
        F: FnOnce(&mut RoundEngine) -> Result<(), ActionError>,
    {
        let result = action(&mut *self.engine.borrow_mut());
        result.map_err(|err| JsValue::from_str(&err.to_string()))?;

        let phase = self.engine.borrow().phase();
        match phase {
            Phase::DealerTurn => self.spawn_dealer_turn(),
            Phase::Resolved => self.spawn_game_over_reset(),
            Phase::AwaitingBet | Phase::PlayerTurn => {}
        }
        self.view()
    }

    fn spawn_dealer_turn(&mut self) {
        let engine = Rc::clone(&self.engine);
        let listener = self.listener.clone();
        let token = self.pending.renew();
        let (interval, delay) = {
            let engine = engine.borrow();
            let config = engine.config();
            (
                Duration::from_millis(u64::from(config.dealer_draw_interval_ms)),
                Duration::from_millis(u64::from(config.game_over_reset_delay_ms)),
            )
        };

        spawn_local(async move {
            let resolution = pacing::run_dealer_turn(&engine, &token, interval, sleep, |_| {
                notify(&engine, listener.as_ref())
            })
            .await;
            if resolution.is_some() {
                pacing::run_game_over_reset(&engine, &token, delay, sleep, || {
                    notify(&engine, listener.as_ref())
                })
                .await;
            }
        });
    }

    fn spawn_game_over_reset(&mut self) {
        if !self.engine.borrow().is_bankrupt() {
            return;
        }
        let engine = Rc::clone(&self.engine);
        let listener = self.listener.clone();
        let token = self.pending.renew();
        let delay = Duration::from_millis(u64::from(
            engine.borrow().config().game_over_reset_delay_ms,
        ));

        spawn_local(async move {
            pacing::run_game_over_reset(&engine, &token, delay, sleep, || {
                notify(&engine, listener.as_ref())
            })
            .await;
        });
    }
}

impl Drop for BlackjackTable {
    fn drop(&mut self) {
        self.pending.cancel();
    }
}

//! Hook that hosts the login flow state machine
//!
//! The reducer holds a pure [`LoginFlow`]; this hook launches whatever
//! network effect the flow leaves pending and feeds the countdown ticks.
//! Responses carry the generation that launched them, so answers to
//! abandoned attempts fall on the floor inside the reducer.

use crate::auth::flow::{FlowAction, FlowConfig, FlowEffect, LoginFlow};
use crate::services::AuthApiService;
use gloo::timers::callback::Interval;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

impl Reducible for LoginFlow {
    type Action = FlowAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Handle returned by [`use_login_flow`]
#[derive(Clone)]
pub struct LoginFlowHandle {
    state: UseReducerHandle<LoginFlow>,
}

impl PartialEq for LoginFlowHandle {
    fn eq(&self, other: &Self) -> bool {
        *self.state == *other.state
    }
}

impl LoginFlowHandle {
    /// The current flow state
    pub fn state(&self) -> &LoginFlow {
        &self.state
    }

    pub fn set_email(&self, value: String) {
        self.state.dispatch(FlowAction::EmailChanged(value));
    }

    pub fn set_otp(&self, value: String) {
        self.state.dispatch(FlowAction::OtpChanged(value));
    }

    pub fn set_password(&self, value: String) {
        self.state.dispatch(FlowAction::PasswordChanged(value));
    }

    pub fn submit_email(&self) {
        self.state.dispatch(FlowAction::SubmitEmail);
    }

    pub fn submit_otp(&self) {
        self.state.dispatch(FlowAction::SubmitOtp);
    }

    pub fn submit_password(&self) {
        self.state.dispatch(FlowAction::SubmitPassword);
    }

    pub fn resend(&self) {
        self.state.dispatch(FlowAction::Resend);
    }

    pub fn clear_error(&self) {
        self.state.dispatch(FlowAction::ClearError);
    }

    pub fn start_over(&self) {
        self.state.dispatch(FlowAction::StartOver);
    }
}

async fn run_effect(effect: FlowEffect, dispatch: UseReducerHandle<LoginFlow>) {
    let service = AuthApiService::new();
    match effect {
        FlowEffect::RequestOtp { generation, email } => {
            let result = service.request_otp(email).await;
            dispatch.dispatch(FlowAction::ChallengeAnswered { generation, result });
        }
        FlowEffect::VerifyOtp {
            generation,
            email,
            otp,
        } => {
            let result = service.verify_otp(email, otp).await;
            dispatch.dispatch(FlowAction::VerifyAnswered { generation, result });
        }
        FlowEffect::AdminLogin {
            generation,
            email,
            password,
        } => {
            let result = service.admin_login(email, password).await;
            dispatch.dispatch(FlowAction::VerifyAnswered { generation, result });
        }
    }
}

/// Hook to drive the login flow
#[hook]
pub fn use_login_flow(config: FlowConfig) -> LoginFlowHandle {
    let state = use_reducer(move || LoginFlow::new(config));

    // Highest generation already handed to the network. Generations only
    // grow, so each effect is launched exactly once even across re-renders.
    let launched = use_mut_ref(|| 0u64);

    {
        let state = state.clone();
        let pending = state.pending().cloned();
        use_effect_with(pending, move |pending| {
            if let Some(effect) = pending.clone() {
                let generation = effect.generation();
                if generation > *launched.borrow() {
                    *launched.borrow_mut() = generation;
                    spawn_local(run_effect(effect, state));
                }
            }
        });
    }

    {
        let state = state.clone();
        let counting = state.counting();
        use_effect_with(counting, move |&counting| {
            let interval = counting.then(|| {
                Interval::new(1_000, move || {
                    state.dispatch(FlowAction::Tick);
                })
            });
            move || drop(interval)
        });
    }

    LoginFlowHandle { state }
}

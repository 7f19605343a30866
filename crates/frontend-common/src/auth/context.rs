//! Global session context and provider

use crate::auth::store::{BrowserStorage, SessionStore};
use crate::client::set_auth_token;
use pms_http::types::User;
use std::rc::Rc;
use yew::prelude::*;

/// Session state backed by browser local storage
pub type Session = SessionStore<BrowserStorage>;

/// Session context handle
pub type SessionHandle = UseReducerHandle<Session>;

/// Session actions
pub enum SessionAction {
    /// Restore the session from local storage (runs once on mount)
    Hydrate,
    SetLoading(bool),
    Login { user: User, token: String },
    SetUser(User),
    Logout,
    SessionExpired,
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SessionAction::Hydrate => {
                next.hydrate();
                // Re-arm the HTTP client with the restored token
                let _ = set_auth_token(next.token());
            }
            SessionAction::SetLoading(is_loading) => {
                next.set_loading(is_loading);
            }
            SessionAction::Login { user, token } => {
                // Update the client before the state is visible to readers
                let _ = set_auth_token(Some(&token));
                next.set_user(Some(user));
                next.set_token(Some(token));
                next.set_loading(false);
                next.set_error(None);
            }
            SessionAction::SetUser(user) => {
                next.set_user(Some(user));
            }
            SessionAction::Logout => {
                let _ = set_auth_token(None);
                next.clear();
                next.set_loading(false);
            }
            SessionAction::SessionExpired => {
                let _ = set_auth_token(None);
                next.clear();
                next.set_loading(false);
                next.set_error(Some(
                    "Your session has expired. Please sign in again.".to_string(),
                ));
            }
        }
        Rc::new(next)
    }
}

/// Auth provider props
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
}

/// Auth provider component
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let session = use_reducer(|| Session::new(BrowserStorage));

    // Set up the global session-expiry handler
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            let handle = session.clone();
            super::expiry::set_session_expired_callback(Rc::new(move || {
                handle.dispatch(SessionAction::SessionExpired);
            }));

            // Cleanup on unmount
            move || {
                super::expiry::clear_session_expired_callback();
            }
        });
    }

    // Restore the session from local storage on mount
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            session.dispatch(SessionAction::Hydrate);
        });
    }

    html! {
        <ContextProvider<SessionHandle> context={session}>
            {props.children.clone()}
        </ContextProvider<SessionHandle>>
    }
}

/// Hook to use the session context
#[hook]
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
        .expect("SessionHandle not found. Make sure to wrap your component with AuthProvider")
}

/// Hook to get the signed-in user
#[hook]
pub fn use_session_user() -> Option<User> {
    let session = use_session();
    session.user().cloned()
}

/// Hook to check if authenticated
#[hook]
pub fn use_is_authenticated() -> bool {
    let session = use_session();
    session.is_authenticated()
}

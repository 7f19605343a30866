//! Authentication guard component for protected routes

use crate::app::Route;
use pms_frontend_common::auth::evaluate;
use pms_frontend_common::auth::GuardOutcome;
use pms_frontend_common::auth::context::use_session;
use pms_frontend_common::components::Spinner;
use pms_http::types::Role;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    pub children: Children,
    /// Role this route is reserved for. `None` admits any signed-in user.
    #[prop_or_default]
    pub role: Option<Role>,
}

/// Guard that renders its children only for a session the route admits
#[function_component(RequireAuth)]
pub fn require_auth(props: &RequireAuthProps) -> Html {
    let session = use_session();

    // Hold the route until the session has been read back from storage,
    // otherwise a refresh on a protected page would bounce to login.
    if session.is_loading() {
        return html! { <Spinner text="Checking session..." /> };
    }

    match evaluate(session.user(), session.token(), props.role.as_ref()) {
        GuardOutcome::Allow => html! { <>{ props.children.clone() }</> },
        GuardOutcome::RedirectLogin => html! { <Redirect<Route> to={Route::Login} /> },
        // The wrong dashboard for this role; the root page forwards them
        // to their own
        GuardOutcome::RedirectRoot => html! { <Redirect<Route> to={Route::Home} /> },
    }
}

//! Root page: forwards every visitor to where they belong

use crate::app::{Route, route_for_role};
use pms_frontend_common::auth::context::use_session;
use pms_frontend_common::components::Spinner;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(Home)]
pub fn home() -> Html {
    let session = use_session();

    if session.is_loading() {
        return html! { <Spinner text="Checking session..." /> };
    }

    let route = match session.user() {
        Some(user) if session.is_authenticated() => route_for_role(&user.role),
        _ => Route::Login,
    };
    html! { <Redirect<Route> to={route} /> }
}

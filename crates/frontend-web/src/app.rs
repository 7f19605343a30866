//! Application shell and routing

use crate::guard::RequireAuth;
use crate::pages::{AdminDashboard, Home, Login, StudentDashboard, SupervisorDashboard};
use pms_frontend_common::AuthProvider;
use pms_http::types::Role;
use yew::prelude::*;
use yew_router::prelude::*;

/// Application routes
#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/auth/login")]
    Login,
    #[at("/student/dashboard")]
    StudentDashboard,
    #[at("/supervisor/dashboard")]
    SupervisorDashboard,
    #[at("/admin/dashboard")]
    AdminDashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Landing route for a signed-in role. Unrecognized roles fall back to the
/// login page rather than looping through the root redirector.
pub fn route_for_role(role: &Role) -> Route {
    match role {
        Role::Student => Route::StudentDashboard,
        Role::Supervisor => Route::SupervisorDashboard,
        Role::Admin => Route::AdminDashboard,
        Role::Unknown(_) => Route::Login,
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <Home /> },
        Route::Login => html! { <Login /> },
        Route::StudentDashboard => html! {
            <RequireAuth role={Role::Student}>
                <StudentDashboard />
            </RequireAuth>
        },
        Route::SupervisorDashboard => html! {
            <RequireAuth role={Role::Supervisor}>
                <SupervisorDashboard />
            </RequireAuth>
        },
        Route::AdminDashboard => html! {
            <RequireAuth role={Role::Admin}>
                <AdminDashboard />
            </RequireAuth>
        },
        Route::NotFound => html! { <Redirect<Route> to={Route::Home} /> },
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <AuthProvider>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </AuthProvider>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_known_role_lands_on_its_dashboard() {
        assert_eq!(route_for_role(&Role::Student), Route::StudentDashboard);
        assert_eq!(
            route_for_role(&Role::Supervisor),
            Route::SupervisorDashboard
        );
        assert_eq!(route_for_role(&Role::Admin), Route::AdminDashboard);
    }

    #[test]
    fn unrecognized_role_falls_back_to_login() {
        assert_eq!(
            route_for_role(&Role::Unknown("EXAMINER".to_string())),
            Route::Login
        );
    }

    #[test]
    fn route_paths_are_stable() {
        assert_eq!(Route::Login.to_path(), "/auth/login");
        assert_eq!(Route::StudentDashboard.to_path(), "/student/dashboard");
        assert_eq!(Route::SupervisorDashboard.to_path(), "/supervisor/dashboard");
        assert_eq!(Route::AdminDashboard.to_path(), "/admin/dashboard");
    }
}

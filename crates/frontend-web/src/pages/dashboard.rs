//! Role dashboards
//!
//! Each dashboard is a thin shell: the shared layout carries the navbar
//! with the signed-in user and the sign-out action. Dashboard content is
//! intentionally minimal.

use crate::app::Route;
use pms_frontend_common::auth::context::{SessionAction, use_session};
use pms_frontend_common::services::AuthApiService;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
struct DashboardLayoutProps {
    pub title: AttrValue,
    pub children: Children,
}

#[function_component(DashboardLayout)]
fn dashboard_layout(props: &DashboardLayoutProps) -> Html {
    let session = use_session();
    let navigator = use_navigator().expect("Navigator not available");

    let on_logout = {
        let session = session.clone();
        let navigator = navigator.clone();
        Callback::from(move |_| {
            let session = session.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                AuthApiService::new().logout().await;
                session.dispatch(SessionAction::Logout);
                navigator.push(&Route::Login);
            });
        })
    };

    let who = session
        .user()
        .map(|user| format!("{} ({})", user.name, user.role))
        .unwrap_or_default();

    html! {
        <div class="min-h-screen bg-gray-50">
            <nav class="bg-white border-b border-gray-200">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                    <div class="flex justify-between h-16 items-center">
                        <div class="flex items-center">
                            <h1 class="text-xl font-bold text-indigo-700">{"PMS"}</h1>
                            <span class="ml-3 text-sm text-gray-500">{props.title.clone()}</span>
                        </div>
                        <div class="flex items-center gap-4">
                            <span class="text-sm text-gray-600">{who}</span>
                            <button
                                onclick={on_logout}
                                class="text-sm text-gray-600 hover:text-gray-900"
                            >
                                {"Sign out"}
                            </button>
                        </div>
                    </div>
                </div>
            </nav>
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                { props.children.clone() }
            </main>
        </div>
    }
}

#[function_component(StudentDashboard)]
pub fn student_dashboard() -> Html {
    html! {
        <DashboardLayout title="Student dashboard">
            <p class="text-gray-600">{"Your projects and supervisor feedback will appear here."}</p>
        </DashboardLayout>
    }
}

#[function_component(SupervisorDashboard)]
pub fn supervisor_dashboard() -> Html {
    html! {
        <DashboardLayout title="Supervisor dashboard">
            <p class="text-gray-600">{"Projects under your supervision will appear here."}</p>
        </DashboardLayout>
    }
}

#[function_component(AdminDashboard)]
pub fn admin_dashboard() -> Html {
    html! {
        <DashboardLayout title="Admin dashboard">
            <p class="text-gray-600">{"Accounts, cohorts and assignments will appear here."}</p>
        </DashboardLayout>
    }
}

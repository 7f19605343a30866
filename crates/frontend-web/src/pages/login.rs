//! Login page hosting the email/OTP/admin-password sequence

use crate::app::route_for_role;
use pms_frontend_common::auth::context::{SessionAction, use_session};
use pms_frontend_common::auth::flow::{FlowConfig, FlowPhase};
use pms_frontend_common::hooks::{LoginFlowHandle, use_login_flow};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

/// Render seconds as `M:SS` for the countdown label
fn format_remaining(remaining: u32) -> String {
    format!("{}:{:02}", remaining / 60, remaining % 60)
}

#[function_component(Login)]
pub fn login() -> Html {
    let flow = use_login_flow(FlowConfig::default());
    let session = use_session();
    let navigator = use_navigator().expect("Navigator not available");

    // Promote a finished flow into the session exactly once, then leave
    let authenticated = matches!(flow.state().phase(), FlowPhase::Authenticated { .. });
    {
        let flow = flow.clone();
        let session = session.clone();
        let navigator = navigator.clone();
        use_effect_with(authenticated, move |&authenticated| {
            if !authenticated {
                return;
            }
            if let FlowPhase::Authenticated { user, token } = flow.state().phase() {
                let route = route_for_role(&user.role);
                session.dispatch(SessionAction::Login {
                    user: user.clone(),
                    token: token.clone(),
                });
                navigator.push(&route);
            }
        });
    }

    let body = match flow.state().phase() {
        FlowPhase::EnteringEmail => email_form(&flow),
        FlowPhase::RequestingOtp { email, .. } => waiting(&format!("Sending a code to {email}...")),
        FlowPhase::AdminPassword { email } => password_form(&flow, email),
        FlowPhase::OtpRequested { email, remaining } => otp_form(&flow, email, *remaining),
        FlowPhase::OtpExpired { email } => expired_notice(&flow, email),
        FlowPhase::Verifying { .. } => waiting("Signing you in..."),
        FlowPhase::Authenticated { .. } => waiting("Redirecting..."),
    };

    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center px-4">
            <div class="max-w-md w-full">
                <div class="text-center mb-8">
                    <h1 class="text-3xl font-bold text-indigo-700">{"PMS"}</h1>
                    <p class="mt-2 text-gray-600">{"Sign in to your project dashboard"}</p>
                </div>
                <div class="bg-white rounded-lg shadow-lg p-8">
                    { session_notice(&session) }
                    { error_notice(&flow) }
                    { body }
                </div>
            </div>
        </div>
    }
}

fn session_notice(session: &pms_frontend_common::SessionHandle) -> Html {
    match session.error() {
        Some(message) => html! {
            <div class="mb-4 p-3 rounded-md bg-amber-50 text-amber-800 text-sm">
                {message}
            </div>
        },
        None => html! {},
    }
}

fn error_notice(flow: &LoginFlowHandle) -> Html {
    let Some(message) = flow.state().error() else {
        return html! {};
    };
    let on_dismiss = {
        let flow = flow.clone();
        Callback::from(move |_| flow.clear_error())
    };
    html! {
        <div class="mb-4 p-3 rounded-md bg-red-50 text-red-700 text-sm flex justify-between items-center">
            <span>{message}</span>
            <button onclick={on_dismiss} class="ml-3 text-red-400 hover:text-red-600">{"✕"}</button>
        </div>
    }
}

fn waiting(text: &str) -> Html {
    html! {
        <div class="text-center py-6">
            <div class="w-8 h-8 border-4 border-gray-200 border-t-indigo-600 rounded-full animate-spin mx-auto mb-4"></div>
            <p class="text-gray-600 text-sm">{text}</p>
        </div>
    }
}

fn email_form(flow: &LoginFlowHandle) -> Html {
    let oninput = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            flow.set_email(input.value());
        })
    };
    let onsubmit = {
        let flow = flow.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.submit_email();
        })
    };
    html! {
        <form {onsubmit}>
            <label class="block text-sm font-medium text-gray-700 mb-1" for="email">
                {"Email address"}
            </label>
            <input
                id="email"
                type="email"
                placeholder="you@university.edu"
                value={flow.state().email_input().to_string()}
                {oninput}
                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
            />
            <button
                type="submit"
                class="mt-4 w-full py-2 px-4 rounded-md text-white bg-indigo-600 hover:bg-indigo-700 font-medium"
            >
                {"Send code"}
            </button>
        </form>
    }
}

fn password_form(flow: &LoginFlowHandle, email: &str) -> Html {
    let oninput = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            flow.set_password(input.value());
        })
    };
    let onsubmit = {
        let flow = flow.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.submit_password();
        })
    };
    let on_back = {
        let flow = flow.clone();
        Callback::from(move |_| flow.start_over())
    };
    html! {
        <form {onsubmit}>
            <p class="text-sm text-gray-600 mb-4">
                {format!("Administrator sign-in for {email}")}
            </p>
            <label class="block text-sm font-medium text-gray-700 mb-1" for="password">
                {"Password"}
            </label>
            <input
                id="password"
                type="password"
                value={flow.state().password_input().to_string()}
                {oninput}
                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500"
            />
            <button
                type="submit"
                class="mt-4 w-full py-2 px-4 rounded-md text-white bg-indigo-600 hover:bg-indigo-700 font-medium"
            >
                {"Sign in"}
            </button>
            <button
                type="button"
                onclick={on_back}
                class="mt-3 w-full text-sm text-gray-600 hover:text-gray-900"
            >
                {"Use a different email"}
            </button>
        </form>
    }
}

fn otp_form(flow: &LoginFlowHandle, email: &str, remaining: u32) -> Html {
    let oninput = {
        let flow = flow.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            flow.set_otp(input.value());
        })
    };
    let onsubmit = {
        let flow = flow.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.submit_otp();
        })
    };
    let on_resend = {
        let flow = flow.clone();
        Callback::from(move |_| flow.resend())
    };
    let on_back = {
        let flow = flow.clone();
        Callback::from(move |_| flow.start_over())
    };
    let can_resend = flow.state().can_resend();
    html! {
        <form {onsubmit}>
            <p class="text-sm text-gray-600 mb-4">
                {format!("We emailed a 6-digit code to {email}.")}
            </p>
            <label class="block text-sm font-medium text-gray-700 mb-1" for="otp">
                {"Verification code"}
            </label>
            <input
                id="otp"
                type="text"
                inputmode="numeric"
                maxlength="6"
                placeholder="000000"
                value={flow.state().otp_input().to_string()}
                {oninput}
                class="w-full px-3 py-2 border border-gray-300 rounded-md text-center tracking-widest focus:outline-none focus:ring-2 focus:ring-indigo-500"
            />
            <p class="mt-2 text-sm text-gray-500 text-center">
                {format!("Code expires in {}", format_remaining(remaining))}
            </p>
            <button
                type="submit"
                class="mt-4 w-full py-2 px-4 rounded-md text-white bg-indigo-600 hover:bg-indigo-700 font-medium"
            >
                {"Verify"}
            </button>
            <div class="mt-3 flex justify-between text-sm">
                <button
                    type="button"
                    onclick={on_resend}
                    disabled={!can_resend}
                    class="text-indigo-600 hover:text-indigo-800 disabled:text-gray-400"
                >
                    {"Resend code"}
                </button>
                <button
                    type="button"
                    onclick={on_back}
                    class="text-gray-600 hover:text-gray-900"
                >
                    {"Use a different email"}
                </button>
            </div>
        </form>
    }
}

fn expired_notice(flow: &LoginFlowHandle, email: &str) -> Html {
    let on_resend = {
        let flow = flow.clone();
        Callback::from(move |_| flow.resend())
    };
    let on_back = {
        let flow = flow.clone();
        Callback::from(move |_| flow.start_over())
    };
    html! {
        <div class="text-center">
            <p class="text-sm text-gray-600 mb-4">
                {format!("The code sent to {email} has expired.")}
            </p>
            <button
                onclick={on_resend}
                class="w-full py-2 px-4 rounded-md text-white bg-indigo-600 hover:bg-indigo-700 font-medium"
            >
                {"Send a new code"}
            </button>
            <button
                onclick={on_back}
                class="mt-3 text-sm text-gray-600 hover:text-gray-900"
            >
                {"Use a different email"}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::format_remaining;

    #[test]
    fn countdown_renders_minutes_and_padded_seconds() {
        assert_eq!(format_remaining(300), "5:00");
        assert_eq!(format_remaining(125), "2:05");
        assert_eq!(format_remaining(59), "0:59");
        assert_eq!(format_remaining(0), "0:00");
    }
}

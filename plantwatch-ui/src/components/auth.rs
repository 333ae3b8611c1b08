//! Auth Panel
//!
//! Login and registration forms with their inline notices.

use leptos::*;

use plantwatch::{Form, Notice};

use crate::platform::Controller;
use crate::state::UiState;

/// Login and register forms side by side
#[component]
pub fn AuthPanel() -> impl IntoView {
    view! {
        <div class="grid md:grid-cols-2 gap-6 max-w-4xl mx-auto">
            <CredentialsForm form=Form::Login title="Log In" submit_label="Log In" />
            <CredentialsForm form=Form::Register title="Register" submit_label="Create Account" />
        </div>
    }
}

#[component]
fn CredentialsForm(
    form: Form,
    title: &'static str,
    submit_label: &'static str,
) -> impl IntoView {
    let state = use_context::<UiState>().expect("UiState not found");
    let controller = use_context::<Controller>().expect("Controller not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    // Clear inputs whenever the controller resets this form
    create_effect(move |previous: Option<u32>| {
        let count = state.reset_count(form);
        if previous.is_some_and(|p| p != count) {
            set_email.set(String::new());
            set_password.set(String::new());
        }
        count
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (e, p) = (email.get(), password.get());
        let controller = controller.clone();

        set_submitting.set(true);
        spawn_local(async move {
            match form {
                Form::Register => {
                    controller.register(&e, &p).await;
                }
                _ => {
                    controller.login(&e, &p).await;
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-6">
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            <form on:submit=on_submit class="space-y-4">
                <input
                    type="email"
                    required
                    placeholder="Email"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2"
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    required
                    placeholder="Password"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg py-2 font-semibold"
                >
                    {submit_label}
                </button>
            </form>
            <NoticeLine form=form />
        </div>
    }
}

/// Inline success or error message of a form
#[component]
pub fn NoticeLine(form: Form) -> impl IntoView {
    let state = use_context::<UiState>().expect("UiState not found");

    move || {
        state.notice(form).map(|notice| {
            let class = match notice {
                Notice::Error(_) => "mt-3 text-sm text-red-400",
                Notice::Success(_) => "mt-3 text-sm text-green-400",
            };
            view! { <p class=class>{notice.text().to_string()}</p> }
        })
    }
}

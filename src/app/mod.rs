use crate::pages::VaultPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppState::new();
    let store = app_state.store;
    let gateway = app_state.gateway;

    app_state.start_session();
    provide_context(AppContext(app_state));

    // The gateway appears once the session resolves; the store subscribes
    // then and stays subscribed for the lifetime of the app.
    Effect::new(move |_| {
        gateway.with(|g| {
            store.open(g.as_ref());
        });
    });
    on_cleanup(move || store.close());

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-slate-500">"Not found"</div> }>
                <Route path=path!("section/:section") view=VaultPage />
                <Route path=path!("") view=VaultPage />
            </Routes>
        </Router>
    }
}

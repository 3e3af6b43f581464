use icons::{Loader, LoaderCircle};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Inline spinner for buttons.
#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <Loader class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Large centred spinner with a caption, used while the vault loads.
#[component]
pub fn SpinnerCircle(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] caption: String,
) -> impl IntoView {
    let merged_class = tw_merge!("size-10 animate-spin text-indigo-500", class);

    view! {
        <div class="flex flex-col items-center justify-center gap-3 py-24 text-slate-400">
            <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" />
            <span class="text-sm font-medium">{caption}</span>
        </div>
    }
}

use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {ModalHeader, div, "flex items-start justify-between gap-4 border-b border-slate-100 px-6 py-4"}
    clx! {ModalTitle, h3, "text-lg font-bold leading-tight text-slate-800"}
    clx! {ModalBody, div, "flex flex-col gap-4 overflow-y-auto px-6 py-5"}
    clx! {ModalFooter, footer, "flex items-center justify-end gap-2 border-t border-slate-100 px-6 py-4"}
}

pub use components::*;

/// Overlay panel. Callers mount it inside a `<Show>`; clicking the backdrop
/// or the close button runs `on_close`.
#[component]
pub fn Modal(
    children: Children,
    on_close: Callback<()>,
    #[prop(optional, into)] class: String,
    #[prop(default = true)] close_on_backdrop_click: bool,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative flex max-h-[85vh] w-full max-w-lg flex-col overflow-hidden rounded-2xl bg-white shadow-2xl",
        class
    );

    view! {
        <div
            data-name="ModalBackdrop"
            class="fixed inset-0 z-50 flex items-center justify-center bg-slate-900/60 px-4 backdrop-blur-sm"
            on:click=move |_| {
                if close_on_backdrop_click {
                    on_close.run(());
                }
            }
        >
            <div
                data-name="ModalContent"
                class=merged_class
                on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
            >
                <button
                    type="button"
                    class="absolute top-4 right-4 rounded-full p-1 text-slate-400 hover:bg-slate-100 hover:text-slate-700 [&_svg:not([class*='size-'])]:size-4"
                    aria-label="Close dialog"
                    on:click=move |_| on_close.run(())
                >
                    <X />
                </button>

                {children()}
            </div>
        </div>
    }
}

mod cards;
mod dialogs;

use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, SpinnerCircle};
use crate::filter::{section_counts, visible_topics};
use crate::models::Section;
use crate::state::{AppContext, LoadState};
use cards::TopicCard;
use dialogs::{DeleteDialog, EditorDialog, ReaderDialog};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct SectionRouteParams {
    pub section: Option<String>,
}

/// Resolves the route parameter: no parameter is the default section, an
/// unrecognised one is `None`.
fn section_from_param(param: Option<&str>) -> Option<Section> {
    match param {
        None => Some(Section::default()),
        Some(id) => Section::from_id(id),
    }
}

#[component]
pub fn VaultPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = leptos_router::hooks::use_params::<SectionRouteParams>();
    let reading = app_state.0.reading;
    let mobile_menu_open = app_state.0.mobile_menu_open;

    let active_section = Memo::new(move |_| {
        let param = params.get().ok().and_then(|p| p.section);
        section_from_param(param.as_deref())
    });

    // Esc closes reader dialogs and the mobile drawer. The editor and the
    // delete dialog only close through their buttons.
    let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key().to_lowercase() != "escape" {
            return;
        }
        if reading.get_untracked().is_some() {
            reading.set(None);
        } else if mobile_menu_open.get_untracked() {
            mobile_menu_open.set(false);
        }
    });
    on_cleanup(move || key_handle.remove());

    view! {
        <Show
            when=move || active_section.get().is_some()
            fallback=|| view! { <NotFoundPage /> }
        >
            <div class="flex min-h-screen bg-slate-50 text-slate-900">
                <Sidebar active_section=Signal::derive(move || active_section.get().unwrap_or_default()) />
                <main class="flex min-w-0 flex-1 flex-col">
                    <Header active_section=Signal::derive(move || active_section.get().unwrap_or_default()) />
                    <TopicGrid active_section=Signal::derive(move || active_section.get().unwrap_or_default()) />
                </main>
            </div>

            <ReaderDialog />
            <EditorDialog />
            <DeleteDialog />
        </Show>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="px-4 py-8 text-xs text-slate-500">
            "Not found. "
            <a href="/" class="text-indigo-600 hover:underline">"Back to the vault"</a>
        </div>
    }
}

#[component]
fn Sidebar(active_section: Signal<Section>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.store;
    let admin_mode = app_state.0.admin_mode;
    let mobile_menu_open = app_state.0.mobile_menu_open;

    let counts = Memo::new(move |_| store.with_topics(section_counts));

    let drawer_class = move || {
        let base = "fixed inset-y-0 left-0 z-40 flex w-64 flex-col bg-slate-900 text-slate-300 transition-transform duration-200 md:static md:translate-x-0";
        if mobile_menu_open.get() {
            format!("{base} translate-x-0")
        } else {
            format!("{base} -translate-x-full")
        }
    };

    view! {
        <Show when=move || mobile_menu_open.get() fallback=|| ().into_view()>
            <div
                class="fixed inset-0 z-30 bg-slate-900/50 md:hidden"
                on:click=move |_| mobile_menu_open.set(false)
            />
        </Show>

        <aside class=drawer_class>
            <div class="border-b border-slate-800 px-6 py-5">
                <a href="/" class="block text-lg font-black tracking-tight text-white">
                    "BPSC VAULT"
                </a>
                <div class="text-[10px] font-bold uppercase tracking-widest text-slate-500">
                    "Previous Year Questions"
                </div>
            </div>

            <nav class="flex-1 space-y-1 overflow-y-auto px-3 py-4">
                {Section::all()
                    .map(|section| {
                        let link_class = move || {
                            if active_section.get() == section {
                                "flex items-center justify-between rounded-lg bg-indigo-600 px-3 py-2 text-sm font-semibold text-white"
                            } else {
                                "flex items-center justify-between rounded-lg px-3 py-2 text-sm font-medium hover:bg-slate-800 hover:text-white"
                            }
                        };
                        view! {
                            <a
                                href=format!("/section/{}", section.id())
                                class=link_class
                                on:click=move |_| mobile_menu_open.set(false)
                            >
                                <span>{section.label()}</span>
                                <span class="rounded-full bg-slate-800/80 px-2 text-[10px] font-bold">
                                    {move || counts.with(|c| c.get(&section).copied().unwrap_or(0))}
                                </span>
                            </a>
                        }
                    })
                    .collect_view()}
            </nav>

            <div class="border-t border-slate-800 p-4">
                <Show
                    when=move || admin_mode.get()
                    fallback=move || view! {
                        <Button variant=ButtonVariant::Dark on:click=move |_| admin_mode.set(true)>
                            "ADMIN LOGIN"
                        </Button>
                    }
                >
                    <Button variant=ButtonVariant::Admin on:click=move |_| admin_mode.set(false)>
                        "STUDENT VIEW"
                    </Button>
                </Show>
            </div>
        </aside>
    }
}

#[component]
fn Header(active_section: Signal<Section>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let search_term = app_state.0.search_term;
    let admin_mode = app_state.0.admin_mode;
    let mobile_menu_open = app_state.0.mobile_menu_open;
    let editor = app_state.0.editor;

    view! {
        <header class="sticky top-0 z-20 flex items-center gap-3 border-b border-slate-200 bg-white/90 px-4 py-3 backdrop-blur md:px-8">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="md:hidden"
                attr:title="Open menu"
                on:click=move |_| mobile_menu_open.update(|v| *v = !*v)
            >
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    width="20"
                    height="20"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    aria-hidden="true"
                >
                    <path d="M4 6h16" />
                    <path d="M4 12h16" />
                    <path d="M4 18h16" />
                </svg>
            </Button>

            <h1 class="shrink-0 text-lg font-black tracking-tight text-slate-800">
                {move || active_section.get().label()}
            </h1>

            <Input
                class="ml-auto max-w-xs"
                r#type="search"
                placeholder="Search topics..."
                value=search_term
                on_input=Callback::new(move |v: String| search_term.set(v))
            />

            <Show when=move || admin_mode.get() fallback=|| ().into_view()>
                <Button
                    size=ButtonSize::Icon
                    class="rounded-full text-lg"
                    attr:title="Add topic"
                    on:click=move |_| editor.start_create(active_section.get_untracked())
                >
                    "+"
                </Button>
            </Show>
        </header>
    }
}

#[component]
fn TopicGrid(active_section: Signal<Section>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.store;
    let search_term = app_state.0.search_term;
    let admin_mode = app_state.0.admin_mode;
    let editor = app_state.0.editor;
    let session_error = app_state.0.session_error;

    let visible = Memo::new(move |_| {
        let section = active_section.get();
        search_term.with(|term| store.with_topics(|topics| visible_topics(topics, section, term)))
    });

    let problem = move || session_error.get().or_else(|| store.last_error());

    view! {
        <div class="flex-1 px-4 py-6 md:px-8">
            <Show when=move || problem().is_some() fallback=|| ().into_view()>
                <div class="mb-4 rounded-lg border border-amber-200 bg-amber-50 px-4 py-2 text-xs text-amber-800">
                    {move || problem().unwrap_or_default()}
                </div>
            </Show>

            {move || {
                if store.load_state() == LoadState::Loading {
                    return view! { <SpinnerCircle caption="Loading vault..." /> }.into_any();
                }

                let topics = visible.get();
                if topics.is_empty() {
                    return view! {
                        <div class="flex flex-col items-center justify-center gap-4 py-24 text-center">
                            <div class="text-xl font-black text-slate-300">"No Data Found"</div>
                            <Show
                                when=move || admin_mode.get()
                                fallback=move || view! {
                                    <Button
                                        variant=ButtonVariant::Outline
                                        on:click=move |_| search_term.set(String::new())
                                    >
                                        "Clear Search Filters"
                                    </Button>
                                }
                            >
                                <Button on:click=move |_| editor.start_create(active_section.get_untracked())>
                                    "Create First Topic"
                                </Button>
                            </Show>
                        </div>
                    }
                    .into_any();
                }

                view! {
                    <div class="grid grid-cols-1 gap-6 lg:grid-cols-2 2xl:grid-cols-3">
                        {topics.into_iter().map(|topic| view! { <TopicCard topic /> }).collect_view()}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

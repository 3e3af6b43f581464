use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Input, Label, Modal, ModalBody,
    ModalFooter, ModalHeader, ModalTitle, Spinner, Textarea,
};
use crate::drafts::{QuestionField, TopicDraft, TopicField};
use crate::models::{Question, Section};
use crate::state::{AppContext, Reading};
use leptos::prelude::*;

const NO_ANALYSIS: &str = "No analysis available.";
const NO_SOLUTION: &str = "Solution coming soon...";

fn or_placeholder(text: &str, placeholder: &'static str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

/// Read-only trend and solution views.
#[component]
pub fn ReaderDialog() -> impl IntoView {
    let reading = expect_context::<AppContext>().0.reading;
    let on_close = Callback::new(move |_: ()| reading.set(None));

    view! {
        <Show when=move || reading.with(|r| r.is_some()) fallback=|| ().into_view()>
            <Modal on_close=on_close>
                {move || reading.get().map(|r| match r {
                    Reading::Trend { title, trend } => view! {
                        <ModalHeader>
                            <div class="space-y-1 pr-8">
                                <div class="text-[10px] font-bold uppercase tracking-widest text-indigo-500">
                                    "Trend Analysis"
                                </div>
                                <ModalTitle>{title}</ModalTitle>
                            </div>
                        </ModalHeader>
                        <ModalBody>
                            <p class="whitespace-pre-wrap text-sm leading-relaxed text-slate-700">
                                {or_placeholder(&trend, NO_ANALYSIS)}
                            </p>
                        </ModalBody>
                    }
                    .into_any(),
                    Reading::Solution { topic_title, question } => view! {
                        <ModalHeader>
                            <div class="space-y-1 pr-8">
                                <div class="text-[10px] font-bold uppercase tracking-widest text-emerald-600">
                                    {format!("Model Answer · {}", question.year)}
                                </div>
                                <ModalTitle>{topic_title}</ModalTitle>
                            </div>
                        </ModalHeader>
                        <ModalBody>
                            <blockquote class="border-l-4 border-indigo-300 bg-slate-50 px-4 py-3 text-sm italic text-slate-600">
                                {format!("\"{}\"", question.q)}
                            </blockquote>
                            <p class="whitespace-pre-wrap text-sm leading-relaxed text-slate-700">
                                {or_placeholder(&question.solution, NO_SOLUTION)}
                            </p>
                        </ModalBody>
                    }
                    .into_any(),
                })}
            </Modal>
        </Show>
    }
}

#[component]
pub fn EditorDialog() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let editor = app_state.0.editor;
    let gateway = app_state.0.gateway;

    let on_close = Callback::new(move |_: ()| editor.cancel());

    let field = move |read: fn(&TopicDraft) -> String| {
        Signal::derive(move || editor.with_draft(read).unwrap_or_default())
    };

    // Rows are keyed by position; only add/remove rebuilds them.
    let question_count = Memo::new(move |_| editor.with_draft(|d| d.questions().len()).unwrap_or(0));

    let heading = move || {
        if editor.with_draft(|d| d.is_new()).unwrap_or(true) {
            "New Topic"
        } else {
            "Edit Topic"
        }
    };

    let on_save = move |_| editor.commit(gateway.get_untracked());

    view! {
        <Show when=move || editor.is_open() fallback=|| ().into_view()>
            <Modal on_close=on_close close_on_backdrop_click=false class="max-w-2xl">
                <ModalHeader>
                    <ModalTitle>{heading}</ModalTitle>
                </ModalHeader>

                <ModalBody>
                    <div class="space-y-1.5">
                        <Label html_for="topic-title">"Title"</Label>
                        <Input
                            id="topic-title"
                            placeholder="e.g. Indian Polity"
                            value=field(|d| d.doc.title.clone())
                            on_input=Callback::new(move |v| editor.update_topic_field(TopicField::Title(v)))
                        />
                    </div>

                    <div class="space-y-1.5">
                        <Label html_for="topic-section">"Section"</Label>
                        <select
                            id="topic-section"
                            class="h-9 w-full rounded-lg border border-slate-200 bg-white px-3 text-sm text-slate-800"
                            prop:value=move || editor.with_draft(|d| d.doc.section.id()).unwrap_or_default()
                            on:change=move |ev| {
                                if let Some(section) = Section::from_id(&event_target_value(&ev)) {
                                    editor.update_topic_field(TopicField::Section(section));
                                }
                            }
                        >
                            {Section::all()
                                .map(|s| view! { <option value=s.id()>{s.label()}</option> })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="space-y-1.5">
                        <Label html_for="topic-trend">"Trend Analysis"</Label>
                        <Textarea
                            id="topic-trend"
                            rows=3
                            value=field(|d| d.doc.trend.clone())
                            on_input=Callback::new(move |v| editor.update_topic_field(TopicField::Trend(v)))
                        />
                    </div>

                    <div class="space-y-1.5">
                        <Label html_for="topic-link">"Study Notes Link"</Label>
                        <Input
                            id="topic-link"
                            r#type="url"
                            placeholder="https://"
                            value=field(|d| d.doc.study_link.clone())
                            on_input=Callback::new(move |v| editor.update_topic_field(TopicField::StudyLink(v)))
                        />
                    </div>

                    <div class="space-y-3">
                        <div class="flex items-center justify-between">
                            <Label>"Questions"</Label>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=move |_| editor.add_question()
                            >
                                "+ Add Question"
                            </Button>
                        </div>

                        {move || {
                            (0..question_count.get())
                                .map(|index| view! { <QuestionFields index /> })
                                .collect_view()
                        }}
                    </div>

                    <Show when=move || editor.error().is_some() fallback=|| ().into_view()>
                        {move || editor.error().map(|e| view! {
                            <Alert class="border-red-200 bg-red-50">
                                <AlertDescription class="text-xs text-red-700">{e}</AlertDescription>
                            </Alert>
                        })}
                    </Show>
                </ModalBody>

                <ModalFooter>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:disabled=move || editor.is_saving()
                        on:click=move |_| editor.cancel()
                    >
                        "Cancel"
                    </Button>
                    <Button
                        size=ButtonSize::Sm
                        attr:disabled=move || editor.is_saving()
                        on:click=on_save
                    >
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || editor.is_saving() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if editor.is_saving() { "Saving..." } else { "Save Topic" }}
                        </span>
                    </Button>
                </ModalFooter>
            </Modal>
        </Show>
    }
}

#[component]
fn QuestionFields(index: usize) -> impl IntoView {
    let editor = expect_context::<AppContext>().0.editor;

    let read = move |pick: fn(&Question) -> String| {
        Signal::derive(move || {
            editor
                .with_draft(|d| d.questions().get(index).map(pick))
                .flatten()
                .unwrap_or_default()
        })
    };
    let write = move |field: QuestionField| {
        Callback::new(move |v: String| editor.update_question_field(index, field, v))
    };

    view! {
        <div class="space-y-2 rounded-xl border border-slate-200 bg-slate-50 p-3">
            <div class="flex items-center gap-2">
                <span class="text-[10px] font-bold uppercase tracking-widest text-slate-400">
                    {format!("Q{}", index + 1)}
                </span>
                <Input
                    class="h-8 w-24"
                    placeholder="Year"
                    value=read(|q| q.year.clone())
                    on_input=write(QuestionField::Year)
                />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    class="ml-auto text-red-500 hover:text-red-600"
                    on:click=move |_| editor.remove_question(index)
                >
                    "Remove"
                </Button>
            </div>
            <Textarea
                rows=2
                placeholder="Question"
                value=read(|q| q.q.clone())
                on_input=write(QuestionField::Prompt)
            />
            <Textarea
                rows=3
                placeholder="Solution (optional)"
                value=read(|q| q.solution.clone())
                on_input=write(QuestionField::Solution)
            />
        </div>
    }
}

#[component]
pub fn DeleteDialog() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let deletion = app_state.0.deletion;
    let gateway = app_state.0.gateway;

    let on_close = Callback::new(move |_: ()| deletion.cancel());
    let on_confirm = move |_| deletion.confirm(gateway.get_untracked());

    view! {
        <Show when=move || deletion.pending().is_some() fallback=|| ().into_view()>
            <Modal on_close=on_close class="max-w-sm">
                <ModalHeader>
                    <ModalTitle class="text-red-600">"Delete topic"</ModalTitle>
                </ModalHeader>
                <ModalBody>
                    <p class="text-sm text-slate-600">
                        "This permanently removes the topic and all of its questions."
                    </p>
                    <div class="rounded-lg border border-slate-200 bg-slate-50 px-3 py-2 text-sm font-medium">
                        {move || deletion.pending().map(|p| p.title().to_string()).unwrap_or_default()}
                    </div>

                    <Show when=move || deletion.error().is_some() fallback=|| ().into_view()>
                        {move || deletion.error().map(|e| view! {
                            <Alert class="border-red-200 bg-red-50">
                                <AlertDescription class="text-xs text-red-700">{e}</AlertDescription>
                            </Alert>
                        })}
                    </Show>
                </ModalBody>
                <ModalFooter>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:disabled=move || deletion.is_deleting()
                        on:click=move |_| deletion.cancel()
                    >
                        "Cancel"
                    </Button>
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        attr:disabled=move || deletion.is_deleting()
                        on:click=on_confirm
                    >
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || deletion.is_deleting() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if deletion.is_deleting() { "Deleting..." } else { "Delete" }}
                        </span>
                    </Button>
                </ModalFooter>
            </Modal>
        </Show>
    }
}

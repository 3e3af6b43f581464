use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardItem, CardTitle,
};
use crate::models::{Question, Topic};
use crate::state::{AppContext, Reading};
use leptos::prelude::*;

#[component]
pub fn TopicCard(topic: Topic) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let admin_mode = app_state.0.admin_mode;
    let editor = app_state.0.editor;
    let deletion = app_state.0.deletion;
    let reading = app_state.0.reading;

    let title = topic.title().to_string();
    let study_link = topic.doc.study_link.clone();
    let has_study_link = topic.has_study_link();
    let questions = topic.doc.questions.clone();
    let question_count = questions.len();

    let topic_for_edit = StoredValue::new(topic.clone());
    let topic_for_delete = StoredValue::new(topic.clone());

    let card_title = title.clone();
    let title_for_trend = title.clone();
    let trend = topic.doc.trend.clone();
    let on_open_trend = move |_| {
        reading.set(Some(Reading::Trend {
            title: title_for_trend.clone(),
            trend: trend.clone(),
        }));
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle>{card_title}</CardTitle>

                <Show when=move || admin_mode.get() fallback=|| ().into_view()>
                    <div class="flex shrink-0 items-center gap-1">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            class="h-8 w-8"
                            attr:title="Edit topic"
                            on:click=move |_| topic_for_edit.with_value(|t| editor.start_edit(t))
                        >
                            <svg
                                xmlns="http://www.w3.org/2000/svg"
                                width="16"
                                height="16"
                                viewBox="0 0 24 24"
                                fill="none"
                                stroke="currentColor"
                                stroke-width="2"
                                stroke-linecap="round"
                                stroke-linejoin="round"
                                aria-hidden="true"
                            >
                                <path d="M12 20h9" />
                                <path d="M16.5 3.5a2.121 2.121 0 0 1 3 3L7 19l-4 1 1-4Z" />
                            </svg>
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            class="h-8 w-8 text-red-500 hover:text-red-600"
                            attr:title="Delete topic"
                            on:click=move |_| topic_for_delete.with_value(|t| deletion.request(t))
                        >
                            <svg
                                xmlns="http://www.w3.org/2000/svg"
                                width="16"
                                height="16"
                                viewBox="0 0 24 24"
                                fill="none"
                                stroke="currentColor"
                                stroke-width="2"
                                stroke-linecap="round"
                                stroke-linejoin="round"
                                aria-hidden="true"
                            >
                                <path d="M3 6h18" />
                                <path d="M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6" />
                                <path d="M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2" />
                            </svg>
                        </Button>
                    </div>
                </Show>
            </CardHeader>

            <CardContent>
                <div class="flex flex-wrap items-center gap-2">
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        class="border-indigo-200 bg-indigo-50 text-indigo-700 hover:bg-indigo-100"
                        on:click=on_open_trend
                    >
                        "ANALYSIS"
                    </Button>
                    {has_study_link.then(|| view! {
                        <a
                            href=study_link.clone()
                            target="_blank"
                            rel="noopener noreferrer"
                            class="inline-flex h-8 items-center rounded-lg border border-emerald-200 bg-emerald-50 px-3 text-xs font-bold text-emerald-700 hover:bg-emerald-100"
                        >
                            "NOTES"
                        </a>
                    })}
                    <span class="ml-auto text-[10px] font-bold uppercase tracking-widest text-slate-400">
                        {format!("{question_count} PYQs")}
                    </span>
                </div>

                <ul class="flex flex-col gap-2">
                    {questions
                        .into_iter()
                        .map(|question| view! { <QuestionRow topic_title=title.clone() question /> })
                        .collect_view()}
                </ul>
            </CardContent>
        </Card>
    }
}

#[component]
fn QuestionRow(topic_title: String, question: Question) -> impl IntoView {
    let reading = expect_context::<AppContext>().0.reading;

    let prompt = question.q.clone();
    let year = question.year.clone();
    let on_show_solution = move |_| {
        reading.set(Some(Reading::Solution {
            topic_title: topic_title.clone(),
            question: question.clone(),
        }));
    };

    view! {
        <CardItem>
            <div class="mb-2 flex items-start gap-2">
                {(!year.is_empty()).then(|| view! {
                    <span class="shrink-0 rounded bg-slate-800 px-1.5 py-0.5 text-[10px] font-bold text-white">
                        {year.clone()}
                    </span>
                })}
                <p class="text-sm leading-relaxed text-slate-700">{prompt}</p>
            </div>
            <Button variant=ButtonVariant::Link size=ButtonSize::Sm class="h-auto px-0" on:click=on_show_solution>
                "Show Solution"
            </Button>
        </CardItem>
    }
}

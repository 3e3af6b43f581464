use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "group flex flex-col overflow-hidden rounded-2xl border border-slate-200 bg-white shadow-sm transition-shadow hover:shadow-md"}
    clx! {CardHeader, div, "flex items-start justify-between gap-3 border-b border-slate-100 px-5 py-4"}
    clx! {CardTitle, h3, "text-base font-bold leading-snug text-slate-800"}
    clx! {CardContent, div, "flex flex-col gap-3 px-5 py-4"}
    // One past-paper question row.
    clx! {CardItem, li, "rounded-xl border border-slate-100 bg-slate-50 p-3"}
}

pub use components::*;

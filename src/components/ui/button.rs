use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-lg text-sm font-bold transition-all disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:ring-2 focus-visible:ring-indigo-400/60 hover:cursor-pointer active:scale-[0.98] touch-manipulation select-none",
        variants: {
            variant: {
                Default: "bg-indigo-600 text-white shadow-sm hover:bg-indigo-700",
                Destructive: "bg-red-600 text-white shadow-sm hover:bg-red-700",
                Outline: "border border-slate-200 bg-white text-slate-700 hover:bg-slate-50",
                Ghost: "text-slate-500 hover:bg-slate-100 hover:text-slate-800",
                Link: "text-indigo-600 underline-offset-4 hover:underline",
                // Sidebar role toggle.
                Admin: "w-full bg-amber-500 text-slate-900 hover:bg-amber-400",
                Dark: "w-full bg-slate-800 text-slate-200 hover:bg-slate-700",
            },
            size: {
                Default: "h-9 px-4 py-2 has-[>svg]:px-3",
                Sm: "h-8 gap-1.5 px-3 text-xs has-[>svg]:px-2.5",
                Icon: "size-9"
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}

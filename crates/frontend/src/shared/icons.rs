use leptos::prelude::*;

/// Path data (24×24 viewBox, stroked) of every icon used by the app
fn icon_paths(name: &str) -> &'static [&'static str] {
    match name {
        "dashboard" => &[
            "M3 3h7v9H3z",
            "M14 3h7v5h-7z",
            "M14 12h7v9h-7z",
            "M3 16h7v5H3z",
        ],
        "clientes" => &[
            "M17 21v-2a4 4 0 0 0-4-4H7a4 4 0 0 0-4 4v2",
            "M13 7a4 4 0 1 1-8 0 4 4 0 0 1 8 0z",
            "M23 21v-2a4 4 0 0 0-3-3.87",
            "M16 3.13a4 4 0 0 1 0 7.75",
        ],
        "productos" => &[
            "M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z",
            "M3.27 6.96 12 12l8.73-5.04",
            "M12 22V12",
        ],
        "albaranes" => &[
            "M14 2H6a2 2 0 0 0-2 2v16l4-2 4 2 4-2 4 2V8z",
            "M14 2v6h6",
            "M8 13h8",
            "M8 17h5",
        ],
        "movimientos" => &[
            "M4 4h16a2 2 0 0 1 2 2v12a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2z",
            "M2 10h20",
            "M6 15h4",
        ],
        "transporte" => &[
            "M3 7h13v10H3z",
            "M16 7h3l2 3v7h-5z",
            "M9 18a1.5 1.5 0 1 1-3 0 1.5 1.5 0 0 1 3 0z",
            "M20 18a1.5 1.5 0 1 1-3 0 1.5 1.5 0 0 1 3 0z",
        ],
        "nueva-venta" => &[
            "M1 1h4l2.68 12.39a2 2 0 0 0 2 1.61h7.72a2 2 0 0 0 2-1.61L23 6H6",
            "M10 21a1 1 0 1 1-2 0 1 1 0 0 1 2 0z",
            "M21 21a1 1 0 1 1-2 0 1 1 0 0 1 2 0z",
        ],
        "tendencias" => &["M23 6l-9.5 9.5-5-5L1 18", "M17 6h6v6"],
        "banco" => &[
            "M3 21h18",
            "M3 10h18",
            "M5 6l7-3 7 3",
            "M4 10v11",
            "M20 10v11",
            "M8 14v3",
            "M12 14v3",
            "M16 14v3",
        ],
        "plus" => &["M12 5v14", "M5 12h14"],
        "refresh" => &[
            "M23 4v6h-6",
            "M1 20v-6h6",
            "M3.51 9a9 9 0 0 1 14.85-3.36L23 10",
            "M1 14l4.64 4.36A9 9 0 0 0 20.49 15",
        ],
        "filter" => &["M22 3H2l8 9.46V19l4 2v-8.54L22 3z"],
        "search" => &["M19 11a8 8 0 1 1-16 0 8 8 0 0 1 16 0z", "M21 21l-4.35-4.35"],
        "x" => &["M18 6L6 18", "M6 6l12 12"],
        "check" => &["M20 6L9 17l-5-5"],
        "chevron-left" => &["M15 18l-6-6 6-6"],
        "chevron-right" => &["M9 18l6-6-6-6"],
        "chevron-down" => &["M6 9l6 6 6-6"],
        "chevrons-left" => &["M11 17l-5-5 5-5", "M18 17l-5-5 5-5"],
        "chevrons-right" => &["M13 17l5-5-5-5", "M6 17l5-5-5-5"],
        "download" => &[
            "M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4",
            "M7 10l5 5 5-5",
            "M12 15V3",
        ],
        "trash" => &[
            "M3 6h18",
            "M19 6l-1 14a2 2 0 0 1-2 2H8a2 2 0 0 1-2-2L5 6",
            "M10 11v6",
            "M14 11v6",
            "M9 6V4a1 1 0 0 1 1-1h4a1 1 0 0 1 1 1v2",
        ],
        "edit" => &["M12 20h9", "M16.5 3.5a2.12 2.12 0 0 1 3 3L7 19l-4 1 1-4z"],
        "eye" => &[
            "M1 12s4-8 11-8 11 8 11 8-4 8-11 8-11-8-11-8z",
            "M15 12a3 3 0 1 1-6 0 3 3 0 0 1 6 0z",
        ],
        "send" => &["M22 2L11 13", "M22 2l-7 20-4-9-9-4z"],
        "link" => &[
            "M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71",
            "M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71",
        ],
        "menu" => &["M3 12h18", "M3 6h18", "M3 18h18"],
        _ => &["M22 12a10 10 0 1 1-20 0 10 10 0 0 1 20 0z", "M12 8v4l3 3"],
    }
}

/// Inline SVG icon; navigation icons are drawn larger than action icons
pub fn icon(name: &str) -> AnyView {
    let size = match name {
        "dashboard" | "clientes" | "productos" | "albaranes" | "movimientos" | "transporte"
        | "nueva-venta" | "tendencias" | "banco" => "20",
        _ => "16",
    };
    let paths = icon_paths(name);
    view! {
        <svg
            width=size
            height=size
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            aria-hidden="true"
        >
            {paths.iter().map(|d| view! { <path d=*d /> }).collect_view()}
        </svg>
    }
    .into_any()
}

use crate::dashboards::d401_tendencias::api;
use crate::shared::components::svg_chart::ChartBlock;
use contracts::shared::ai::render::{render_message, MarkdownTable, MessageBlock};
use contracts::shared::ai::{
    AskRequest, ChatMessage, ChatMode, ChatRequest, ChatRole, GREETING, RESET_GREETING,
    SUGGESTED_QUESTIONS,
};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn bubble_class(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "chat__bubble chat__bubble--user",
        _ => "chat__bubble chat__bubble--assistant",
    }
}

fn markdown_table(table: MarkdownTable) -> impl IntoView {
    view! {
        <table class="table__data table__data--compact">
            <thead>
                <tr>{table.headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}</tr>
            </thead>
            <tbody>
                {table
                    .rows
                    .into_iter()
                    .map(|row| view! { <tr>{row.into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}</tr> })
                    .collect_view()}
            </tbody>
        </table>
    }
}

/// Assistant text with its tables and charts; user text is shown as typed
fn message_body(message: ChatMessage) -> AnyView {
    if message.role == ChatRole::User {
        return view! { <p class="chat__text">{message.content}</p> }.into_any();
    }
    let rendered = render_message(&message.content);
    view! {
        <div>
            {rendered
                .blocks
                .into_iter()
                .map(|block| match block {
                    MessageBlock::Text(text) => view! { <p class="chat__text">{text}</p> }.into_any(),
                    MessageBlock::Table(table) => markdown_table(table).into_any(),
                })
                .collect_view()}
            {rendered.charts.into_iter().map(|spec| view! { <ChartBlock spec=spec /> }).collect_view()}
        </div>
    }
    .into_any()
}

/// Assistant panel of the analytics page. Analytics mode sends the selected
/// range with each question; general mode sends the recent history.
#[component]
#[allow(non_snake_case)]
pub fn TendenciasChat(from: RwSignal<String>, to: RwSignal<String>) -> impl IntoView {
    let mode = RwSignal::new(ChatMode::default());
    let messages = RwSignal::new(vec![ChatMessage::assistant(GREETING)]);
    let input = RwSignal::new(String::new());
    let sending = RwSignal::new(false);
    let log_ref = NodeRef::<html::Div>::new();

    Effect::new(move |_| {
        messages.with(|m| m.len());
        sending.track();
        if let Some(el) = log_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let send = move || {
        let text = input.get_untracked().trim().to_string();
        if text.is_empty() || sending.get_untracked() {
            return;
        }
        messages.update(|m| m.push(ChatMessage::user(text.clone())));
        input.set(String::new());
        sending.set(true);

        let current = mode.get_untracked();
        spawn_local(async move {
            let result = match current {
                ChatMode::Analytics => {
                    let request = AskRequest::new(&text, &from.get_untracked(), &to.get_untracked());
                    api::ask(&request).await
                }
                ChatMode::General => {
                    let request = messages.with_untracked(|m| ChatRequest::general(m));
                    api::chat(&request).await
                }
            };
            let reply = match result {
                Ok(answer) => ChatMessage::assistant(answer),
                Err(e) => {
                    log::warn!("chat ({:?}): {}", current, e);
                    ChatMessage::error(&e.to_string())
                }
            };
            messages.update(|m| m.push(reply));
            sending.set(false);
        });
    };

    let reset = move |_| {
        messages.set(vec![ChatMessage::assistant(RESET_GREETING)]);
        input.set(String::new());
    };

    let mode_button = move |m: ChatMode| {
        view! {
            <Button
                size=ButtonSize::Small
                appearance=Signal::derive(move || {
                    if mode.get() == m { ButtonAppearance::Primary } else { ButtonAppearance::Secondary }
                })
                on_click=move |_| mode.set(m)
            >
                {m.label()}
            </Button>
        }
    };

    view! {
        <Card class="chat">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                <h3 class="dashboard-card__title">"Asistente IA"</h3>
                <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle on_click=reset>
                    "Reiniciar"
                </Button>
            </Flex>
            <Flex gap=FlexGap::Small>
                {mode_button(ChatMode::Analytics)}
                {mode_button(ChatMode::General)}
            </Flex>

            <div class="chat__log" node_ref=log_ref>
                {move || {
                    messages
                        .get()
                        .into_iter()
                        .map(|m| {
                            let class = bubble_class(m.role);
                            view! { <div class=class>{message_body(m)}</div> }
                        })
                        .collect_view()
                }}
                <Show when=move || sending.get()>
                    <div class="chat__bubble chat__bubble--assistant chat__bubble--pending">"Pensando…"</div>
                </Show>
            </div>

            <form
                class="chat__form"
                on:submit=move |ev| {
                    ev.prevent_default();
                    send();
                }
            >
                <input
                    class="form__input"
                    placeholder=move || mode.get().placeholder()
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    class="button button--primary"
                    disabled=move || sending.get() || input.with(|i| i.trim().is_empty())
                >
                    "Enviar"
                </button>
            </form>

            <Show when=move || mode.get() == ChatMode::Analytics>
                <div class="chat__suggestions">
                    {SUGGESTED_QUESTIONS
                        .into_iter()
                        .map(|(caption, question)| view! {
                            <button type="button" class="chip" on:click=move |_| input.set(question.to_string())>
                                {caption}
                            </button>
                        })
                        .collect_view()}
                </div>
            </Show>
            <p class="chat__hint">{move || mode.get().hint()}</p>
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_class() {
        assert_eq!(bubble_class(ChatRole::User), "chat__bubble chat__bubble--user");
        assert_eq!(bubble_class(ChatRole::System), "chat__bubble chat__bubble--assistant");
    }
}

use crate::domain::a007_banco::api;
use crate::shared::components::date_range_inputs::DateRangeInputs;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::{ErrorBox, PageFrame, PageHeader, PAGE_CAT_LIST};
use contracts::domain::a007_banco::aggregate::{BankAccount, BankStatus, BankTransaction};
use contracts::shared::error::ApiError;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn status_label(status: &BankStatus) -> &'static str {
    match (status.linked, status.demo) {
        (true, true) => "Conectado (demo)",
        (true, false) => "Conectado",
        (false, _) => "No conectado",
    }
}

fn empty_accounts_text(linked: bool) -> &'static str {
    if linked {
        "No se han encontrado cuentas (prueba sincronizar)."
    } else {
        "Conéctate para listar cuentas; en demo verás datos ficticios."
    }
}

/// Bank link page: link state, accounts and the transactions of one account
#[component]
#[allow(non_snake_case)]
pub fn BancoView() -> impl IntoView {
    let status = RwSignal::new(BankStatus::default());
    let accounts = RwSignal::new(Vec::<BankAccount>::new());
    let account_id = RwSignal::new(String::new());
    let transactions = RwSignal::new(Vec::<BankTransaction>::new());
    let from = RwSignal::new(String::new());
    let to = RwSignal::new(String::new());
    let loading = RwSignal::new(true);
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let load_accounts = move || async move {
        let list = api::fetch_accounts().await?;
        if account_id.get_untracked().is_empty() {
            if let Some(first) = list.first() {
                account_id.set(first.id.clone());
            }
        }
        accounts.set(list);
        Ok::<_, ApiError>(())
    };

    let load_transactions = move || async move {
        let id = account_id.get_untracked();
        if id.is_empty() {
            return Ok(());
        }
        let list = api::fetch_transactions(&id, &from.get_untracked(), &to.get_untracked()).await?;
        transactions.set(list);
        Ok::<_, ApiError>(())
    };

    spawn_local(async move {
        match api::fetch_status().await {
            Ok(s) => status.set(s),
            Err(e) => {
                log::warn!("bank status: {}", e);
                error.set(Some(e.to_string()));
            }
        }
        if let Err(e) = load_accounts().await {
            log::warn!("bank accounts: {}", e);
            error.set(Some(e.with_context("No se pudieron cargar las cuentas")));
        }
        loading.set(false);
    });

    Effect::new(move |_| {
        account_id.track();
        from.track();
        to.track();
        spawn_local(async move {
            loading.set(true);
            if let Err(e) = load_transactions().await {
                log::warn!("bank transactions: {}", e);
                error.set(Some(e.with_context("No se pudieron cargar los movimientos")));
            }
            loading.set(false);
        });
    });

    let connect = move |_| {
        error.set(None);
        busy.set(true);
        spawn_local(async move {
            let outcome = match api::start_link().await {
                Ok(r) => r.redirect_url.ok_or_else(|| "No hay redirect_url".to_string()),
                Err(e) => Err(e.to_string()),
            };
            match outcome {
                Ok(url) => {
                    log::info!("bank link: redirecting to provider");
                    if let Some(w) = web_sys::window() {
                        if let Err(e) = w.location().set_href(&url) {
                            error.set(Some(format!("{:?}", e)));
                        }
                    }
                }
                Err(msg) => error.set(Some(msg)),
            }
            busy.set(false);
        });
    };

    let sync_now = move |_| {
        error.set(None);
        busy.set(true);
        spawn_local(async move {
            let result = async {
                api::sync().await?;
                load_accounts().await?;
                load_transactions().await
            }
            .await;
            if let Err(e) = result {
                log::warn!("bank sync: {}", e);
                error.set(Some(e.with_context("No se pudo sincronizar")));
            }
            busy.set(false);
        });
    };

    view! {
        <PageFrame page_id="a007_banco--view" category=PAGE_CAT_LIST>
            <PageHeader
                title="Banco (CaixaBank)"
                actions=move || view! {
                    <Show
                        when=move || status.with(|s| s.linked)
                        fallback=move || view! {
                            <Button appearance=ButtonAppearance::Primary on_click=connect disabled=busy>
                                {icon("link")}
                                " Conectar con CaixaBank"
                            </Button>
                        }
                    >
                        <Button appearance=ButtonAppearance::Secondary on_click=sync_now disabled=busy>
                            {icon("refresh")}
                            " Sincronizar ahora"
                        </Button>
                    </Show>
                }
            />

            {move || error.get().map(|e| view! { <ErrorBox message=e /> })}

            <Card class="dashboard-card">
                <span class="form__label">"Estado de enlace"</span>
                <h3 class="dashboard-card__title">{move || status.with(status_label)}</h3>
                {move || status.with(|s| s.last_sync.clone()).map(|ts| view! {
                    <p class="filter-panel__count">{format!("Última sync: {}", format_datetime(&ts))}</p>
                })}
            </Card>

            <Card class="dashboard-card">
                <h3 class="dashboard-card__title">"Cuentas"</h3>
                <Show
                    when=move || accounts.with(|a| !a.is_empty())
                    fallback=move || view! { <p class="table__empty">{move || empty_accounts_text(status.with(|s| s.linked))}</p> }
                >
                    <label class="form__label">
                        "Cuenta"
                        <select
                            class="form__select"
                            prop:value=move || account_id.get()
                            on:change=move |ev| account_id.set(event_target_value(&ev))
                        >
                            {move || accounts
                                .get()
                                .into_iter()
                                .map(|a| view! { <option value=a.id.clone()>{a.option_label()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                </Show>
            </Card>

            <Card class="dashboard-card">
                <DateRangeInputs from=from to=to />
                <Show when=move || loading.get()>
                    <Flex justify=FlexJustify::Center><Spinner /></Flex>
                </Show>
                <div class="table-wrapper">
                    <table class="table__data">
                        <thead>
                            <tr>
                                <th>"Fecha"</th>
                                <th>"Concepto"</th>
                                <th>"Contraparte"</th>
                                <th class="table__cell--right">"Importe"</th>
                                <th class="table__cell--right">"Saldo"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || transactions
                                .get()
                                .into_iter()
                                .map(|t| {
                                    let amount_class = if t.is_debit() {
                                        "table__cell--right amount--negative"
                                    } else {
                                        "table__cell--right amount--positive"
                                    };
                                    view! {
                                        <tr class="table__row">
                                            <td>{t.fecha().to_string()}</td>
                                            <td>{t.concepto().to_string()}</td>
                                            <td>{t.counterparty.clone().unwrap_or_else(|| "—".to_string())}</td>
                                            <td class=amount_class>{t.importe_label()}</td>
                                            <td class="table__cell--right">{t.saldo_label()}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                    <Show when=move || !loading.get() && transactions.with(|t| t.is_empty())>
                        <p class="table__empty">"Sin movimientos en el rango."</p>
                    </Show>
                </div>
            </Card>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        let mut s = BankStatus::default();
        assert_eq!(status_label(&s), "No conectado");
        s.linked = true;
        s.demo = true;
        assert_eq!(status_label(&s), "Conectado (demo)");
        assert_eq!(empty_accounts_text(false), "Conéctate para listar cuentas; en demo verás datos ficticios.");
    }
}

//! Displays all loans, the per-currency totals and the add loan form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState,
    currency::{Currency, format_currency},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    loan::{
        core::{Loan, get_all_loans},
        summary::{LoanSummary, summarize_loans},
    },
};

/// The state needed for the [get_loans_page] route handler.
#[derive(Debug, Clone)]
pub struct LoanPageState {
    /// The database connection for managing loans.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoanPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The loan data to display in the view.
#[derive(Debug, PartialEq)]
struct LoanTableRow {
    borrower: String,
    principal: String,
    interest_rate: f64,
    total_repayment: String,
    delete_url: String,
}

fn table_row_from_loan(loan: &Loan) -> LoanTableRow {
    LoanTableRow {
        borrower: loan.borrower.clone(),
        principal: format_currency(loan.principal, loan.currency),
        interest_rate: loan.interest_rate,
        total_repayment: format_currency(loan.total_repayment(), loan.currency),
        delete_url: format_endpoint(endpoints::DELETE_LOAN, loan.id),
    }
}

const LOAD_ERROR_MESSAGE: &str = "Failed to load loans. Check the server logs and try again.";

fn loans_view(loans: &[LoanTableRow], summary: &LoanSummary, load_error: Option<&str>) -> Markup {
    let table_row = |loan: &LoanTableRow| {
        let delete_confirm = format!(
            "Are you sure you want to delete the loan for '{}'? This cannot be undone.",
            loan.borrower
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (loan.borrower)
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (loan.principal)
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (loan.interest_rate) "%"
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (loan.total_repayment)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    button
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(loan.delete_url)
                        hx-confirm=(delete_confirm)
                        hx-target="closest tr"
                        hx-swap="delete"
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        )
    };

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Loans" }
                }

                (summary_view(summary))

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Borrower"
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    "Principal"
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    "Interest Rate"
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    "Total Repayment"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @if let Some(message) = load_error {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-red-600 dark:text-red-400"
                                    {
                                        (message)
                                    }
                                }
                            } @else {
                                @for loan in loans {
                                    (table_row(loan))
                                }

                                @if loans.is_empty() {
                                    tr
                                    {
                                        td
                                            colspan="5"
                                            class="px-6 py-4 text-center
                                                text-gray-500 dark:text-gray-400"
                                        {
                                            "No loans recorded. Add your first loan using the form below."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                section class="w-full lg:max-w-md"
                {
                    h2 class="text-lg font-bold mb-4" { "Add Loan" }

                    (loan_form_view(""))
                }
            }
        }
    );

    base("Loans", &content)
}

fn summary_view(summary: &LoanSummary) -> Markup {
    let card = |label: &str, slug: &str, value: String| {
        html!(
            div class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm
                dark:border-gray-700 dark:bg-gray-800"
            {
                p class="text-xs uppercase text-gray-500 dark:text-gray-400" { (label) }
                p class="mt-1 text-lg font-semibold tabular-nums" data-summary=(slug)
                {
                    (value)
                }
            }
        )
    };

    html!(
        section class="grid grid-cols-2 lg:grid-cols-4 gap-4 w-full"
        {
            (card(
                "Total Principal (IDR)",
                "idr-principal",
                format_currency(summary.idr_principal, Currency::Idr),
            ))
            (card(
                "Total Interest (IDR)",
                "idr-interest",
                format_currency(summary.idr_interest, Currency::Idr),
            ))
            (card(
                "Total Principal (THB)",
                "thb-principal",
                format_currency(summary.thb_principal, Currency::Thb),
            ))
            (card(
                "Total Interest (THB)",
                "thb-interest",
                format_currency(summary.thb_interest, Currency::Thb),
            ))
        }
    )
}

pub(super) fn loan_form_view(error_message: &str) -> Markup {
    let create_loan_endpoint = endpoints::POST_LOAN;

    html! {
        form
            hx-post=(create_loan_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="nama_peminjam"
                    class=(FORM_LABEL_STYLE)
                {
                    "Borrower Name"
                }

                input
                    id="nama_peminjam"
                    type="text"
                    name="nama_peminjam"
                    placeholder="Borrower Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="jumlah_pinjaman"
                    class=(FORM_LABEL_STYLE)
                {
                    "Loan Amount"
                }

                input
                    id="jumlah_pinjaman"
                    type="number"
                    name="jumlah_pinjaman"
                    placeholder="1000000"
                    min="0"
                    step="any"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="mata_uang"
                    class=(FORM_LABEL_STYLE)
                {
                    "Currency"
                }

                select
                    id="mata_uang"
                    name="mata_uang"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="IDR" { "IDR - Indonesian Rupiah" }
                    option value="THB" { "THB - Thai Baht" }
                }
            }

            div
            {
                label
                    for="tingkat_bunga"
                    class=(FORM_LABEL_STYLE)
                {
                    "Interest Rate (%)"
                }

                input
                    id="tingkat_bunga"
                    type="number"
                    name="tingkat_bunga"
                    placeholder="5"
                    min="0"
                    step="any"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Loan" }
        }
    }
}

/// Renders the loans page showing all loans, the per-currency totals and the
/// add loan form.
///
/// A store failure does not fail the whole page: the table body is replaced
/// with an inline error message and the totals are zeroed.
pub async fn get_loans_page(State(state): State<LoanPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return loans_view(&[], &LoanSummary::default(), Some(LOAD_ERROR_MESSAGE))
                .into_response();
        }
    };

    match get_all_loans(&connection) {
        Ok(loans) => {
            let summary = summarize_loans(&loans);
            let rows: Vec<LoanTableRow> = loans.iter().map(table_row_from_loan).collect();

            loans_view(&rows, &summary, None).into_response()
        }
        Err(error) => {
            tracing::error!("could not get all loans: {error}");

            loans_view(&[], &LoanSummary::default(), Some(LOAD_ERROR_MESSAGE)).into_response()
        }
    }
}

#[cfg(test)]
mod loans_template_tests {
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        endpoints::{self, format_endpoint},
        loan::summary::LoanSummary,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form,
        },
    };

    use super::{LoanTableRow, loans_view};

    fn test_rows() -> Vec<LoanTableRow> {
        vec![
            LoanTableRow {
                borrower: "Alice".to_string(),
                principal: "Rp1.000.000".to_string(),
                interest_rate: 5.0,
                total_repayment: "Rp1.050.000".to_string(),
                delete_url: format_endpoint(endpoints::DELETE_LOAN, 1),
            },
            LoanTableRow {
                borrower: "Bob".to_string(),
                principal: "฿2,000.00".to_string(),
                interest_rate: 10.0,
                total_repayment: "฿2,200.00".to_string(),
                delete_url: format_endpoint(endpoints::DELETE_LOAN, 2),
            },
        ]
    }

    #[test]
    fn renders_table_rows_with_formatted_values() {
        let rows = test_rows();

        let rendered = loans_view(&rows, &LoanSummary::default(), None).into_string();

        let html = Html::parse_document(&rendered);
        assert_valid_html(&html);
        let table_rows = must_get_table_rows(&html, rows.len());

        for (table_row, want) in table_rows.iter().zip(&rows) {
            let got_borrower: String = table_row
                .select(&Selector::parse("th").unwrap())
                .next()
                .expect("Could not find table header <th> in table row")
                .text()
                .collect::<String>()
                .trim()
                .to_string();
            assert_eq!(got_borrower, want.borrower);

            let columns: Vec<String> = table_row
                .select(&Selector::parse("td").unwrap())
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            assert_eq!(columns[0], want.principal);
            assert_eq!(columns[1], format!("{}%", want.interest_rate));
            assert_eq!(columns[2], want.total_repayment);

            let delete_button = table_row
                .select(&Selector::parse("button").unwrap())
                .next()
                .expect("Could not find delete button in table row");
            assert_eq!(delete_button.attr("hx-delete"), Some(want.delete_url.as_str()));
            assert!(
                delete_button.attr("hx-confirm").is_some(),
                "want delete button to ask for confirmation"
            );
        }
    }

    #[test]
    fn renders_no_data_message_for_empty_list() {
        let rendered = loans_view(&[], &LoanSummary::default(), None).into_string();

        let html = Html::parse_document(&rendered);
        assert_valid_html(&html);
        let message = must_get_full_width_cell_text(&html);
        assert!(
            message.contains("No loans recorded"),
            "want no data message, got {message:?}"
        );
    }

    #[test]
    fn renders_inline_error_in_place_of_table_body() {
        let rendered = loans_view(
            &[],
            &LoanSummary::default(),
            Some("Failed to load loans. Check the server logs and try again."),
        )
        .into_string();

        let html = Html::parse_document(&rendered);
        assert_valid_html(&html);
        let message = must_get_full_width_cell_text(&html);
        assert!(
            message.contains("Failed to load loans"),
            "want inline error message, got {message:?}"
        );
    }

    #[test]
    fn renders_summary_totals() {
        let summary = LoanSummary {
            idr_principal: 1_000_000.0,
            idr_interest: 50_000.0,
            thb_principal: 2000.0,
            thb_interest: 200.0,
        };

        let rendered = loans_view(&[], &summary, None).into_string();

        let html = Html::parse_document(&rendered);
        assert_summary_value(&html, "idr-principal", "Rp1.000.000");
        assert_summary_value(&html, "idr-interest", "Rp50.000");
        assert_summary_value(&html, "thb-principal", "฿2,000.00");
        assert_summary_value(&html, "thb-interest", "฿200.00");
    }

    #[test]
    fn renders_zeroed_summary_for_empty_list() {
        let rendered = loans_view(&[], &LoanSummary::default(), None).into_string();

        let html = Html::parse_document(&rendered);
        assert_summary_value(&html, "idr-principal", "Rp0");
        assert_summary_value(&html, "idr-interest", "Rp0");
        assert_summary_value(&html, "thb-principal", "฿0.00");
        assert_summary_value(&html, "thb-interest", "฿0.00");
    }

    #[test]
    fn renders_add_loan_form() {
        let rendered = loans_view(&[], &LoanSummary::default(), None).into_string();

        let html = Html::parse_document(&rendered);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_LOAN, "hx-post");
        assert_form_input(&form, "nama_peminjam", "text");
        assert_form_input(&form, "jumlah_pinjaman", "number");
        assert_form_input(&form, "tingkat_bunga", "number");
        assert_currency_select(&form);
        assert_form_submit_button(&form);
    }

    #[track_caller]
    fn must_get_table_rows(html: &Html, want_row_count: usize) -> Vec<ElementRef<'_>> {
        let table_row_selector = Selector::parse("tbody tr").unwrap();
        let table_rows = html.select(&table_row_selector).collect::<Vec<_>>();

        assert_eq!(
            table_rows.len(),
            want_row_count,
            "want {want_row_count} table rows, got {}",
            table_rows.len()
        );

        table_rows
    }

    #[track_caller]
    fn must_get_full_width_cell_text(html: &Html) -> String {
        let cell_selector = Selector::parse("td[colspan='5']").unwrap();
        html.select(&cell_selector)
            .next()
            .expect("Could not find table cell with colspan='5' in HTML")
            .text()
            .collect::<String>()
            .trim()
            .to_string()
    }

    #[track_caller]
    fn assert_summary_value(html: &Html, slug: &str, want: &str) {
        let selector = Selector::parse(&format!("[data-summary='{slug}']")).unwrap();
        let got: String = html
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("Could not find summary value for {slug}"))
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        assert_eq!(got, want, "want summary {slug} = {want}, got {got}");
    }

    #[track_caller]
    fn assert_currency_select(form: &ElementRef<'_>) {
        let select = form
            .select(&Selector::parse("select[name='mata_uang']").unwrap())
            .next()
            .expect("Could not find currency select in form");

        let options: Vec<&str> = select
            .select(&Selector::parse("option").unwrap())
            .map(|option| option.attr("value").unwrap_or_default())
            .collect();
        assert_eq!(options, vec!["IDR", "THB"]);
    }
}

#[cfg(test)]
mod get_loans_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        currency::Currency,
        loan::core::{NewLoan, create_loan, create_loan_table},
        test_utils::{assert_content_type, assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{LoanPageState, get_loans_page};

    fn get_loan_page_state() -> LoanPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_loan_table(&connection).expect("Could not create loan table");

        LoanPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_loans_with_derived_totals() {
        let state = get_loan_page_state();
        create_loan(
            NewLoan {
                borrower: "Alice".to_string(),
                principal: 1_000_000.0,
                currency: Currency::Idr,
                interest_rate: 5.0,
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test loan");

        let response = get_loans_page(State(state)).await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_text: String = html
            .select(&Selector::parse("tbody tr").unwrap())
            .next()
            .expect("Could not find table row")
            .text()
            .collect();
        assert!(row_text.contains("Alice"));
        assert!(row_text.contains("Rp1.000.000"));
        assert!(row_text.contains("Rp1.050.000"));
    }

    #[tokio::test]
    async fn renders_no_data_message_and_zero_totals_for_empty_store() {
        let state = get_loan_page_state();

        let response = get_loans_page(State(state)).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let body_text: String = html
            .select(&Selector::parse("tbody").unwrap())
            .next()
            .expect("Could not find table body")
            .text()
            .collect();
        assert!(body_text.contains("No loans recorded"));

        let idr_principal: String = html
            .select(&Selector::parse("[data-summary='idr-principal']").unwrap())
            .next()
            .expect("Could not find IDR principal summary")
            .text()
            .collect();
        assert_eq!(idr_principal.trim(), "Rp0");
    }
}

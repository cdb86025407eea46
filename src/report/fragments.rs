//! Markup fragments for the report: table body, table, pane and tab
//!
//! Every renderer is a pure function returning a `String`. Fragments
//! are only ever concatenated, never parsed.

use std::fmt;

use chrono::TimeZone;

use super::format::format_record;
use super::record::{Racer, TradeRecord};

/// Placeholder row for an account with no open positions
pub const EMPTY_TBODY: &str =
    r#"    <tr><td colspan="5" class="text-secondary text-center fst-italic">No data.</td></tr>"#;

/// Column labels of the positions table, in order
pub const COLUMNS: [&str; 5] = ["Symbol", "Type", "Price", "Vol", "Profit"];

/// Render the body rows for one account
///
/// Records are emitted in the order given; sorting belongs to the caller.
pub fn render_tbody<Tz>(records: &[TradeRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if records.is_empty() {
        return EMPTY_TBODY.to_string();
    }
    records
        .iter()
        .map(|r| format_record(r, tz))
        .collect::<Vec<_>>()
        .join("")
}

/// Wrap body rows in the table scaffolding
pub fn render_table(tbody: &str) -> String {
    format!(
        r#"
      <table class="table table-hover table-sm">
        <thead>
          <tr class="table-secondary">
            <th>{symbol}</th> <th>{kind}</th> <th>{price}</th> <th>{vol}</th> <th class="text-end">{profit}</th>
          </tr>
        </thead>
        <tbody>
        {tbody}
        </tbody>
      </table>
"#,
        symbol = COLUMNS[0],
        kind = COLUMNS[1],
        price = COLUMNS[2],
        vol = COLUMNS[3],
        profit = COLUMNS[4],
    )
}

/// Render the tab-content pane for one account
///
/// The pane anchor is the racer label. Only the first pane can be shown
/// on load, and only when `activate_first` is set.
pub fn render_pane(index: usize, racer: &Racer, table: &str, activate_first: bool) -> String {
    let active = if activate_first && index == 0 {
        "show active"
    } else {
        ""
    };
    format!(
        r#"
    <div id="{name}" class="tab-pane fade {active}">
      <h6>ID: {account}</h6>
      <p class="text-secondary fst-italic">xtb-{name}</p>
      {table}
    </div>
"#,
        name = racer.app,
        account = racer.id,
    )
}

/// Render the navigation tab pointing at a pane
pub fn render_tab(label: &str) -> String {
    format!(
        r##"
        <li class="nav-item"><a class="nav-link" data-bs-toggle="tab" href="#{label}">{upper}</a></li>"##,
        upper = label.to_uppercase(),
    )
}

//! Single trade record formatting

use std::fmt;

use chrono::{Local, TimeZone};

use super::record::{OpenTime, TradeRecord};

/// strftime pattern for open times, e.g. `Tue 14-May, 03:07 PM`
pub const OPEN_TIME_FORMAT: &str = "%a %d-%b, %I:%M %p";

/// Format an open time in the local time zone
pub fn format_open_time(open_time: &OpenTime) -> String {
    format_open_time_in(open_time, &Local)
}

/// Format an open time in an explicit time zone
pub fn format_open_time_in<Tz>(open_time: &OpenTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    open_time
        .at()
        .with_timezone(tz)
        .format(OPEN_TIME_FORMAT)
        .to_string()
}

/// Bootstrap colour for the profit cell
pub fn profit_style(record: &TradeRecord) -> &'static str {
    if record.is_losing() {
        "danger"
    } else {
        "success"
    }
}

/// Render one record as three stacked table rows
///
/// Row 1 carries symbol, command badge, price, volume and profit; row 2
/// the open time; row 3 the order and position ids.
pub fn format_record<Tz>(record: &TradeRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        r#"
        <tr> <td rowspan="3">{symbol}</td>
          <td rowspan="3">
            <button type="button" class="btn btn-sm btn-outline-{cmd_color} fw-bold" 
              style="--bs-btn-padding-y: .1rem; --bs-btn-padding-x: .1rem; --bs-btn-font-size: .55rem;" disabled>{cmd_text}
            </button>
          </td>
          <td>{open_price}</td><td>{volume}</td>
          <td class="fw-bold text-end text-{profit_color}">{profit}</td>
        </tr>
        <tr><td colspan="3" class="text-secondary fw-light fst-italic"><small>{open_time}</small></td></tr>
        <tr>
          <td colspan="3" class="text-secondary fw-light"><small><i>Order: </i>{order2}<i> Position: </i>{position}</small></td>
        </tr>
        "#,
        symbol = record.symbol,
        cmd_color = record.cmd.style(),
        cmd_text = record.cmd.label(),
        open_price = record.open_price,
        volume = record.volume,
        profit_color = profit_style(record),
        profit = record.profit,
        open_time = format_open_time_in(&record.open_time, tz),
        order2 = record.order2,
        position = record.position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    // 2024-05-14 15:07:00 UTC
    const TUE_AFTERNOON_MS: i64 = 1_715_699_220_000;

    fn sell_at_loss() -> TradeRecord {
        serde_json::from_value(json!({
            "symbol": "US500",
            "cmd": 1,
            "open_price": 5230.4,
            "volume": 0.05,
            "profit": -12.5,
            "open_time": TUE_AFTERNOON_MS + 999,
            "order2": 551_022_115,
            "position": 551_022_100,
        }))
        .unwrap()
    }

    #[test]
    fn test_open_time_format() {
        let t = OpenTime::from_millis(TUE_AFTERNOON_MS).unwrap();
        assert_eq!(format_open_time_in(&t, &Utc), "Tue 14-May, 03:07 PM");
    }

    #[test]
    fn test_open_time_morning_is_zero_padded() {
        // 2024-01-05 09:04:00 UTC
        let t = OpenTime::from_millis(1_704_445_440_000).unwrap();
        assert_eq!(format_open_time_in(&t, &Utc), "Fri 05-Jan, 09:04 AM");
    }

    #[test]
    fn test_local_time_matches_chrono_local() {
        let t = OpenTime::from_millis(TUE_AFTERNOON_MS).unwrap();
        let expected = t.at().with_timezone(&Local).format(OPEN_TIME_FORMAT).to_string();
        assert_eq!(format_open_time(&t), expected);
    }

    #[test]
    fn test_sell_at_loss_styling() {
        let html = format_record(&sell_at_loss(), &Utc);
        assert!(html.contains("btn-outline-danger fw-bold"));
        assert!(html.contains("disabled>SELL"));
        assert!(html.contains(r#"<td class="fw-bold text-end text-danger">-12.5</td>"#));
        assert!(html.contains("<small>Tue 14-May, 03:07 PM</small>"));
        assert!(html.contains("<i>Order: </i>551022115<i> Position: </i>551022100"));
        assert!(html.contains("<td>5230.4</td><td>0.05</td>"));
    }

    #[test]
    fn test_unknown_command_renders_na() {
        let mut rec = sell_at_loss();
        rec.cmd = crate::report::Command::from(json!(6));
        let html = format_record(&rec, &Utc);
        assert!(html.contains("btn-outline-secondary"));
        assert!(html.contains("disabled>NA"));
    }

    #[test]
    fn test_zero_profit_is_success() {
        let mut rec = sell_at_loss();
        rec.profit = serde_json::Number::from(0_i64);
        assert_eq!(profit_style(&rec), "success");
        let html = format_record(&rec, &Utc);
        assert!(html.contains(r#"text-success">0</td>"#));
    }

    #[test]
    fn test_three_rows_per_record() {
        let html = format_record(&sell_at_loss(), &Utc);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("</tr>").count(), 3);
        assert!(html.starts_with("\n        <tr> <td rowspan=\"3\">US500</td>"));
        assert!(html.ends_with("</tr>\n        "));
    }
}

//! Report document assembly

use std::fmt;

use chrono::{Local, TimeZone};

use super::fragments::{render_pane, render_table, render_tab, render_tbody};
use super::record::{Racer, TradeRecord};
use crate::config::ReportConfig;

/// Multi-tab positions report
///
/// Built append-only: one [`process`](Self::process) call per racer in
/// configured order, then [`finalize`](Self::finalize) to render the
/// shell. Tabs and panes stay index-aligned.
#[derive(Debug, Clone)]
pub struct ReportDocument<Tz: TimeZone = Local> {
    title: String,
    activate_first_tab: bool,
    tz: Tz,
    tabs: Vec<String>,
    panes: Vec<String>,
}

impl ReportDocument<Local> {
    /// Create an empty document rendering open times in local time
    pub fn new(options: &ReportConfig) -> Self {
        Self::with_timezone(options, Local)
    }
}

impl<Tz> ReportDocument<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn with_timezone(options: &ReportConfig, tz: Tz) -> Self {
        Self {
            title: options.title.clone(),
            activate_first_tab: options.activate_first_tab,
            tz,
            tabs: Vec::new(),
            panes: Vec::new(),
        }
    }

    /// Render one racer's records and append its pane and tab
    pub fn process(&mut self, index: usize, racer: &Racer, records: &[TradeRecord]) -> &mut Self {
        let tbody = render_tbody(records, &self.tz);
        let table = render_table(&tbody);
        let pane = render_pane(index, racer, &table, self.activate_first_tab);
        let tab = render_tab(&racer.app);
        self.tabs.push(tab);
        self.panes.push(pane);
        self
    }

    /// Render the full HTML document
    ///
    /// Does not consume the document; repeated calls return identical output.
    pub fn finalize(&self) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html lang="en" data-bs-theme="dark">
<head>
  <title>{title}</title>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="icon" type="image/x-icon" href="favicon.ico" />
  <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet">
  <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/js/bootstrap.bundle.min.js"></script>
  </head>
<body>
  <header>
    <ul class="nav nav-tabs justify-content-center" role="tablist">
      {tabs}
    </ul>
  </header>
  <div class="container tab-content pt-5" id="pills-tabContent">
  {panes}
  </div>
</body>
</html>
"#,
            title = self.title,
            tabs = self.tabs.join(""),
            panes = self.panes.join(""),
        )
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn panes(&self) -> &[String] {
        &self.panes
    }

    /// Number of racers processed so far
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }
}

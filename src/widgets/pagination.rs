//! Pagination control for Spring Data style page results.
//!
//! The renderer produces a [`Pagination`] view model (info label plus First,
//! Prev, up to five numbered pages, Next, Last) that can be drawn as Bootstrap
//! markup or plain text. Activating a control only calls the caller's
//! callback; reloading is the caller's job.

use serde::Deserialize;
use serde_json::Value;
use std::{fmt, ops::Range};

/// Numbered buttons shown at most.
pub const WINDOW_SIZE: u64 = 5;
const WINDOW_RADIUS: u64 = 2;

pub const EMPTY_PLACEHOLDER: &str = "無資料";

/// Page metadata in either the flat `Page<T>` shape or the wrapped
/// `{content, page: {...}}` shape.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct PageResult {
    pub content: Vec<Value>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based current page.
    pub number: u64,
}

impl PageResult {
    #[must_use]
    pub fn new(total_elements: u64, total_pages: u64, number: u64) -> Self {
        Self {
            content: Vec::new(),
            total_elements,
            total_pages,
            number,
        }
    }

    /// Reads either shape; missing or non-numeric values default to zero.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let meta = match value.get("page") {
            Some(page) if is_present(page) => page,
            _ => value,
        };

        Self {
            content: value
                .get("content")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            total_elements: count(meta.get("totalElements")),
            total_pages: count(meta.get("totalPages")),
            number: count(meta.get("number")),
        }
    }

    #[must_use]
    pub fn last_page(&self) -> Option<u64> {
        self.total_pages.checked_sub(1)
    }
}

impl From<Value> for PageResult {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| n.is_finite() && *n > 0.0)
                    .map(|n| n.trunc() as u64)
            })
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Numbered pages to show: centred on `current`, widened toward the open side
/// near either edge, never outside `[0, total_pages)`.
#[must_use]
pub fn page_window(current: u64, total_pages: u64) -> Range<u64> {
    let Some(last) = total_pages.checked_sub(1) else {
        return 0..0;
    };
    let current = current.min(last);

    let mut start = current.saturating_sub(WINDOW_RADIUS);
    let mut end = last.min(current.saturating_add(WINDOW_RADIUS));

    if end - start < WINDOW_SIZE - 1 {
        if start == 0 {
            end = last.min(start + WINDOW_SIZE - 1);
        } else if end == last {
            start = end.saturating_sub(WINDOW_SIZE - 1);
        }
    }

    start..end + 1
}

/// Glyph set, picked from whether an icon font stylesheet is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IconSet {
    #[default]
    Text,
    FontAwesome,
}

impl IconSet {
    /// Looks for a Font Awesome stylesheet among the document's link hrefs.
    pub fn detect<'a>(stylesheet_hrefs: impl IntoIterator<Item = &'a str>) -> Self {
        let loaded = stylesheet_hrefs
            .into_iter()
            .any(|href| href.contains("font-awesome") || href.contains("all.min.css"));
        if loaded {
            Self::FontAwesome
        } else {
            Self::Text
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    First,
    Prev,
    Page,
    Next,
    Last,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageControl {
    pub kind: ControlKind,
    /// Zero-based page requested on activation.
    pub target: u64,
    pub disabled: bool,
    pub active: bool,
}

impl PageControl {
    fn new(kind: ControlKind, target: u64, disabled: bool) -> Self {
        Self {
            kind,
            target,
            disabled,
            active: false,
        }
    }

    /// Visible label: icon markup, text glyph, or the one-based page number.
    #[must_use]
    pub fn label(&self, icons: IconSet) -> String {
        let (icon, glyph) = match self.kind {
            ControlKind::First => ("fa-angle-double-left", "«"),
            ControlKind::Prev => ("fa-angle-left", "‹"),
            ControlKind::Next => ("fa-angle-right", "›"),
            ControlKind::Last => ("fa-angle-double-right", "»"),
            ControlKind::Page => return (self.target + 1).to_string(),
        };

        match icons {
            IconSet::FontAwesome => format!(r#"<i class="fas {icon}"></i>"#),
            IconSet::Text => glyph.to_string(),
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&'static str> {
        match self.kind {
            ControlKind::First => Some("第一頁"),
            ControlKind::Prev => Some("上一頁"),
            ControlKind::Next => Some("下一頁"),
            ControlKind::Last => Some("最後一頁"),
            ControlKind::Page => None,
        }
    }

    /// Calls `on_page` with the target unless disabled; returns whether it ran.
    pub fn activate<F: FnMut(u64)>(&self, mut on_page: F) -> bool {
        if self.disabled {
            return false;
        }
        on_page(self.target);
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pagination {
    /// No data; only the placeholder is drawn.
    Empty,
    Controls {
        total_elements: u64,
        total_pages: u64,
        controls: Vec<PageControl>,
    },
}

impl Pagination {
    #[must_use]
    pub fn info_label(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Controls {
                total_elements,
                total_pages,
                ..
            } => Some(format!("共 {total_elements} 筆 / {total_pages} 頁")),
        }
    }

    #[must_use]
    pub fn controls(&self) -> &[PageControl] {
        match self {
            Self::Empty => &[],
            Self::Controls { controls, .. } => controls,
        }
    }

    pub fn numbered(&self) -> impl Iterator<Item = &PageControl> {
        self.controls()
            .iter()
            .filter(|control| control.kind == ControlKind::Page)
    }

    #[must_use]
    pub fn control(&self, kind: ControlKind) -> Option<&PageControl> {
        self.controls().iter().find(|control| control.kind == kind)
    }

    /// Bootstrap 5 markup.
    #[must_use]
    pub fn to_html(&self, icons: IconSet) -> String {
        let Self::Controls { controls, .. } = self else {
            return format!(r#"<div class="text-center text-muted py-3">{EMPTY_PLACEHOLDER}</div>"#);
        };

        let mut items = String::new();
        for control in controls {
            let mut class = String::from("page-item");
            if control.disabled {
                class.push_str(" disabled");
            }
            if control.active {
                class.push_str(" active");
            }
            let title = control
                .title()
                .map(|title| format!(r#" title="{title}""#))
                .unwrap_or_default();
            items.push_str(&format!(
                r##"<li class="{class}"><a class="page-link" href="#" data-page="{}"{title}>{}</a></li>"##,
                control.target,
                control.label(icons)
            ));
        }

        format!(
            concat!(
                r#"<div class="d-flex justify-content-between w-100">"#,
                r#"<div class="d-flex align-items-center"><span class="text-muted small me-3">{}</span></div>"#,
                r#"<nav><ul class="pagination pagination-sm mb-0">{}</ul></nav>"#,
                "</div>"
            ),
            self.info_label().unwrap_or_default(),
            items
        )
    }
}

/// Plain-text rendering: active page in brackets, disabled controls in
/// parentheses.
impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Controls { controls, .. } = self else {
            return write!(f, "{EMPTY_PLACEHOLDER}");
        };

        writeln!(f, "{}", self.info_label().unwrap_or_default())?;
        let labels: Vec<String> = controls
            .iter()
            .map(|control| {
                let label = control.label(IconSet::Text);
                if control.active {
                    format!("[{label}]")
                } else if control.disabled {
                    format!("({label})")
                } else {
                    label
                }
            })
            .collect();
        write!(f, "{}", labels.join(" "))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PageRenderer {
    icons: IconSet,
}

impl PageRenderer {
    #[must_use]
    pub fn new(icons: IconSet) -> Self {
        Self { icons }
    }

    #[must_use]
    pub fn icons(&self) -> IconSet {
        self.icons
    }

    /// Builds the view model for `page`.
    #[must_use]
    pub fn view(&self, page: &PageResult) -> Pagination {
        if page.total_elements == 0 {
            return Pagination::Empty;
        }

        let last = page.last_page();
        let current = last.map_or(page.number, |last| page.number.min(last));
        let at_start = current == 0;
        // No valid last page means there is nowhere forward to go.
        let at_end = last.map_or(true, |last| current == last);

        let mut controls = vec![
            PageControl::new(ControlKind::First, 0, at_start),
            PageControl::new(ControlKind::Prev, current.saturating_sub(1), at_start),
        ];

        controls.extend(page_window(current, page.total_pages).map(|index| PageControl {
            active: index == current,
            ..PageControl::new(ControlKind::Page, index, false)
        }));

        controls.push(PageControl::new(ControlKind::Next, current.saturating_add(1), at_end));
        controls.push(PageControl::new(
            ControlKind::Last,
            last.unwrap_or(0),
            at_end,
        ));

        Pagination::Controls {
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            controls,
        }
    }

    /// Renders `page` and binds `on_page` to its controls.
    pub fn render<F: FnMut(u64)>(&self, page: &PageResult, on_page: F) -> PaginationWidget<F> {
        PaginationWidget {
            view: self.view(page),
            icons: self.icons,
            on_page,
        }
    }
}

/// Rendered pagination bound to the caller's reload callback.
pub struct PaginationWidget<F> {
    view: Pagination,
    icons: IconSet,
    on_page: F,
}

impl<F: FnMut(u64)> PaginationWidget<F> {
    #[must_use]
    pub fn view(&self) -> &Pagination {
        &self.view
    }

    #[must_use]
    pub fn html(&self) -> String {
        self.view.to_html(self.icons)
    }

    /// Activates the control at `position` (in render order). Returns whether
    /// the callback ran.
    pub fn click(&mut self, position: usize) -> bool {
        let on_page = &mut self.on_page;
        self.view
            .controls()
            .get(position)
            .is_some_and(|control| control.activate(&mut *on_page))
    }

    /// Activates the first control of `kind`; for [`ControlKind::Page`] use
    /// [`click_page`](Self::click_page).
    pub fn click_kind(&mut self, kind: ControlKind) -> bool {
        let on_page = &mut self.on_page;
        self.view
            .control(kind)
            .is_some_and(|control| control.activate(&mut *on_page))
    }

    /// Activates the numbered button for zero-based `index`, if shown.
    pub fn click_page(&mut self, index: u64) -> bool {
        let on_page = &mut self.on_page;
        self.view
            .numbered()
            .find(|control| control.target == index)
            .is_some_and(|control| control.activate(&mut *on_page))
    }
}

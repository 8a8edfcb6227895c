//! Calendar trigger for native date inputs. Inputs that opt in with
//! `data-enhance="calendar"` are wrapped and get a button that opens the
//! native picker, falling back to focus + click where the picker API is
//! missing or refuses to open.

use tracing::debug;

pub const STYLE_ID: &str = "date-enhancer-styles";
pub const WRAPPER_CLASS: &str = "date-picker-wrapper";
pub const FULL_WIDTH_CLASS: &str = "full-width";
pub const TRIGGER_CLASS: &str = "calendar-trigger-btn";
const ENHANCE_MARKER: &str = "calendar";

pub const STYLES: &str = r#"
.date-picker-wrapper { display: inline-flex; align-items: center; gap: 6px; }
.date-picker-wrapper.full-width { display: flex; width: 100%; }
.date-picker-wrapper input[type="date"] { flex: 1; min-width: 0; }
.calendar-trigger-btn {
    background: transparent;
    border: 1px solid var(--border, rgba(255,255,255,0.2));
    border-radius: 4px;
    padding: 4px 8px;
    cursor: pointer;
    font-size: 16px;
    line-height: 1;
    transition: all 0.2s ease;
    flex-shrink: 0;
}
.calendar-trigger-btn:hover { border-color: var(--accent, #00f6ff); background: rgba(0,246,255,0.1); }
.calendar-trigger-btn:focus { outline: none; border-color: var(--accent, #00f6ff); }
"#;

/// Attributes of an `<input>` the enhancer inspects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateInput {
    pub input_type: String,
    pub data_enhance: Option<String>,
    pub enhanced: bool,
    pub read_only: bool,
    pub disabled: bool,
    pub classes: Vec<String>,
    pub width: Option<String>,
}

impl DateInput {
    /// A date input that opted in to enhancement.
    #[must_use]
    pub fn calendar() -> Self {
        Self {
            input_type: "date".to_string(),
            data_enhance: Some(ENHANCE_MARKER.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.input_type == "date"
            && self.data_enhance.as_deref() == Some(ENHANCE_MARKER)
            && !self.enhanced
            && !self.read_only
            && !self.disabled
    }

    fn is_full_width(&self) -> bool {
        self.classes.iter().any(|class| class == FULL_WIDTH_CLASS)
            || self.width.as_deref().map(str::trim) == Some("100%")
    }
}

/// Wrapper and trigger button added around an enhanced input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enhancement {
    /// Index of the input in the slice passed to [`enhance_date_inputs`].
    pub input: usize,
    pub wrapper_classes: Vec<&'static str>,
    pub trigger: CalendarTrigger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarTrigger {
    pub class: &'static str,
    pub glyph: &'static str,
    pub title: &'static str,
    pub aria_label: &'static str,
}

impl Default for CalendarTrigger {
    fn default() -> Self {
        Self {
            class: TRIGGER_CLASS,
            glyph: "📅",
            title: "選擇日期",
            aria_label: "開啟日曆選擇器",
        }
    }
}

/// Documents that can hold the shared style sheet.
pub trait StyleHost {
    fn has_style(&self, id: &str) -> bool;
    fn add_style(&mut self, id: &str, css: &str);
}

/// Adds the style sheet unless it is already present.
pub fn inject_styles(host: &mut impl StyleHost) -> bool {
    if host.has_style(STYLE_ID) {
        return false;
    }
    host.add_style(STYLE_ID, STYLES);
    true
}

/// Marks every eligible input as enhanced and describes the markup to add.
/// Running it again only picks up inputs added since.
pub fn enhance_date_inputs(inputs: &mut [DateInput]) -> Vec<Enhancement> {
    let enhancements: Vec<Enhancement> = inputs
        .iter_mut()
        .enumerate()
        .filter(|(_, input)| input.is_eligible())
        .map(|(index, input)| {
            input.enhanced = true;

            let mut wrapper_classes = vec![WRAPPER_CLASS];
            if input.is_full_width() {
                wrapper_classes.push(FULL_WIDTH_CLASS);
            }

            Enhancement {
                input: index,
                wrapper_classes,
                trigger: CalendarTrigger::default(),
            }
        })
        .collect();

    debug!("enhanced {} date inputs", enhancements.len());
    enhancements
}

/// The input as seen by the trigger button.
pub trait DatePickerControl {
    /// `Ok(())` if the native picker opened, `Err` if the API is missing or
    /// refused.
    fn show_picker(&mut self) -> Result<(), String>;
    fn focus(&mut self);
    fn click(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerOutcome {
    Native,
    Fallback,
}

/// Trigger button action.
pub fn open_picker(control: &mut impl DatePickerControl) -> PickerOutcome {
    match control.show_picker() {
        Ok(()) => PickerOutcome::Native,
        Err(reason) => {
            debug!("native date picker unavailable: {}", reason);
            control.focus();
            control.click();
            PickerOutcome::Fallback
        }
    }
}

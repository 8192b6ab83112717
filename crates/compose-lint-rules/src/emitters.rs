//! Heuristics for deciding whether a UI function emits content.
//!
//! A function emits content when one of its top-level statements calls a
//! layout or leaf UI function. Calls nested inside lambdas are not looked at.

use std::collections::BTreeSet;

use compose_lint_core::tree::simple_name;
use compose_lint_core::{CallRef, ConfigError, Configuration, FunctionRef};

use crate::options::{CONTENT_EMITTERS, PREVIEW_MARKERS};

/// UI functions known to emit content.
const KNOWN_EMITTERS: &[&str] = &[
    "AndroidView",
    "BasicText",
    "BasicTextField",
    "Box",
    "BoxWithConstraints",
    "Button",
    "Canvas",
    "Card",
    "Checkbox",
    "CircularProgressIndicator",
    "Column",
    "ConstraintLayout",
    "Divider",
    "FloatingActionButton",
    "FlowColumn",
    "FlowRow",
    "HorizontalPager",
    "Icon",
    "IconButton",
    "Image",
    "LazyColumn",
    "LazyRow",
    "LazyVerticalGrid",
    "LinearProgressIndicator",
    "OutlinedButton",
    "OutlinedTextField",
    "RadioButton",
    "Row",
    "Scaffold",
    "Slider",
    "Spacer",
    "Surface",
    "Switch",
    "Tab",
    "TabRow",
    "Text",
    "TextButton",
    "TextField",
    "TopAppBar",
    "VerticalPager",
];

/// Capitalized UI functions that render outside the caller's layout or
/// emit nothing at all.
const NON_EMITTERS: &[&str] = &[
    "AlertDialog",
    "BackHandler",
    "BasicAlertDialog",
    "DatePickerDialog",
    "Dialog",
    "DisposableEffect",
    "DropdownMenu",
    "LaunchedEffect",
    "ModalBottomSheet",
    "Popup",
    "SideEffect",
];

/// Decides whether calls and functions emit content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentEmitters {
    extra: BTreeSet<String>,
}

impl ContentEmitters {
    /// Creates a detector that also treats `extra` as emitters.
    #[must_use]
    pub fn new(extra: BTreeSet<String>) -> Self {
        Self { extra }
    }

    /// Reads [`CONTENT_EMITTERS`] from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the option was not declared.
    pub fn from_config(config: &Configuration) -> Result<Self, ConfigError> {
        config
            .require_set(CONTENT_EMITTERS.name)
            .map(|extra| Self::new(extra.clone()))
    }

    /// Whether a single call emits content.
    #[must_use]
    pub fn emits(&self, call: &CallRef<'_>) -> bool {
        let callee = call.callee();
        if KNOWN_EMITTERS.contains(&callee)
            || self.extra.iter().any(|name| simple_name(name) == callee)
        {
            return true;
        }
        if NON_EMITTERS.contains(&callee) {
            return false;
        }
        let styled = call.arguments().iter().any(|argument| {
            argument.name.as_deref() == Some("modifier")
                || argument.text.trim_start().starts_with("Modifier")
        });
        let is_ui_call = callee.starts_with(|c: char| c.is_ascii_uppercase());
        styled || (is_ui_call && call.has_trailing_lambda())
    }

    /// Whether any top-level statement of `function` emits content.
    #[must_use]
    pub fn is_content_emitting(&self, function: &FunctionRef<'_>) -> bool {
        function
            .body_statements()
            .iter()
            .filter_map(|statement| statement.as_call())
            .any(|call| self.emits(&call))
    }
}

/// Whether `function` carries one of the preview `markers`.
///
/// A marker matches an annotation whose simple name equals it, starts with
/// it or ends with it, so `Preview` covers `PreviewScreenSizes` and
/// `DevicePreview`.
#[must_use]
pub fn has_preview_marker(function: &FunctionRef<'_>, markers: &BTreeSet<String>) -> bool {
    function.annotations().iter().any(|annotation| {
        let name = annotation.simple_name();
        markers.iter().map(|marker| simple_name(marker)).any(|marker| {
            !marker.is_empty() && (name.starts_with(marker) || name.ends_with(marker))
        })
    })
}

pub(crate) fn preview_markers(config: &Configuration) -> Result<BTreeSet<String>, ConfigError> {
    config.require_set(PREVIEW_MARKERS.name).cloned()
}

//! Rule requiring content-emitting UI functions to accept a styling handle.
//!
//! # Rationale
//!
//! A UI function that places content on screen should let its caller
//! position and decorate that content. Without a `modifier` parameter the
//! caller has to wrap it in an extra layout just to add padding.
//!
//! # Detected Patterns
//!
//! A `@Composable` function returning `Unit`, with no styling-handle
//! parameter, whose body has a top-level call that emits content (see
//! [`ContentEmitters`]).
//!
//! # Exemptions
//!
//! - Functions returning a value
//! - `override` functions and interface members
//! - Functions carrying a preview marker annotation
//!
//! # Configuration
//!
//! - `checkModifiersForVisibility`: visibilities to inspect
//! - `stylingHandleTypeAliases`: extra styling-handle type names
//! - `contentEmittingMarkerAnnotations`: preview marker annotations
//! - `contentEmitters`: extra content-emitting callees

use std::collections::BTreeSet;

use compose_lint_core::{
    ConfigError, Configuration, Emitter, FunctionRef, Hook, Hooks, MutationHandle, OptionSpec,
    Rule, RuleError, RuleVisitor, Severity,
};
use tracing::trace;

use crate::emitters::{has_preview_marker, preview_markers, ContentEmitters};
use crate::options::{
    aliases, VisibilityScope, CONTENT_EMITTERS, PREVIEW_MARKERS, STYLING_HANDLE_ALIASES,
    VISIBILITY,
};

/// Rule code for modifier-missing-check.
pub const CODE: &str = "CM002";

/// Rule name for modifier-missing-check.
pub const NAME: &str = "compose:modifier-missing-check";

const MESSAGE: &str = "Content-emitting UI function is missing a styling-handle parameter.";

const OPTIONS: &[OptionSpec] = &[
    VISIBILITY,
    STYLING_HANDLE_ALIASES,
    PREVIEW_MARKERS,
    CONTENT_EMITTERS,
];

/// Requires content-emitting UI functions to take a styling handle.
#[derive(Debug, Clone)]
pub struct ModifierMissing {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ModifierMissing {
    fn default() -> Self {
        Self::new()
    }
}

impl ModifierMissing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ModifierMissing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Content-emitting UI functions must accept a styling handle"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn options(&self) -> &'static [OptionSpec] {
        OPTIONS
    }

    fn hooks(&self) -> Hooks {
        Hooks::EMPTY.with(Hook::Composable)
    }

    fn start_file(&self, config: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError> {
        Ok(Box::new(Visitor {
            scope: VisibilityScope::from_config(config)?,
            aliases: aliases(config)?,
            markers: preview_markers(config)?,
            emitters: ContentEmitters::from_config(config)?,
        }))
    }
}

struct Visitor {
    scope: VisibilityScope,
    aliases: BTreeSet<String>,
    markers: BTreeSet<String>,
    emitters: ContentEmitters,
}

impl Visitor {
    fn is_exempt(&self, function: &FunctionRef<'_>) -> bool {
        !function.returns_unit()
            || function.is_override()
            || function.defined_in_interface()
            || has_preview_marker(function, &self.markers)
            || !self.scope.includes(function.visibility())
    }
}

impl RuleVisitor for Visitor {
    fn visit_composable(
        &mut self,
        function: &FunctionRef<'_>,
        emitter: &mut Emitter<'_>,
        _fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        if self.is_exempt(function) {
            trace!(function = function.name(), "exempt from {NAME}");
            return Ok(());
        }
        if function.modifier_parameter(&self.aliases).is_some() {
            return Ok(());
        }
        if self.emitters.is_content_emitting(function) {
            emitter.report(function, MESSAGE, false);
        }
        Ok(())
    }
}

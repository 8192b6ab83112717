//! # compose-lint-rules
//!
//! Built-in rules for declarative UI functions.
//!
//! Every rule here inspects `@Composable` functions or their parameter lists
//! and reads its options from the project settings through
//! [`compose_lint_core::resolve`].
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CM001 | `compose:modifier-without-default-check` | Styling-handle parameters must default to `Modifier` (fixable) |
//! | CM002 | `compose:modifier-missing-check` | Content-emitting UI functions must accept a styling handle |
//! | CM003 | `compose:param-order-check` | Parameters follow required, styling handle, defaulted, trailing lambda |
//!
//! ## Shared Options
//!
//! | Option | Kind | Default |
//! |--------|------|---------|
//! | `checkModifiersForVisibility` | `public` \| `public_and_internal` \| `all` | `public` |
//! | `stylingHandleTypeAliases` | string set | `Modifier` |
//! | `contentEmittingMarkerAnnotations` | string set | `Preview` |
//! | `contentEmitters` | string set | empty |
//!
//! ## Usage
//!
//! ```
//! use compose_lint_core::Linter;
//! use compose_lint_rules::{ModifierMissing, ModifierWithoutDefault};
//!
//! let linter = Linter::builder()
//!     .rule(ModifierWithoutDefault::new())
//!     .rule(ModifierMissing::new())
//!     .build()
//!     .unwrap();
//! assert_eq!(linter.rule_count(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod emitters;
mod modifier_missing;
mod modifier_without_default;
mod options;
mod param_order;
mod presets;

pub use emitters::{has_preview_marker, ContentEmitters};
pub use modifier_missing::ModifierMissing;
pub use modifier_without_default::ModifierWithoutDefault;
pub use options::{
    VisibilityScope, CONTENT_EMITTERS, PREVIEW_MARKERS, STYLING_HANDLE_ALIASES, VISIBILITY,
};
pub use param_order::ParamOrder;
pub use presets::{all_rules, minimal_rules, recommended_rules, Preset};

/// Re-export core types for convenience.
pub use compose_lint_core::{Rule, Severity, Violation};

//! Collects findings during one file's traversal.

use crate::tree::{CallRef, FileRef, FunctionRef, NodeRef, ParameterRef, TypeRef};

/// Something a finding can be anchored at.
pub trait Anchor {
    /// Byte offset the finding points to.
    fn anchor_offset(&self) -> usize;
}

impl Anchor for usize {
    fn anchor_offset(&self) -> usize {
        *self
    }
}

impl Anchor for NodeRef<'_> {
    fn anchor_offset(&self) -> usize {
        self.range().start
    }
}

impl Anchor for FileRef<'_> {
    fn anchor_offset(&self) -> usize {
        self.node().anchor_offset()
    }
}

impl Anchor for TypeRef<'_> {
    fn anchor_offset(&self) -> usize {
        self.node().anchor_offset()
    }
}

/// Functions anchor at their name token.
impl Anchor for FunctionRef<'_> {
    fn anchor_offset(&self) -> usize {
        self.name_offset()
    }
}

impl Anchor for ParameterRef<'_> {
    fn anchor_offset(&self) -> usize {
        self.node().anchor_offset()
    }
}

impl Anchor for CallRef<'_> {
    fn anchor_offset(&self) -> usize {
        self.node().anchor_offset()
    }
}

/// A finding before it is turned into a [`Violation`](crate::Violation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Finding {
    pub(crate) offset: usize,
    /// Index of the reporting rule in registration order.
    pub(crate) rule: usize,
    /// Emission order within the file.
    pub(crate) sequence: usize,
    pub(crate) message: String,
    pub(crate) fixable: bool,
    pub(crate) auto_fixed: bool,
}

/// Findings of one file, in emission order.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    items: Vec<Finding>,
}

impl Findings {
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn push(&mut self, rule: usize, offset: usize, message: String, fixable: bool) {
        let sequence = self.items.len();
        self.items.push(Finding {
            offset,
            rule,
            sequence,
            message,
            fixable,
            auto_fixed: false,
        });
    }

    /// Moves every finding at or after `at` by `delta` bytes.
    pub(crate) fn shift(&mut self, at: usize, delta: isize) {
        for finding in &mut self.items {
            if finding.offset >= at {
                finding.offset = finding.offset.saturating_add_signed(delta);
            }
        }
    }

    /// Marks fixable findings emitted since `from` as fixed.
    pub(crate) fn mark_fixed(&mut self, from: usize) {
        for finding in self.items.iter_mut().skip(from) {
            if finding.fixable {
                finding.auto_fixed = true;
            }
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Finding> {
        self.items
    }
}

/// Reports findings for one rule during one hook invocation.
#[derive(Debug)]
pub struct Emitter<'a> {
    findings: &'a mut Findings,
    rule: usize,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(findings: &'a mut Findings, rule: usize) -> Self {
        Self { findings, rule }
    }

    /// Reports a finding anchored at `anchor`.
    pub fn report(&mut self, anchor: &impl Anchor, message: impl Into<String>, fixable: bool) {
        self.report_at(anchor.anchor_offset(), message, fixable);
    }

    /// Reports a finding at an explicit byte offset.
    pub fn report_at(&mut self, offset: usize, message: impl Into<String>, fixable: bool) {
        self.findings
            .push(self.rule, offset, message.into(), fixable);
    }
}

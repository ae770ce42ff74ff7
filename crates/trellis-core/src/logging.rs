//! Logging and debugging facilities for Trellis.
//!
//! This module provides:
//! - Target and span names for filtering `tracing` output per subsystem
//! - A [`PerfSpan`] guard for timing relayout/repaint passes
//! - [`TreeDebug`], a tree printer usable with any [`DebugTree`]
//!
//! # Tracing Integration
//!
//! Trellis emits all diagnostics through the `tracing` crate. Install a
//! subscriber in your application to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis::layout=warn,trellis::input=debug")
//!     .init();
//! ```
//!
//! Layout-constraint violations (content larger than the space it was given)
//! are reported as `warn` on [`targets::LAYOUT`]; they are recovered locally
//! and never fail an operation.

use std::fmt::{self, Write as FmtWrite};

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// A full measure + layout pass of a window host.
    pub const RELAYOUT: &str = "trellis::relayout";
    /// Painting a window host.
    pub const REPAINT: &str = "trellis::repaint";
    /// Routed event dispatch.
    pub const DISPATCH: &str = "trellis::dispatch";
    /// Task queue processing span.
    pub const TASK: &str = "trellis::task";
}

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Signal emission.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Deferred task queue.
    pub const TASK: &str = "trellis::task";
    /// Render tree structure (attach/detach, ownership).
    pub const RENDER: &str = "trellis::render";
    /// Measure and layout passes, constraint violations.
    pub const LAYOUT: &str = "trellis::layout";
    /// Control tree structure.
    pub const CONTROL: &str = "trellis::control";
    /// Routed event dispatch.
    pub const EVENT: &str = "trellis::event";
    /// Window host state: focus, capture, scheduling, teardown.
    pub const HOST: &str = "trellis::host";
    /// Native input translation.
    pub const INPUT: &str = "trellis::input";
    /// Native window collaborator.
    pub const NATIVE: &str = "trellis::native";
    /// Performance spans.
    pub const PERF: &str = "trellis::perf";
}

/// A tree that can be printed by [`TreeDebug`].
pub trait DebugTree {
    /// Node identifier.
    type Id: Copy + fmt::Debug;

    /// Human readable label of a node, e.g. its type name.
    fn label(&self, id: Self::Id) -> Option<String>;

    /// Children of a node in order.
    fn children(&self, id: Self::Id) -> Vec<Self::Id>;

    /// Extra detail printed after the label (sizes, flags).
    fn detail(&self, _id: Self::Id) -> Option<String> {
        None
    }
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line-per-node representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node ids.
    pub show_ids: bool,
    /// Whether to show [`DebugTree::detail`].
    pub show_details: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_details: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            ..Default::default()
        }
    }

    /// Options for minimal output: labels only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_details: false,
            ..Default::default()
        }
    }
}

/// Debug utility for printing trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a printer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a printer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree<T: DebugTree>(&self, tree: &T, root: T::Id) -> String {
        let mut output = String::new();
        self.format_into(tree, root, 0, &[], true, &mut output);
        output
    }

    fn format_into<T: DebugTree>(
        &self,
        tree: &T,
        id: T::Id,
        depth: usize,
        open_levels: &[bool],
        is_last: bool,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let Some(label) = tree.label(id) else {
            let _ = writeln!(output, "{}(missing {:?})", self.prefix(open_levels, is_last, depth), id);
            return;
        };

        output.push_str(&self.prefix(open_levels, is_last, depth));
        output.push_str(&label);
        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_details
            && let Some(detail) = tree.detail(id)
        {
            let _ = write!(output, " {detail}");
        }
        output.push('\n');

        let children = tree.children(id);
        let count = children.len();
        let mut levels = open_levels.to_vec();
        if depth > 0 {
            levels.push(!is_last);
        }
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(tree, child, depth + 1, &levels, i + 1 == count, output);
        }
    }

    fn prefix(&self, open_levels: &[bool], is_last: bool, depth: usize) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => {
                return format!("{}- ", " ".repeat((depth - 1) * self.options.indent_size));
            }
        };

        let mut prefix = String::new();
        for open in open_levels {
            prefix.push_str(if *open { branch } else { " " });
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a performance span for `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Trace-level log on the core target.
#[macro_export]
macro_rules! trellis_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "trellis_core", $($arg)*)
    };
}

/// Debug-level log on the core target.
#[macro_export]
macro_rules! trellis_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "trellis_core", $($arg)*)
    };
}

/// Warn-level log on the core target.
#[macro_export]
macro_rules! trellis_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "trellis_core", $($arg)*)
    };
}

use serde::{Deserialize, Serialize};

/// Columns added per nesting level when pretty-printing.
pub const INDENT_WIDTH: usize = 4;

/// Output switches for [`NodeSerializer`](super::NodeSerializer).
///
/// Both flags default to `false`: the XML declaration is written and the
/// output is compact. Missing fields in a JSON config fall back to these
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingOptions {
    /// Leave out the leading `<?xml ...?>` declaration.
    pub omit_declaration: bool,

    /// Indent nested markup by [`INDENT_WIDTH`] spaces per level.
    pub pretty_print: bool,
}

impl FormattingOptions {
    pub fn new(omit_declaration: bool, pretty_print: bool) -> Self {
        Self {
            omit_declaration,
            pretty_print,
        }
    }

    pub fn omit_declaration(mut self, omit: bool) -> Self {
        self.omit_declaration = omit;
        self
    }

    pub fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

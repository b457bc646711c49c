/// Block-level elements recognized in a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    CodeBlock {
        language: String,
        lines: Vec<String>,
    },
    UnorderedListItem {
        text: String,
    },
    OrderedListItem {
        text: String,
    },
    /// A row of a table; only emitted for runs that form a complete table
    TableRow {
        cells: Vec<String>,
    },
    /// Unrecognized text, consecutive lines joined with `\n`
    PlainText {
        text: String,
    },
}

impl Block {
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            Block::UnorderedListItem { .. } | Block::OrderedListItem { .. }
        )
    }

    /// True for plain text made only of whitespace, which may sit between
    /// list items without splitting the list.
    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, Block::PlainText { text } if text.trim().is_empty())
    }
}

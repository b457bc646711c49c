use crate::block::Block;
use crate::config::Config;

const FENCE: &str = "```";

/// Parse reply text into a list of blocks
pub fn parse(reply: &str, config: &Config) -> Vec<Block> {
    let mut state = ParseState::default();
    if reply.is_empty() {
        return state.finish();
    }

    let lines: Vec<&str> = reply.split('\n').collect();
    let closers = next_fence_closers(&lines);
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let line = raw.trim_end_matches('\r');

        // Fences go first so nothing inside one is read as a heading or list
        if let Some(tag) = fence_open(line) {
            if let Some(close) = closers[i + 1] {
                let language = tag.unwrap_or(config.code.default_language.as_str()).to_string();
                let body = lines[i + 1..close]
                    .iter()
                    .map(|l| l.trim_end_matches('\r').to_string())
                    .collect();
                state.push(Block::CodeBlock {
                    language,
                    lines: body,
                });
                i = close + 1;
                continue;
            }
            tracing::trace!(line = i, "unterminated code fence kept as text");
            state.push_plain(raw);
            i += 1;
            continue;
        }

        if let Some((level, text)) = heading(line) {
            state.push(Block::Heading {
                level,
                text: text.to_string(),
            });
            i += 1;
            continue;
        }

        if config.tables.enabled && table_cells(line).is_some() {
            i = parse_table_run(&lines, i, &mut state);
            continue;
        }

        if let Some(text) = unordered_item(line) {
            state.push(Block::UnorderedListItem {
                text: text.to_string(),
            });
        } else if let Some(text) = ordered_item(line) {
            state.push(Block::OrderedListItem {
                text: text.to_string(),
            });
        } else {
            state.push_plain(raw);
        }
        i += 1;
    }

    state.finish()
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,
    // Plain lines waiting to be joined into one block
    plain: Option<String>,
}

impl ParseState {
    fn push(&mut self, block: Block) {
        self.flush_plain();
        self.blocks.push(block);
    }

    fn push_plain(&mut self, line: &str) {
        match &mut self.plain {
            Some(text) => {
                text.push('\n');
                text.push_str(line);
            }
            None => self.plain = Some(line.to_string()),
        }
    }

    fn flush_plain(&mut self) {
        if let Some(text) = self.plain.take() {
            self.blocks.push(Block::PlainText { text });
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_plain();
        self.blocks
    }
}

/// Returns `Some(tag)` when the line opens a fence.
fn fence_open(line: &str) -> Option<Option<&str>> {
    let rest = line.trim().strip_prefix(FENCE)?;
    if rest.is_empty() {
        return Some(None);
    }
    rest.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then_some(Some(rest))
}

/// For each line index, the first closing fence at or after it. The extra
/// trailing slot lets an opener on the last line look one past the end.
fn next_fence_closers(lines: &[&str]) -> Vec<Option<usize>> {
    let mut closers = vec![None; lines.len() + 1];
    for j in (0..lines.len()).rev() {
        closers[j] = if lines[j].trim() == FENCE {
            Some(j)
        } else {
            closers[j + 1]
        };
    }
    closers
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    Some((level as u8, text))
}

fn unordered_item(line: &str) -> Option<&str> {
    line.strip_prefix("* ").filter(|text| !text.is_empty())
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let text = rest.trim_start();
    (text.len() < rest.len() && !text.is_empty()).then_some(text)
}

/// Split a `|a|b|` line into trimmed cells.
fn table_cells(line: &str) -> Option<Vec<String>> {
    let inner = line.trim().strip_prefix('|')?.strip_suffix('|')?;
    Some(inner.split('|').map(|c| c.trim().to_string()).collect())
}

fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':'))
}

/// Consume a run of same-width table lines starting at `start`. The run
/// becomes table rows only if it yields a header and at least one data row;
/// otherwise the lines are kept verbatim.
fn parse_table_run(lines: &[&str], start: usize, state: &mut ParseState) -> usize {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut end = start;
    let mut width = None;

    while end < lines.len() {
        let Some(cells) = table_cells(lines[end].trim_end_matches('\r')) else {
            break;
        };
        match width {
            None => width = Some(cells.len()),
            Some(w) if w != cells.len() => break,
            Some(_) => {}
        }
        rows.push(cells);
        end += 1;
    }

    if rows.len() > 1 && is_separator_row(&rows[1]) {
        rows.remove(1);
    }

    if rows.len() >= 2 {
        for cells in rows {
            state.push(Block::TableRow { cells });
        }
    } else {
        tracing::trace!(line = start, "table run too short, kept as text");
        for raw in &lines[start..end] {
            state.push_plain(raw);
        }
    }
    end
}

//! Indentation-driven parser producing the lossless CST.
//!
//! The parser walks the source once. At every token boundary the text skipped
//! over (whitespace, newlines, comments) becomes the `before` fragment of the
//! next token's owner, and whatever follows the last token becomes the
//! document trailer. When a block structure ends, the cursor rewinds to the
//! start of the pending gap so the enclosing structure claims it instead.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::node::{
    FlowDelims, MappingEntry, MappingNode, Node, ScalarNode, SequenceItem, SequenceNode,
};
use crate::scalar::{decode_plain, ScalarStyle, ScalarValue};

pub(crate) struct Parser<'s> {
    src: &'s str,
    pos: usize,
    indent_unit: Option<usize>,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            indent_unit: None,
        }
    }

    pub(crate) fn parse_document(mut self) -> Result<Document> {
        let lead_start = self.pos;
        self.skip_blank();
        if self.src[self.pos..].starts_with("---") && self.boundary(self.pos + 3) {
            self.pos += 3;
            self.skip_blank();
        }
        if self.at_end() {
            return Err(Error::EmptyDocument);
        }
        let lead = self.src[lead_start..self.pos].to_string();
        let col = self.column(self.pos);
        let root = self.parse_block_node(lead, col)?;
        let trailer_start = self.pos;
        self.skip_blank();
        if !self.at_end() {
            return Err(self.err("trailing content after document root"));
        }
        let trailer = self.src[trailer_start..].to_string();
        Ok(Document::assemble(
            root,
            trailer,
            self.indent_unit.unwrap_or(2),
        ))
    }

    // ---- cursor helpers ----

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn cur(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn boundary(&self, pos: usize) -> bool {
        matches!(
            self.src.as_bytes().get(pos),
            None | Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')
        )
    }

    fn at_dash(&self) -> bool {
        self.cur() == Some(b'-') && self.boundary(self.pos + 1)
    }

    fn column(&self, pos: usize) -> usize {
        let line_start = self.src[..pos].rfind('\n').map_or(0, |i| i + 1);
        pos - line_start
    }

    fn err(&self, message: impl Into<String>) -> Error {
        let upto = self.pos.min(self.src.len());
        Error::Parse {
            line: self.src[..upto].matches('\n').count() + 1,
            message: message.into(),
        }
    }

    /// Advance over whitespace, newlines and comments.
    fn skip_blank(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'#' => {
                    while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_inline_spaces(&mut self) {
        while matches!(self.cur(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    fn note_unit(&mut self, parent: usize, child: usize) {
        if self.indent_unit.is_none() && child > parent {
            self.indent_unit = Some(child - parent);
        }
    }

    // ---- structure detection ----

    /// Find the end of a quoted scalar starting at `start`, without moving
    /// the cursor. `None` for unterminated or multi-line quotes.
    fn scan_quoted_end(&self, start: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let quote = bytes[start];
        let mut i = start + 1;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\n' {
                return None;
            }
            if quote == b'"' {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == b'"' {
                    return Some(i + 1);
                }
            } else if b == b'\'' {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                return Some(i + 1);
            }
            i += 1;
        }
        None
    }

    fn quoted_key_ahead(&self) -> bool {
        let Some(end) = self.scan_quoted_end(self.pos) else {
            return false;
        };
        let bytes = self.src.as_bytes();
        let mut j = end;
        while matches!(bytes.get(j), Some(b' ') | Some(b'\t')) {
            j += 1;
        }
        bytes.get(j) == Some(&b':') && self.boundary(j + 1)
    }

    /// Whether the current line reads as a `key: value` mapping entry.
    fn line_has_key_colon(&self) -> bool {
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' | b'\r' => return false,
                b'#' if i > self.pos && matches!(bytes[i - 1], b' ' | b'\t') => return false,
                b':' if self.boundary(i + 1) => return true,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn mapping_starts_here(&self) -> bool {
        match self.cur() {
            Some(b'"') | Some(b'\'') => self.quoted_key_ahead(),
            _ => self.line_has_key_colon(),
        }
    }

    // ---- block structures ----

    fn parse_block_node(&mut self, lead: String, col: usize) -> Result<Node> {
        match self.cur() {
            Some(b'-') if self.at_dash() => self.parse_block_sequence(lead, col),
            Some(b'[') => self.parse_flow_sequence(lead),
            Some(b'{') => self.parse_flow_mapping(lead),
            Some(b'|') | Some(b'>') => self.parse_block_scalar(lead, col.saturating_sub(1)),
            Some(_) if self.mapping_starts_here() => self.parse_block_mapping(lead, col),
            Some(_) => self.parse_scalar_token(lead, false),
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn parse_block_mapping(&mut self, first_lead: String, indent: usize) -> Result<Node> {
        let mut entries: Vec<MappingEntry> = Vec::new();
        let mut pending = Some(first_lead);
        loop {
            let before = match pending.take() {
                Some(lead) => lead,
                None => {
                    let save = self.pos;
                    self.skip_blank();
                    if self.at_end() {
                        self.pos = save;
                        break;
                    }
                    let col = self.column(self.pos);
                    if col < indent {
                        self.pos = save;
                        break;
                    }
                    if col > indent {
                        return Err(self.err("bad indentation in mapping"));
                    }
                    if self.at_dash() {
                        self.pos = save;
                        break;
                    }
                    self.src[save..self.pos].to_string()
                }
            };
            let (key, key_repr) = self.parse_key()?;
            if entries.iter().any(|e| e.key == key) {
                return Err(self.err(format!("duplicate mapping key '{key}'")));
            }
            let value = self.parse_value(indent, false)?;
            entries.push(MappingEntry {
                before,
                key_repr,
                key,
                value,
                sep: String::new(),
            });
        }
        Ok(Node::Mapping(MappingNode {
            entries,
            indent,
            flow: None,
        }))
    }

    fn parse_block_sequence(&mut self, first_lead: String, indent: usize) -> Result<Node> {
        let mut items: Vec<SequenceItem> = Vec::new();
        let mut pending = Some(first_lead);
        loop {
            let gap = match pending.take() {
                Some(lead) => lead,
                None => {
                    let save = self.pos;
                    self.skip_blank();
                    if self.at_end() {
                        self.pos = save;
                        break;
                    }
                    let col = self.column(self.pos);
                    if col < indent {
                        self.pos = save;
                        break;
                    }
                    if col > indent {
                        return Err(self.err("bad indentation in sequence"));
                    }
                    if !self.at_dash() {
                        self.pos = save;
                        break;
                    }
                    self.src[save..self.pos].to_string()
                }
            };
            let before = format!("{gap}-");
            self.pos += 1;
            let value = self.parse_value(indent, true)?;
            items.push(SequenceItem {
                before,
                value,
                sep: String::new(),
            });
        }
        Ok(Node::Sequence(SequenceNode {
            items,
            indent,
            flow: None,
        }))
    }

    /// Parse the value following a mapping colon (`after_dash == false`) or a
    /// sequence dash (`after_dash == true`).
    fn parse_value(&mut self, parent_indent: usize, after_dash: bool) -> Result<Node> {
        let sp_start = self.pos;
        self.skip_inline_spaces();
        let inline_lead = self.src[sp_start..self.pos].to_string();
        match self.cur() {
            None | Some(b'\n') | Some(b'\r') | Some(b'#') => {
                // nothing on this line: nested block on the following lines,
                // or a null value
                self.pos = sp_start;
                let save = self.pos;
                self.skip_blank();
                if !self.at_end() {
                    let col = self.column(self.pos);
                    let nested = col > parent_indent
                        || (!after_dash && col == parent_indent && self.at_dash());
                    if nested {
                        let lead = self.src[save..self.pos].to_string();
                        self.note_unit(parent_indent, col);
                        return self.parse_block_node(lead, col);
                    }
                }
                self.pos = save;
                Ok(Node::Scalar(ScalarNode::empty()))
            }
            Some(b'[') => self.parse_flow_sequence(inline_lead),
            Some(b'{') => self.parse_flow_mapping(inline_lead),
            Some(b'|') | Some(b'>') => self.parse_block_scalar(inline_lead, parent_indent),
            Some(b'-') if after_dash && self.at_dash() => {
                let col = self.column(self.pos);
                self.note_unit(parent_indent, col);
                self.parse_block_sequence(inline_lead, col)
            }
            Some(_) => {
                if after_dash && self.mapping_starts_here() {
                    let col = self.column(self.pos);
                    self.note_unit(parent_indent, col);
                    self.parse_block_mapping(inline_lead, col)
                } else {
                    self.parse_scalar_token(inline_lead, false)
                }
            }
        }
    }

    fn parse_key(&mut self) -> Result<(String, String)> {
        let start = self.pos;
        match self.cur() {
            Some(b'"') | Some(b'\'') => {
                let (key, _style) = self.lex_quoted()?;
                self.skip_inline_spaces();
                if !(self.cur() == Some(b':') && self.boundary(self.pos + 1)) {
                    return Err(self.err("expected ':' after mapping key"));
                }
                self.pos += 1;
                Ok((key, self.src[start..self.pos].to_string()))
            }
            _ => {
                let bytes = self.src.as_bytes();
                let mut i = self.pos;
                loop {
                    match bytes.get(i) {
                        None | Some(b'\n') | Some(b'\r') => {
                            return Err(self.err("expected ':' in mapping entry"));
                        }
                        Some(b':') if self.boundary(i + 1) => break,
                        _ => i += 1,
                    }
                }
                let key = self.src[self.pos..i]
                    .trim_end_matches([' ', '\t'])
                    .to_string();
                let key_repr = self.src[start..=i].to_string();
                self.pos = i + 1;
                Ok((key, key_repr))
            }
        }
    }

    // ---- scalars ----

    fn lex_quoted(&mut self) -> Result<(String, ScalarStyle)> {
        let start = self.pos;
        let end = self
            .scan_quoted_end(start)
            .ok_or_else(|| self.err("unterminated quoted scalar"))?;
        let quote = self.src.as_bytes()[start];
        let inner = &self.src[start + 1..end - 1];
        self.pos = end;
        if quote == b'"' {
            Ok((decode_double(inner), ScalarStyle::DoubleQuoted))
        } else {
            Ok((inner.replace("''", "'"), ScalarStyle::SingleQuoted))
        }
    }

    fn parse_scalar_token(&mut self, lead: String, flow: bool) -> Result<Node> {
        let start = self.pos;
        match self.cur() {
            Some(b'"') | Some(b'\'') => {
                let (value, style) = self.lex_quoted()?;
                let repr = self.src[start..self.pos].to_string();
                Ok(Node::Scalar(ScalarNode::parsed(
                    lead,
                    repr,
                    ScalarValue::Str(value),
                    style,
                )))
            }
            _ => {
                let bytes = self.src.as_bytes();
                let mut i = self.pos;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\n' | b'\r' => break,
                        b'#' if i > start && matches!(bytes[i - 1], b' ' | b'\t') => break,
                        b',' | b']' | b'}' if flow => break,
                        _ => i += 1,
                    }
                }
                let lexeme = self.src[start..i].trim_end_matches([' ', '\t']);
                if lexeme.is_empty() {
                    return Err(self.err("expected a scalar value"));
                }
                self.pos = start + lexeme.len();
                let value = decode_plain(lexeme);
                Ok(Node::Scalar(ScalarNode::parsed(
                    lead,
                    lexeme.to_string(),
                    value,
                    ScalarStyle::Plain,
                )))
            }
        }
    }

    fn parse_block_scalar(&mut self, lead: String, parent_indent: usize) -> Result<Node> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let style = if bytes[start] == b'|' {
            ScalarStyle::Literal
        } else {
            ScalarStyle::Folded
        };
        let mut header_end = start;
        while header_end < bytes.len() && bytes[header_end] != b'\n' {
            header_end += 1;
        }
        // consume lines that are blank or indented past the parent; trailing
        // blank lines stay with the surrounding gap
        let mut end = header_end;
        let mut scan = header_end;
        while scan < bytes.len() {
            let line_start = scan + 1;
            let mut line_end = line_start;
            while line_end < bytes.len() && bytes[line_end] != b'\n' {
                line_end += 1;
            }
            let line = &self.src[line_start..line_end];
            let stripped = line.trim_start_matches(' ');
            if stripped.trim_end_matches('\r').is_empty() {
                scan = line_end;
            } else if line.len() - stripped.len() > parent_indent {
                end = line_end;
                scan = line_end;
            } else {
                break;
            }
        }
        let repr = self.src[start..end].to_string();
        self.pos = end;
        let value = decode_block_scalar(&repr, style);
        Ok(Node::Scalar(ScalarNode::parsed(lead, repr, value, style)))
    }

    // ---- flow structures ----

    fn parse_flow_value(&mut self, lead: String) -> Result<Node> {
        match self.cur() {
            Some(b'[') => self.parse_flow_sequence(lead),
            Some(b'{') => self.parse_flow_mapping(lead),
            Some(b',') | Some(b']') | Some(b'}') => Ok(Node::Scalar(ScalarNode::parsed(
                lead,
                String::new(),
                ScalarValue::Null,
                ScalarStyle::Plain,
            ))),
            _ => self.parse_scalar_token(lead, true),
        }
    }

    fn parse_flow_sequence(&mut self, lead: String) -> Result<Node> {
        let open = format!("{lead}[");
        self.pos += 1;
        let mut items: Vec<SequenceItem> = Vec::new();
        loop {
            let gap_start = self.pos;
            self.skip_blank();
            if self.at_end() {
                return Err(self.err("unterminated flow sequence"));
            }
            if self.cur() == Some(b']') {
                let close = format!("{}]", &self.src[gap_start..self.pos]);
                self.pos += 1;
                return Ok(Node::Sequence(SequenceNode {
                    items,
                    indent: 0,
                    flow: Some(FlowDelims { open, close }),
                }));
            }
            let before = self.src[gap_start..self.pos].to_string();
            let value = self.parse_flow_value(String::new())?;
            let sep_start = self.pos;
            self.skip_blank();
            match self.cur() {
                Some(b',') => {
                    let sep = format!("{},", &self.src[sep_start..self.pos]);
                    self.pos += 1;
                    items.push(SequenceItem { before, value, sep });
                }
                Some(b']') => {
                    let close = format!("{}]", &self.src[sep_start..self.pos]);
                    self.pos += 1;
                    items.push(SequenceItem {
                        before,
                        value,
                        sep: String::new(),
                    });
                    return Ok(Node::Sequence(SequenceNode {
                        items,
                        indent: 0,
                        flow: Some(FlowDelims { open, close }),
                    }));
                }
                _ => return Err(self.err("expected ',' or ']' in flow sequence")),
            }
        }
    }

    fn parse_flow_mapping(&mut self, lead: String) -> Result<Node> {
        let open = format!("{lead}{{");
        self.pos += 1;
        let mut entries: Vec<MappingEntry> = Vec::new();
        loop {
            let gap_start = self.pos;
            self.skip_blank();
            if self.at_end() {
                return Err(self.err("unterminated flow mapping"));
            }
            if self.cur() == Some(b'}') {
                let close = format!("{}}}", &self.src[gap_start..self.pos]);
                self.pos += 1;
                return Ok(Node::Mapping(MappingNode {
                    entries,
                    indent: 0,
                    flow: Some(FlowDelims { open, close }),
                }));
            }
            let before = self.src[gap_start..self.pos].to_string();
            let (key, key_repr) = self.parse_flow_key()?;
            if entries.iter().any(|e| e.key == key) {
                return Err(self.err(format!("duplicate mapping key '{key}'")));
            }
            let value_start = self.pos;
            self.skip_inline_spaces();
            let value_lead = self.src[value_start..self.pos].to_string();
            let value = self.parse_flow_value(value_lead)?;
            let sep_start = self.pos;
            self.skip_blank();
            match self.cur() {
                Some(b',') => {
                    let sep = format!("{},", &self.src[sep_start..self.pos]);
                    self.pos += 1;
                    entries.push(MappingEntry {
                        before,
                        key_repr,
                        key,
                        value,
                        sep,
                    });
                }
                Some(b'}') => {
                    let close = format!("{}}}", &self.src[sep_start..self.pos]);
                    self.pos += 1;
                    entries.push(MappingEntry {
                        before,
                        key_repr,
                        key,
                        value,
                        sep: String::new(),
                    });
                    return Ok(Node::Mapping(MappingNode {
                        entries,
                        indent: 0,
                        flow: Some(FlowDelims { open, close }),
                    }));
                }
                _ => return Err(self.err("expected ',' or '}' in flow mapping")),
            }
        }
    }

    fn parse_flow_key(&mut self) -> Result<(String, String)> {
        let start = self.pos;
        match self.cur() {
            Some(b'"') | Some(b'\'') => {
                let (key, _style) = self.lex_quoted()?;
                self.skip_inline_spaces();
                if self.cur() != Some(b':') {
                    return Err(self.err("expected ':' after mapping key"));
                }
                self.pos += 1;
                Ok((key, self.src[start..self.pos].to_string()))
            }
            _ => {
                let bytes = self.src.as_bytes();
                let mut i = self.pos;
                loop {
                    match bytes.get(i) {
                        None | Some(b'\n') | Some(b',') | Some(b'}') => {
                            return Err(self.err("expected ':' in flow mapping entry"));
                        }
                        Some(b':') => break,
                        _ => i += 1,
                    }
                }
                let key = self.src[self.pos..i]
                    .trim_end_matches([' ', '\t'])
                    .to_string();
                let key_repr = self.src[start..=i].to_string();
                self.pos = i + 1;
                Ok((key, key_repr))
            }
        }
    }
}

fn decode_double(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_block_scalar(repr: &str, style: ScalarStyle) -> ScalarValue {
    let body = match repr.find('\n') {
        Some(i) => &repr[i + 1..],
        None => "",
    };
    if body.is_empty() {
        return ScalarValue::Str(String::new());
    }
    let lines: Vec<&str> = body.split('\n').collect();
    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);
    let content: Vec<String> = lines
        .iter()
        .map(|l| {
            if l.len() > min_indent {
                l[min_indent..].trim_end_matches('\r').to_string()
            } else {
                String::new()
            }
        })
        .collect();
    let joined = match style {
        ScalarStyle::Folded => content.join(" "),
        _ => content.join("\n"),
    };
    ScalarValue::Str(format!("{joined}\n"))
}

#[cfg(test)]
mod tests {
    use crate::document::Document;
    use crate::error::Error;
    use crate::node::Node;
    use crate::scalar::ScalarValue;

    fn roundtrip(text: &str) {
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.to_string(), text, "round trip must be byte-identical");
    }

    #[test]
    fn test_roundtrip_block_document() {
        roundtrip("# keep me\nrepos:\n  - repo: local\n    hooks:\n      - id: eslint\n        additional_dependencies:\n          - eslint@8.0.0   # pinned\n");
    }

    #[test]
    fn test_roundtrip_mixed_styles() {
        roundtrip("name: 'single'\nother: \"double\"\ncount: 3\nempty:\nflag: true\n");
    }

    #[test]
    fn test_roundtrip_flow_collections() {
        roundtrip("args: [--fix, --quiet]\nenv: {CI: true, RUST_LOG: debug}\n");
        roundtrip("matrix: [1,\n  2, 3]\n");
    }

    #[test]
    fn test_roundtrip_block_scalar() {
        roundtrip("entry: |\n  line one\n  line two\nnext: x\n");
        roundtrip("entry: >\n  folded\n  text\n");
    }

    #[test]
    fn test_roundtrip_document_marker_and_comments() {
        roundtrip("---\n# top\nkey: value  # trailing\n\n# gap comment\nother: 1\n");
    }

    #[test]
    fn test_roundtrip_sequence_at_parent_column() {
        roundtrip("repos:\n- repo: local\n  rev: v1\n- repo: other\n");
    }

    #[test]
    fn test_roundtrip_crlf() {
        roundtrip("key: value\r\nother: 2\r\n");
    }

    #[test]
    fn test_roundtrip_no_trailing_newline() {
        roundtrip("key: value");
        roundtrip("key:");
    }

    #[test]
    fn test_empty_document_errors() {
        assert!(matches!(Document::parse(""), Err(Error::EmptyDocument)));
        assert!(matches!(
            Document::parse("   \n# only a comment\n"),
            Err(Error::EmptyDocument)
        ));
        assert!(matches!(
            Document::parse("---\n"),
            Err(Error::EmptyDocument)
        ));
    }

    #[test]
    fn test_multiple_documents_rejected() {
        let err = Document::parse("a: 1\n---\nb: 2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = Document::parse("a: 1\na: 2\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("duplicate"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_scalar_decoding() {
        let doc = Document::parse("count: 42\nratio: 0.5\nname: plain text\n").unwrap();
        let Node::Mapping(root) = doc.root() else {
            panic!("expected mapping root");
        };
        let Some(Node::Scalar(count)) = root.get("count") else {
            panic!("missing count");
        };
        assert_eq!(count.value(), &ScalarValue::Int(42));
        let Some(Node::Scalar(ratio)) = root.get("ratio") else {
            panic!("missing ratio");
        };
        assert_eq!(ratio.value(), &ScalarValue::Float(0.5));
        let Some(Node::Scalar(name)) = root.get("name") else {
            panic!("missing name");
        };
        assert_eq!(name.value(), &ScalarValue::Str("plain text".to_string()));
    }

    #[test]
    fn test_quoted_scalar_with_colon_stays_scalar() {
        let doc = Document::parse("items:\n  - \"has: colon\"\n").unwrap();
        assert_eq!(doc.to_string(), "items:\n  - \"has: colon\"\n");
    }

    #[test]
    fn test_indent_unit_detection() {
        let doc = Document::parse("a:\n    b: 1\n").unwrap();
        assert_eq!(doc.indent_unit(), 4);
        let doc = Document::parse("a:\n  b: 1\n").unwrap();
        assert_eq!(doc.indent_unit(), 2);
    }
}

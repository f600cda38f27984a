//! XML property-list encoder.
//!
//! Output follows the layout Apple's own tools produce: XML declaration,
//! DOCTYPE, `<plist version="1.0">`, tab indentation, `<dict/>`/`<array/>` for
//! empty containers. The encoder is a [`Visitor`] over the shared traversal.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::value::{format_date, DocumentValue};
use crate::walk::{walk, Flow, NodePath, PathSegment, Visitor};

const HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
    "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
    "<plist version=\"1.0\">\n",
);

const FOOTER: &str = "</plist>\n";

pub(crate) fn write_document(root: &DocumentValue) -> String {
    let mut w = XmlWriter {
        out: String::from(HEADER),
    };
    walk(root, &mut w);
    w.out.push_str(FOOTER);
    w.out
}

struct XmlWriter {
    out: String,
}

impl XmlWriter {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    fn element(&mut self, tag: &str, text: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.out.push_str(text);
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }
}

impl Visitor for XmlWriter {
    fn enter(&mut self, path: &NodePath, value: &DocumentValue) -> Flow {
        let depth = path.len();
        if let Some(PathSegment::Key(k)) = path.last() {
            self.indent(depth);
            self.element("key", &escape(k));
        }
        self.indent(depth);

        match value {
            DocumentValue::String(s) => self.element("string", &escape(s)),
            DocumentValue::Integer(i) => self.element("integer", &i.to_string()),
            DocumentValue::Real(r) => self.element("real", &format!("{r:?}")),
            DocumentValue::Boolean(true) => self.out.push_str("<true/>\n"),
            DocumentValue::Boolean(false) => self.out.push_str("<false/>\n"),
            DocumentValue::Date(d) => self.element("date", &format_date(d)),
            DocumentValue::Binary(b) => self.element("data", &BASE64_STANDARD.encode(b)),
            DocumentValue::Sequence(items) if items.is_empty() => self.out.push_str("<array/>\n"),
            DocumentValue::Sequence(_) => self.out.push_str("<array>\n"),
            DocumentValue::Mapping(d) if d.is_empty() => self.out.push_str("<dict/>\n"),
            DocumentValue::Mapping(_) => self.out.push_str("<dict>\n"),
        }
        Flow::Continue
    }

    fn leave(&mut self, path: &NodePath, value: &DocumentValue) {
        let close = match value {
            DocumentValue::Sequence(items) if !items.is_empty() => "</array>\n",
            DocumentValue::Mapping(d) if !d.is_empty() => "</dict>\n",
            _ => return,
        };
        self.indent(path.len());
        self.out.push_str(close);
    }
}

fn escape(s: &str) -> String {
    if !s.contains(['&', '<', '>']) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

/// `console . <kind> (` with free whitespace; group 1 is the method name.
static UNSAFE_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"console\s*\.\s*(log|error|warn)\s*\(").expect("unsafe call pattern compiles")
});

/// A whole import statement anchored at a line start, possibly spanning lines
/// (`import {\n a,\n b\n} from 'x';`), or a bare side-effect import.
static IMPORT_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^import\b\s*(?:[^;'"()]*?\bfrom\s*)?['"][^'"\n]+['"][ \t]*;?"#)
        .expect("import declaration pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Log,
    Error,
    Warn,
}

impl CallKind {
    pub const ALL: [CallKind; 3] = [CallKind::Log, CallKind::Error, CallKind::Warn];

    pub fn method(self) -> &'static str {
        match self {
            CallKind::Log => "log",
            CallKind::Error => "error",
            CallKind::Warn => "warn",
        }
    }

    /// Name of the sanitizing drop-in exported by the safety module.
    pub fn safe_name(self) -> &'static str {
        match self {
            CallKind::Log => "safeLog",
            CallKind::Error => "safeError",
            CallKind::Warn => "safeWarn",
        }
    }

    fn from_method(method: &str) -> Option<Self> {
        CallKind::ALL.into_iter().find(|k| k.method() == method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsafeCallSite {
    pub kind: CallKind,
    /// Byte range of the `console.<kind>` token, excluding the parenthesis.
    pub span: Range<usize>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// `console` must start a fresh expression: no identifier character glued to
/// it and no member access (`window.console.log`) in front of it on the same
/// line. A dot ending the previous line (a comment, say) does not count.
fn starts_expression(text: &str, start: usize) -> bool {
    let mut before = text[..start].chars().rev();
    match before.next() {
        None => true,
        Some(c) if is_ident_char(c) || c == '.' => false,
        Some(c) if c == '\n' || c == '\r' => true,
        Some(_) => before
            .find(|&c| c == '\n' || c == '\r' || !c.is_whitespace())
            .is_none_or(|c| c != '.'),
    }
}

/// Iterate over every disallowed logging call in `text`, in order.
pub fn unsafe_calls(text: &str) -> impl Iterator<Item = UnsafeCallSite> + '_ {
    UNSAFE_CALL_RE.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let method = caps.get(1)?;
        if !starts_expression(text, whole.start()) {
            return None;
        }
        Some(UnsafeCallSite {
            kind: CallKind::from_method(method.as_str())?,
            span: whole.start()..method.end(),
        })
    })
}

pub fn has_unsafe_call(text: &str) -> bool {
    unsafe_calls(text).next().is_some()
}

/// Coarse containment check; over-detection only means an import is not added.
pub fn has_safe_import(text: &str, module_name: &str) -> bool {
    text.contains(module_name)
}

/// Replace every unsafe call token with its safe equivalent. Arguments,
/// parenthesis and any whitespace before the parenthesis are kept verbatim.
pub fn replace_unsafe_calls(text: &str) -> Cow<'_, str> {
    let mut sites = unsafe_calls(text).peekable();
    if sites.peek().is_none() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for site in sites {
        out.push_str(&text[last..site.span.start]);
        out.push_str(site.kind.safe_name());
        last = site.span.end;
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Byte offset of the line end after the last import declaration, falling
/// back to the last line that starts with `import `. `None` when the text
/// has no import at all.
pub fn import_insertion_point(text: &str) -> Option<usize> {
    let end_of_line = |pos: usize| text[pos..].find('\n').map_or(text.len(), |i| pos + i);

    if let Some(last) = IMPORT_DECL_RE.find_iter(text).last() {
        return Some(end_of_line(last.end()));
    }

    let mut offset = 0;
    let mut found = None;
    for line in text.split_inclusive('\n') {
        if line.starts_with("import ") {
            found = Some(offset);
        }
        offset += line.len();
    }
    found.map(end_of_line)
}

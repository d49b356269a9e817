//! Identifier normalization: raw schema names to stable identifiers a Rust emitter can use.

use check_keyword::CheckKeyword;

/// Initialisms and their canonical spelling, after golang/lint's `commonInitialisms`.
///
/// At any position the first matching entry wins, so a key that is a prefix of another
/// (`Http` of `Https`) comes after it.
const INITIALISMS: [(&str, &str); 36] = [
    ("Api", "API"),
    ("Ascii", "ASCII"),
    ("Cpu", "CPU"),
    ("Css", "CSS"),
    ("Dns", "DNS"),
    ("Eof", "EOF"),
    ("Guid", "GUID"),
    ("Html", "HTML"),
    ("Https", "HTTPS"),
    ("Http", "HTTP"),
    ("Id", "ID"),
    ("Ip", "IP"),
    ("Json", "JSON"),
    ("Lhs", "LHS"),
    ("Qps", "QPS"),
    ("Ram", "RAM"),
    ("Rhs", "RHS"),
    ("Rpc", "RPC"),
    ("Sla", "SLA"),
    ("Smtp", "SMTP"),
    ("Sql", "SQL"),
    ("Ssh", "SSH"),
    ("Tcp", "TCP"),
    ("Tls", "TLS"),
    ("Ttl", "TTL"),
    ("Udp", "UDP"),
    ("Uid", "UID"),
    ("Ui", "UI"),
    ("Uuid", "UUID"),
    ("Uri", "URI"),
    ("Url", "URL"),
    ("Utf8", "UTF8"),
    ("Vm", "VM"),
    ("Xml", "XML"),
    ("Xsrf", "XSRF"),
    ("Xss", "XSS"),
];

/// Upper bound on normalization rounds. Every round only adds capitals or removes characters,
/// so real names settle after two or three.
const MAX_PASSES: usize = 8;

const UNNAMED: &str = "Unnamed";

pub fn convert<F: NamingConvention, T: NamingConvention>(source: &str) -> String {
    T::concatenate(&F::split(source))
}

pub trait NamingConvention {
    fn split(name: &str) -> Vec<&str>;
    fn concatenate(words: &[&str]) -> String;
}

/// Words joined by `-`, `_` or `.`, like `order-line_item.v2`.
pub struct Separated;

impl NamingConvention for Separated {
    fn split(name: &str) -> Vec<&str> {
        name.split(['-', '_', '.']).collect()
    }

    fn concatenate(words: &[&str]) -> String {
        words.join("_")
    }
}

/// Words starting at capital letters.
///
/// Joining keeps the first word as is and only capitalizes the first letter of the others;
/// the remaining letters keep their case so initialisms like `ID` survive.
pub struct CamelCase;

impl NamingConvention for CamelCase {
    fn split(name: &str) -> Vec<&str> {
        let mut words = vec![];
        let mut start = 0;
        for (index, c) in name.char_indices().skip(1) {
            if c.is_uppercase() {
                words.push(&name[start..index]);
                start = index;
            }
        }
        if !name.is_empty() {
            words.push(&name[start..]);
        }
        words
    }

    fn concatenate(words: &[&str]) -> String {
        let mut result = String::new();
        let mut words = words.iter();
        if let Some(first) = words.next() {
            result.push_str(first);
        }
        for word in words {
            result.push_str(&title(word));
        }
        result
    }
}

/// How type and field names are spelled in generated code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Capitalize the first letter.
    pub exported: bool,
    /// Prepended to every name that does not already start with it.
    pub prefix: Option<String>,
}

impl NamingPolicy {
    pub fn exported() -> Self {
        Self {
            exported: true,
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Maps a raw schema name to an identifier.
    ///
    /// Never empty, and `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, raw: &str) -> String {
        let prefix = self
            .prefix
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| settle(prefix, |s| self.shape(s)));

        settle(raw, |s| {
            let mut name = self.shape(s);
            if let Some(prefix) = prefix.as_deref() {
                name = add_prefix(prefix, name);
            }
            if name.as_str().is_keyword() {
                name.push('_');
            }
            name
        })
    }

    /// One round of initialism collapse, whitespace removal, separator joining and the
    /// exported capitalization.
    fn shape(&self, s: &str) -> String {
        let mut name = collapse_initialisms(s);
        name.retain(|c| !c.is_whitespace());
        let mut name = convert::<Separated, CamelCase>(&name);
        if name.is_empty() {
            name = UNNAMED.to_string();
        }
        if self.exported {
            name = title(&name);
        }
        name
    }
}

/// Normalizes with the default policy: unexported, no prefix.
pub fn normalize(raw: &str) -> String {
    NamingPolicy::default().normalize(raw)
}

/// Applies `round` until the result stops changing.
fn settle(raw: &str, round: impl Fn(&str) -> String) -> String {
    let mut current = round(raw);
    for _ in 1..MAX_PASSES {
        let next = round(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn collapse_initialisms(s: &str) -> String {
    let mut current = s.to_string();
    loop {
        let next = replace_initialisms(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn replace_initialisms(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        match INITIALISMS.iter().find(|(key, _)| rest.starts_with(key)) {
            Some((key, initialism)) => {
                result.push_str(initialism);
                rest = &rest[key.len()..];
            }
            None => {
                result.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    result
}

/// A name already carrying the prefix, followed by anything but a lowercase letter, is left
/// alone.
fn add_prefix(prefix: &str, name: String) -> String {
    match name.strip_prefix(prefix) {
        Some(rest) if !rest.starts_with(char::is_lowercase) => name,
        _ => format!("{prefix}{}", title(&name)),
    }
}

fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

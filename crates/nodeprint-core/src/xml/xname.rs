use super::namespaces::XMLNS;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Expanded XML name plus the prefix it was written with.
///
/// Equality and hashing look at the namespace and local name only; the
/// prefix is a serialization hint.
#[derive(Clone, Debug)]
pub struct XName {
    pub namespace: Option<String>,
    pub local_name: String,
    pub prefix: Option<String>,
}

impl XName {
    pub fn new(namespace: &str, local_name: &str) -> Self {
        Self {
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace.to_string())
            },
            local_name: local_name.to_string(),
            prefix: None,
        }
    }

    pub fn local(local_name: &str) -> Self {
        Self {
            namespace: None,
            local_name: local_name.to_string(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix.to_string())
        };
        self
    }

    /// Name of an `xmlns:prefix` declaration, or of the default `xmlns`
    /// declaration when `prefix` is `None`.
    pub fn xmlns(prefix: Option<&str>) -> Self {
        match prefix {
            Some(p) => XName::new(XMLNS, p).with_prefix("xmlns"),
            None => XName::local("xmlns"),
        }
    }

    pub fn is_xmlns(&self) -> bool {
        match self.namespace.as_deref() {
            Some(ns) => ns == XMLNS,
            None => self.local_name == "xmlns",
        }
    }

    /// `prefix:local` when a prefix is known, otherwise the bare local name.
    pub fn qualified(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local_name)),
            None => Cow::Borrowed(&self.local_name),
        }
    }
}

impl PartialEq for XName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

impl Eq for XName {}

impl Hash for XName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local_name.hash(state);
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XAttribute {
    pub name: XName,
    pub value: String,
}

impl XAttribute {
    pub fn new(name: XName, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

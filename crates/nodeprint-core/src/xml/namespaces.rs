/// Namespace bound to `xmlns` declarations.
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// Namespace bound to the reserved `xml` prefix (`xml:space`, `xml:lang`).
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

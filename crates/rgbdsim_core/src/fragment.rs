//! Scene document fragments
//!
//! All numeric attributes go through [`fmt_num`] so that composing the same
//! scene twice yields byte-identical documents.

use xmltree::{Element, XMLNode};

/// Canonical decimal text for a number attribute
///
/// Shortest representation that parses back to the same `f64`, always with
/// a fractional part or exponent (`60.0`, `0.1`, `1e-7`).
pub fn fmt_num(v: f64) -> String {
    format!("{:?}", v)
}

/// Space-separated canonical numbers, e.g. `"0.1 0.1 0.1"`
pub fn fmt_nums(values: &[f64]) -> String {
    values.iter().map(|v| fmt_num(*v)).collect::<Vec<_>>().join(" ")
}

/// Create an element with attributes inserted in the given order
pub fn element(name: &str, attrs: &[(&str, String)]) -> Element {
    let mut elem = Element::new(name);
    for (key, value) in attrs {
        elem.attributes.insert((*key).to_string(), value.clone());
    }
    elem
}

/// Append `child` as the last child element of `parent`
pub fn append_child(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

/// Direct child elements of `parent`
pub fn child_elements(parent: &Element) -> impl Iterator<Item = &Element> {
    parent.children.iter().filter_map(|node| node.as_element())
}

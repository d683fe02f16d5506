//! XML response normalization into a nested value tree.
//!
//! The tree is isomorphic to the element tree: leaf elements become text,
//! elements with children become maps, and repeated siblings become ordered
//! lists. Typed decoders in `models` read from this tree exactly once.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// A normalized XML fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    /// Child lookup; None for text and list nodes.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Nested child lookup along a key path.
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Text content of a leaf node.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text content of a leaf child.
    pub fn text_of(&self, key: &str) -> Option<&str> {
        self.get(key)?.text()
    }

    /// Uniform sequence view: list members, or the value itself.
    ///
    /// The vendor serializes a one-element collection without the wrapping
    /// list, so callers iterate `items()` instead of matching on the shape.
    pub fn items(&self) -> Vec<&Value> {
        match self {
            Value::List(values) => values.iter().collect(),
            other => vec![other],
        }
    }
}

/// Parses a whole document, returning the root element name and its value.
pub fn parse(body: &str) -> Result<(String, Value)> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(|e| Error::Xml(e.to_string()))? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let value = read_element(&mut reader)?;
                return Ok((name, value));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Ok((name, Value::Text(String::new())));
            }
            Event::Eof => return Err(Error::Xml("empty response body".into())),
            _ => {}
        }
    }
}

/// Reads the content of an already-opened element up to its end tag.
fn read_element(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut children: BTreeMap<String, Value> = BTreeMap::new();
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(|e| Error::Xml(e.to_string()))? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let value = read_element(reader)?;
                insert_child(&mut children, name, value);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                insert_child(&mut children, name, Value::Text(String::new()));
            }
            Event::Text(t) => {
                let decoded = t.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                text.push_str(&decoded);
            }
            Event::CData(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::End(_) => break,
            Event::Eof => return Err(Error::Xml("unexpected end of document".into())),
            _ => {}
        }
    }

    if children.is_empty() {
        Ok(Value::Text(text))
    } else {
        Ok(Value::Map(children))
    }
}

/// Inserts a child, turning repeated siblings into an ordered list.
fn insert_child(children: &mut BTreeMap<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        None => {
            children.insert(name, value);
        }
        Some(Value::List(values)) => values.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::List(Vec::new()));
            if let Value::List(values) = existing {
                values.push(first);
                values.push(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_and_nesting() {
        let (root, value) = parse("<Cart><CartId>123</CartId><HMAC>abc=</HMAC></Cart>").unwrap();
        assert_eq!(root, "Cart");
        assert_eq!(value.text_of("CartId"), Some("123"));
        assert_eq!(value.text_of("HMAC"), Some("abc="));
        assert!(value.get("Missing").is_none());
    }

    #[test]
    fn test_repeated_siblings_become_list() {
        let (_, value) = parse(
            "<Items><Item><ASIN>B000000001</ASIN></Item><Item><ASIN>B000000002</ASIN></Item></Items>",
        )
        .unwrap();

        let items = value.get("Item").unwrap().items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text_of("ASIN"), Some("B000000001"));
        assert_eq!(items[1].text_of("ASIN"), Some("B000000002"));
    }

    #[test]
    fn test_single_sibling_stays_scalar_but_items_wraps() {
        let (_, value) = parse("<Items><Item><ASIN>B000000001</ASIN></Item></Items>").unwrap();

        let item = value.get("Item").unwrap();
        assert!(matches!(item, Value::Map(_)));
        // items() presents the scalar as a one-element sequence
        let items = item.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text_of("ASIN"), Some("B000000001"));
    }

    #[test]
    fn test_path_traversal() {
        let (_, value) =
            parse("<Cart><SubTotal><Amount>2999</Amount></SubTotal></Cart>").unwrap();
        assert_eq!(value.path(&["SubTotal", "Amount"]).and_then(Value::text), Some("2999"));
        assert!(value.path(&["SubTotal", "Nope"]).is_none());
    }

    #[test]
    fn test_entities_are_unescaped() {
        let (_, value) = parse("<Item><Title>Tea &amp; Biscuits &lt;set&gt;</Title></Item>").unwrap();
        assert_eq!(value.text_of("Title"), Some("Tea & Biscuits <set>"));
    }

    #[test]
    fn test_empty_elements() {
        let (_, value) = parse("<Cart><PurchaseURL/></Cart>").unwrap();
        assert_eq!(value.text_of("PurchaseURL"), Some(""));
    }

    #[test]
    fn test_declaration_and_whitespace_skipped() {
        let body = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>\n  <Ok>1</Ok>\n</Response>";
        let (root, value) = parse(body).unwrap();
        assert_eq!(root, "Response");
        assert_eq!(value.text_of("Ok"), Some("1"));
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse("").is_err());
        assert!(parse("<Cart><CartId>1</Cart>").is_err());
        assert!(parse("not xml at all").is_err());
    }
}

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

const DEFAULT_FONT: &str = "Helvetica";
const DEFAULT_FONT_SIZE: u32 = 24;
const DEFAULT_BACKGROUND: &str = "#FFFFFF";
const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Content alignment mode for a slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Justify {
    #[default]
    Left,
    Center,
}

/// An open mapping of style attribute name to value.
///
/// Styles resolve by shallow key-wise merges in increasing priority:
/// built-in defaults, then the deck-level override, then the per-slide
/// override. Unknown attributes are carried through untouched; the typed
/// accessors fall back to fixed defaults when a key is absent or has an
/// unusable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, Value>);

impl StyleMap {
    /// The built-in base style every deck starts from.
    pub fn defaults() -> Self {
        let mut map = BTreeMap::new();
        map.insert("font".to_string(), Value::from(DEFAULT_FONT));
        map.insert(
            "fontSize".to_string(),
            Value::from(u64::from(DEFAULT_FONT_SIZE)),
        );
        map.insert(
            "backgroundColor".to_string(),
            Value::from(DEFAULT_BACKGROUND),
        );
        map.insert("textColor".to_string(), Value::from(DEFAULT_TEXT_COLOR));
        map.insert("justify".to_string(), Value::from("left"));
        Self(map)
    }

    /// Shallow merge: every key present in `other` overrides this map's value.
    pub fn merge_from(&mut self, other: &StyleMap) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy of this map with `other` merged over it.
    pub fn merged(&self, other: &StyleMap) -> StyleMap {
        let mut result = self.clone();
        result.merge_from(other);
        result
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str_or(&self, key: &str, fallback: &'static str) -> String {
        match self.0.get(key).and_then(Value::as_str) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn font(&self) -> String {
        self.str_or("font", DEFAULT_FONT)
    }

    pub fn font_size(&self) -> u32 {
        match self.0.get("fontSize") {
            Some(value) => value
                .as_u64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .map(|n| n as u32)
                .unwrap_or(DEFAULT_FONT_SIZE),
            None => DEFAULT_FONT_SIZE,
        }
    }

    pub fn background_color(&self) -> String {
        self.str_or("backgroundColor", DEFAULT_BACKGROUND)
    }

    pub fn text_color(&self) -> String {
        self.str_or("textColor", DEFAULT_TEXT_COLOR)
    }

    pub fn justify(&self) -> Justify {
        match self.0.get("justify").and_then(Value::as_str) {
            Some("center") => Justify::Center,
            _ => Justify::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_of(yaml: &str) -> StyleMap {
        serde_yaml::from_str(yaml).expect("style yaml")
    }

    #[test]
    fn test_defaults() {
        let style = StyleMap::defaults();
        assert_eq!(style.font(), "Helvetica");
        assert_eq!(style.font_size(), 24);
        assert_eq!(style.background_color(), "#FFFFFF");
        assert_eq!(style.text_color(), "#000000");
        assert_eq!(style.justify(), Justify::Left);
    }

    #[test]
    fn test_empty_map_falls_back() {
        let style = StyleMap::default();
        assert_eq!(style.font(), "Helvetica");
        assert_eq!(style.font_size(), 24);
        assert_eq!(style.justify(), Justify::Left);
    }

    #[test]
    fn test_merge_overrides_present_keys_only() {
        let mut style = StyleMap::defaults();
        style.merge_from(&style_of("fontSize: 36\njustify: center"));
        assert_eq!(style.font_size(), 36);
        assert_eq!(style.justify(), Justify::Center);
        // Untouched keys keep their previous values
        assert_eq!(style.font(), "Helvetica");
        assert_eq!(style.background_color(), "#FFFFFF");
    }

    #[test]
    fn test_merge_priority_per_attribute() {
        // default < global < per-slide, each attribute independently
        let global = style_of("font: Georgia\nfontSize: 30");
        let per_slide = style_of("fontSize: 48");
        let resolved = StyleMap::defaults().merged(&global).merged(&per_slide);
        assert_eq!(resolved.font(), "Georgia");
        assert_eq!(resolved.font_size(), 48);
        assert_eq!(resolved.text_color(), "#000000");
    }

    #[test]
    fn test_font_size_from_string_value() {
        let style = StyleMap::defaults().merged(&style_of("fontSize: \"32\""));
        assert_eq!(style.font_size(), 32);
    }

    #[test]
    fn test_unusable_font_size_falls_back() {
        let style = StyleMap::defaults().merged(&style_of("fontSize: huge"));
        assert_eq!(style.font_size(), 24);
    }

    #[test]
    fn test_unknown_justify_is_left() {
        let style = StyleMap::defaults().merged(&style_of("justify: justified"));
        assert_eq!(style.justify(), Justify::Left);
    }

    #[test]
    fn test_unknown_keys_carried() {
        let style = style_of("lineHeight: 1.5");
        assert!(style.get("lineHeight").is_some());
    }
}

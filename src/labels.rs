use std::collections::HashMap;

/// Language dependent lookup for column labels and tooltips.
///
/// Keys are resolved at render time only; nothing in the layout engine
/// compares or stores resolved strings.
pub trait LabelResolver {
    fn resolve(&self, key: &str) -> String;
}

impl<F> LabelResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, key: &str) -> String {
        self(key)
    }
}

/// Fixed key -> text table. Unknown keys resolve to themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticLabels {
    strings: HashMap<String, String>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            strings: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.strings.insert(key.into(), text.into());
    }
}

impl LabelResolver for StaticLabels {
    fn resolve(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

use std::collections::BTreeMap;

/// Accumulates pod annotations for one reconcile pass.
///
/// Unlike the sequence managers this is a map: the last write for a given
/// key wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationManager {
    annotations: BTreeMap<String, String>,
}

impl AnnotationManager {
    pub fn set_annotation(&mut self, key: String, value: String) {
        self.annotations.insert(key, value);
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut manager = AnnotationManager::default();
        manager.set_annotation("k".to_string(), "first".to_string());
        manager.set_annotation("k".to_string(), "second".to_string());

        assert_eq!(1, manager.annotations().len());
        assert_eq!("second", manager.annotations()["k"]);
    }
}

use std::collections::HashMap;

/// Label-to-position map seeded from a known ordering.
///
/// Labels outside the seed are appended in first-seen order, so a batch
/// carrying foreign labels still aggregates every record.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl LabelIndex {
    pub fn new(seed: &[String]) -> Self {
        let mut index = Self::default();
        for label in seed {
            index.position_or_insert(label);
        }
        index
    }

    pub fn position_or_insert(&mut self, label: &str) -> usize {
        if let Some(&position) = self.positions.get(label) {
            return position;
        }
        let position = self.labels.len();
        self.labels.push(label.to_string());
        self.positions.insert(label.to_string(), position);
        position
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_labels_are_appended() {
        let mut index = LabelIndex::new(&["b".to_string(), "a".to_string()]);
        assert_eq!(index.position_or_insert("a"), 1);
        assert_eq!(index.position_or_insert("z"), 2);
        assert_eq!(index.position_or_insert("z"), 2);
        assert_eq!(index.into_labels(), vec!["b", "a", "z"]);
    }
}

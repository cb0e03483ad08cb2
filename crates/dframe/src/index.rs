use crate::error::{FrameError, FrameResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered set of unique column labels.
///
/// Cloning is cheap: the labels and the lookup map are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Index {
    inner: Arc<IndexInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct IndexInner {
    labels: Vec<Arc<str>>,
    positions: HashMap<Arc<str>, usize>,
}

impl Index {
    pub fn for_labels<I, S>(labels: I) -> FrameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<Arc<str>> = labels.into_iter().map(|l| Arc::from(l.as_ref())).collect();
        let mut positions = HashMap::with_capacity(labels.len());
        for (idx, label) in labels.iter().enumerate() {
            if positions.insert(label.clone(), idx).is_some() {
                return Err(FrameError::DuplicateLabel(label.to_string()));
            }
        }

        Ok(Self {
            inner: Arc::new(IndexInner { labels, positions }),
        })
    }

    pub fn empty() -> Self {
        Self {
            inner: Arc::new(IndexInner {
                labels: Vec::new(),
                positions: HashMap::new(),
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.inner.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.labels.is_empty()
    }

    pub fn labels(&self) -> &[Arc<str>] {
        &self.inner.labels
    }

    pub fn label(&self, position: usize) -> FrameResult<&str> {
        self.inner
            .labels
            .get(position)
            .map(|l| l.as_ref())
            .ok_or(FrameError::ColumnPositionOutOfBounds {
                position,
                width: self.size(),
            })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.inner.positions.contains_key(label)
    }

    pub fn position(&self, label: &str) -> FrameResult<usize> {
        self.inner
            .positions
            .get(label)
            .copied()
            .ok_or_else(|| FrameError::UnknownColumn(label.to_string()))
    }

    pub(crate) fn check_position(&self, position: usize) -> FrameResult<usize> {
        if position < self.size() {
            Ok(position)
        } else {
            Err(FrameError::ColumnPositionOutOfBounds {
                position,
                width: self.size(),
            })
        }
    }

    /// Index made of the labels at `positions`, in that order.
    pub fn select_positions(&self, positions: &[usize]) -> FrameResult<Self> {
        let mut labels = Vec::with_capacity(positions.len());
        for &p in positions {
            labels.push(self.label(p)?);
        }
        Self::for_labels(labels)
    }

    /// Appends `other`'s labels after this index's labels. A label that is already taken gets
    /// `_` appended until it is unique.
    pub fn add_labels(&self, other: &Index) -> Self {
        self.extended(other.labels())
    }

    /// Like [`Index::for_labels`], but repeated labels are renamed the way
    /// [`Index::add_labels`] renames them instead of failing.
    pub fn for_labels_renaming_duplicates<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::empty().extended(labels)
    }

    fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<Arc<str>> = self.inner.labels.clone();
        let mut positions = self.inner.positions.clone();

        for label in extra {
            let mut unique = label.as_ref().to_string();
            while positions.contains_key(unique.as_str()) {
                unique.push('_');
            }
            let unique: Arc<str> = Arc::from(unique);
            positions.insert(unique.clone(), labels.len());
            labels.push(unique);
        }

        Self {
            inner: Arc::new(IndexInner { labels, positions }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_insertion_order() {
        let index = Index::for_labels(["a", "b", "c"]).unwrap();
        assert_eq!(index.size(), 3);
        assert_eq!(index.position("b").unwrap(), 1);
        assert_eq!(index.label(2).unwrap(), "c");
        assert_eq!(
            index.position("x"),
            Err(FrameError::UnknownColumn("x".to_string()))
        );
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        assert_eq!(
            Index::for_labels(["a", "b", "a"]),
            Err(FrameError::DuplicateLabel("a".to_string()))
        );
    }

    #[test]
    fn add_labels_renames_collisions() {
        let left = Index::for_labels(["id", "name"]).unwrap();
        let right = Index::for_labels(["id", "id_", "city"]).unwrap();
        let combined = left.add_labels(&right);
        let labels: Vec<&str> = combined.labels().iter().map(|l| l.as_ref()).collect();
        assert_eq!(labels, vec!["id", "name", "id_", "id__", "city"]);
    }

    #[test]
    fn repeated_labels_can_be_renamed_on_construction() {
        let index = Index::for_labels_renaming_duplicates(["id", "name", "id", "id"]);
        let labels: Vec<&str> = index.labels().iter().map(|l| l.as_ref()).collect();
        assert_eq!(labels, vec!["id", "name", "id_", "id__"]);
        assert_eq!(index.position("id_").unwrap(), 2);
    }
}

//! Group labels and pairs of groups.

use std::fmt;

use indexmap::IndexSet;

use crate::table::Record;

/// A numeric id for a group, given by its position in [`Groups`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(pub usize);

impl From<Id> for usize {
    fn from(id: Id) -> Self {
        id.0
    }
}

/// An ordered set of group labels.
///
/// Labels are ordered by first appearance.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Groups(IndexSet<String>);

impl Groups {
    /// Collects the distinct group labels of records, in order of first appearance.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .map(|record| record.group.as_str())
            .collect()
    }

    /// Removes the provided group labels.
    ///
    /// Order of the remaining labels is preserved. Labels that are not present are ignored with
    /// a warning.
    pub fn exclude<S>(mut self, excluded: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        for name in excluded.iter().map(AsRef::as_ref) {
            if !self.0.shift_remove(name) {
                log::warn!("Excluded group '{name}' not found in input.");
            }
        }

        self
    }

    /// Returns the id of a group label.
    pub fn get_id(&self, name: &str) -> Option<Id> {
        self.0.get_index_of(name).map(Id)
    }

    /// Returns the label of a group id.
    pub fn get_name(&self, id: Id) -> Option<&str> {
        self.0.get_index(id.0).map(String::as_str)
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the group labels.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns all unordered pairs of distinct groups.
    pub fn pairs(&self) -> Pairs {
        let n = self.len();

        let pairs = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (Id(i), Id(j))))
            .map(|(a, b)| Pair {
                a,
                b,
                name: format!("{}_{}", self.0[a.0], self.0[b.0]),
            })
            .collect();

        Pairs(pairs)
    }
}

impl<S> FromIterator<S> for Groups
where
    S: ToString,
{
    fn from_iter<I>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        Self(names.into_iter().map(|s| s.to_string()).collect())
    }
}

/// An unordered pair of distinct groups.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Pair {
    a: Id,
    b: Id,
    name: String,
}

impl Pair {
    /// Returns the ids of the groups in the pair.
    pub fn ids(&self) -> (Id, Id) {
        (self.a, self.b)
    }

    /// Returns the name of the pair, formed by joining the group labels with an underscore.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Pairs of groups in a fixed order.
///
/// For groups ordered as g₀, g₁, ..., the pairs are (g₀, g₁), (g₀, g₂), ..., (g₁, g₂), ...
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pairs(Vec<Pair>);

impl Pairs {
    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.0.iter()
    }

    /// Returns an iterator over the pair names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Pair::name)
    }
}

impl<'a> IntoIterator for &'a Pairs {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_from_records_first_appearance() {
        let records = [
            Record::new("r", "YRI", Some(1.0)),
            Record::new("r", "CEU", Some(1.0)),
            Record::new("s", "YRI", None),
            Record::new("s", "CHB", Some(2.0)),
        ];

        let groups = Groups::from_records(&records);

        assert_eq!(groups, Groups::from_iter(["YRI", "CEU", "CHB"]));
        assert_eq!(groups.get_id("CHB"), Some(Id(2)));
        assert_eq!(groups.get_name(Id(1)), Some("CEU"));
        assert_eq!(groups.get_id("JPT"), None);
    }

    #[test]
    fn test_exclude() {
        let groups = Groups::from_iter(["A", "B", "C", "D"]).exclude(&["B", "E"]);

        assert_eq!(groups, Groups::from_iter(["A", "C", "D"]));
    }

    #[test]
    fn test_pairs() {
        let pairs = Groups::from_iter(["A", "B", "C"]).pairs();

        assert_eq!(pairs.names().collect::<Vec<_>>(), ["A_B", "A_C", "B_C"]);
        assert_eq!(
            pairs.iter().map(Pair::ids).collect::<Vec<_>>(),
            [(Id(0), Id(1)), (Id(0), Id(2)), (Id(1), Id(2))]
        );
    }

    #[test]
    fn test_pairs_after_exclusion() {
        let pairs = Groups::from_iter(["A", "B", "C"]).exclude(&["B"]).pairs();

        assert_eq!(pairs.names().collect::<Vec<_>>(), ["A_C"]);
        assert_eq!(
            pairs.iter().map(Pair::ids).collect::<Vec<_>>(),
            [(Id(0), Id(1))]
        );
    }

    #[test]
    fn test_pairs_single_group() {
        assert!(Groups::from_iter(["A"]).pairs().is_empty());
        assert!(Groups::default().pairs().is_empty());
    }
}

use crate::Value;
use std::{borrow::Borrow, fmt, ops::Index, slice, vec};

/// Insertion ordered map.
///
/// Iteration order is the order in which keys were first inserted. Inserting an
/// existing key replaces its value and keeps the original position. Lookups are
/// linear, the maps handled here are column lists of a single statement or row.
#[derive(Clone, PartialEq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

/// Column name to value map: column-value maps, predicate maps and fetched rows.
pub type Record = OrderedMap<String, Value>;

impl<K, V> OrderedMap<K, V> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + Clone {
        self.entries.iter().map(|(k, v)| (k, v))
    }
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + Clone {
        self.entries.iter().map(|(k, _)| k)
    }
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + Clone {
        self.entries.iter().map(|(_, v)| v)
    }
    /// First entry in insertion order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|(k, v)| (k, v))
    }
    pub fn retain(&mut self, mut f: impl FnMut(&K, &V) -> bool) {
        self.entries.retain(|(k, v)| f(k, v));
    }
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .position(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)
    }
    /// Insert or replace, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<K>, value: impl Into<V>) -> Option<V> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).map(|i| &self.entries[i].1)
    }
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).is_some()
    }
    /// Remove the entry, shifting the following ones to keep the order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).map(|i| self.entries.remove(i).1)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

impl<K: PartialEq, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: PartialEq, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V> {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = vec::IntoIter<(K, V)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = &'a (K, V);
    type IntoIter = slice::Iter<'a, (K, V)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V, Q> Index<&Q> for OrderedMap<K, V>
where
    K: PartialEq + Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    type Output = V;
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("Key is not present in the map")
    }
}

/// Build a [`Record`] from `column => value` pairs, values go through [`AsValue`](crate::AsValue).
///
/// ```rust
/// use scoop_core::{Value, record};
/// let row = record! { "name" => "a", "age" => 5 };
/// assert_eq!(row["age"], Value::Int64(5));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(
                ::std::string::String::from($column),
                $crate::AsValue::as_value($value),
            );
        )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn keeps_insertion_order() {
        let mut map = OrderedMap::<String, i32>::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mid", 3);
        assert_eq!(
            map.keys().map(String::as_str).collect::<Vec<_>>(),
            ["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn replace_keeps_position() {
        let mut map = record! { "a" => 1, "b" => 2, "c" => 3 };
        assert_eq!(map.insert("a", 10), Some(Value::Int64(1)));
        assert_eq!(map.len(), 3);
        assert_eq!(map.first(), Some((&"a".to_string(), &Value::Int64(10))));
        assert_eq!(map.remove("b"), Some(Value::Int64(2)));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn from_array_and_index() {
        let map = OrderedMap::from([("x".to_string(), 1), ("y".to_string(), 2)]);
        assert_eq!(map["y"], 2);
        assert_eq!(map.get("z"), None);
    }
}

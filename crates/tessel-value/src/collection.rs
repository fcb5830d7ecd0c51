//! Collection values: lists, sets, and string-keyed maps.
//!
//! Every collection value owns its backing collection. Constructors copy
//! their input, and [`CollectionValue::get_all`] returns an independent
//! copy, so nothing outside the value can observe or mutate its storage.

use std::collections::{BTreeMap, BTreeSet};

use tessel_types::{Key, ValueType};

use crate::any::AnyValue;
use crate::error::{ValueError, ValueResult};
use crate::value::{ImmutableValue, Value};

/// Element-level view shared by all collection values.
pub trait CollectionValue {
    type Element;
    type Collection;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn contains(&self, element: &Self::Element) -> bool;

    /// An independent copy of the current elements.
    fn get_all(&self) -> Self::Collection;
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Mutable ordered collection value.
#[derive(Clone, Debug, PartialEq)]
pub struct ListValue<T> {
    inner: Value<Vec<T>>,
}

impl<T> ListValue<T>
where
    T: Clone + PartialEq,
    Vec<T>: ValueType,
{
    /// An empty, non-existing list.
    pub fn new(key: Key<Vec<T>>) -> Self {
        Self {
            inner: Value::new(key, Vec::new()),
        }
    }

    /// An existing list holding a copy of `elements`.
    pub fn with_elements<I>(key: Key<Vec<T>>, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            inner: Value::with_actual(key, Vec::new(), elements.into_iter().collect()),
        }
    }

    pub fn from_value(inner: Value<Vec<T>>) -> Self {
        Self { inner }
    }

    pub fn key(&self) -> Key<Vec<T>> {
        self.inner.key()
    }

    pub fn get(&self) -> &[T] {
        self.inner.get()
    }

    pub fn get_direct(&self) -> Option<&[T]> {
        self.inner.get_direct().map(Vec::as_slice)
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.get().get(index)
    }

    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.get().iter().position(|e| e == element)
    }

    pub fn set(&mut self, elements: Vec<T>) -> &mut Self {
        self.inner.set(elements);
        self
    }

    pub fn add(&mut self, element: T) -> &mut Self {
        self.inner.get_mut().push(element);
        self
    }

    pub fn add_all<I>(&mut self, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.get_mut().extend(elements);
        self
    }

    /// Insert at `index`, shifting later elements. `index == len` appends.
    pub fn insert(&mut self, index: usize, element: T) -> ValueResult<&mut Self> {
        let key = self.key();
        let list = self.inner.get_mut();
        if index > list.len() {
            return Err(index_error(key, index, list.len()));
        }
        list.insert(index, element);
        Ok(self)
    }

    /// Replace the element at `index`.
    pub fn set_at(&mut self, index: usize, element: T) -> ValueResult<&mut Self> {
        let key = self.key();
        let list = self.inner.get_mut();
        let len = list.len();
        match list.get_mut(index) {
            Some(slot) => *slot = element,
            None => return Err(index_error(key, index, len)),
        }
        Ok(self)
    }

    pub fn remove_at(&mut self, index: usize) -> ValueResult<T> {
        let key = self.key();
        let list = self.inner.get_mut();
        if index >= list.len() {
            return Err(index_error(key, index, list.len()));
        }
        Ok(list.remove(index))
    }

    /// Remove the first occurrence of `element`.
    pub fn remove(&mut self, element: &T) -> &mut Self {
        let list = self.inner.get_mut();
        if let Some(pos) = list.iter().position(|e| e == element) {
            list.remove(pos);
        }
        self
    }

    /// Remove every occurrence of every element in `elements`.
    pub fn remove_all(&mut self, elements: &[T]) -> &mut Self {
        self.inner.get_mut().retain(|e| !elements.contains(e));
        self
    }

    /// Keep only elements matching `predicate`.
    pub fn filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: FnMut(&T) -> bool,
    {
        self.inner.get_mut().retain(predicate);
        self
    }

    pub fn as_value(&self) -> &Value<Vec<T>> {
        &self.inner
    }

    pub fn into_value(self) -> Value<Vec<T>> {
        self.inner
    }

    pub fn as_immutable(&self) -> ImmutableListValue<T> {
        ImmutableListValue {
            inner: self.inner.as_immutable(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

impl<T> CollectionValue for ListValue<T>
where
    T: Clone + PartialEq,
    Vec<T>: ValueType,
{
    type Element = T;
    type Collection = Vec<T>;

    fn size(&self) -> usize {
        self.get().len()
    }

    fn contains(&self, element: &T) -> bool {
        self.get().contains(element)
    }

    fn get_all(&self) -> Vec<T> {
        self.get().to_vec()
    }
}

/// Immutable ordered collection value.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmutableListValue<T> {
    inner: ImmutableValue<Vec<T>>,
}

impl<T> ImmutableListValue<T>
where
    T: Clone + PartialEq,
    Vec<T>: ValueType,
{
    pub fn new(key: Key<Vec<T>>) -> Self {
        Self {
            inner: ImmutableValue::new(key, Vec::new()),
        }
    }

    pub fn with_elements<I>(key: Key<Vec<T>>, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            inner: ImmutableValue::with_actual(key, Vec::new(), elements.into_iter().collect()),
        }
    }

    pub fn from_value(inner: ImmutableValue<Vec<T>>) -> Self {
        Self { inner }
    }

    pub fn key(&self) -> Key<Vec<T>> {
        self.inner.key()
    }

    pub fn get(&self) -> &[T] {
        self.inner.get()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.get().get(index)
    }

    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.get().iter().position(|e| e == element)
    }

    pub fn with(&self, elements: Vec<T>) -> Self {
        Self {
            inner: self.inner.with(elements),
        }
    }

    pub fn with_element(&self, element: T) -> Self {
        let mut next = self.get_all();
        next.push(element);
        self.with(next)
    }

    pub fn with_all<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut next = self.get_all();
        next.extend(elements);
        self.with(next)
    }

    pub fn with_at(&self, index: usize, element: T) -> ValueResult<Self> {
        let mut next = self.get_all();
        if index > next.len() {
            return Err(index_error(self.key(), index, next.len()));
        }
        next.insert(index, element);
        Ok(self.with(next))
    }

    pub fn without(&self, element: &T) -> Self {
        let mut next = self.get_all();
        if let Some(pos) = next.iter().position(|e| e == element) {
            next.remove(pos);
        }
        self.with(next)
    }

    pub fn without_at(&self, index: usize) -> ValueResult<Self> {
        let mut next = self.get_all();
        if index >= next.len() {
            return Err(index_error(self.key(), index, next.len()));
        }
        next.remove(index);
        Ok(self.with(next))
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut next = self.get_all();
        next.retain(predicate);
        self.with(next)
    }

    pub fn as_value(&self) -> &ImmutableValue<Vec<T>> {
        &self.inner
    }

    pub fn as_mutable(&self) -> ListValue<T> {
        ListValue {
            inner: self.inner.as_mutable(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

impl<T> CollectionValue for ImmutableListValue<T>
where
    T: Clone + PartialEq,
    Vec<T>: ValueType,
{
    type Element = T;
    type Collection = Vec<T>;

    fn size(&self) -> usize {
        self.get().len()
    }

    fn contains(&self, element: &T) -> bool {
        self.get().contains(element)
    }

    fn get_all(&self) -> Vec<T> {
        self.get().to_vec()
    }
}

fn index_error<E>(key: Key<E>, index: usize, len: usize) -> ValueError {
    ValueError::IndexOutOfRange {
        key: key.id(),
        index,
        len,
    }
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// Mutable unordered collection value, iterated in element order.
#[derive(Clone, Debug, PartialEq)]
pub struct SetValue<T> {
    inner: Value<BTreeSet<T>>,
}

impl<T> SetValue<T>
where
    T: Clone + Ord,
    BTreeSet<T>: ValueType,
{
    pub fn new(key: Key<BTreeSet<T>>) -> Self {
        Self {
            inner: Value::new(key, BTreeSet::new()),
        }
    }

    pub fn with_elements<I>(key: Key<BTreeSet<T>>, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            inner: Value::with_actual(key, BTreeSet::new(), elements.into_iter().collect()),
        }
    }

    pub fn key(&self) -> Key<BTreeSet<T>> {
        self.inner.key()
    }

    pub fn get(&self) -> &BTreeSet<T> {
        self.inner.get()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn set(&mut self, elements: BTreeSet<T>) -> &mut Self {
        self.inner.set(elements);
        self
    }

    pub fn add(&mut self, element: T) -> &mut Self {
        self.inner.get_mut().insert(element);
        self
    }

    pub fn add_all<I>(&mut self, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.get_mut().extend(elements);
        self
    }

    pub fn remove(&mut self, element: &T) -> &mut Self {
        self.inner.get_mut().remove(element);
        self
    }

    pub fn remove_all<'a, I>(&mut self, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let set = self.inner.get_mut();
        for element in elements {
            set.remove(element);
        }
        self
    }

    pub fn filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: FnMut(&T) -> bool,
    {
        self.inner.get_mut().retain(predicate);
        self
    }

    pub fn as_value(&self) -> &Value<BTreeSet<T>> {
        &self.inner
    }

    pub fn as_immutable(&self) -> ImmutableSetValue<T> {
        ImmutableSetValue {
            inner: self.inner.as_immutable(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

impl<T> CollectionValue for SetValue<T>
where
    T: Clone + Ord,
    BTreeSet<T>: ValueType,
{
    type Element = T;
    type Collection = BTreeSet<T>;

    fn size(&self) -> usize {
        self.get().len()
    }

    fn contains(&self, element: &T) -> bool {
        self.get().contains(element)
    }

    fn get_all(&self) -> BTreeSet<T> {
        self.get().clone()
    }
}

/// Immutable set value.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmutableSetValue<T> {
    inner: ImmutableValue<BTreeSet<T>>,
}

impl<T> ImmutableSetValue<T>
where
    T: Clone + Ord,
    BTreeSet<T>: ValueType,
{
    pub fn with_elements<I>(key: Key<BTreeSet<T>>, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        SetValue::with_elements(key, elements).as_immutable()
    }

    pub fn get(&self) -> &BTreeSet<T> {
        self.inner.get()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn with(&self, elements: BTreeSet<T>) -> Self {
        Self {
            inner: self.inner.with(elements),
        }
    }

    pub fn with_element(&self, element: T) -> Self {
        let mut next = self.get_all();
        next.insert(element);
        self.with(next)
    }

    pub fn without(&self, element: &T) -> Self {
        let mut next = self.get_all();
        next.remove(element);
        self.with(next)
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut next = self.get_all();
        next.retain(predicate);
        self.with(next)
    }

    pub fn as_mutable(&self) -> SetValue<T> {
        SetValue {
            inner: self.inner.as_mutable(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

impl<T> CollectionValue for ImmutableSetValue<T>
where
    T: Clone + Ord,
    BTreeSet<T>: ValueType,
{
    type Element = T;
    type Collection = BTreeSet<T>;

    fn size(&self) -> usize {
        self.get().len()
    }

    fn contains(&self, element: &T) -> bool {
        self.get().contains(element)
    }

    fn get_all(&self) -> BTreeSet<T> {
        self.get().clone()
    }
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

/// Mutable map value with string keys, so it serializes as a JSON object.
#[derive(Clone, Debug, PartialEq)]
pub struct MapValue<V> {
    inner: Value<BTreeMap<String, V>>,
}

impl<V> MapValue<V>
where
    V: Clone + PartialEq,
    BTreeMap<String, V>: ValueType,
{
    pub fn new(key: Key<BTreeMap<String, V>>) -> Self {
        Self {
            inner: Value::new(key, BTreeMap::new()),
        }
    }

    pub fn with_entries<I, K>(key: Key<BTreeMap<String, V>>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            inner: Value::with_actual(key, BTreeMap::new(), map),
        }
    }

    pub fn key(&self) -> Key<BTreeMap<String, V>> {
        self.inner.key()
    }

    pub fn get(&self) -> &BTreeMap<String, V> {
        self.inner.get()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn get_entry(&self, name: &str) -> Option<&V> {
        self.get().get(name)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.get().values().any(|v| v == value)
    }

    pub fn put(&mut self, name: impl Into<String>, value: V) -> &mut Self {
        self.inner.get_mut().insert(name.into(), value);
        self
    }

    pub fn put_all<I, K>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        self.inner
            .get_mut()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.inner.get_mut().remove(name);
        self
    }

    pub fn filter<P>(&mut self, mut predicate: P) -> &mut Self
    where
        P: FnMut(&str, &V) -> bool,
    {
        self.inner.get_mut().retain(|k, v| predicate(k, v));
        self
    }

    pub fn as_immutable(&self) -> ImmutableMapValue<V> {
        ImmutableMapValue {
            inner: self.inner.as_immutable(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

impl<V> CollectionValue for MapValue<V>
where
    V: Clone + PartialEq,
    BTreeMap<String, V>: ValueType,
{
    type Element = String;
    type Collection = BTreeMap<String, V>;

    fn size(&self) -> usize {
        self.get().len()
    }

    /// Whether the map has an entry named `element`.
    fn contains(&self, element: &String) -> bool {
        self.get().contains_key(element)
    }

    fn get_all(&self) -> BTreeMap<String, V> {
        self.get().clone()
    }
}

/// Immutable map value.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmutableMapValue<V> {
    inner: ImmutableValue<BTreeMap<String, V>>,
}

impl<V> ImmutableMapValue<V>
where
    V: Clone + PartialEq,
    BTreeMap<String, V>: ValueType,
{
    pub fn get(&self) -> &BTreeMap<String, V> {
        self.inner.get()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn with(&self, entries: BTreeMap<String, V>) -> Self {
        Self {
            inner: self.inner.with(entries),
        }
    }

    pub fn with_entry(&self, name: impl Into<String>, value: V) -> Self {
        let mut next = self.get_all();
        next.insert(name.into(), value);
        self.with(next)
    }

    pub fn without(&self, name: &str) -> Self {
        let mut next = self.get_all();
        next.remove(name);
        self.with(next)
    }

    pub fn as_mutable(&self) -> MapValue<V> {
        MapValue {
            inner: self.inner.as_mutable(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

impl<V> CollectionValue for ImmutableMapValue<V>
where
    V: Clone + PartialEq,
    BTreeMap<String, V>: ValueType,
{
    type Element = String;
    type Collection = BTreeMap<String, V>;

    fn size(&self) -> usize {
        self.get().len()
    }

    fn contains(&self, element: &String) -> bool {
        self.get().contains_key(element)
    }

    fn get_all(&self) -> BTreeMap<String, V> {
        self.get().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LORE: Key<Vec<String>> = Key::list("test:lore", "Lore");
    const TAGS: Key<BTreeSet<String>> = Key::set("test:tags", "Tags");
    const WEIGHTS: Key<BTreeMap<String, i32>> = Key::map("test:weights", "Weights");

    fn lore(lines: &[&str]) -> ListValue<String> {
        ListValue::with_elements(LORE, lines.iter().map(|s| s.to_string()))
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    #[test]
    fn list_add_on_empty_marks_exists() {
        let mut list = ListValue::new(LORE);
        assert!(!list.exists());
        list.add("first".into());
        assert!(list.exists());
        assert_eq!(list.get(), ["first".to_string()]);
    }

    #[test]
    fn list_get_all_is_independent() {
        let list = lore(&["a", "b"]);
        let mut copy = list.get_all();
        copy.push("c".into());
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn list_constructed_from_vec_is_independent() {
        let mut source = vec!["a".to_string()];
        let list = ListValue::with_elements(LORE, source.clone());
        source.push("b".into());
        assert_eq!(list.size(), 1);
    }

    #[test]
    fn list_index_operations() {
        let mut list = lore(&["a", "c"]);
        list.insert(1, "b".into()).unwrap();
        assert_eq!(list.get_all(), vec!["a", "b", "c"]);
        list.set_at(0, "z".into()).unwrap();
        assert_eq!(list.remove_at(2).unwrap(), "c");
        assert_eq!(list.get_all(), vec!["z", "b"]);
        assert_eq!(list.index_of(&"b".to_string()), Some(1));
    }

    #[test]
    fn list_index_out_of_range() {
        let mut list = lore(&["a"]);
        assert!(matches!(
            list.insert(5, "x".into()).unwrap_err(),
            ValueError::IndexOutOfRange { index: 5, len: 1, .. }
        ));
        assert!(list.remove_at(1).is_err());
        assert!(list.set_at(1, "x".into()).is_err());
        assert_eq!(list.size(), 1);
    }

    #[test]
    fn list_remove_and_filter() {
        let mut list = lore(&["a", "b", "a", "c"]);
        list.remove(&"a".to_string());
        assert_eq!(list.get_all(), vec!["b", "a", "c"]);
        list.remove_all(&["a".to_string()]);
        assert_eq!(list.get_all(), vec!["b", "c"]);
        list.filter(|s| s != "c");
        assert_eq!(list.get_all(), vec!["b"]);
    }

    #[test]
    fn immutable_list_never_mutates_receiver() {
        let base = lore(&["a"]).as_immutable();
        let added = base.with_element("b".into());
        let removed = added.without(&"a".to_string());
        let inserted = removed.with_at(0, "z".into()).unwrap();
        assert_eq!(base.get_all(), vec!["a"]);
        assert_eq!(added.get_all(), vec!["a", "b"]);
        assert_eq!(removed.get_all(), vec!["b"]);
        assert_eq!(inserted.get_all(), vec!["z", "b"]);
        assert!(base.without_at(3).is_err());
    }

    #[test]
    fn immutable_list_roundtrips_through_mutable() {
        let list = lore(&["x", "y"]);
        assert_eq!(list.as_immutable().as_mutable(), list);
    }

    // -----------------------------------------------------------------------
    // Sets
    // -----------------------------------------------------------------------

    #[test]
    fn set_deduplicates() {
        let mut set = SetValue::new(TAGS);
        set.add("x".into()).add("x".into()).add("y".into());
        assert_eq!(set.size(), 2);
        set.remove_all([&"x".to_string()]);
        assert!(set.contains(&"y".to_string()));
        assert!(!set.contains(&"x".to_string()));
    }

    #[test]
    fn immutable_set_filter() {
        let set = ImmutableSetValue::with_elements(TAGS, ["a".to_string(), "bb".to_string()]);
        let short = set.filter(|s| s.len() == 1);
        assert_eq!(short.size(), 1);
        assert_eq!(set.size(), 2);
        assert!(set.without(&"a".to_string()).with_element("c".into()).contains(&"c".into()));
    }

    // -----------------------------------------------------------------------
    // Maps
    // -----------------------------------------------------------------------

    #[test]
    fn map_put_and_remove() {
        let mut map = MapValue::new(WEIGHTS);
        map.put("zombie", 10).put("skeleton", 5);
        assert_eq!(map.get_entry("zombie"), Some(&10));
        assert!(map.contains_value(&5));
        map.remove("zombie");
        assert!(!map.contains(&"zombie".to_string()));
        map.filter(|_, w| *w > 5);
        assert!(map.is_empty());
        assert!(map.exists());
    }

    #[test]
    fn immutable_map_is_copy_on_write() {
        let map = MapValue::with_entries(WEIGHTS, [("pig", 1)]).as_immutable();
        let more = map.with_entry("cow", 2);
        assert_eq!(map.size(), 1);
        assert_eq!(more.size(), 2);
        assert_eq!(more.without("pig").get_all().len(), 1);
        assert_eq!(more.as_mutable().as_immutable(), more);
    }
}

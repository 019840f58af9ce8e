//! Field container shapes accepted by the collection descriptors.
//!
//! Each shape exists in a mandatory form and an `Option`-wrapped form; the
//! wrapped form may be absent from the tree and is only materialized when
//! the tree provides it.

use std::collections::{BTreeMap, HashMap};

use crate::convert::FromTreeValue;
use crate::reader::Config;

/// A field bound with [`Reader::param_list`](crate::Reader::param_list).
pub trait ParamListTarget: 'static {
    type Element: FromTreeValue;
    const OPTIONAL: bool;

    fn replace(&mut self, values: Vec<Self::Element>);
}

impl<T: FromTreeValue + 'static> ParamListTarget for Vec<T> {
    type Element = T;
    const OPTIONAL: bool = false;

    fn replace(&mut self, values: Vec<T>) {
        *self = values;
    }
}

impl<T: FromTreeValue + 'static> ParamListTarget for Option<Vec<T>> {
    type Element = T;
    const OPTIONAL: bool = true;

    fn replace(&mut self, values: Vec<T>) {
        *self = Some(values);
    }
}

/// A string-keyed field bound with [`Reader::dict`](crate::Reader::dict).
pub trait DictTarget: 'static {
    type Value: FromTreeValue;
    const OPTIONAL: bool;

    fn replace(&mut self, entries: Vec<(String, Self::Value)>);
}

impl<T: FromTreeValue + 'static> DictTarget for BTreeMap<String, T> {
    type Value = T;
    const OPTIONAL: bool = false;

    fn replace(&mut self, entries: Vec<(String, T)>) {
        *self = entries.into_iter().collect();
    }
}

impl<T: FromTreeValue + 'static> DictTarget for HashMap<String, T> {
    type Value = T;
    const OPTIONAL: bool = false;

    fn replace(&mut self, entries: Vec<(String, T)>) {
        *self = entries.into_iter().collect();
    }
}

impl<T: FromTreeValue + 'static> DictTarget for Option<BTreeMap<String, T>> {
    type Value = T;
    const OPTIONAL: bool = true;

    fn replace(&mut self, entries: Vec<(String, T)>) {
        *self = Some(entries.into_iter().collect());
    }
}

impl<T: FromTreeValue + 'static> DictTarget for Option<HashMap<String, T>> {
    type Value = T;
    const OPTIONAL: bool = true;

    fn replace(&mut self, entries: Vec<(String, T)>) {
        *self = Some(entries.into_iter().collect());
    }
}

/// A sequence of nested configs bound with [`Reader::node_list`](crate::Reader::node_list).
pub trait NodeListTarget: 'static {
    type Element: Config;
    const OPTIONAL: bool;

    fn replace(&mut self, elements: Vec<Self::Element>);
}

impl<U: Config> NodeListTarget for Vec<U> {
    type Element = U;
    const OPTIONAL: bool = false;

    fn replace(&mut self, elements: Vec<U>) {
        *self = elements;
    }
}

impl<U: Config> NodeListTarget for Option<Vec<U>> {
    type Element = U;
    const OPTIONAL: bool = true;

    fn replace(&mut self, elements: Vec<U>) {
        *self = Some(elements);
    }
}

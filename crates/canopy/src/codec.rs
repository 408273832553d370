//! Name-keyed encode/decode of tree definitions.
//!
//! Every node writes its construction parameters under string keys into [`Params`]; the tree is
//! flattened into serde records ([`TreeRecord`] / [`NodeRecord`]) and stored as JSON. Run state
//! (indices, clocks) is never written: decoded trees must be `init`ed before stepping.

use std::collections::BTreeMap;
use std::fmt;

use canopy_core::WorldMut;
use serde::{Deserialize, Serialize};

use crate::{
    Behavior, BehaviorTree, CodecError, Decorator, Leaf, LeafNode, NodeKind, Parallel, Result,
    Sequence, Throttle,
};

/// A literal parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    /// JSON has no NaN or infinity; [`BehaviorTree::to_json`] rejects non-finite floats.
    Float(f64),
    Text(String),
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(f64::from(value))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

/// Conversion out of a [`ParamValue`] for [`Params::decode`].
pub trait FromParam: Sized {
    /// Human-readable type name used in error messages.
    const EXPECTED: &'static str;

    fn from_param(value: &ParamValue) -> Option<Self>;
}

impl FromParam for ParamValue {
    const EXPECTED: &'static str = "value";

    fn from_param(value: &ParamValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromParam for bool {
    const EXPECTED: &'static str = "bool";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromParam for u32 {
    const EXPECTED: &'static str = "unsigned 32-bit integer";

    fn from_param(value: &ParamValue) -> Option<Self> {
        i64::from_param(value).and_then(|i| u32::try_from(i).ok())
    }
}

impl FromParam for usize {
    const EXPECTED: &'static str = "index";

    fn from_param(value: &ParamValue) -> Option<Self> {
        i64::from_param(value).and_then(|i| usize::try_from(i).ok())
    }
}

impl FromParam for f64 {
    const EXPECTED: &'static str = "number";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromParam for f32 {
    const EXPECTED: &'static str = "number";

    fn from_param(value: &ParamValue) -> Option<Self> {
        f64::from_param(value).map(|f| f as f32)
    }
}

impl FromParam for String {
    const EXPECTED: &'static str = "string";

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Construction parameters of one node, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn encode(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.encode(key, value);
        self
    }

    pub fn decode<T: FromParam>(&self, key: &str) -> Result<T> {
        let value = self.0.get(key).ok_or_else(|| CodecError::MissingParam {
            key: key.to_owned(),
        })?;
        convert(key, value)
    }

    /// Like [`Params::decode`], but an absent key yields `default`. A present key of the wrong
    /// type is still an error.
    pub fn decode_or<T: FromParam>(&self, key: &str, default: T) -> Result<T> {
        match self.0.get(key) {
            Some(value) => convert(key, value),
            None => Ok(default),
        }
    }
}

fn convert<T: FromParam>(key: &str, value: &ParamValue) -> Result<T> {
    T::from_param(value).ok_or_else(|| CodecError::InvalidParam {
        key: key.to_owned(),
        expected: T::EXPECTED,
    })
}

/// Serialized form of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub kind: NodeKind,
    /// Leaf type tag (`Action` / `Condition` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            leaf: None,
            name: None,
            params: Params::new(),
            children: Vec::new(),
        }
    }
}

/// Serialized form of a whole tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeRecord>,
}

type LeafFactory<W> = Box<dyn Fn(&Params) -> Result<Box<dyn Leaf<W>>>>;

/// Maps leaf type tags to the factories that rebuild them from parameters.
pub struct LeafRegistry<W>
where
    W: WorldMut + 'static,
{
    factories: BTreeMap<String, LeafFactory<W>>,
}

impl<W> LeafRegistry<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry preloaded with [`crate::register_builtins`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::register_builtins(&mut registry);
        registry
    }

    /// Register (or replace) the factory for `tag`.
    pub fn register<L, F>(&mut self, tag: impl Into<String>, factory: F) -> &mut Self
    where
        L: Leaf<W>,
        F: Fn(&Params) -> Result<L> + 'static,
    {
        self.factories.insert(
            tag.into(),
            Box::new(move |params: &Params| {
                factory(params).map(|leaf| Box::new(leaf) as Box<dyn Leaf<W>>)
            }),
        );
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn build(&self, tag: &str, params: &Params) -> Result<Box<dyn Leaf<W>>> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| CodecError::UnknownLeaf(tag.to_owned()))?;
        factory(params)
    }
}

impl<W> Default for LeafRegistry<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for LeafRegistry<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl<W> Behavior<W>
where
    W: WorldMut + 'static,
{
    pub fn encode(&self) -> NodeRecord {
        let mut record = NodeRecord::new(self.kind());
        match self {
            Behavior::Action(leaf) | Behavior::Condition(leaf) => {
                record.leaf = Some(leaf.type_tag().to_owned());
                record.name = Some(leaf.name().to_owned());
                record.params = leaf.encode_params();
            }
            Behavior::Throttle(t) => {
                record.params.encode("timeout", t.timeout());
            }
            _ => {}
        }
        record.children = self.children().into_iter().map(Behavior::encode).collect();
        record
    }

    pub fn decode(record: &NodeRecord, registry: &LeafRegistry<W>) -> Result<Self> {
        let kind = record.kind;
        match kind {
            NodeKind::Action | NodeKind::Condition => {
                expect_at_most(record, 0)?;
                let tag = record
                    .leaf
                    .as_deref()
                    .ok_or(CodecError::MissingLeafTag { kind })?;
                let leaf = registry.build(tag, &record.params)?;
                let node = LeafNode::from_boxed(record.name.clone().unwrap_or_default(), leaf);
                Ok(if kind == NodeKind::Action {
                    Behavior::Action(node)
                } else {
                    Behavior::Condition(node)
                })
            }
            NodeKind::Sequence => Ok(Behavior::Sequence(Sequence::new(decode_children(
                record, registry,
            )?))),
            NodeKind::Parallel => Ok(Behavior::Parallel(Parallel::new(decode_children(
                record, registry,
            )?))),
            NodeKind::Inverter => Ok(Behavior::Inverter(decode_decorator(record, registry)?)),
            NodeKind::Succeeder => Ok(Behavior::Succeeder(decode_decorator(record, registry)?)),
            NodeKind::RepeatUntilFail => Ok(Behavior::RepeatUntilFail(decode_decorator(
                record, registry,
            )?)),
            NodeKind::RepeatUntilSuccess => Ok(Behavior::RepeatUntilSuccess(decode_decorator(
                record, registry,
            )?)),
            NodeKind::Throttle => {
                let timeout: f32 = record.params.decode("timeout")?;
                let inner = decode_decorator(record, registry)?;
                Ok(Behavior::Throttle(Throttle::with_decorator(timeout, inner)))
            }
        }
    }
}

fn expect_at_most(record: &NodeRecord, max: usize) -> Result<()> {
    if record.children.len() > max {
        return Err(CodecError::TooManyChildren {
            kind: record.kind,
            max,
            got: record.children.len(),
        });
    }
    Ok(())
}

fn ensure_finite(record: &NodeRecord) -> Result<()> {
    for (key, value) in record.params.iter() {
        if let ParamValue::Float(f) = value {
            if !f.is_finite() {
                return Err(CodecError::NonFiniteParam {
                    key: key.to_owned(),
                });
            }
        }
    }
    record.children.iter().try_for_each(ensure_finite)
}

fn decode_children<W>(record: &NodeRecord, registry: &LeafRegistry<W>) -> Result<Vec<Behavior<W>>>
where
    W: WorldMut + 'static,
{
    record
        .children
        .iter()
        .map(|child| Behavior::decode(child, registry))
        .collect()
}

fn decode_decorator<W>(record: &NodeRecord, registry: &LeafRegistry<W>) -> Result<Decorator<W>>
where
    W: WorldMut + 'static,
{
    expect_at_most(record, 1)?;
    match record.children.first() {
        Some(child) => Ok(Decorator::new(Behavior::decode(child, registry)?)),
        None => Ok(Decorator::empty()),
    }
}

impl<W> BehaviorTree<W>
where
    W: WorldMut + 'static,
{
    pub fn encode(&self) -> TreeRecord {
        TreeRecord {
            name: self.name().to_owned(),
            root: self.root().map(Behavior::encode),
        }
    }

    pub fn decode(record: &TreeRecord, registry: &LeafRegistry<W>) -> Result<Self> {
        let root = record
            .root
            .as_ref()
            .map(|root| Behavior::decode(root, registry))
            .transpose()?;
        Ok(BehaviorTree::from_parts(record.name.clone(), root))
    }

    pub fn to_json(&self) -> Result<String> {
        let record = self.encode();
        if let Some(root) = &record.root {
            ensure_finite(root)?;
        }
        Ok(serde_json::to_string_pretty(&record)?)
    }

    pub fn from_json(json: &str, registry: &LeafRegistry<W>) -> Result<Self> {
        let record: TreeRecord = serde_json::from_str(json)?;
        Self::decode(&record, registry)
    }
}

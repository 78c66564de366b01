//! Property aggregation
//!
//! When nodes are collapsed or edges are combined, the new object gets
//! properties computed from its members. An [`AggregatorTable`] maps each
//! output property name to an [`Aggregator`], which is either applied to the
//! member objects themselves or to one property extracted from every member.
//!
//! Numeric reducers coerce their inputs with [`float_or_nan`]: values that are
//! not numbers become NaN and propagate through `sum`/`max` instead of
//! failing. JSON has no NaN, so a NaN result is stored as `null`, which
//! coerces back to NaN when a later stage aggregates it again.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::graph::{Edge, Node, Properties};
use crate::keys;
use crate::Result;

pub type CustomReducer = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Reduction of an ordered list of values to one value.
#[derive(Clone)]
pub enum Reducer {
    /// Numeric sum; stays integral while every input is an integer.
    Sum,
    /// Numeric maximum; any NaN input makes the result NaN.
    Max,
    Count,
    First,
    /// Display form of every value joined by a separator.
    Join(String),
    Custom(CustomReducer),
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Sum => write!(f, "Sum"),
            Reducer::Max => write!(f, "Max"),
            Reducer::Count => write!(f, "Count"),
            Reducer::First => write!(f, "First"),
            Reducer::Join(sep) => write!(f, "Join({:?})", sep),
            Reducer::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Reducer {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Reducer::Custom(Arc::new(f))
    }

    pub fn reduce(&self, values: &[Value]) -> Value {
        match self {
            Reducer::Sum => sum(values),
            Reducer::Max => max(values),
            Reducer::Count => Value::from(values.len()),
            Reducer::First => values.first().cloned().unwrap_or(Value::Null),
            Reducer::Join(sep) => Value::String(
                values
                    .iter()
                    .map(display_value)
                    .collect::<Vec<_>>()
                    .join(sep),
            ),
            Reducer::Custom(f) => f(values),
        }
    }
}

/// Coerce a property value to a float; anything that is not a number (or a
/// string holding one) becomes NaN.
pub fn float_or_nan(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

/// JSON form of a float; NaN and infinities become `null`.
pub fn number_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn integers(values: &[Value]) -> Option<Vec<i64>> {
    values.iter().map(Value::as_i64).collect()
}

fn sum(values: &[Value]) -> Value {
    if let Some(ints) = integers(values) {
        if let Some(total) = ints.iter().try_fold(0i64, |acc, v| acc.checked_add(*v)) {
            return Value::from(total);
        }
    }
    number_value(values.iter().map(float_or_nan).sum())
}

fn max(values: &[Value]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }
    if let Some(ints) = integers(values) {
        return ints.into_iter().max().map(Value::from).unwrap_or(Value::Null);
    }
    // f64::max skips NaN, so propagate it explicitly.
    let mut result = f64::NEG_INFINITY;
    for v in values.iter().map(float_or_nan) {
        if v.is_nan() {
            return Value::Null;
        }
        result = result.max(v);
    }
    number_value(result)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Objects that can be collapsed or combined.
pub trait Aggregate: Serialize {
    fn properties(&self) -> &Properties;
}

impl Aggregate for Node {
    fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl Aggregate for Edge {
    fn properties(&self) -> &Properties {
        &self.properties
    }
}

#[derive(Debug, Clone)]
pub enum Aggregator {
    /// Reduce the member objects themselves (serialized to JSON).
    Direct(Reducer),
    /// Reduce the values of one property of every member, in member order.
    /// A member without the property contributes `null`.
    FromProperty(Reducer, String),
}

impl Aggregator {
    pub fn direct(reducer: Reducer) -> Self {
        Aggregator::Direct(reducer)
    }

    pub fn from_property(reducer: Reducer, key: impl Into<String>) -> Self {
        Aggregator::FromProperty(reducer, key.into())
    }

    pub fn apply<T: Aggregate>(&self, objects: &[T]) -> Result<Value> {
        match self {
            Aggregator::Direct(Reducer::Count) => Ok(Value::from(objects.len())),
            Aggregator::Direct(reducer) => {
                let values = objects
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(reducer.reduce(&values))
            }
            Aggregator::FromProperty(reducer, key) => {
                let values: Vec<Value> = objects
                    .iter()
                    .map(|o| o.properties().get(key).cloned().unwrap_or(Value::Null))
                    .collect();
                Ok(reducer.reduce(&values))
            }
        }
    }
}

/// Output property name -> aggregator, applied in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AggregatorTable {
    entries: IndexMap<String, Aggregator>,
}

impl AggregatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, aggregator: Aggregator) -> Self {
        self.insert(name, aggregator);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, aggregator: Aggregator) -> Option<Aggregator> {
        self.entries.insert(name.into(), aggregator)
    }

    pub fn get(&self, name: &str) -> Option<&Aggregator> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Aggregator)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute every aggregate property over `objects`.
    pub fn aggregate<T: Aggregate>(&self, objects: &[T]) -> Result<Properties> {
        let mut properties = Properties::new();
        for (name, aggregator) in &self.entries {
            properties.insert(name.clone(), aggregator.apply(objects)?);
        }
        Ok(properties)
    }

    /// Netboxes -> room: peak load, member count, and the room name.
    pub fn rooms() -> Self {
        Self::new()
            .with(keys::NAME, Aggregator::from_property(Reducer::First, keys::ROOM))
            .with(keys::LOAD, Aggregator::from_property(Reducer::Max, keys::LOAD))
            .with(keys::NUM_NETBOXES, Aggregator::direct(Reducer::Count))
    }

    /// Rooms -> place: peak load, room count, total netbox count.
    pub fn places() -> Self {
        Self::new()
            .with(keys::LOAD, Aggregator::from_property(Reducer::Max, keys::LOAD))
            .with(keys::NUM_ROOMS, Aggregator::direct(Reducer::Count))
            .with(
                keys::NUM_NETBOXES,
                Aggregator::from_property(Reducer::Sum, keys::NUM_NETBOXES),
            )
    }

    /// Parallel edges -> one edge: summed capacity and traffic.
    pub fn edges() -> Self {
        Self::new()
            .with(keys::SPEED, Aggregator::from_property(Reducer::Sum, keys::SPEED))
            .with(keys::LOAD_IN, Aggregator::from_property(Reducer::Sum, keys::LOAD_IN))
            .with(keys::LOAD_OUT, Aggregator::from_property(Reducer::Sum, keys::LOAD_OUT))
    }
}

/// The aggregator tables used by the pipeline stages, built once by the
/// driver and handed to each stage explicitly.
#[derive(Debug, Clone)]
pub struct Presets {
    pub rooms: AggregatorTable,
    pub places: AggregatorTable,
    pub edges: AggregatorTable,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            rooms: AggregatorTable::rooms(),
            places: AggregatorTable::places(),
            edges: AggregatorTable::edges(),
        }
    }
}

//! Topic projections: which topics a check needs and how each is resampled.

use super::table::ColumnKey;

/// How a field is carried onto the common timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplePolicy {
    /// Linear interpolation between samples (default)
    Linear,

    /// Hold the last sample until the next update
    ZeroOrderHold,

    /// Value only at rows where the topic published, NaN elsewhere
    NanFill,
}

/// A topic plus the fields a policy applies to; no fields means all of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFields {
    pub topic: String,
    pub fields: Vec<String>,
}

impl TopicFields {
    pub fn new(topic: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            topic: topic.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Policy for every field of the topic
    pub fn all(topic: impl Into<String>) -> Self {
        Self::new(topic, &[])
    }

    fn covers(&self, topic: &str, field: &str) -> bool {
        self.topic == topic && (self.fields.is_empty() || self.fields.iter().any(|f| f == field))
    }
}

/// The set of topics a check asks the loader for
///
/// # Examples
///
/// ```
/// use ulg_checks::dataframe::{ColumnKey, ResamplePolicy, TopicFields, TopicProjection};
///
/// let projection = TopicProjection::new(["vehicle_attitude_setpoint", "vehicle_status"])
///     .with_zoh(TopicFields::all("vehicle_status"))
///     .require(ColumnKey::new("vehicle_status", 0, "nav_state"));
///
/// assert_eq!(projection.policy("vehicle_status", "nav_state"), ResamplePolicy::ZeroOrderHold);
/// assert_eq!(projection.policy("vehicle_attitude_setpoint", "q_d[0]"), ResamplePolicy::Linear);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicProjection {
    /// Topic names, in request order
    pub topics: Vec<String>,

    /// Zero-order-hold topics
    pub zoh: Vec<TopicFields>,

    /// NaN-fill topics
    pub nan: Vec<TopicFields>,

    /// Columns that must exist once the table is built
    pub required: Vec<ColumnKey>,
}

impl TopicProjection {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_zoh(mut self, topic: TopicFields) -> Self {
        self.zoh.push(topic);
        self
    }

    pub fn with_nan(mut self, topic: TopicFields) -> Self {
        self.nan.push(topic);
        self
    }

    pub fn require(mut self, key: ColumnKey) -> Self {
        self.required.push(key);
        self
    }

    /// Resampling policy of one field; NaN fill wins over zero-order hold
    pub fn policy(&self, topic: &str, field: &str) -> ResamplePolicy {
        if self.nan.iter().any(|t| t.covers(topic, field)) {
            ResamplePolicy::NanFill
        } else if self.zoh.iter().any(|t| t.covers(topic, field)) {
            ResamplePolicy::ZeroOrderHold
        } else {
            ResamplePolicy::Linear
        }
    }
}

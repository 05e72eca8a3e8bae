//! Human-readable forms of locations.
//!
//! These strings end up in design space documents and log output, so the
//! number formatting is fixed: integral values print without decimals, other
//! values with three decimals, split values as a parenthesized pair.

use serde::Serialize;
use std::fmt;
use tracing::error;

use super::{AxisPlacement, AxisValue, Location};

/// One row of [`Location::as_sorted_string_dict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisString {
    pub axis: String,
    pub value: String,
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        if value == 0.0 {
            // no "-0"
            "0".to_string()
        } else {
            format!("{:.0}", value)
        }
    } else if value.is_finite() {
        format!("{:.3}", value)
    } else {
        format!("{}", value)
    }
}

/// Format a coordinate compactly. `None` renders as `"None"`.
///
/// ```
/// use mutator_math::{number_to_string, AxisValue};
///
/// assert_eq!(number_to_string(Some(AxisValue::Scalar(1.0))), "1");
/// assert_eq!(number_to_string(Some(AxisValue::Scalar(0.25))), "0.250");
/// assert_eq!(number_to_string(Some(AxisValue::Split(0.0, 1.0))), "(0,1)");
/// assert_eq!(number_to_string(None), "None");
/// ```
pub fn number_to_string(value: Option<AxisValue>) -> String {
    match value {
        None => "None".to_string(),
        Some(AxisValue::Scalar(v)) => format_number(v),
        Some(AxisValue::Split(x, y)) => format!("({},{})", format_number(x), format_number(y)),
    }
}

impl Location {
    /// The location as `axis:value` pairs, or `"origin"` when empty.
    ///
    /// A coordinate that is not a finite number is logged with its axis and
    /// the whole string becomes `"error"`.
    pub fn as_string(&self) -> String {
        if self.is_empty() {
            return "origin".to_string();
        }
        let mut parts = Vec::with_capacity(self.len());
        for (name, value) in self.iter() {
            if !value.is_finite() {
                error!(
                    axis = name,
                    value = ?value,
                    location = ?self.axes,
                    "Location value error"
                );
                return "error".to_string();
            }
            let s = match *value {
                AxisValue::Split(x, y) => format!("({:.3},{:.3})", x, y),
                AxisValue::Scalar(v) => format_number(v),
            };
            parts.push(format!("{}:{}", name, s));
        }
        parts.join(", ")
    }

    /// Rows of axis name and formatted value, sorted by axis name.
    pub fn as_sorted_string_dict(&self) -> Vec<AxisString> {
        self.iter()
            .map(|(name, value)| AxisString {
                axis: name.to_string(),
                value: number_to_string(Some(*value)),
            })
            .collect()
    }

    /// Describe the kind of location: origin, on-axis or off-axis, and split.
    pub fn get_type(&self, short: bool) -> String {
        if self.is_origin() {
            return "origin".to_string();
        }
        let mut t = Vec::new();
        match self.is_on_axis() {
            AxisPlacement::OffAxis if short => t.push("off-axis".to_string()),
            AxisPlacement::OffAxis => {
                t.push(format!("off-axis, {}", self.get_active_axes().join(" ")))
            }
            _ if short => t.push("on-axis".to_string()),
            placement => t.push(format!("on-axis, {}", placement.axis().unwrap_or_default())),
        }
        if self.is_ambivalent() {
            t.push("split".to_string());
        }
        t.join(", ")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Location {} >", self.as_string())
    }
}

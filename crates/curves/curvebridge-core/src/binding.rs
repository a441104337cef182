//! Channel bindings: which source property (and which axis of it) drives a
//! scalar target parameter.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelBinding {
    /// Source property name (e.g. `"Lcl Translation"`).
    pub channel_name: String,
    /// Axis of a vector property; `0` for scalars.
    pub axis_index: usize,
    /// `true` when the property is a vector with one curve per axis.
    pub multi_channel: bool,
}

impl ChannelBinding {
    pub fn scalar(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            axis_index: 0,
            multi_channel: false,
        }
    }

    pub fn axis(channel_name: impl Into<String>, axis_index: usize) -> Self {
        Self {
            channel_name: channel_name.into(),
            axis_index,
            multi_channel: true,
        }
    }
}

//! @ai:module:intent Parameter overrides and their expansion into isolated sweep points
//! @ai:module:layer domain
//! @ai:module:public_api ParamOverride, expand
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::spec::{ParamValue, ParameterSet};
use std::str::FromStr;

/// @ai:intent `key=v1[,v2...]` override of one benchmark parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamOverride {
    pub name: String,
    pub values: Vec<ParamValue>,
}

impl FromStr for ParamOverride {
    type Err = Error;

    /// @ai:example ("size=100") -> size: [100]
    /// @ai:example ("size=100,1000") -> size: [100, 1000]
    fn from_str(raw: &str) -> Result<Self> {
        let (name, values) = raw
            .split_once('=')
            .ok_or_else(|| Error::InvalidOverride(raw.to_string()))?;

        let name = name.trim();

        if name.is_empty() || values.trim().is_empty() {
            return Err(Error::InvalidOverride(raw.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            values: values.split(',').map(ParamValue::parse).collect(),
        })
    }
}

/// @ai:intent Cartesian product of the overrides applied to `base`, first override varying slowest
/// @ai:pre every override names a declared parameter
/// @ai:post without overrides the result is exactly `[base]`
/// @ai:effects pure
pub fn expand(base: &ParameterSet, overrides: &[ParamOverride]) -> Result<Vec<ParameterSet>> {
    let mut points = vec![base.clone()];

    for param in overrides {
        if !base.contains(&param.name) {
            return Err(Error::UnknownParameter(param.name.clone()));
        }

        points = points
            .into_iter()
            .flat_map(|point| {
                param.values.iter().map(move |value| {
                    let mut next = point.clone();
                    next.insert(param.name.clone(), value.clone());
                    next
                })
            })
            .collect();
    }

    Ok(points)
}

//! Merges pre-loaded REG-Conditional installation parameters into
//! registration requests, so every device carries the parameter set the
//! reference boundary model needs.

use ahash::AHashMap;
use thiserror::Error;

use crate::error::ScenarioError;
use crate::records::{ConditionalRecord, DeviceKey, DeviceRecord, InstallationField};

/// Why a device could not be reconciled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("no REG-Conditional data for device ({device}); load the correct REG-Conditional data for the device")]
    NoConditional { device: String },

    #[error("{count} REG-Conditional records match device ({device})")]
    AmbiguousConditional { device: String, count: usize },

    #[error("installationParam object is not found in REG-Conditional for device ({device})")]
    MissingInstallationParam { device: String },

    #[error("REG-Conditional parameter(s) {} not found in installationParam {seen} for device ({device})", join(.missing))]
    IncompleteConditional {
        device: String,
        missing: Vec<&'static str>,
        seen: String,
    },

    #[error("parameter(s) {} not found in installationParam {seen} of category {category} device ({device})", join(.missing))]
    IncompleteInline {
        device: String,
        category: String,
        missing: Vec<&'static str>,
        seen: String,
    },
}

impl ReconcileError {
    /// Names of the fields that were absent, if any.
    pub fn missing(&self) -> &[&'static str] {
        match self {
            Self::IncompleteConditional { missing, .. } | Self::IncompleteInline { missing, .. } => missing,
            _ => &[],
        }
    }
}

impl From<ReconcileError> for ScenarioError {
    fn from(err: ReconcileError) -> Self {
        ScenarioError::Configuration(err.to_string())
    }
}

fn join(names: &[&'static str]) -> String {
    names.join(", ")
}

/// Result of looking a device up in a [`ConditionalIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a ConditionalRecord),
    NotFound,
    Ambiguous(usize),
}

/// REG-Conditional records indexed by (FCC ID, serial number), built once.
#[derive(Debug, Default)]
pub struct ConditionalIndex<'a> {
    by_key: AHashMap<DeviceKey<'a>, Vec<&'a ConditionalRecord>>,
}

impl<'a> ConditionalIndex<'a> {
    pub fn new(records: &'a [ConditionalRecord]) -> Self {
        let mut by_key: AHashMap<DeviceKey<'a>, Vec<&'a ConditionalRecord>> = AHashMap::with_capacity(records.len());
        for record in records {
            by_key.entry(record.key()).or_default().push(record);
        }
        Self { by_key }
    }

    pub fn lookup(&self, key: &DeviceKey<'a>) -> Lookup<'a> {
        match self.by_key.get(key).map(Vec::as_slice) {
            None | Some([]) => Lookup::NotFound,
            Some([record]) => Lookup::Found(*record),
            Some(records) => Lookup::Ambiguous(records.len()),
        }
    }
}

/// Return a copy of `requests` in which every device carries the full
/// required installation parameter set.
///
/// Devices without installation parameters take them, along with their
/// category, from the unique matching REG-Conditional record. Devices that
/// already carry parameters are only checked. Neither input is retained.
pub fn reconcile(
    requests: &[DeviceRecord],
    conditionals: &[ConditionalRecord],
) -> Result<Vec<DeviceRecord>, ReconcileError> {
    let index = ConditionalIndex::new(conditionals);
    requests.iter()
        .map(|device| reconcile_device(device, &index))
        .collect()
}

fn reconcile_device(device: &DeviceRecord, index: &ConditionalIndex<'_>) -> Result<DeviceRecord, ReconcileError> {
    let key = device.key();

    if let Some(param) = &device.installation_param {
        let missing = param.missing_fields();
        if !missing.is_empty() {
            return Err(ReconcileError::IncompleteInline {
                device: key.to_string(),
                category: device.cbsd_category.map_or_else(|| "unspecified".to_string(), |c| c.to_string()),
                missing: names(&missing),
                seen: param.describe(),
            });
        }
        return Ok(device.clone());
    }

    let conditional = match index.lookup(&key) {
        Lookup::Found(record) => record,
        Lookup::NotFound => return Err(ReconcileError::NoConditional { device: key.to_string() }),
        Lookup::Ambiguous(count) => {
            return Err(ReconcileError::AmbiguousConditional { device: key.to_string(), count });
        }
    };

    let param = conditional.installation_param.as_ref()
        .ok_or_else(|| ReconcileError::MissingInstallationParam { device: key.to_string() })?;

    let mut missing = names(&param.missing_fields());
    if conditional.cbsd_category.is_none() {
        missing.push("cbsdCategory");
    }
    if !missing.is_empty() {
        return Err(ReconcileError::IncompleteConditional {
            device: key.to_string(),
            missing,
            seen: param.describe(),
        });
    }

    tracing::debug!(device = %key, "installation parameters taken from REG-Conditional");
    let mut merged = device.clone();
    merged.installation_param = Some(param.required_subset());
    merged.cbsd_category = conditional.cbsd_category;
    Ok(merged)
}

fn names(fields: &[InstallationField]) -> Vec<&'static str> {
    fields.iter().map(InstallationField::as_str).collect()
}

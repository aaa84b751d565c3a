//! Metric key → sensor lookup table consumed by rendering.

use std::collections::BTreeMap;

use serde::Serialize;

use super::provider::{SensorCategory, SensorDescriptor, SensorKind};

/// Where a metric key reads its value from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorRef {
    pub sensor_id: String,
    pub category: SensorCategory,
    pub name: String,
}

/// Immutable once built. A reload publishes a whole new map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SensorMap {
    entries: BTreeMap<String, SensorRef>,
}

fn sanitize(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Package-level CPU temperatures win over per-core ones for `CPU.Temp`
fn is_preferred_cpu_temp(sensor: &SensorDescriptor) -> bool {
    let name = sensor.name.to_lowercase();
    name.contains("package") || name.contains("tctl") || name.contains("tdie")
}

impl SensorMap {
    /// Build a map from a provider's full sensor enumeration.
    ///
    /// Each `(category, kind)` pair gets one `<CAT>.<Kind>` key (first sensor in
    /// enumeration order wins, except preferred CPU package temperatures), and
    /// every temperature sensor also gets a `TEMP.<name>` key.
    pub fn build(sensors: &[SensorDescriptor]) -> Self {
        let mut entries = BTreeMap::new();

        for sensor in sensors {
            let sensor_ref = SensorRef {
                sensor_id: sensor.id.clone(),
                category: sensor.category,
                name: sensor.name.clone(),
            };

            let key = format!(
                "{}.{}",
                sensor.category.key_prefix(),
                sensor.kind.key_suffix()
            );
            let prefer = sensor.category == SensorCategory::Cpu
                && sensor.kind == SensorKind::Temperature
                && is_preferred_cpu_temp(sensor);
            if prefer || !entries.contains_key(&key) {
                entries.insert(key, sensor_ref.clone());
            }

            if sensor.kind == SensorKind::Temperature {
                entries
                    .entry(format!("TEMP.{}", sanitize(&sensor.name)))
                    .or_insert(sensor_ref);
            }
        }

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&SensorRef> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SensorRef)> {
        self.entries.iter()
    }
}

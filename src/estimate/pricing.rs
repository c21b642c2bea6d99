use std::collections::HashMap;

use crate::error::EstimateError;

/// Credits consumed per minute, keyed by executor then resource class.
///
/// Built once at startup and shared read-only; pass a custom table to
/// [`PricingTable::from_rates`] to price against different numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    rates: HashMap<String, HashMap<String, f64>>,
}

impl PricingTable {
    pub fn from_rates(rates: HashMap<String, HashMap<String, f64>>) -> Self {
        Self { rates }
    }

    /// Overlay `overrides` on this table, adding executors and classes as needed.
    pub fn merged_with(mut self, overrides: &HashMap<String, HashMap<String, f64>>) -> Self {
        for (executor, classes) in overrides {
            let entry = self.rates.entry(executor.clone()).or_default();
            for (class, rate) in classes {
                entry.insert(class.clone(), *rate);
            }
        }
        self
    }

    /// Resolve the credit rate for a job's executor and resource class.
    ///
    /// An unknown executor means the table itself is stale; a known executor
    /// without the class is reported against the job that used it.
    pub fn credits_per_minute(
        &self,
        executor: &str,
        resource_class: &str,
        job: &str,
    ) -> Result<f64, EstimateError> {
        let classes = self
            .rates
            .get(executor)
            .ok_or_else(|| EstimateError::MissingExecutor {
                executor: executor.to_string(),
                job: job.to_string(),
            })?;
        classes
            .get(resource_class)
            .copied()
            .ok_or_else(|| EstimateError::MissingResourceClass {
                executor: executor.to_string(),
                resource_class: resource_class.to_string(),
                job: job.to_string(),
            })
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        let table: &[(&str, &[(&str, f64)])] = &[
            (
                "docker",
                &[
                    ("small", 5.0),
                    ("medium", 10.0),
                    ("medium+", 15.0),
                    ("large", 20.0),
                    ("xlarge", 40.0),
                    ("2xlarge", 80.0),
                    ("2xlarge+", 100.0),
                    ("3xlarge", 160.0),
                    ("4xlarge", 320.0),
                ],
            ),
            (
                "machine",
                &[
                    ("small", 5.0),
                    ("medium", 10.0),
                    ("large", 20.0),
                    ("xlarge", 40.0),
                    ("2xlarge", 80.0),
                    ("3xlarge", 120.0),
                ],
            ),
            ("macos", &[("medium", 50.0), ("large", 100.0)]),
            (
                "windows",
                &[
                    ("medium", 40.0),
                    ("large", 120.0),
                    ("xlarge", 210.0),
                    ("2xlarge", 500.0),
                ],
            ),
            // Known executor, no published rates yet.
            ("gpu", &[]),
        ];

        let rates = table
            .iter()
            .map(|(executor, classes)| {
                let classes = classes
                    .iter()
                    .map(|(class, rate)| (class.to_string(), *rate))
                    .collect();
                (executor.to_string(), classes)
            })
            .collect();
        Self::from_rates(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn docker_2xlarge_plus_is_100() {
        let rate = PricingTable::default()
            .credits_per_minute("docker", "2xlarge+", "job")
            .unwrap();
        assert_eq!(rate, 100.0);
    }

    #[test]
    fn unknown_executor_is_missing_executor() {
        let err = PricingTable::default()
            .credits_per_minute("watson", "qubit.large", "job")
            .unwrap_err();
        assert!(matches!(
            &err,
            EstimateError::MissingExecutor { executor, job } if executor == "watson" && job == "job"
        ));
        assert_eq!(err.kind(), ErrorKind::PricingGap);
    }

    #[test]
    fn unknown_class_is_missing_resource_class() {
        let err = PricingTable::default()
            .credits_per_minute("macos", "mac128k", "job")
            .unwrap_err();
        assert!(matches!(
            &err,
            EstimateError::MissingResourceClass { executor, resource_class, job }
                if executor == "macos" && resource_class == "mac128k" && job == "job"
        ));
    }

    #[test]
    fn gpu_is_known_but_unpriced() {
        let err = PricingTable::default()
            .credits_per_minute("gpu", "gpu.nvidia.small", "train")
            .unwrap_err();
        assert!(matches!(
            &err,
            EstimateError::MissingResourceClass { executor, resource_class, .. }
                if executor == "gpu" && resource_class == "gpu.nvidia.small"
        ));
        assert!(!err.to_string().contains("maintainer"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = PricingTable::default();
        assert!(table.credits_per_minute("Docker", "medium", "j").is_err());
        assert!(table.credits_per_minute("docker", "Medium", "j").is_err());
    }

    #[test]
    fn injected_table_replaces_defaults() {
        let mut classes = HashMap::new();
        classes.insert("tiny".to_string(), 1.5);
        let mut rates = HashMap::new();
        rates.insert("docker".to_string(), classes);
        let table = PricingTable::from_rates(rates);

        assert_eq!(table.credits_per_minute("docker", "tiny", "j").unwrap(), 1.5);
        assert!(matches!(
            table.credits_per_minute("docker", "medium", "j"),
            Err(EstimateError::MissingResourceClass { .. })
        ));
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let overrides: HashMap<String, HashMap<String, f64>> =
            toml::from_str("[docker]\nmedium = 12.0\n[gpu]\n\"gpu.nvidia.small\" = 160.0\n")
                .unwrap();
        let table = PricingTable::default().merged_with(&overrides);

        assert_eq!(table.credits_per_minute("docker", "medium", "j").unwrap(), 12.0);
        assert_eq!(table.credits_per_minute("docker", "large", "j").unwrap(), 20.0);
        assert_eq!(
            table.credits_per_minute("gpu", "gpu.nvidia.small", "j").unwrap(),
            160.0
        );
    }
}

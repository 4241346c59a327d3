//! Routing table compilation.
//!
//! # Responsibilities
//! - Validate the operator's flavor declarations
//! - Expand every flavor's labels into all non-empty subsets
//! - Resolve overlapping subsets in declaration order
//!
//! # Design Decisions
//! - A job may send any subset of a flavor's labels and still reach it
//! - First-declared flavor wins a subset claimed by several flavors
//! - Expansion costs 2^k keys per flavor, so k is capped
//! - Ignored labels are stripped before expansion and never count towards k

use std::collections::{HashMap, HashSet};

use crate::config::schema::RoutingConfig;
use crate::routing::error::ConfigurationError;
use crate::routing::flavor::Flavor;
use crate::routing::labels::{normalize, Label, LabelSet};
use crate::routing::matcher::RoutingTable;

/// Default cap on canonical labels per flavor (4095 keys).
pub const DEFAULT_MAX_LABELS_PER_FLAVOR: usize = 12;

/// Highest accepted value for the label cap (about a million keys).
pub const MAX_LABELS_CEILING: usize = 20;

/// Ordered flavor → labels declarations, as written by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlavorLabelsMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl FlavorLabelsMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a flavor declaration, builder style.
    pub fn with_flavor<I>(mut self, flavor: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.push(flavor, labels);
        self
    }

    /// Append a flavor declaration.
    pub fn push<I>(&mut self, flavor: impl Into<String>, labels: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.entries
            .push((flavor.into(), labels.into_iter().map(Into::into).collect()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(flavor, labels)| (flavor.as_str(), labels.as_slice()))
    }
}

impl<F, I> FromIterator<(F, I)> for FlavorLabelsMapping
where
    F: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (F, I)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (flavor, labels) in iter {
            mapping.push(flavor, labels);
        }
        mapping
    }
}

/// Compiles a [`FlavorLabelsMapping`] into an immutable [`RoutingTable`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    mapping: FlavorLabelsMapping,
    default_flavor: Option<String>,
    ignore_labels: LabelSet,
    max_labels_per_flavor: usize,
}

impl TableBuilder {
    pub fn new(mapping: FlavorLabelsMapping) -> Self {
        Self {
            mapping,
            default_flavor: None,
            ignore_labels: LabelSet::new(),
            max_labels_per_flavor: DEFAULT_MAX_LABELS_PER_FLAVOR,
        }
    }

    /// Create a builder from the `[routing]` config section.
    pub fn from_config(config: &RoutingConfig) -> Self {
        let mapping = config
            .flavors
            .iter()
            .map(|f| (f.name.clone(), f.labels.clone()))
            .collect();

        let mut builder = Self::new(mapping)
            .ignore_labels(&config.ignore_labels)
            .max_labels_per_flavor(config.max_labels_per_flavor);
        if let Some(default) = &config.default_flavor {
            builder = builder.default_flavor(default.clone());
        }
        builder
    }

    /// Flavor returned for an empty label set.
    ///
    /// Must be one of the declared flavors. When unset, the first declared
    /// flavor is used.
    pub fn default_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.default_flavor = Some(flavor.into());
        self
    }

    /// Labels that carry no routing intent (e.g. `self-hosted`, `linux`).
    pub fn ignore_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ignore_labels = normalize(labels);
        self
    }

    pub fn max_labels_per_flavor(mut self, limit: usize) -> Self {
        self.max_labels_per_flavor = limit;
        self
    }

    /// Validate the declarations and expand them into a routing table.
    pub fn build(self) -> Result<RoutingTable, ConfigurationError> {
        if self.max_labels_per_flavor > MAX_LABELS_CEILING {
            return Err(ConfigurationError::LabelLimitTooHigh {
                limit: self.max_labels_per_flavor,
                ceiling: MAX_LABELS_CEILING,
            });
        }
        if self.mapping.is_empty() {
            return Err(ConfigurationError::EmptyMapping);
        }

        let mut declared: Vec<Flavor> = Vec::with_capacity(self.mapping.len());
        let mut seen: HashSet<Flavor> = HashSet::with_capacity(self.mapping.len());
        let mut entries: HashMap<Box<[Label]>, Flavor> = HashMap::new();

        for (name, labels) in self.mapping.iter() {
            let flavor = Flavor::parse(name)?;
            if !seen.insert(flavor.clone()) {
                return Err(ConfigurationError::DuplicateFlavor(name.to_string()));
            }

            // BTreeSet iteration is sorted, so this is the canonical order.
            let canonical: Vec<Label> = normalize(labels)
                .into_iter()
                .filter(|label| !self.ignore_labels.contains(label))
                .collect();
            if canonical.len() > self.max_labels_per_flavor {
                return Err(ConfigurationError::TooManyLabels {
                    flavor: name.to_string(),
                    count: canonical.len(),
                    limit: self.max_labels_per_flavor,
                });
            }

            let before = entries.len();
            for key in non_empty_subsets(&canonical) {
                entries.entry(key).or_insert_with(|| flavor.clone());
            }
            let claimed = entries.len() - before;
            let shadowed = (1usize << canonical.len()) - 1 - claimed;
            if shadowed > 0 {
                tracing::debug!(
                    flavor = %flavor,
                    shadowed,
                    "Label combinations already claimed by an earlier flavor"
                );
            }
            tracing::debug!(flavor = %flavor, labels = canonical.len(), claimed, "Expanded flavor");

            declared.push(flavor);
        }

        let default_flavor = match self.default_flavor {
            Some(name) => {
                let flavor = Flavor::parse(name)?;
                if !seen.contains(&flavor) {
                    return Err(ConfigurationError::UndeclaredDefaultFlavor(
                        flavor.as_str().to_string(),
                    ));
                }
                flavor
            }
            None => declared
                .first()
                .cloned()
                .ok_or(ConfigurationError::EmptyMapping)?,
        };

        Ok(RoutingTable::new(
            entries,
            default_flavor,
            declared,
            self.ignore_labels,
        ))
    }
}

/// Compile `mapping` with an explicit default flavor and default limits.
pub fn build(
    mapping: FlavorLabelsMapping,
    default_flavor: impl Into<String>,
) -> Result<RoutingTable, ConfigurationError> {
    TableBuilder::new(mapping)
        .default_flavor(default_flavor)
        .build()
}

/// Every non-empty subset of `labels`, each keeping the input order.
///
/// `labels` must already be sorted and duplicate-free; the caller enforces
/// `labels.len() <= MAX_LABELS_CEILING`.
fn non_empty_subsets(labels: &[Label]) -> impl Iterator<Item = Box<[Label]>> + '_ {
    (1u32..(1u32 << labels.len())).map(move |mask| {
        labels
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, label)| label.clone())
            .collect()
    })
}

use tracing::debug;

use crate::models::{Interaction, InteractionFinding, InteractionReport, Severity};
use crate::services::catalog::MedicationCatalog;
use crate::services::selection::MedicationSelection;

/// Every tabulated interaction among the selected ids.
///
/// Each unordered pair `(i < j)` of the input is checked once, in either
/// table orientation, and yields at most one row. Rows come back in the order
/// their pair is first enumerated. Nothing is inferred transitively: only
/// pairs present in `table` are reported. The caller is expected to have
/// removed duplicate ids.
pub fn find_interactions<'a>(table: &'a [Interaction], medication_ids: &[u32]) -> Vec<&'a Interaction> {
    let mut results = Vec::new();

    for (i, &first) in medication_ids.iter().enumerate() {
        for &second in &medication_ids[i + 1..] {
            if let Some(interaction) = table.iter().find(|row| row.involves_pair(first, second)) {
                results.push(interaction);
            }
        }
    }

    results
}

/// Number of unordered pairs in a selection of `n` medications.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

pub struct InteractionChecker {
    catalog: MedicationCatalog,
}

impl Default for InteractionChecker {
    fn default() -> Self {
        Self::new(MedicationCatalog::new())
    }
}

impl InteractionChecker {
    pub fn new(catalog: MedicationCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &MedicationCatalog {
        &self.catalog
    }

    pub fn check(&self, selection: &MedicationSelection) -> InteractionReport {
        let ids = selection.ids();

        let interactions: Vec<InteractionFinding> = find_interactions(self.catalog.interactions(), ids)
            .into_iter()
            .map(|interaction| InteractionFinding {
                med1_name: self.catalog.name_of(interaction.med1_id),
                med2_name: self.catalog.name_of(interaction.med2_id),
                interaction: interaction.clone(),
            })
            .collect();

        let highest_severity: Option<Severity> = interactions
            .iter()
            .map(|finding| finding.interaction.severity)
            .max();

        let medications = ids
            .iter()
            .filter_map(|id| self.catalog.get(*id).ok().cloned())
            .collect();

        debug!(
            "Checked {} medications, {} interactions found (highest: {:?})",
            ids.len(),
            interactions.len(),
            highest_severity
        );

        InteractionReport {
            medications,
            pairs_checked: pair_count(ids.len()),
            interactions,
            highest_severity,
        }
    }
}

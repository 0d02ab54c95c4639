use std::borrow::Cow;
use std::sync::LazyLock;

use crate::models::{Interaction, Medication, MedicationError, Severity};

static MEDICATIONS: LazyLock<Vec<Medication>> = LazyLock::new(|| {
    [
        (1, "Aspirin", "Pain reliever and anti-inflammatory drug."),
        (2, "Lisinopril", "ACE inhibitor used to treat high blood pressure and heart failure."),
        (3, "Metformin", "Used to treat type 2 diabetes."),
        (4, "Atorvastatin", "Statin medication used to prevent cardiovascular disease."),
        (5, "Simvastatin", "Statin medication used to lower cholesterol levels."),
        (6, "Warfarin", "Anticoagulant used to treat blood clots."),
    ]
    .into_iter()
    .map(|(id, name, description)| Medication {
        id,
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
});

static INTERACTIONS: LazyLock<Vec<Interaction>> = LazyLock::new(|| {
    vec![
        Interaction {
            id: 1,
            med1_id: 1,
            med2_id: 6,
            severity: Severity::Severe,
            description: "Taking aspirin with warfarin can significantly increase the risk of bleeding.".to_string(),
            recommendation: "Avoid this combination unless specifically directed by your doctor. If both medications are necessary, close monitoring of INR levels is required.".to_string(),
        },
        Interaction {
            id: 2,
            med1_id: 4,
            med2_id: 5,
            severity: Severity::Moderate,
            description: "Taking multiple statin medications can increase the risk of muscle damage and rhabdomyolysis.".to_string(),
            recommendation: "Avoid taking multiple statin medications. If you need additional cholesterol management, discuss alternative options with your doctor.".to_string(),
        },
        Interaction {
            id: 3,
            med1_id: 1,
            med2_id: 2,
            severity: Severity::Moderate,
            description: "Aspirin may decrease the effectiveness of lisinopril in lowering blood pressure.".to_string(),
            recommendation: "Monitor blood pressure closely if taking these medications together. Your doctor may need to adjust your dosage.".to_string(),
        },
        Interaction {
            id: 4,
            med1_id: 2,
            med2_id: 3,
            severity: Severity::Minor,
            description: "Lisinopril and metformin may both lower blood sugar, which could potentially lead to hypoglycemia.".to_string(),
            recommendation: "Monitor blood sugar levels if taking these medications together, especially when starting or changing doses.".to_string(),
        },
    ]
});

#[derive(Debug, Clone)]
pub struct MedicationCatalog {
    medications: Cow<'static, [Medication]>,
    interactions: Cow<'static, [Interaction]>,
}

impl Default for MedicationCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicationCatalog {
    pub fn new() -> Self {
        Self {
            medications: Cow::Borrowed(MEDICATIONS.as_slice()),
            interactions: Cow::Borrowed(INTERACTIONS.as_slice()),
        }
    }

    pub fn with_data(medications: Vec<Medication>, interactions: Vec<Interaction>) -> Self {
        Self {
            medications: Cow::Owned(medications),
            interactions: Cow::Owned(interactions),
        }
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn get(&self, id: u32) -> Result<&Medication, MedicationError> {
        self.medications
            .iter()
            .find(|medication| medication.id == id)
            .ok_or(MedicationError::NotFound(id))
    }

    pub fn name_of(&self, id: u32) -> String {
        self.get(id)
            .map(|medication| medication.name.clone())
            .unwrap_or_else(|_| format!("Medication #{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = MedicationCatalog::new();

        assert_eq!(catalog.medications().len(), 6);
        assert_eq!(catalog.interactions().len(), 4);
        assert_eq!(catalog.get(6).unwrap().name, "Warfarin");
        assert_eq!(catalog.get(7), Err(MedicationError::NotFound(7)));
        assert_eq!(catalog.name_of(7), "Medication #7");
    }

    #[test]
    fn test_interaction_rows_reference_known_medications() {
        let catalog = MedicationCatalog::new();

        for interaction in catalog.interactions() {
            assert!(catalog.get(interaction.med1_id).is_ok());
            assert!(catalog.get(interaction.med2_id).is_ok());
            assert_ne!(interaction.med1_id, interaction.med2_id);
        }
    }
}

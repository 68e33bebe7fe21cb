use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Static cause/prevention text for a predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiseaseRecord {
    pub cause: &'static str,
    pub prevention: &'static str,
}

/// Returned whenever a label has no entry in the table. Lookups never fail:
/// the label is always accepted even if the knowledge table is incomplete.
pub const UNKNOWN_RECORD: DiseaseRecord = DiseaseRecord {
    cause: "Unknown",
    prevention: "No information available.",
};

static DISEASE_TABLE: Lazy<HashMap<&'static str, DiseaseRecord>> = Lazy::new(|| {
    HashMap::from([
        (
            "Pepper__bell___Bacterial_spot",
            DiseaseRecord {
                cause: "Bacterium (Xanthomonas campestris pv. vesicatoria)",
                prevention: "Use disease-free seeds and avoid overhead watering.",
            },
        ),
        (
            "Pepper__bell___healthy",
            DiseaseRecord {
                cause: "No disease",
                prevention: "Maintain proper irrigation and nutrient levels.",
            },
        ),
        (
            "Potato___Early_blight",
            DiseaseRecord {
                cause: "Fungus (Alternaria solani)",
                prevention: "Use crop rotation and avoid excess moisture on leaves.",
            },
        ),
        (
            "Potato___Late_blight",
            DiseaseRecord {
                cause: "Fungus (Phytophthora infestans)",
                prevention: "Use resistant varieties and fungicide sprays.",
            },
        ),
        (
            "Potato___healthy",
            DiseaseRecord {
                cause: "No disease",
                prevention: "Keep soil well-drained and avoid waterlogging.",
            },
        ),
        (
            "Tomato_Bacterial_spot",
            DiseaseRecord {
                cause: "Bacterium (Xanthomonas campestris pv. vesicatoria)",
                prevention: "Avoid working with wet plants and use copper-based sprays.",
            },
        ),
        (
            "Tomato_Early_blight",
            DiseaseRecord {
                cause: "Fungus (Alternaria solani)",
                prevention: "Remove infected leaves and rotate crops yearly.",
            },
        ),
        (
            "Tomato_Late_blight",
            DiseaseRecord {
                cause: "Fungus (Phytophthora infestans)",
                prevention: "Avoid overhead watering and increase air circulation.",
            },
        ),
        (
            "Tomato_Leaf_Mold",
            DiseaseRecord {
                cause: "Fungus (Passalora fulva)",
                prevention: "Ensure good airflow and avoid high humidity.",
            },
        ),
        (
            "Tomato_Septoria_leaf_spot",
            DiseaseRecord {
                cause: "Fungus (Septoria lycopersici)",
                prevention: "Remove infected foliage and apply fungicide if needed.",
            },
        ),
        (
            "Tomato_Spider_mites_Two_spotted_spider_mite",
            DiseaseRecord {
                cause: "Pest (Tetranychus urticae)",
                prevention: "Spray water on undersides of leaves and use miticides.",
            },
        ),
        (
            "Tomato__Target_Spot",
            DiseaseRecord {
                cause: "Fungus (Corynespora cassiicola)",
                prevention: "Avoid leaf wetness and use protective fungicides.",
            },
        ),
        (
            "Tomato__Tomato_YellowLeaf__Curl_Virus",
            DiseaseRecord {
                cause: "Virus (Transmitted by whiteflies)",
                prevention: "Control whiteflies and remove infected plants.",
            },
        ),
        (
            "Tomato__Tomato_mosaic_virus",
            DiseaseRecord {
                cause: "Virus (Tobamovirus group)",
                prevention: "Avoid tobacco use near plants and disinfect tools.",
            },
        ),
        (
            "Tomato_healthy",
            DiseaseRecord {
                cause: "No disease",
                prevention: "Maintain good nutrition and watering practices.",
            },
        ),
    ])
});

/// Resolves a label to its cause/prevention text, substituting
/// [`UNKNOWN_RECORD`] for labels the table does not know.
pub fn lookup(label: &str) -> DiseaseRecord {
    DISEASE_TABLE.get(label).copied().unwrap_or(UNKNOWN_RECORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_config::DEFAULT_LABELS;

    #[test]
    fn every_label_has_a_record() {
        for label in DEFAULT_LABELS {
            let record = lookup(label);
            assert_ne!(record, UNKNOWN_RECORD, "missing record for {label}");
            assert!(!record.cause.is_empty());
            assert!(!record.prevention.is_empty());
        }
    }

    #[test]
    fn healthy_tomato_record() {
        let record = lookup("Tomato_healthy");
        assert_eq!(record.cause, "No disease");
        assert_eq!(
            record.prevention,
            "Maintain good nutrition and watering practices."
        );
    }

    #[test]
    fn unknown_label_gets_placeholder() {
        let record = lookup("Wheat_rust");
        assert_eq!(record.cause, "Unknown");
        assert_eq!(record.prevention, "No information available.");
    }
}

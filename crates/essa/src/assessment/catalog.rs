//! Read-only reference data: technology readiness levels, candidate factors per
//! dimension, and the default life cycle.

use super::domain::Dimension;
use serde::Serialize;

/// One Technology Readiness Level with the actors worth engaging at that level.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrlLevel {
    pub level: u8,
    pub definition: &'static str,
    pub actors: &'static [&'static str],
}

/// Environmental Footprint indicator metadata attached to environmental factors.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnvironmentalIndicator {
    pub indicator: &'static str,
    pub category: &'static str,
    pub method: &'static str,
    pub version: &'static str,
    pub identifier: &'static str,
}

/// Candidate factor shown when picking the three factors of a dimension.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FactorSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub explanation: &'static str,
    pub default_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environmental: Option<EnvironmentalIndicator>,
}

const DEVELOPERS: &str = "Technology developers";
const SCIENTISTS: &str = "External scientific experts";
const INDUSTRY: &str = "Industry representatives";
const GOVERNMENT: &str = "Government agency representatives";

pub static TRL_TABLE: [TrlLevel; 9] = [
    TrlLevel {
        level: 1,
        definition: "Basic principles observed",
        actors: &[DEVELOPERS, SCIENTISTS],
    },
    TrlLevel {
        level: 2,
        definition: "Technology concept formulated",
        actors: &[DEVELOPERS, SCIENTISTS],
    },
    TrlLevel {
        level: 3,
        definition: "Experimental proof of concept",
        actors: &[DEVELOPERS, SCIENTISTS],
    },
    TrlLevel {
        level: 4,
        definition: "Technology validated in lab",
        actors: &[DEVELOPERS, SCIENTISTS, INDUSTRY],
    },
    TrlLevel {
        level: 5,
        definition: "Technology validated in relevant environment (industrially relevant environment in the case of key enabling technologies)",
        actors: &[DEVELOPERS, SCIENTISTS, INDUSTRY, GOVERNMENT],
    },
    TrlLevel {
        level: 6,
        definition: "Technology demonstrated in relevant environment (industrially relevant environment in the case of key enabling technologies)",
        actors: &["N/A"],
    },
    TrlLevel {
        level: 7,
        definition: "System prototype demonstration in operational environment",
        actors: &["N/A"],
    },
    TrlLevel {
        level: 8,
        definition: "System complete and qualified",
        actors: &["N/A"],
    },
    TrlLevel {
        level: 9,
        definition: "Actual system proven in operational environment (competitive manufacturing in the case of key enabling technologies; or in space)",
        actors: &["N/A"],
    },
];

pub fn trl_level(level: u8) -> Option<&'static TrlLevel> {
    TRL_TABLE.iter().find(|row| row.level == level)
}

const fn ef(
    indicator: &'static str,
    category: &'static str,
    method: &'static str,
    identifier: &'static str,
) -> Option<EnvironmentalIndicator> {
    Some(EnvironmentalIndicator {
        indicator,
        category,
        method,
        version: "EF 3.1",
        identifier,
    })
}

const fn factor(
    name: &'static str,
    unit: &'static str,
    explanation: &'static str,
    default_selected: bool,
) -> FactorSpec {
    FactorSpec {
        name,
        unit,
        explanation,
        default_selected,
        environmental: None,
    }
}

const fn env_factor(
    name: &'static str,
    unit: &'static str,
    explanation: &'static str,
    default_selected: bool,
    environmental: Option<EnvironmentalIndicator>,
) -> FactorSpec {
    FactorSpec {
        name,
        unit,
        explanation,
        default_selected,
        environmental,
    }
}

pub static ENVIRONMENTAL_FACTORS: [FactorSpec; 13] = [
    env_factor(
        "Climate change",
        "kg CO2 eq",
        "Modification of climate affecting global ecosystem.",
        true,
        ef("Radiative forcing as global warming potential (GWP100)", "Climate", "IPCC 2021 baseline model", "EF-CC"),
    ),
    env_factor(
        "Particulate matters",
        "disease incidence",
        "PM effects on human health.",
        false,
        ef("Impact on human health", "Human health", "PM model recommended by UNEP", "EF-PM"),
    ),
    env_factor(
        "Water use",
        "m3 world eq",
        "Consumption & depletion, scarcity-adjusted.",
        false,
        ef("User deprivation potential (deprivation-weighted water consumption)", "Resources", "AWARE", "EF-WU"),
    ),
    env_factor(
        "Resource use, fossils",
        "MJ",
        "Depletion of non-renewable energy resources.",
        true,
        ef("Abiotic resource depletion, fossil fuels (ADP-fossil)", "Resources", "CML 2002", "EF-RUF"),
    ),
    env_factor(
        "Land Use",
        "point",
        "Impact on land degradation & biodiversity.",
        true,
        ef("Soil quality index", "Ecosystems", "LANCA", "EF-LU"),
    ),
    env_factor(
        "Resource use, minerals and metals",
        "kg Sb eq",
        "Depletion of mineral resources.",
        false,
        ef("Abiotic resource depletion (ADP ultimate reserves)", "Resources", "CML 2002", "EF-RUM"),
    ),
    env_factor(
        "Ozone depletion",
        "kg CFC-11 eq",
        "Impoverishment of protective ozone layer.",
        false,
        ef("Ozone depletion potential (ODP)", "Human health", "WMO 2014", "EF-OD"),
    ),
    env_factor(
        "Acidification",
        "mol H+ eq",
        "Atmospheric chemicals redeposited in ecosystems.",
        false,
        ef("Accumulated exceedance (AE)", "Ecosystems", "Accumulated exceedance", "EF-AC"),
    ),
    env_factor(
        "Ionizing radiation, effect on human health",
        "kBq U235 eq",
        "Effects of radioactivity.",
        false,
        ef("Human exposure efficiency relative to U235", "Human health", "Human health effect model", "EF-IR"),
    ),
    env_factor(
        "Photochemical ozone formation, effect on human health",
        "kg NMVOC eq",
        "Air quality deterioration (smog).",
        false,
        ef("Tropospheric ozone concentration increase", "Human health", "LOTOS-EUROS", "EF-POF"),
    ),
    env_factor(
        "Eutrophication, terrestrial",
        "mol N eq",
        "Excess enrichment leading to imbalance.",
        false,
        ef("Accumulated exceedance (AE)", "Ecosystems", "Accumulated exceedance", "EF-EUT"),
    ),
    env_factor(
        "Eutrophication, marine",
        "kg N eq",
        "Excess nutrients leading to dead zones.",
        false,
        ef("Fraction of nutrients reaching marine end compartment (N)", "Ecosystems", "EUTREND", "EF-EUM"),
    ),
    env_factor(
        "Eutrophication, freshwater",
        "kg P eq",
        "Excess nutrients in rivers & lakes.",
        false,
        ef("Fraction of nutrients reaching freshwater end compartment (P)", "Ecosystems", "EUTREND", "EF-EUF"),
    ),
];

pub static SOCIAL_FACTORS: [FactorSpec; 17] = [
    factor("Health and safety (workers)", "", "Worker health & safety across supply chain.", true),
    factor("Equal opportunities (workers)", "", "Non-discrimination & inclusion.", false),
    factor("Smallholders including farmers (workers)", "", "Impacts on smallholders.", false),
    factor("Access to material resources (local community)", "", "Shared resource access & rights.", false),
    factor("Delocalization and migration (local community)", "", "Community displacement risks.", false),
    factor("Safe and healthy living conditions (local community)", "", "Ambient environmental & safety conditions.", false),
    factor("Respect of indigenous rights (local community)", "", "FPIC & cultural heritage.", false),
    factor("Local employment (local community)", "", "Quality job opportunities locally.", false),
    factor("Public commitment to sustainability issues (society)", "", "Transparency & responsible conduct.", true),
    factor("Contribution to economic development (society)", "", "Shared prosperity enablement.", false),
    factor("Prevention and mitigation of conflicts (society)", "", "Conflict sensitivity & mitigation.", false),
    factor("Technology development (society)", "", "Innovation spillovers & capacity.", false),
    factor("Ethical treatment of animals (society)", "", "Animal welfare standards.", false),
    factor("Poverty alleviation (society)", "", "Inclusive growth & poverty reduction.", false),
    factor("Health and safety (consumers)", "", "Consumer health & safety.", false),
    factor("End of life responsibility (consumers)", "", "Design for circularity & EPR.", true),
    factor("Health issues for children as consumers (children)", "", "Child-specific health risks.", false),
];

pub static ECONOMIC_FACTORS: [FactorSpec; 7] = [
    factor("Complexity of production process", "", "How complex is manufacturing?", true),
    factor("Raw material cost", "", "Cost of feedstocks & inputs.", true),
    factor("Market size", "", "Addressable market potential.", false),
    factor("Cost of final product", "", "Unit economics and price point.", true),
    factor("Scalability of production process", "", "Ease of scale-up to volume.", false),
    factor("Raw material availability", "", "Supply security & constraints.", false),
    factor("Chance on subsidies", "", "Public funding & incentives likelihood.", false),
];

pub static DEFAULT_LIFE_CYCLE: [&str; 7] = [
    "Raw material extraction",
    "Material synthesis / processing",
    "Component manufacturing",
    "Product assembly",
    "Distribution & logistics",
    "Use phase",
    "End-of-life (reuse/recycling/disposal)",
];

pub fn factors(dimension: Dimension) -> &'static [FactorSpec] {
    match dimension {
        Dimension::Environmental => &ENVIRONMENTAL_FACTORS,
        Dimension::Social => &SOCIAL_FACTORS,
        Dimension::Economic => &ECONOMIC_FACTORS,
    }
}

/// Names flagged as default-selected in the catalog of `dimension`.
pub fn default_selection(dimension: Dimension) -> Vec<String> {
    factors(dimension)
        .iter()
        .filter(|spec| spec.default_selected)
        .map(|spec| spec.name.to_string())
        .collect()
}

/// Looks a factor up across every catalog.
pub fn find_factor(name: &str) -> Option<(Dimension, &'static FactorSpec)> {
    Dimension::ordered().into_iter().find_map(|dimension| {
        factors(dimension)
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| (dimension, spec))
    })
}

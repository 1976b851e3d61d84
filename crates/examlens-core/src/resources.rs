//! Static study resources per category.

const PHYSICS: &[&str] = &[
    "NCERT Physics Textbooks (Class 11-12)",
    "HC Verma - Concepts of Physics",
    "Khan Academy Physics Videos",
    "MIT OpenCourseWare - Physics",
    "Practice numerical problems daily",
];

const MATHEMATICS: &[&str] = &[
    "RD Sharma Mathematics",
    "NCERT Mathematics (Class 11-12)",
    "Khan Academy Math",
    "Brilliant.org - Problem Solving",
    "Practice 20 problems daily",
];

const LOGICAL_REASONING: &[&str] = &[
    "RS Aggarwal - Logical Reasoning",
    "Arun Sharma - Logical Reasoning",
    "Solve puzzles on BrainTeaser apps",
    "Practice pattern recognition daily",
    "Lumosity brain training",
];

const VERBAL_ABILITY: &[&str] = &[
    "Wren & Martin English Grammar",
    "Word Power Made Easy - Norman Lewis",
    "Read newspapers daily",
    "Vocabulary.com practice",
    "GRE vocabulary lists",
];

const DATA_INTERPRETATION: &[&str] = &[
    "Arun Sharma - Data Interpretation",
    "Practice charts and graphs",
    "Excel data analysis tutorials",
    "Economic Times - Data sections",
    "Kaggle data visualization",
];

/// Resources for a category, most useful first.
///
/// Category names match exactly; anything unrecognised gets a generic list
/// that names the category.
pub fn study_materials(category: &str) -> Vec<String> {
    let known = match category {
        "Physics" => Some(PHYSICS),
        "Mathematics" => Some(MATHEMATICS),
        "Logical Reasoning" => Some(LOGICAL_REASONING),
        "Verbal Ability" => Some(VERBAL_ABILITY),
        "Data Interpretation" => Some(DATA_INTERPRETATION),
        _ => None,
    };

    match known {
        Some(list) => list.iter().map(|s| s.to_string()).collect(),
        None => vec![
            format!("Search online tutorials for {category}"),
            "YouTube educational channels".to_string(),
            "Practice previous year questions".to_string(),
            "Join study groups".to_string(),
            "Use mobile learning apps".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category() {
        let m = study_materials("Physics");
        assert_eq!(m.len(), 5);
        assert_eq!(m[0], "NCERT Physics Textbooks (Class 11-12)");
    }

    #[test]
    fn unknown_category_falls_back() {
        let m = study_materials("Botany");
        assert_eq!(m[0], "Search online tutorials for Botany");
        assert_eq!(m.len(), 5);
    }
}

//! Topic extraction from a keyword table.

/// `(theme, keywords)`. Themes are reported in order of first mention.
const THEMES: &[(&str, &[&str])] = &[
    (
        "work",
        &[
            "work", "job", "boss", "office", "meeting", "meetings", "deadline", "deadlines",
            "colleague", "colleagues", "coworker", "coworkers", "project", "career", "manager",
            "shift", "promotion", "client", "clients",
        ],
    ),
    (
        "school",
        &[
            "school", "class", "classes", "exam", "exams", "homework", "study", "studied",
            "studying", "teacher", "university", "college", "lecture", "grades",
        ],
    ),
    (
        "family",
        &[
            "family", "mom", "mother", "dad", "father", "parents", "sister", "brother", "son",
            "daughter", "kids", "children", "grandma", "grandmother", "grandpa", "husband", "wife",
        ],
    ),
    (
        "friends",
        &["friend", "friends", "buddy", "party", "hangout", "roommate"],
    ),
    (
        "relationships",
        &[
            "partner", "boyfriend", "girlfriend", "relationship", "dating", "date", "breakup",
        ],
    ),
    (
        "health",
        &[
            "health", "sick", "doctor", "hospital", "pain", "headache", "ill", "illness",
            "medication", "therapy", "therapist",
        ],
    ),
    (
        "sleep",
        &["sleep", "slept", "sleeping", "insomnia", "nap", "nightmare", "bed"],
    ),
    (
        "exercise",
        &[
            "exercise", "workout", "gym", "run", "ran", "running", "walk", "walked", "yoga",
            "hike", "hiked", "swim", "swam", "bike",
        ],
    ),
    (
        "finances",
        &["money", "rent", "bills", "debt", "salary", "budget", "paycheck", "expenses"],
    ),
    (
        "nature",
        &[
            "nature", "park", "outdoors", "beach", "garden", "forest", "sunshine", "mountains",
        ],
    ),
    (
        "food",
        &["food", "dinner", "lunch", "breakfast", "cooked", "cooking", "meal", "ate"],
    ),
    (
        "self-care",
        &["meditation", "meditate", "meditated", "journaling", "relaxing", "bath"],
    ),
    (
        "gratitude",
        &["grateful", "thankful", "gratitude", "appreciate", "appreciated", "blessed"],
    ),
];

/// Themes that become "<theme> stress" when pressure words co-occur.
const STRESS_PRONE: &[&str] = &["work", "school", "finances"];

const STRESS_MARKERS: &[&str] = &[
    "stress", "stressed", "stressful", "overwhelmed", "pressure", "anxious", "anxiety",
    "worried", "exhausted", "burnout", "overworked",
];

/// Deduplicated topical labels in order of first mention.
pub(crate) fn extract_themes(tokens: &[String]) -> Vec<String> {
    let stressed = tokens.iter().any(|t| STRESS_MARKERS.contains(&t.as_str()));

    let mut themes: Vec<String> = Vec::new();
    for token in tokens {
        let Some((theme, _)) = THEMES
            .iter()
            .find(|(_, keywords)| keywords.contains(&token.as_str()))
        else {
            continue;
        };

        let label = if stressed && STRESS_PRONE.contains(theme) {
            format!("{theme} stress")
        } else {
            theme.to_string()
        };

        if !themes.contains(&label) {
            themes.push(label);
        }
    }
    themes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::tokenize;

    #[test]
    fn themes_follow_first_mention_and_dedupe() {
        let tokens = tokenize("Dinner with my sister, then my mom called about dinner plans");
        assert_eq!(extract_themes(&tokens), vec!["food", "family"]);
    }

    #[test]
    fn work_under_pressure_becomes_work_stress() {
        let tokens = tokenize("The deadline at work has me completely overwhelmed");
        assert_eq!(extract_themes(&tokens), vec!["work stress"]);
    }

    #[test]
    fn short_text_may_have_no_themes() {
        assert!(extract_themes(&tokenize("Meh.")).is_empty());
    }
}

use super::domain::JobRecord;

/// Words shorter than this only count as matched when they appear verbatim.
const PARTIAL_TOKEN_MIN_LEN: usize = 4;

/// Share of query words (in tenths) that must match for a multi-word query.
const WORD_OVERLAP_TENTHS: usize = 7;

/// Lowercase text searched by the matcher.
pub fn haystack(job: &JobRecord) -> String {
    [
        job.title.as_str(),
        job.description.as_str(),
        job.required_skills.as_str(),
        job.effective_employment_type(),
        job.city.as_str(),
        job.state.as_str(),
        job.country.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Whether `job` satisfies a free-text query.
///
/// A blank query matches everything. Otherwise the query first has to appear as a
/// substring of the record text; failing that, a query of two or more words
/// matches when at least 70% of its words (rounded up) are found. Words of four
/// or more characters may also match part of, or contain, a single token.
pub fn matches_search_term(job: &JobRecord, search_term: &str) -> bool {
    let term = search_term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let haystack = haystack(job);
    if haystack.contains(&term) {
        return true;
    }

    let words: Vec<&str> = term.split_whitespace().collect();
    if words.len() < 2 {
        return false;
    }

    let tokens: Vec<&str> = haystack.split_whitespace().collect();
    let matched = words
        .iter()
        .filter(|word| word_matches(word, &haystack, &tokens))
        .count();

    matched >= required_matches(words.len())
}

fn word_matches(word: &str, haystack: &str, tokens: &[&str]) -> bool {
    if haystack.contains(word) {
        return true;
    }

    word.chars().count() >= PARTIAL_TOKEN_MIN_LEN
        && tokens
            .iter()
            .any(|token| token.contains(word) || word.contains(token))
}

fn required_matches(word_count: usize) -> usize {
    (word_count * WORD_OVERLAP_TENTHS).div_ceil(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            ..JobRecord::default()
        }
    }

    #[test]
    fn blank_terms_match_everything() {
        assert!(matches_search_term(&job("Backend Engineer"), ""));
        assert!(matches_search_term(&job("Backend Engineer"), "   "));
    }

    #[test]
    fn direct_substring_matches_case_insensitively() {
        let record = job("Senior React Developer");
        assert!(matches_search_term(&record, "react developer"));
        assert!(matches_search_term(&record, "  REACT  "));
        assert!(!matches_search_term(&job("Backend Engineer"), "xyz"));
    }

    #[test]
    fn haystack_covers_skills_type_and_location() {
        let record = JobRecord {
            title: "Engineer".to_string(),
            required_skills: "Rust, Tokio".to_string(),
            role_type: "contract".to_string(),
            city: "Lisbon".to_string(),
            state: "Lisboa".to_string(),
            country: "Portugal".to_string(),
            ..JobRecord::default()
        };

        for term in ["tokio", "contract", "lisbon", "portugal"] {
            assert!(matches_search_term(&record, term), "expected match for {term}");
        }
    }

    #[test]
    fn multi_word_queries_need_seventy_percent_overlap() {
        let record = JobRecord {
            title: "Senior React Developer".to_string(),
            location_type: "remote".to_string(),
            description: "Remote friendly team".to_string(),
            ..JobRecord::default()
        };

        assert!(matches_search_term(&record, "senior react remote"));
        assert!(matches_search_term(&record, "react developers remote"));
        assert!(!matches_search_term(&record, "react golang kubernetes"));
    }

    #[test]
    fn short_words_only_match_verbatim() {
        let record = job("Data Engineer");
        assert!(!matches_search_term(&record, "eng ops"));
        assert!(matches_search_term(&record, "engineering data"));
    }

    #[test]
    fn single_words_get_no_partial_match() {
        assert!(!matches_search_term(&job("Developer"), "developers"));
    }

    #[test]
    fn required_matches_rounds_up() {
        assert_eq!(required_matches(2), 2);
        assert_eq!(required_matches(3), 3);
        assert_eq!(required_matches(4), 3);
        assert_eq!(required_matches(10), 7);
    }
}

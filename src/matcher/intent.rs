// ============================================================================
// Intent matcher — maps a profile value onto a rendered option list
// ============================================================================

/// Options shorter than this never count as "contained in the intent";
/// two-character fragments match almost anything.
const MIN_CONTAINED_OPTION_LEN: usize = 2;

/// Fuzzy results below this similarity are discarded outright. Callers with
/// consequential actions (dropdown selection) apply their own higher floor.
const FUZZY_FLOOR: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The matched option, in its original (un-normalized) form.
    pub matched: String,
    /// 1.0 exact, 0.9 containment, else bigram similarity.
    pub score: f64,
    /// Position in the supplied option list.
    pub index: usize,
}

/// Find the option that best matches a free-text intent.
///
/// Cascade, first hit wins: exact match, containment match, fuzzy match.
/// Intent and options are trimmed and case-folded before comparison.
pub fn find_best_match(intent: &str, options: &[String]) -> Option<MatchResult> {
    let clean_intent = intent.trim().to_lowercase();
    if clean_intent.is_empty() || options.is_empty() {
        return None;
    }

    let clean_options: Vec<String> = options.iter().map(|o| o.trim().to_lowercase()).collect();

    // Exact match
    if let Some(index) = clean_options.iter().position(|o| *o == clean_intent) {
        return Some(MatchResult {
            matched: options[index].clone(),
            score: 1.0,
            index,
        });
    }

    // Containment: prefer an option containing the intent; otherwise accept
    // an option contained in the intent if it is long enough to be meaningful.
    let contained = clean_options
        .iter()
        .position(|o| o.contains(&clean_intent))
        .or_else(|| {
            clean_options.iter().position(|o| {
                clean_intent.contains(o.as_str()) && o.chars().count() > MIN_CONTAINED_OPTION_LEN
            })
        });
    if let Some(index) = contained {
        return Some(MatchResult {
            matched: options[index].clone(),
            score: 0.9,
            index,
        });
    }

    // Fuzzy: best bigram similarity above the floor.
    let mut best: Option<(usize, f64)> = None;
    for (i, option) in clean_options.iter().enumerate() {
        let score = bigram_similarity(&clean_intent, option);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    match best {
        Some((index, score)) if score > FUZZY_FLOOR => Some(MatchResult {
            matched: options[index].clone(),
            score,
            index,
        }),
        _ => None,
    }
}

/// Sørensen–Dice coefficient over character bigrams, in [0, 1].
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    let a_grams = bigrams(a);
    let b_grams = bigrams(b);

    if a_grams.is_empty() || b_grams.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }

    let mut remaining = b_grams.clone();
    let mut shared = 0usize;
    for gram in &a_grams {
        if let Some(pos) = remaining.iter().position(|g| g == gram) {
            remaining.swap_remove(pos);
            shared += 1;
        }
    }

    (2.0 * shared as f64) / (a_grams.len() + b_grams.len()) as f64
}

fn bigrams(s: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

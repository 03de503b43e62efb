// Rule-based English analyzer, the built-in LanguageAnalyzer.
//
// Lemmas come from an irregular-form table first, then from a small set of
// suffix rules. Suffix rules apply to lowercase tokens and to capitalized
// tokens at the start of a sentence ("Sisters pray."), but not to capitalized
// tokens mid-sentence or to known given names, so proper nouns ("Charles",
// "Teresa") are left alone. "women" -> "woman", "nuns" -> "nun".
//
// PERSON entities are runs of capitalized words that either follow an
// honorific ("Mr.", "Pope", "Sister") or start with a known given name. A
// given name that is also a common word ("Grace", "Hope", "Will") only counts
// when it opens a longer run ("Grace Kelly").

use std::collections::{HashMap, HashSet};

use super::tokenizer::{is_number, is_punctuation, tokenize, Span};
use super::traits::{Analysis, AnalyzedToken, Entity, EntityLabel, LanguageAnalyzer, PartOfSpeech};

const IRREGULAR: &[(&str, &str)] = &[
    ("women", "woman"),
    ("men", "man"),
    ("children", "child"),
    ("brethren", "brother"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("lives", "life"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("selves", "self"),
    ("ourselves", "ourselves"),
    ("themselves", "themselves"),
    ("him", "he"),
    ("them", "they"),
    ("us", "we"),
    ("me", "i"),
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("'s", "'s"),
    ("’s", "'s"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("said", "say"),
    ("says", "say"),
    ("made", "make"),
    ("making", "make"),
    ("saw", "see"),
    ("seen", "see"),
    ("took", "take"),
    ("taken", "take"),
    ("taking", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("giving", "give"),
    ("came", "come"),
    ("coming", "come"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("brought", "bring"),
    ("wrote", "write"),
    ("written", "write"),
    ("writing", "write"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("became", "become"),
    ("began", "begin"),
    ("begun", "begin"),
    ("bore", "bear"),
    ("born", "bear"),
    ("found", "find"),
    ("held", "hold"),
    ("kept", "keep"),
    ("left", "leave"),
    ("led", "lead"),
    ("lost", "lose"),
    ("meant", "mean"),
    ("met", "meet"),
    ("paid", "pay"),
    ("sent", "send"),
    ("stood", "stand"),
    ("taught", "teach"),
    ("told", "tell"),
    ("understood", "understand"),
    ("better", "well"),
    ("best", "well"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Words that look inflected but are already base forms.
const KEEP: &[&str] = &[
    "always", "perhaps", "news", "series", "species", "thus", "towards", "afterwards",
    "sometimes", "whereas", "yes", "this", "his", "hers", "its", "ours", "yours", "theirs",
    "was", "gas", "bias", "alias", "canvas", "christmas", "lens", "physics", "ethics",
    "politics", "economics", "mathematics", "thing", "king", "morning", "evening", "nothing",
    "something", "anything", "everything", "bring", "sing", "spring", "string", "ring",
    "wing", "during", "ceiling", "wedding", "building", "sacred", "hundred", "kindred",
    "naked", "wicked", "beloved", "indeed", "need", "seed", "bed", "red", "shed", "creed",
    "speed", "breed", "greed",
];

/// Given names that double as ordinary words.
const COMMON_WORD_NAMES: &[&str] = &[
    "grace", "faith", "hope", "charity", "mercy", "joy", "will", "may", "june", "april",
    "august", "mark", "rose", "art", "bill", "christian", "major", "patience", "prudence",
    "constance", "glory", "trinity", "angel", "justice", "love", "peace", "dawn", "summer",
    "pearl", "ruby", "victory", "verity", "faithful",
];

const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "pope", "saint", "st", "sister", "brother", "father",
    "mother", "cardinal", "bishop", "archbishop", "blessed", "king", "queen", "lady", "lord",
];

/// Lookup-plus-suffix-rules analyzer with an optional given-name gazetteer.
pub struct RuleBasedAnalyzer {
    irregular: HashMap<&'static str, &'static str>,
    keep: HashSet<&'static str>,
    honorifics: HashSet<&'static str>,
    common_word_names: HashSet<&'static str>,
    given_names: HashSet<String>,
}

impl Default for RuleBasedAnalyzer {
    fn default() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
            keep: KEEP.iter().copied().collect(),
            honorifics: HONORIFICS.iter().copied().collect(),
            common_word_names: COMMON_WORD_NAMES.iter().copied().collect(),
            given_names: HashSet::new(),
        }
    }
}

impl RuleBasedAnalyzer {
    /// Recognize capitalized runs that start with one of these names as PERSON
    /// even without a preceding honorific. Names are matched case-insensitively.
    pub fn with_given_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.given_names = names
            .into_iter()
            .map(|n| n.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Base form of a single token, lowercased. `sentence_initial` lets a
    /// capitalized common noun ("Daughters") through the suffix rules.
    pub fn lemma(&self, token: &str, sentence_initial: bool) -> String {
        let lower = token.to_lowercase();

        if let Some(&irregular) = self.irregular.get(lower.as_str()) {
            return irregular.to_string();
        }

        let starts_lower = token.chars().next().is_some_and(|c| c.is_lowercase());
        let inflectable = starts_lower || (sentence_initial && !self.given_names.contains(&lower));
        if !inflectable || self.keep.contains(lower.as_str()) || lower.chars().count() <= 3 {
            return lower;
        }

        strip_suffix(&lower)
    }

    fn part_of_speech(&self, token: &str, sentence_initial: bool) -> PartOfSpeech {
        if is_number(token) {
            PartOfSpeech::Number
        } else if is_punctuation(token) {
            PartOfSpeech::Punctuation
        } else if !sentence_initial && token.chars().next().is_some_and(|c| c.is_uppercase()) {
            PartOfSpeech::ProperNoun
        } else {
            PartOfSpeech::Word
        }
    }

    fn is_honorific(&self, token: &str) -> bool {
        self.honorifics.contains(token.to_lowercase().as_str())
    }

    fn person_entities(&self, text: &str, spans: &[Span<'_>]) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut i = 0;

        while i < spans.len() {
            if !is_capitalized_word(spans[i].text) || self.is_honorific(spans[i].text) {
                i += 1;
                continue;
            }

            let start = i;
            while i < spans.len() && is_capitalized_word(spans[i].text) && !self.is_honorific(spans[i].text) {
                i += 1;
            }
            let run = &spans[start..i];

            let after_honorific = previous_word(spans, start)
                .is_some_and(|prev| self.is_honorific(prev));
            let first = run[0].text.to_lowercase();
            let known_name = self.given_names.contains(&first)
                && (run.len() > 1 || !self.common_word_names.contains(first.as_str()));

            if after_honorific || known_name {
                let (s, e) = (run[0].start, run[run.len() - 1].end);
                entities.push(Entity {
                    text: text[s..e].to_string(),
                    start: s,
                    end: e,
                    label: EntityLabel::Person,
                });
            }
        }

        entities
    }
}

impl LanguageAnalyzer for RuleBasedAnalyzer {
    fn analyze(&self, text: &str) -> Analysis {
        let spans = tokenize(text);

        let mut tokens = Vec::with_capacity(spans.len());
        let mut sentence_initial = true;
        for span in &spans {
            let pos = self.part_of_speech(span.text, sentence_initial);
            tokens.push(AnalyzedToken {
                text: span.text.to_string(),
                lemma: self.lemma(span.text, sentence_initial),
                pos,
            });
            sentence_initial = matches!(span.text, "." | "!" | "?" | "…");
        }

        let entities = self.person_entities(text, &spans);
        Analysis { tokens, entities }
    }
}

/// Previous non-"." token, so "Mr. Smith" and "Mr Smith" both see "Mr".
fn previous_word<'a>(spans: &[Span<'a>], index: usize) -> Option<&'a str> {
    spans[..index]
        .iter()
        .rev()
        .find(|s| s.text != ".")
        .map(|s| s.text)
}

fn is_capitalized_word(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|c| c.is_uppercase()) && chars.all(|c| c.is_alphabetic())
}

fn strip_suffix(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is")) {
        return word[..word.len() - 1].to_string();
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if stem.chars().count() >= 3 && stem.chars().any(is_vowel) {
            return restore_stem(stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if stem.chars().count() >= 3 && !stem.ends_with('e') && stem.chars().any(is_vowel) {
            return restore_stem(stem);
        }
    }
    word.to_string()
}

/// Undo consonant doubling ("stopp" -> "stop") and restore a dropped final
/// "e" after v/u/c ("lov" -> "love", "serv" -> "serve").
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];
    if n >= 2 && chars[n - 2] == last && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
        return chars[..n - 1].iter().collect();
    }
    if matches!(last, 'v' | 'u') || (last == 'c' && chars[n - 2] != 'c') {
        return format!("{stem}e");
    }
    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

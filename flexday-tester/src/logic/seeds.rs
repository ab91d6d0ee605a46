use anyhow::{Result, bail};
use flexday_core::derive_stream_seed;
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const PHRASE_DOMAIN: &[u8] = b"flexday/seed-phrase";

/// Resolve CLI seed arguments into numeric seeds.
///
/// Integers are taken as-is (negative values by magnitude). Other tokens are
/// treated as phrases and hashed, so `--seeds alice,bob` is reproducible.
/// Duplicates are dropped in order; no tokens yields the default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let seed = if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            phrase_seed(token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn phrase_seed(phrase: &str) -> u64 {
    let mut tag = PHRASE_DOMAIN.to_vec();
    tag.extend_from_slice(phrase.to_lowercase().as_bytes());
    derive_stream_seed(0, &tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn resolves_numeric_and_phrases() {
        let inputs = tokens(&["42", "-7", "18446744073709551615", "Alice"]);
        let seeds = resolve_seed_inputs(&inputs).unwrap();
        assert_eq!(&seeds[..3], &[42, 7, u64::MAX]);
        assert_eq!(seeds[3], phrase_seed("alice"));
    }

    #[test]
    fn phrases_are_case_insensitive_and_deduped() {
        let seeds = resolve_seed_inputs(&tokens(&["alice", "ALICE", "7", "-7"])).unwrap();
        assert_eq!(seeds.len(), 2);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        let seeds = resolve_seed_inputs(&tokens(&["", " "])).unwrap();
        assert_eq!(seeds, vec![DEFAULT_SEED]);
    }

    #[test]
    fn punctuation_is_rejected() {
        assert!(resolve_seed_inputs(&tokens(&["a b!"])).is_err());
    }
}

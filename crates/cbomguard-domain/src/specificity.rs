//! Winner selection among multiple matching rules.

use crate::policy::Rule;
use std::cmp::Ordering;

/// Pick the single winning rule: highest specificity first, ties broken by
/// the numerically higher (worse) target level id. A full tie keeps the
/// earlier rule, which only affects the finding message, never the level.
pub fn resolve<'a>(candidates: &[&'a Rule]) -> Option<&'a Rule> {
    let mut winner: Option<&'a Rule> = None;
    for &rule in candidates {
        match winner {
            None => winner = Some(rule),
            Some(current) => {
                let ordering = rule
                    .specificity()
                    .cmp(&current.specificity())
                    .then(rule.level_id.cmp(&current.level_id));
                if ordering == Ordering::Greater {
                    winner = Some(rule);
                }
            }
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Predicate;
    use crate::policy::{AlgorithmPredicates, RulePredicates};

    fn algorithm_rule(description: &str, level_id: i32, fields: u32) -> Rule {
        let mut predicates = AlgorithmPredicates::default();
        // Constrain the first `fields` predicate slots to control specificity.
        let slots: [&mut Option<Predicate>; 4] = [
            &mut predicates.primitive,
            &mut predicates.mode,
            &mut predicates.padding,
            &mut predicates.curve,
        ];
        for slot in slots.into_iter().take(fields as usize) {
            *slot = Some(Predicate::Text("x".to_string()));
        }
        Rule {
            name: None,
            description: description.to_string(),
            level_id,
            oid: None,
            predicates: RulePredicates::Algorithm(predicates),
        }
    }

    #[test]
    fn highest_specificity_wins_regardless_of_order() {
        let broad = algorithm_rule("broad", 5, 1);
        let narrow = algorithm_rule("narrow", 1, 3);

        let winner = resolve(&[&broad, &narrow]).expect("winner");
        assert_eq!(winner.description, "narrow");
        let winner = resolve(&[&narrow, &broad]).expect("winner");
        assert_eq!(winner.description, "narrow");
    }

    #[test]
    fn equal_specificity_prefers_worse_level() {
        let lenient = algorithm_rule("lenient", 1, 2);
        let strict = algorithm_rule("strict", 4, 2);

        let winner = resolve(&[&lenient, &strict]).expect("winner");
        assert_eq!(winner.description, "strict");
        let winner = resolve(&[&strict, &lenient]).expect("winner");
        assert_eq!(winner.description, "strict");
    }

    #[test]
    fn single_match_wins_unconditionally() {
        let only = algorithm_rule("only", 1, 0);
        let winner = resolve(&[&only]).expect("winner");
        assert_eq!(winner.description, "only");
    }

    #[test]
    fn no_candidates_yields_none() {
        assert!(resolve(&[]).is_none());
    }

    #[test]
    fn full_tie_keeps_first_rule() {
        let first = algorithm_rule("first", 3, 2);
        let second = algorithm_rule("second", 3, 2);
        let winner = resolve(&[&first, &second]).expect("winner");
        assert_eq!(winner.description, "first");
    }
}

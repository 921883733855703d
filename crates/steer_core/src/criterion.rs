//! Atomic truth facts ([`Criterion`]) and their Pass/Fail/Inconclusive
//! rollup ([`Evaluation`]), spec §3 invariants.

/// A named boolean predicate attached to a Test, Configuration, or Report.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Criterion {
    pub basis: String,
    pub result: bool,
}

impl Criterion {
    pub fn new(basis: impl Into<String>, result: bool) -> Self {
        Self { basis: basis.into(), result }
    }
}

/// Three-valued rollup tag. `Inconclusive` is reserved for aggregation
/// failures (spec §4.4/§4.5), never produced by the plain AND-over-criteria
/// rule in [`evaluate`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Pass,
    Fail,
    Inconclusive,
}

impl Evaluation {
    pub fn is_pass(self) -> bool {
        matches!(self, Evaluation::Pass)
    }
}

/// `Pass` iff every criterion's `result` is `true`; `Fail` otherwise. An
/// empty criteria list evaluates to `Pass` (vacuous AND), matching the
/// teacher's gate-rollup convention of starting from `true`.
pub fn evaluate(criteria: &[Criterion]) -> Evaluation {
    if criteria.iter().all(|c| c.result) {
        Evaluation::Pass
    } else {
        Evaluation::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_pass() {
        assert_eq!(evaluate(&[]), Evaluation::Pass);
    }

    #[test]
    fn any_failing_criterion_fails() {
        let c = vec![Criterion::new("a", true), Criterion::new("b", false)];
        assert_eq!(evaluate(&c), Evaluation::Fail);
    }

    #[test]
    fn all_passing_criteria_pass() {
        let c = vec![Criterion::new("a", true), Criterion::new("b", true)];
        assert_eq!(evaluate(&c), Evaluation::Pass);
    }
}

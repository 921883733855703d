//! Confusion matrix and its 22 derived statistics (spec §4.5). NaN/∞ are
//! legitimate outputs on degenerate inputs and are preserved, never coerced
//! to zero.

use steer_core::ValueSet;

/// The four confusion-matrix cells for one Configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub tp: u64,
    pub tn: u64,
    pub fp: u64,
    pub fn_: u64,
}

/// Builds the confusion matrix from actual vs. predicted pass/fail counts.
/// Cells are all zero unless `actual_test_count >= predicted_pass_count +
/// predicted_fail_count` (spec §4.5, §8 invariant 4).
pub fn confusion_matrix(
    actual_test_count: u64,
    actual_pass_count: u64,
    actual_fail_count: u64,
    predicted_pass_count: u64,
    predicted_fail_count: u64,
) -> ConfusionMatrix {
    if actual_test_count < predicted_pass_count + predicted_fail_count {
        return ConfusionMatrix::default();
    }
    let tp = actual_pass_count.min(predicted_pass_count);
    let tn = actual_fail_count.min(predicted_fail_count);
    let fp = predicted_pass_count - tp;
    let fn_ = predicted_fail_count - tn;
    ConfusionMatrix { tp, tn, fp, fn_ }
}

/// The 22 standard confusion-matrix statistics, computed without coercing
/// NaN/∞ results from degenerate (zero-denominator) inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfusionStats {
    pub tpr: f64,
    pub tnr: f64,
    pub ppv: f64,
    pub npv: f64,
    pub fnr: f64,
    pub fpr: f64,
    pub fdr: f64,
    pub for_: f64,
    pub prevalence_threshold: f64,
    pub threat_score: f64,
    pub accuracy: f64,
    pub balanced_accuracy: f64,
    pub f1: f64,
    pub mcc: f64,
    pub fowlkes_mallows: f64,
    pub informedness: f64,
    pub markedness: f64,
    pub error_rate: f64,
    pub prevalence: f64,
    pub lr_plus: f64,
    pub lr_minus: f64,
    pub dor: f64,
}

impl ConfusionMatrix {
    pub fn total(&self) -> f64 {
        (self.tp + self.tn + self.fp + self.fn_) as f64
    }

    pub fn stats(&self) -> ConfusionStats {
        let (tp, tn, fp, fn_) = (self.tp as f64, self.tn as f64, self.fp as f64, self.fn_ as f64);
        let total = self.total();

        let tpr = tp / (tp + fn_);
        let tnr = tn / (tn + fp);
        let ppv = tp / (tp + fp);
        let npv = tn / (tn + fn_);
        let fnr = 1.0 - tpr;
        let fpr = 1.0 - tnr;
        let fdr = 1.0 - ppv;
        let for_ = 1.0 - npv;
        let prevalence_threshold = ((tpr * fpr).sqrt() - fpr) / (tpr - fpr);
        let threat_score = tp / (tp + fn_ + fp);
        let accuracy = (tp + tn) / total;
        let balanced_accuracy = (tpr + tnr) / 2.0;
        let f1 = 2.0 * ppv * tpr / (ppv + tpr);
        let mcc_num = tp * tn - fp * fn_;
        let mcc_den = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();
        let mcc = mcc_num / mcc_den;
        let fowlkes_mallows = (ppv * tpr).sqrt();
        let informedness = tpr + tnr - 1.0;
        let markedness = ppv + npv - 1.0;
        let error_rate = (fp + fn_) / total;
        let prevalence = (tp + fn_) / total;
        let lr_plus = tpr / fpr;
        let lr_minus = fnr / tnr;
        let dor = lr_plus / lr_minus;

        ConfusionStats {
            tpr,
            tnr,
            ppv,
            npv,
            fnr,
            fpr,
            fdr,
            for_,
            prevalence_threshold,
            threat_score,
            accuracy,
            balanced_accuracy,
            f1,
            mcc,
            fowlkes_mallows,
            informedness,
            markedness,
            error_rate,
            prevalence,
            lr_plus,
            lr_minus,
            dor,
        }
    }
}

/// Renders [`ConfusionStats`] as a single `f64` [`ValueSet`] named
/// `"confusionMatrixStatistics"`, in the field order declared on the struct.
pub fn stats_to_value_set(stats: &ConfusionStats) -> ValueSet {
    let mut vs = ValueSet::new("confusionMatrixStatistics", steer_core::DataType::F64, Some(12), None)
        .expect("static name/data_type are always valid");
    let entries: [(&str, f64); 22] = [
        ("TPR", stats.tpr),
        ("TNR", stats.tnr),
        ("PPV", stats.ppv),
        ("NPV", stats.npv),
        ("FNR", stats.fnr),
        ("FPR", stats.fpr),
        ("FDR", stats.fdr),
        ("FOR", stats.for_),
        ("prevalenceThreshold", stats.prevalence_threshold),
        ("threatScore", stats.threat_score),
        ("accuracy", stats.accuracy),
        ("balancedAccuracy", stats.balanced_accuracy),
        ("F1", stats.f1),
        ("MCC", stats.mcc),
        ("FowlkesMallows", stats.fowlkes_mallows),
        ("informedness", stats.informedness),
        ("markedness", stats.markedness),
        ("errorRate", stats.error_rate),
        ("prevalence", stats.prevalence),
        ("LRPlus", stats.lr_plus),
        ("LRMinus", stats.lr_minus),
        ("DOR", stats.dor),
    ];
    for (label, value) in entries {
        vs.add_value(label, format_f64(value)).expect("finite or NaN/inf text always parses as F64");
    }
    vs
}

fn format_f64(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        format!("{v:.12}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_matrix_under_sufficient_actual_count() {
        let m = confusion_matrix(100, 99, 1, 99, 1);
        assert_eq!(m, ConfusionMatrix { tp: 99, tn: 1, fp: 0, fn_: 0 });
    }

    #[test]
    fn degenerate_zero_counts_stay_zero() {
        let m = confusion_matrix(0, 0, 0, 0, 0);
        assert_eq!(m, ConfusionMatrix::default());
        let stats = m.stats();
        assert!(stats.tpr.is_nan());
        assert!(stats.accuracy.is_nan());
    }

    #[test]
    fn perfect_classifier_gives_mcc_of_one() {
        let m = confusion_matrix(100, 90, 10, 90, 10);
        let stats = m.stats();
        assert!((stats.mcc - 1.0).abs() < 1e-9);
        assert!((stats.accuracy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn insufficient_actual_count_zeroes_all_cells() {
        let m = confusion_matrix(5, 3, 2, 10, 10);
        assert_eq!(m, ConfusionMatrix::default());
    }
}

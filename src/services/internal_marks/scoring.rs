//! CIE（Continuous Internal Evaluation）计分
//!
//! | 类型 | 分项上限 |
//! |---|---|
//! | theory | test1/test2/assignment1/seminar2 ≤ 25 |
//! | theoryLab | theoryTest1/2 ≤ 25，theoryAssignment1/theorySeminar/conduction ≤ 10，record ≤ 5，labTest ≤ 50 |
//! | lab | conductionViva ≤ 15，recordJournal ≤ 10，labTestOnly ≤ 100 |
//!
//! 结果封顶 50，保留两位小数。缺失分项按 0 计。

use crate::models::courses::entities::SubjectType;
use crate::models::internal_marks::entities::CieComponents;

pub const MAX_CIE: f64 = 50.0;

/// 某课程类型参与计分的分项：(字段名, 上限, 取值)
pub fn components_for(
    subject_type: SubjectType,
    c: &CieComponents,
) -> Vec<(&'static str, f64, Option<f64>)> {
    match subject_type {
        SubjectType::Theory => vec![
            ("test1", 25.0, c.test1),
            ("test2", 25.0, c.test2),
            ("assignment1", 25.0, c.assignment1),
            ("seminar2", 25.0, c.seminar2),
        ],
        SubjectType::TheoryLab => vec![
            ("theoryTest1", 25.0, c.theory_test1),
            ("theoryTest2", 25.0, c.theory_test2),
            ("theoryAssignment1", 10.0, c.theory_assignment1),
            ("theorySeminar", 10.0, c.theory_seminar),
            ("conduction", 10.0, c.conduction),
            ("record", 5.0, c.record),
            ("labTest", 50.0, c.lab_test),
        ],
        SubjectType::Lab => vec![
            ("conductionViva", 15.0, c.conduction_viva),
            ("recordJournal", 10.0, c.record_journal),
            ("labTestOnly", 100.0, c.lab_test_only),
        ],
    }
}

/// 导入导出表格中的列名，顺序与 [`components_for`] 一致
pub fn column_names(subject_type: SubjectType) -> &'static [&'static str] {
    match subject_type {
        SubjectType::Theory => &["IA-1", "IA-2", "Assignment", "Seminar"],
        SubjectType::TheoryLab => &[
            "Theory IA-1",
            "Theory IA-2",
            "Theory Assignment",
            "Theory Seminar",
            "Conduction",
            "Record",
            "Lab Test",
        ],
        SubjectType::Lab => &["Conduction & Viva", "Record/Journal", "Lab Test"],
    }
}

/// 按 [`column_names`] 的顺序组装分项
pub fn from_values(subject_type: SubjectType, values: &[Option<f64>]) -> CieComponents {
    let at = |i: usize| values.get(i).copied().flatten();
    match subject_type {
        SubjectType::Theory => CieComponents {
            test1: at(0),
            test2: at(1),
            assignment1: at(2),
            seminar2: at(3),
            ..Default::default()
        },
        SubjectType::TheoryLab => CieComponents {
            theory_test1: at(0),
            theory_test2: at(1),
            theory_assignment1: at(2),
            theory_seminar: at(3),
            conduction: at(4),
            record: at(5),
            lab_test: at(6),
            ..Default::default()
        },
        SubjectType::Lab => CieComponents {
            conduction_viva: at(0),
            record_journal: at(1),
            lab_test_only: at(2),
            ..Default::default()
        },
    }
}

/// 分项越界时返回 (字段名, 错误信息)
pub fn validate_components(
    subject_type: SubjectType,
    components: &CieComponents,
) -> Result<(), (&'static str, String)> {
    for (field, max, value) in components_for(subject_type, components) {
        if let Some(v) = value
            && (!v.is_finite() || !(0.0..=max).contains(&v))
        {
            return Err((field, format!("{field} must be between 0 and {max}")));
        }
    }
    Ok(())
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn calculate_cie(subject_type: SubjectType, c: &CieComponents) -> f64 {
    let v = |x: Option<f64>| x.unwrap_or(0.0);

    let raw = match subject_type {
        SubjectType::Theory => {
            (v(c.test1) + v(c.test2)) / 2.0 + (v(c.assignment1) + v(c.seminar2)) / 2.0
        }
        SubjectType::TheoryLab => {
            let theory_tests = (v(c.theory_test1) + v(c.theory_test2)) / 2.0 / 25.0 * 15.0;
            let theory_work = (v(c.theory_assignment1) + v(c.theory_seminar)) / 20.0 * 10.0;
            let lab_work = v(c.conduction) + v(c.record);
            let lab_test = v(c.lab_test) / 50.0 * 10.0;
            theory_tests + theory_work + lab_work + lab_test
        }
        SubjectType::Lab => {
            (v(c.conduction_viva) + 5.0) + v(c.record_journal) + v(c.lab_test_only) / 100.0 * 20.0
        }
    };

    round2(raw.min(MAX_CIE))
}

/// 只保留该课程类型相关的分项
pub fn retain_relevant(subject_type: SubjectType, c: &CieComponents) -> CieComponents {
    match subject_type {
        SubjectType::Theory => CieComponents {
            test1: c.test1,
            test2: c.test2,
            assignment1: c.assignment1,
            seminar2: c.seminar2,
            ..Default::default()
        },
        SubjectType::TheoryLab => CieComponents {
            theory_test1: c.theory_test1,
            theory_test2: c.theory_test2,
            theory_assignment1: c.theory_assignment1,
            theory_seminar: c.theory_seminar,
            conduction: c.conduction,
            record: c.record,
            lab_test: c.lab_test,
            ..Default::default()
        },
        SubjectType::Lab => CieComponents {
            conduction_viva: c.conduction_viva,
            record_journal: c.record_journal,
            lab_test_only: c.lab_test_only,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theory_formula() {
        let c = CieComponents {
            test1: Some(20.0),
            test2: Some(20.0),
            assignment1: Some(15.0),
            seminar2: Some(15.0),
            ..Default::default()
        };
        assert_eq!(calculate_cie(SubjectType::Theory, &c), 35.0);
    }

    #[test]
    fn test_lab_formula() {
        let c = CieComponents {
            conduction_viva: Some(10.0),
            record_journal: Some(8.0),
            lab_test_only: Some(80.0),
            ..Default::default()
        };
        // (10 + 5) + 8 + 80/100*20 = 39
        assert_eq!(calculate_cie(SubjectType::Lab, &c), 39.0);
    }

    #[test]
    fn test_theory_lab_formula() {
        let c = CieComponents {
            theory_test1: Some(20.0),
            theory_test2: Some(22.0),
            theory_assignment1: Some(8.0),
            theory_seminar: Some(9.0),
            conduction: Some(9.0),
            record: Some(4.0),
            lab_test: Some(40.0),
            ..Default::default()
        };
        // 21/25*15 = 12.6, 17/20*10 = 8.5, 9+4 = 13, 40/50*10 = 8
        assert_eq!(calculate_cie(SubjectType::TheoryLab, &c), 42.1);
    }

    #[test]
    fn test_result_is_capped_at_fifty() {
        let c = CieComponents {
            test1: Some(25.0),
            test2: Some(25.0),
            assignment1: Some(25.0),
            seminar2: Some(25.0),
            ..Default::default()
        };
        assert_eq!(calculate_cie(SubjectType::Theory, &c), 50.0);

        let lab = CieComponents {
            conduction_viva: Some(15.0),
            record_journal: Some(10.0),
            lab_test_only: Some(100.0),
            ..Default::default()
        };
        assert_eq!(calculate_cie(SubjectType::Lab, &lab), 50.0);
    }

    #[test]
    fn test_missing_components_count_as_zero() {
        let c = CieComponents {
            test1: Some(21.0),
            ..Default::default()
        };
        assert_eq!(calculate_cie(SubjectType::Theory, &c), 10.5);
        assert_eq!(calculate_cie(SubjectType::Lab, &CieComponents::default()), 5.0);
    }

    #[test]
    fn test_range_validation() {
        let c = CieComponents {
            record: Some(6.0),
            ..Default::default()
        };
        let (field, _) = validate_components(SubjectType::TheoryLab, &c).unwrap_err();
        assert_eq!(field, "record");
        // theory 不看 record
        assert!(validate_components(SubjectType::Theory, &c).is_ok());

        let negative = CieComponents {
            test1: Some(-1.0),
            ..Default::default()
        };
        assert!(validate_components(SubjectType::Theory, &negative).is_err());
    }

    #[test]
    fn test_columns_line_up_with_components() {
        for subject_type in SubjectType::ALL {
            let values: Vec<Option<f64>> = (1..=column_names(*subject_type).len())
                .map(|i| Some(i as f64))
                .collect();
            let c = from_values(*subject_type, &values);
            let read_back: Vec<Option<f64>> = components_for(*subject_type, &c)
                .into_iter()
                .map(|(_, _, v)| v)
                .collect();
            assert_eq!(read_back, values);
        }
    }

    #[test]
    fn test_retain_relevant_drops_other_types() {
        let c = CieComponents {
            test1: Some(10.0),
            lab_test_only: Some(90.0),
            ..Default::default()
        };
        let kept = retain_relevant(SubjectType::Theory, &c);
        assert_eq!(kept.test1, Some(10.0));
        assert_eq!(kept.lab_test_only, None);
    }
}

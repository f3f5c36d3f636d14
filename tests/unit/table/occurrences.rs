use super::*;

#[test]
fn worksheet_table_shape_and_totals() {
    let table = OccurrenceTable::worksheet();
    assert_eq!(table.page_count(), 39);
    assert_eq!(table.last_page(), 38);

    let totals = table.totals();
    assert_eq!(
        totals,
        OccurrenceTotals {
            wo: 64,
            shi: 48,
            hen: 17,
            ni: 51,
        }
    );
    for target in Target::ALL {
        let column_sum: u32 = WORKSHEET_COUNTS.iter().map(|r| r[target.index()]).sum();
        assert_eq!(totals.get(target), column_sum);
        assert_eq!(table.occurrences(target).len() as u32, column_sum);
    }
}

#[test]
fn occurrences_are_page_then_index_ordered() {
    let table = OccurrenceTable::from_rows(vec![[2, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 3]]).unwrap();
    assert_eq!(
        table.occurrences(Target::Wo),
        vec![
            Occurrence { page: 0, index: 0 },
            Occurrence { page: 0, index: 1 },
            Occurrence { page: 2, index: 0 },
        ]
    );
    assert_eq!(
        table.occurrences(Target::Ni),
        vec![
            Occurrence { page: 2, index: 0 },
            Occurrence { page: 2, index: 1 },
            Occurrence { page: 2, index: 2 },
        ]
    );
    assert!(table.occurrences(Target::Hen).is_empty());
}

#[test]
fn count_outside_table_is_zero() {
    let table = OccurrenceTable::worksheet();
    assert_eq!(table.count(38, Target::Shi), 11);
    assert_eq!(table.count(39, Target::Shi), 0);
}

#[test]
fn empty_table_is_rejected() {
    assert!(OccurrenceTable::from_rows(Vec::new()).is_err());
}

#[test]
fn totals_serialize_in_column_order() {
    let json = serde_json::to_string(&OccurrenceTable::worksheet().totals()).unwrap();
    assert_eq!(json, r#"{"wo":64,"shi":48,"hen":17,"ni":51}"#);
}

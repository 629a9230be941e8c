use macro_forecast::data::{IndicatorTable, RawRecord};
use macro_forecast::merge::merge;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn table(years: &[i32], offset: f64) -> IndicatorTable {
    let records: Vec<RawRecord> = years
        .iter()
        .map(|&y| RawRecord::new(y, Some(offset + y as f64)))
        .collect();
    IndicatorTable::build(&records)
}

#[test]
fn test_year_set_is_union() {
    let tables = vec![
        ("A".to_string(), table(&[2010, 2011], 0.0)),
        ("B".to_string(), table(&[2011, 2012], 0.5)),
    ];

    let merged = merge(&tables).unwrap();

    assert_eq!(merged.years(), vec![2010, 2011, 2012]);
    assert_eq!(merged.indicators(), &["A".to_string(), "B".to_string()]);
}

#[test]
fn test_missing_cells_only_where_table_lacks_year() {
    let a_years = [2000, 2003, 2004, 2007];
    let b_years = [2001, 2003, 2005, 2006, 2007];
    let c_years: [i32; 0] = [];
    let tables = vec![
        ("A".to_string(), table(&a_years, 0.0)),
        ("B".to_string(), table(&b_years, 0.0)),
        ("C".to_string(), table(&c_years, 0.0)),
    ];

    let merged = merge(&tables).unwrap();

    let union: BTreeSet<i32> = a_years.iter().chain(b_years.iter()).copied().collect();
    assert_eq!(merged.years(), union.into_iter().collect::<Vec<_>>());

    for (name, years) in [("A", &a_years[..]), ("B", &b_years[..]), ("C", &c_years[..])] {
        for row_year in merged.years() {
            let cell = merged.value(name, row_year);
            if years.contains(&row_year) {
                assert_eq!(cell, Some(row_year as f64));
            } else {
                assert_eq!(cell, None, "{} should be unset in {}", name, row_year);
            }
        }
    }
}

#[test]
fn test_all_empty_gives_empty_table() {
    let tables = vec![
        ("A".to_string(), IndicatorTable::default()),
        ("B".to_string(), IndicatorTable::default()),
    ];

    let merged = merge(&tables).unwrap();

    assert!(merged.is_empty());
    assert_eq!(merged.last_year(), None);
    assert_eq!(merged.indicators().len(), 2);
}

#[test]
fn test_observations_skip_unset() {
    let tables = vec![
        ("A".to_string(), table(&[2010, 2012], 0.0)),
        ("B".to_string(), table(&[2011], 0.0)),
    ];
    let merged = merge(&tables).unwrap();

    let observed = merged.observations("A").unwrap();
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[1].year, 2012);
    assert!(merged.observations("missing").is_none());
}

//! Gap filling.

use polars::prelude::*;

/// Forward fill missing values in date order.
///
/// Sorts by `date_col`, casts each column in `columns` to float and carries
/// the last observed value forward over nulls. Leading nulls stay null.
///
/// # Arguments
/// * `lf` - Input LazyFrame
/// * `columns` - Column names to fill
/// * `date_col` - Column to sort by
///
/// # Returns
/// LazyFrame with filled columns.
pub fn fill_missing(lf: LazyFrame, columns: &[&str], date_col: &str) -> LazyFrame {
    let sort_options = SortMultipleOptions::new().with_maintain_order(true);
    let mut lf = lf.sort([date_col], sort_options);

    for &name in columns {
        lf = lf.with_column(col(name).cast(DataType::Float64).forward_fill(None).alias(name));
    }

    lf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_missing_sorts_then_fills() {
        let df = df! {
            "date" => &["2024-01-03", "2024-01-01", "2024-01-02", "2024-01-04"],
            "fund" => &[None, Some(0.01), None, Some(0.03)],
        }
        .unwrap()
        .lazy();

        let result = fill_missing(df, &["fund"], "date").collect().unwrap();

        let values: Vec<Option<f64>> =
            result.column("fund").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0.01), Some(0.01), Some(0.01), Some(0.03)]);
    }

    #[test]
    fn fill_missing_multiple_columns() {
        let df = df! {
            "date" => &[1, 2, 3],
            "val1" => &[Some(1.0), None, Some(3.0)],
            "val2" => &[None, Some(2.0), None],
        }
        .unwrap()
        .lazy();

        let result = fill_missing(df, &["val1", "val2"], "date").collect().unwrap();

        assert_eq!(result.column("val1").unwrap().f64().unwrap().get(1), Some(1.0));
        assert_eq!(result.column("val2").unwrap().f64().unwrap().get(0), None);
        assert_eq!(result.column("val2").unwrap().f64().unwrap().get(2), Some(2.0));
    }
}
